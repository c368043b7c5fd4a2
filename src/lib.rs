//! Real Estate Price Dashboard
//!
//! Loads a fitted house-price model, collects the thirteen housing features
//! through a form and shows the predicted price next to feature-importance
//! and room-count charts.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod model;
pub mod predict;
pub mod state;
pub mod ui;
