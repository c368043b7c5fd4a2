/// Data layer: form inputs and the synthetic sample.
///
/// Architecture:
/// ```text
///   form widgets
///        │
///        ▼
///   ┌───────────────┐
///   │ FeatureVector  │  13 named fields, widget bounds
///   └───────────────┘
///        │  to_frame()
///        ▼
///   ┌───────────────┐
///   │ FeatureFrame   │  named columns in training order, one row
///   └───────────────┘
///
///   sample: Normal(mean, sd) → histogram bins + KDE curve
/// ```
pub mod features;
pub mod sample;
