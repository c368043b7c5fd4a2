use std::fmt;
use std::ops::RangeInclusive;

// ---------------------------------------------------------------------------
// Feature – one column of the model's training schema
// ---------------------------------------------------------------------------

/// Number of input columns the price model consumes.
pub const FEATURE_COUNT: usize = 13;

/// How a feature is entered in the form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputKind {
    /// Free floating-point entry.
    Float,
    /// Whole numbers only.
    Integer,
    /// Pick one of a fixed set of values.
    Choice(&'static [u8]),
}

/// A housing feature, in training-schema order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Feature {
    Crim,
    Zn,
    Indus,
    Chas,
    Nox,
    Rm,
    Age,
    Dis,
    Rad,
    Tax,
    Ptratio,
    B,
    Lstat,
}

impl Feature {
    /// Every feature in the exact column order the model was trained on.
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Crim,
        Feature::Zn,
        Feature::Indus,
        Feature::Chas,
        Feature::Nox,
        Feature::Rm,
        Feature::Age,
        Feature::Dis,
        Feature::Rad,
        Feature::Tax,
        Feature::Ptratio,
        Feature::B,
        Feature::Lstat,
    ];

    /// Column name as it appears in the training data.
    pub fn name(self) -> &'static str {
        match self {
            Feature::Crim => "CRIM",
            Feature::Zn => "ZN",
            Feature::Indus => "INDUS",
            Feature::Chas => "CHAS",
            Feature::Nox => "NOX",
            Feature::Rm => "RM",
            Feature::Age => "AGE",
            Feature::Dis => "DIS",
            Feature::Rad => "RAD",
            Feature::Tax => "TAX",
            Feature::Ptratio => "PTRATIO",
            Feature::B => "B",
            Feature::Lstat => "LSTAT",
        }
    }

    /// Short description shown as a tooltip next to the input.
    pub fn help(self) -> &'static str {
        match self {
            Feature::Crim => "Per capita crime rate",
            Feature::Zn => "Residential land zoned",
            Feature::Indus => "Non-retail business acres",
            Feature::Chas => "Bounds Charles River",
            Feature::Nox => "Nitric oxide concentration",
            Feature::Rm => "Avg number of rooms",
            Feature::Age => "Proportion of old units",
            Feature::Dis => "Distance to employment centers",
            Feature::Rad => "Access to radial highways",
            Feature::Tax => "Property-tax rate",
            Feature::Ptratio => "Pupil-teacher ratio",
            Feature::B => "1000(Bk - 0.63)^2",
            Feature::Lstat => "% lower status population",
        }
    }

    /// Value the form starts with.
    pub fn default_value(self) -> f64 {
        match self {
            Feature::Crim => 0.1,
            Feature::Zn => 12.5,
            Feature::Indus => 7.5,
            Feature::Chas => 0.0,
            Feature::Nox => 0.5,
            Feature::Rm => 6.0,
            Feature::Age => 50.0,
            Feature::Dis => 4.0,
            Feature::Rad => 4.0,
            Feature::Tax => 300.0,
            Feature::Ptratio => 18.0,
            Feature::B => 396.9,
            Feature::Lstat => 12.5,
        }
    }

    pub fn kind(self) -> InputKind {
        match self {
            Feature::Chas => InputKind::Choice(&[0, 1]),
            Feature::Rad => InputKind::Integer,
            _ => InputKind::Float,
        }
    }

    /// Widget-level bounds. Only CHAS and NOX are constrained.
    pub fn bounds(self) -> Option<RangeInclusive<f64>> {
        match self {
            Feature::Chas | Feature::Nox => Some(0.0..=1.0),
            _ => None,
        }
    }

    /// Position of this feature in the assembled record.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Column names in training-schema order.
pub fn feature_names() -> Vec<String> {
    Feature::ALL.iter().map(|f| f.name().to_string()).collect()
}

// ---------------------------------------------------------------------------
// FeatureVector – the current form state
// ---------------------------------------------------------------------------

/// The thirteen housing inputs collected by the form.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pub crim: f64,
    pub zn: f64,
    pub indus: f64,
    /// 1 if the tract bounds the Charles River, else 0.
    pub chas: u8,
    /// Kept within [0, 1]. Non-finite input resets it to the default.
    pub nox: f64,
    pub rm: f64,
    pub age: f64,
    pub dis: f64,
    pub rad: i64,
    pub tax: f64,
    pub ptratio: f64,
    pub b: f64,
    pub lstat: f64,
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self {
            crim: Feature::Crim.default_value(),
            zn: Feature::Zn.default_value(),
            indus: Feature::Indus.default_value(),
            chas: 0,
            nox: Feature::Nox.default_value(),
            rm: Feature::Rm.default_value(),
            age: Feature::Age.default_value(),
            dis: Feature::Dis.default_value(),
            rad: 4,
            tax: Feature::Tax.default_value(),
            ptratio: Feature::Ptratio.default_value(),
            b: Feature::B.default_value(),
            lstat: Feature::Lstat.default_value(),
        }
    }
}

/// Mutable access to a single field, typed by how the form edits it.
pub enum FieldMut<'a> {
    Float(&'a mut f64),
    Integer(&'a mut i64),
    Choice(&'a mut u8),
}

impl FeatureVector {
    /// Read one field as a model input.
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Crim => self.crim,
            Feature::Zn => self.zn,
            Feature::Indus => self.indus,
            Feature::Chas => f64::from(self.chas),
            Feature::Nox => self.nox,
            Feature::Rm => self.rm,
            Feature::Age => self.age,
            Feature::Dis => self.dis,
            Feature::Rad => self.rad as f64,
            Feature::Tax => self.tax,
            Feature::Ptratio => self.ptratio,
            Feature::B => self.b,
            Feature::Lstat => self.lstat,
        }
    }

    /// Write one field, applying the same bounds the form widgets enforce:
    /// NOX is clamped to [0, 1] (a non-finite value falls back to the
    /// default), CHAS snaps to 0 or 1 and RAD is rounded. Every other field
    /// is stored unchecked.
    pub fn set(&mut self, feature: Feature, value: f64) {
        match self.field_mut(feature) {
            FieldMut::Float(slot) => {
                *slot = match feature.bounds() {
                    Some(_) if !value.is_finite() => feature.default_value(),
                    Some(range) => value.clamp(*range.start(), *range.end()),
                    None => value,
                };
            }
            FieldMut::Integer(slot) => *slot = value.round() as i64,
            FieldMut::Choice(slot) => *slot = u8::from(value >= 0.5),
        }
    }

    /// Borrow one field for editing.
    pub fn field_mut(&mut self, feature: Feature) -> FieldMut<'_> {
        match feature {
            Feature::Crim => FieldMut::Float(&mut self.crim),
            Feature::Zn => FieldMut::Float(&mut self.zn),
            Feature::Indus => FieldMut::Float(&mut self.indus),
            Feature::Chas => FieldMut::Choice(&mut self.chas),
            Feature::Nox => FieldMut::Float(&mut self.nox),
            Feature::Rm => FieldMut::Float(&mut self.rm),
            Feature::Age => FieldMut::Float(&mut self.age),
            Feature::Dis => FieldMut::Float(&mut self.dis),
            Feature::Rad => FieldMut::Integer(&mut self.rad),
            Feature::Tax => FieldMut::Float(&mut self.tax),
            Feature::Ptratio => FieldMut::Float(&mut self.ptratio),
            Feature::B => FieldMut::Float(&mut self.b),
            Feature::Lstat => FieldMut::Float(&mut self.lstat),
        }
    }

    /// All values in training-schema order.
    pub fn values(&self) -> [f64; FEATURE_COUNT] {
        Feature::ALL.map(|f| self.get(f))
    }

    /// Assemble the single-row record passed to the model.
    pub fn to_frame(&self) -> FeatureFrame {
        FeatureFrame::new(feature_names(), vec![self.values().to_vec()])
    }
}

// ---------------------------------------------------------------------------
// FeatureFrame – tabular model input
// ---------------------------------------------------------------------------

/// Named columns plus rows of numeric cells, the shape a fitted estimator
/// expects at prediction time.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureFrame {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl FeatureFrame {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Self {
        Self { columns, rows }
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_assemble_in_training_order() {
        let frame = FeatureVector::default().to_frame();
        assert_eq!(
            frame.columns,
            vec![
                "CRIM", "ZN", "INDUS", "CHAS", "NOX", "RM", "AGE", "DIS", "RAD", "TAX",
                "PTRATIO", "B", "LSTAT"
            ]
        );
        assert_eq!(frame.n_rows(), 1);
        assert_eq!(
            frame.rows[0],
            vec![0.1, 12.5, 7.5, 0.0, 0.5, 6.0, 50.0, 4.0, 4.0, 300.0, 18.0, 396.9, 12.5]
        );
    }

    #[test]
    fn bounded_inputs_always_yield_thirteen_fields() {
        for chas in [0.0, 1.0] {
            for nox in [0.0, 0.25, 0.5, 1.0] {
                let mut v = FeatureVector::default();
                v.set(Feature::Chas, chas);
                v.set(Feature::Nox, nox);
                let frame = v.to_frame();
                assert_eq!(frame.n_columns(), FEATURE_COUNT);
                assert_eq!(frame.rows[0].len(), FEATURE_COUNT);
                assert_eq!(frame.rows[0][Feature::Chas.index()], chas);
                assert_eq!(frame.rows[0][Feature::Nox.index()], nox);
            }
        }
    }

    #[test]
    fn set_applies_widget_bounds() {
        let mut v = FeatureVector::default();
        v.set(Feature::Nox, 1.7);
        assert_eq!(v.nox, 1.0);
        v.set(Feature::Nox, -0.2);
        assert_eq!(v.nox, 0.0);
        v.set(Feature::Chas, 1.0);
        assert_eq!(v.chas, 1);
        v.set(Feature::Rad, 7.6);
        assert_eq!(v.rad, 8);
    }

    #[test]
    fn non_finite_nox_falls_back_to_default() {
        let mut v = FeatureVector::default();
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            v.set(Feature::Nox, 0.9);
            v.set(Feature::Nox, bad);
            assert_eq!(v.get(Feature::Nox), Feature::Nox.default_value());
            assert!((0.0..=1.0).contains(&v.nox));
        }
    }

    #[test]
    fn unbounded_fields_pass_through() {
        let mut v = FeatureVector::default();
        v.set(Feature::Crim, -42.0);
        v.set(Feature::Tax, 1.0e9);
        assert_eq!(v.get(Feature::Crim), -42.0);
        assert_eq!(v.get(Feature::Tax), 1.0e9);
    }

    #[test]
    fn get_and_set_cover_every_feature() {
        let mut v = FeatureVector::default();
        for (i, f) in Feature::ALL.iter().enumerate() {
            assert_eq!(f.index(), i);
            assert_eq!(v.get(*f), f.default_value());
            let value = if f.bounds().is_some() { 1.0 } else { 3.0 };
            v.set(*f, value);
            assert_eq!(v.get(*f), value);
        }
    }
}
