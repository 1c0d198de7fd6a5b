//! Pressure sweep: predicted temperature at evenly spaced pressures.

use serde_json::Value;

use super::resolver::coerce_number;
use crate::features::{FeatureRecord, PRESSURE_FIELD};
use crate::inference::{PredictError, Predictor};

/// Sweep parameters rejected before any inference runs.
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    #[error("{name} must be a finite number (got {value})")]
    NonNumericBound { name: &'static str, value: Value },
    #[error("pressure range {p_min}..{p_max} is too wide to sample")]
    RangeTooWide { p_min: f64, p_max: f64 },
    #[error("n_points must be a positive integer (got {0})")]
    NotAnInteger(Value),
    #[error("n_points must be at least 2 (got {0})")]
    TooFewPoints(u64),
    #[error("n_points must be at most {max} (got {n})")]
    TooManyPoints { n: u64, max: usize },
}

/// A validated linear pressure range.
///
/// `p_max < p_min` is allowed and yields a descending sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureRange {
    p_min: f64,
    p_max: f64,
    n_points: usize,
}

impl PressureRange {
    pub fn new(p_min: f64, p_max: f64, n_points: usize, max_points: usize) -> Result<Self, SweepError> {
        if !p_min.is_finite() {
            return Err(SweepError::NonNumericBound { name: "p_min", value: p_min.into() });
        }
        if !p_max.is_finite() {
            return Err(SweepError::NonNumericBound { name: "p_max", value: p_max.into() });
        }
        if !(p_max - p_min).is_finite() {
            return Err(SweepError::RangeTooWide { p_min, p_max });
        }
        if n_points < 2 {
            return Err(SweepError::TooFewPoints(n_points as u64));
        }
        if n_points > max_points {
            return Err(SweepError::TooManyPoints { n: n_points as u64, max: max_points });
        }
        Ok(Self { p_min, p_max, n_points })
    }

    /// Validate raw JSON parameters. Bounds may be numbers or numeric strings;
    /// `n_points` must be integral.
    pub fn from_json(
        p_min: &Value,
        p_max: &Value,
        n_points: &Value,
        max_points: usize,
    ) -> Result<Self, SweepError> {
        let bound = |name: &'static str, value: &Value| {
            coerce_number(value).ok_or_else(|| SweepError::NonNumericBound {
                name,
                value: value.clone(),
            })
        };
        let p_min = bound("p_min", p_min)?;
        let p_max = bound("p_max", p_max)?;

        let n = coerce_number(n_points)
            .filter(|n| n.fract() == 0.0 && *n > 0.0)
            .ok_or_else(|| SweepError::NotAnInteger(n_points.clone()))?;
        if n > max_points as f64 {
            return Err(SweepError::TooManyPoints { n: n as u64, max: max_points });
        }

        Self::new(p_min, p_max, n as usize, max_points)
    }

    pub fn p_min(&self) -> f64 {
        self.p_min
    }

    pub fn p_max(&self) -> f64 {
        self.p_max
    }

    pub fn n_points(&self) -> usize {
        self.n_points
    }

    pub fn step(&self) -> f64 {
        (self.p_max - self.p_min) / (self.n_points - 1) as f64
    }

    /// `p_min + i * step` for `i` in `0..n_points`.
    pub fn pressures(&self) -> impl Iterator<Item = f64> {
        let (p_min, step) = (self.p_min, self.step());
        (0..self.n_points).map(move |i| p_min + i as f64 * step)
    }
}

/// Sampled pressures and their predicted temperatures, index-aligned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Curve {
    pub pressures: Vec<f64>,
    pub temperatures: Vec<f64>,
}

/// Run the full prediction pipeline once per pressure in `range`.
///
/// `composition` supplies every raw field; its pressure is overwritten at each
/// point. The first failing point aborts the sweep.
pub fn sweep(
    predictor: &Predictor,
    composition: &FeatureRecord,
    range: &PressureRange,
) -> Result<Curve, PredictError> {
    let mut record = composition.clone();
    let mut curve = Curve {
        pressures: Vec::with_capacity(range.n_points()),
        temperatures: Vec::with_capacity(range.n_points()),
    };

    for pressure in range.pressures() {
        record.insert(PRESSURE_FIELD.to_string(), pressure);
        let temperature = predictor.predict(&record)?;
        curve.pressures.push(pressure);
        curve.temperatures.push(temperature);
    }

    Ok(curve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::COMPOSITION_FIELDS;
    use crate::inference::{HydrateModel, InferenceError};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Returns the pressure it was given and counts calls.
    struct Echo {
        calls: AtomicUsize,
    }

    impl HydrateModel for Echo {
        fn predict(&self, features: &FeatureRecord) -> Result<f64, InferenceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(features["Pc"] / 10.0)
        }

        fn feature_names(&self) -> Vec<&str> {
            vec!["Pc"]
        }

        fn kind(&self) -> &'static str {
            "echo"
        }
    }

    fn composition() -> FeatureRecord {
        let mut r: FeatureRecord = COMPOSITION_FIELDS.iter().map(|k| (k.to_string(), 0.05)).collect();
        r.insert("H2O".to_string(), 0.07);
        r.insert("Pc".to_string(), 1.0);
        r
    }

    fn echo() -> (Arc<Echo>, Predictor) {
        let model = Arc::new(Echo { calls: AtomicUsize::new(0) });
        (model.clone(), Predictor::new(model))
    }

    #[test]
    fn test_ten_points() {
        let (model, predictor) = echo();
        let range = PressureRange::new(10.0, 100.0, 10, 500).unwrap();
        let curve = sweep(&predictor, &composition(), &range).unwrap();

        assert_eq!(curve.pressures.len(), 10);
        assert_eq!(curve.temperatures.len(), 10);
        assert_eq!(curve.pressures[0], 10.0);
        assert_eq!(curve.pressures[9], 100.0);
        for pair in curve.pressures.windows(2) {
            assert!((pair[1] - pair[0] - 10.0).abs() < 1e-9);
        }
        assert_eq!(range.step(), (100.0 - 10.0) / 9.0);
        assert_eq!(model.calls.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn test_temperatures_follow_pressure() {
        let (_, predictor) = echo();
        let range = PressureRange::new(20.0, 40.0, 3, 500).unwrap();
        let curve = sweep(&predictor, &composition(), &range).unwrap();
        assert_eq!(curve.temperatures, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_descending_range() {
        let (_, predictor) = echo();
        let range = PressureRange::new(100.0, 10.0, 4, 500).unwrap();
        let curve = sweep(&predictor, &composition(), &range).unwrap();
        assert_eq!(curve.pressures, vec![100.0, 70.0, 40.0, 10.0]);
    }

    #[test]
    fn test_single_point_rejected() {
        let result = PressureRange::new(10.0, 100.0, 1, 500);
        assert!(matches!(result, Err(SweepError::TooFewPoints(1))));
    }

    #[test]
    fn test_overflowing_range_rejected() {
        let result = PressureRange::new(-1e308, 1e308, 10, 500);
        assert!(matches!(result, Err(SweepError::RangeTooWide { .. })));
    }

    #[test]
    fn test_too_many_points_rejected() {
        let result = PressureRange::new(10.0, 100.0, 501, 500);
        assert!(matches!(result, Err(SweepError::TooManyPoints { n: 501, max: 500 })));
    }

    #[test]
    fn test_from_json_validation() {
        let ok = PressureRange::from_json(&json!(10), &json!("100"), &json!(10.0), 500).unwrap();
        assert_eq!(ok.n_points(), 10);
        assert_eq!(ok.p_max(), 100.0);

        let cases = [
            (json!("low"), json!(100), json!(10)),
            (json!(10), Value::Null, json!(10)),
            (json!(10), json!(100), json!(2.5)),
            (json!(10), json!(100), json!(0)),
            (json!(10), json!(100), json!(-3)),
            (json!(10), json!(100), json!("ten")),
            (json!(10), json!(100), json!(1)),
        ];
        for (p_min, p_max, n) in cases {
            assert!(PressureRange::from_json(&p_min, &p_max, &n, 500).is_err(), "{p_min} {p_max} {n}");
        }
    }

    #[test]
    fn test_zero_composition_aborts_sweep() {
        let (model, predictor) = echo();
        let mut comp = composition();
        for k in COMPOSITION_FIELDS {
            comp.insert(k.to_string(), 0.0);
        }
        let range = PressureRange::new(10.0, 100.0, 5, 500).unwrap();
        assert!(sweep(&predictor, &comp, &range).is_err());
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }
}
