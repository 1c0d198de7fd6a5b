//! Derived ratio and aggregate features.

use super::composition::Composition;
use super::{FeatureError, FeatureRecord};

/// Stabilizer added to denominators so a zero CH4 or C3H8 fraction stays finite.
const EPS: f64 = 1e-6;

/// Names of the derived fields, in the order they are computed.
pub const DERIVED_FIELDS: [&str; 6] = [
    "C3plus",
    "C1_fraction",
    "C2plus_to_C1",
    "diluents_to_C1",
    "C1_to_allHC",
    "C2_to_C3",
];

/// Secondary features computed from a (normalized) composition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedFeatures {
    pub c3plus: f64,
    pub c1_fraction: f64,
    pub c2plus_to_c1: f64,
    pub diluents_to_c1: f64,
    pub c1_to_all_hc: f64,
    pub c2_to_c3: f64,
}

impl DerivedFeatures {
    pub fn from_composition(c: &Composition) -> Self {
        let c3plus = c.c3h8
            + c.ic4
            + c.nc4
            + c.neoc5
            + c.ic5
            + c.nc5
            + c.nc6
            + c.nc7
            + c.nc8
            + c.nc9;

        Self {
            c3plus,
            c1_fraction: c.ch4,
            c2plus_to_c1: (c.c2h6 + c3plus) / (c.ch4 + EPS),
            diluents_to_c1: (c.n2 + c.co2) / (c.ch4 + EPS),
            c1_to_all_hc: c.ch4 / (c.ch4 + c.c2h6 + c3plus + EPS),
            c2_to_c3: c.c2h6 / (c.c3h8 + EPS),
        }
    }

    /// Values in [`DERIVED_FIELDS`] order.
    pub fn values(&self) -> [f64; 6] {
        [
            self.c3plus,
            self.c1_fraction,
            self.c2plus_to_c1,
            self.diluents_to_c1,
            self.c1_to_all_hc,
            self.c2_to_c3,
        ]
    }
}

/// Augment a record with the derived fields.
///
/// Does not normalize; callers run [`super::normalize`] first.
pub fn derive(record: &FeatureRecord) -> Result<FeatureRecord, FeatureError> {
    let composition = Composition::from_record(record)?;
    let derived = DerivedFeatures::from_composition(&composition);

    let mut out = record.clone();
    for (name, value) in DERIVED_FIELDS.iter().zip(derived.values()) {
        out.insert(name.to_string(), value);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{normalize, COMPOSITION_FIELDS};

    fn sample() -> FeatureRecord {
        let values = [
            0.01, 0.02, 0.80, 0.07, 0.04, 0.01, 0.015, 0.001, 0.005, 0.004, 0.003, 0.002, 0.001,
            0.001,
        ];
        COMPOSITION_FIELDS
            .iter()
            .zip(values)
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_c3plus_is_sum_of_components() {
        let r = sample();
        let out = derive(&r).unwrap();
        let expected = r["C3H8"]
            + r["iC4"]
            + r["nC4"]
            + r["neoC5"]
            + r["iC5"]
            + r["nC5"]
            + r["nC6"]
            + r["nC7"]
            + r["nC8"]
            + r["nC9"];
        assert_eq!(out["C3plus"], expected);
    }

    #[test]
    fn test_ratios() {
        let out = derive(&sample()).unwrap();
        let c3plus = out["C3plus"];

        assert_eq!(out["C1_fraction"], 0.80);
        assert!((out["C2plus_to_C1"] - (0.07 + c3plus) / (0.80 + EPS)).abs() < 1e-12);
        assert!((out["diluents_to_C1"] - 0.03 / (0.80 + EPS)).abs() < 1e-12);
        assert!((out["C1_to_allHC"] - 0.80 / (0.80 + 0.07 + c3plus + EPS)).abs() < 1e-12);
        assert!((out["C2_to_C3"] - 0.07 / (0.04 + EPS)).abs() < 1e-12);
    }

    #[test]
    fn test_keeps_original_fields() {
        let r = sample();
        let out = derive(&r).unwrap();
        assert_eq!(out.len(), r.len() + DERIVED_FIELDS.len());
        for (k, v) in &r {
            assert_eq!(out[k], *v);
        }
    }

    #[test]
    fn test_deterministic() {
        let r = normalize(&sample()).unwrap();
        assert_eq!(derive(&r).unwrap(), derive(&r).unwrap());
    }

    #[test]
    fn test_zero_methane_stays_finite() {
        let mut r = sample();
        r.insert("CH4".to_string(), 0.0);
        r.insert("C3H8".to_string(), 0.0);
        let out = derive(&r).unwrap();
        for name in DERIVED_FIELDS {
            assert!(out[name].is_finite(), "{name} not finite");
        }
    }
}
