//! Gas composition and mole-fraction normalization.

use super::{FeatureError, FeatureRecord};

/// Hydrocarbon and inert components rescaled by [`normalize`].
pub const COMPOSITION_FIELDS: [&str; 14] = [
    "N2", "CO2", "CH4", "C2H6", "C3H8", "iC4", "nC4", "neoC5", "iC5", "nC5", "nC6", "nC7", "nC8",
    "nC9",
];

/// Mole fractions of the fourteen composition components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Composition {
    pub n2: f64,
    pub co2: f64,
    pub ch4: f64,
    pub c2h6: f64,
    pub c3h8: f64,
    pub ic4: f64,
    pub nc4: f64,
    pub neoc5: f64,
    pub ic5: f64,
    pub nc5: f64,
    pub nc6: f64,
    pub nc7: f64,
    pub nc8: f64,
    pub nc9: f64,
}

impl Composition {
    /// Read the composition fields out of a record.
    pub fn from_record(record: &FeatureRecord) -> Result<Self, FeatureError> {
        let get = |name: &str| {
            record
                .get(name)
                .copied()
                .ok_or_else(|| FeatureError::MissingField(name.to_string()))
        };

        Ok(Self {
            n2: get("N2")?,
            co2: get("CO2")?,
            ch4: get("CH4")?,
            c2h6: get("C2H6")?,
            c3h8: get("C3H8")?,
            ic4: get("iC4")?,
            nc4: get("nC4")?,
            neoc5: get("neoC5")?,
            ic5: get("iC5")?,
            nc5: get("nC5")?,
            nc6: get("nC6")?,
            nc7: get("nC7")?,
            nc8: get("nC8")?,
            nc9: get("nC9")?,
        })
    }

    /// Values in [`COMPOSITION_FIELDS`] order.
    pub fn values(&self) -> [f64; 14] {
        [
            self.n2, self.co2, self.ch4, self.c2h6, self.c3h8, self.ic4, self.nc4, self.neoc5,
            self.ic5, self.nc5, self.nc6, self.nc7, self.nc8, self.nc9,
        ]
    }

    fn from_values(v: [f64; 14]) -> Self {
        Self {
            n2: v[0],
            co2: v[1],
            ch4: v[2],
            c2h6: v[3],
            c3h8: v[4],
            ic4: v[5],
            nc4: v[6],
            neoc5: v[7],
            ic5: v[8],
            nc5: v[9],
            nc6: v[10],
            nc7: v[11],
            nc8: v[12],
            nc9: v[13],
        }
    }

    /// Sum of all fourteen fractions.
    pub fn total(&self) -> f64 {
        self.values().iter().sum()
    }

    /// Rescale so the fractions sum to one.
    ///
    /// A zero total is rejected instead of producing NaN. A total that
    /// overflows would scale every fraction to zero, so it is rejected too,
    /// as is any non-finite result.
    pub fn normalized(&self) -> Result<Self, FeatureError> {
        let total = self.total();
        if total == 0.0 {
            return Err(FeatureError::ZeroComposition);
        }
        if !total.is_finite() {
            return Err(FeatureError::NonFiniteTotal(total));
        }

        let mut scaled = self.values();
        for (value, name) in scaled.iter_mut().zip(COMPOSITION_FIELDS) {
            *value /= total;
            if !value.is_finite() {
                return Err(FeatureError::NonFinite {
                    field: name.to_string(),
                    value: *value,
                });
            }
        }

        Ok(Self::from_values(scaled))
    }

    /// Overwrite the composition fields of `record` with these values.
    pub fn write_into(&self, record: &mut FeatureRecord) {
        for (name, value) in COMPOSITION_FIELDS.iter().zip(self.values()) {
            record.insert(name.to_string(), value);
        }
    }
}

/// Normalize the composition fields of a record.
///
/// Fields outside the composition (water, pressure, anything else) are passed
/// through unchanged.
pub fn normalize(record: &FeatureRecord) -> Result<FeatureRecord, FeatureError> {
    let composition = Composition::from_record(record)?.normalized()?;
    let mut out = record.clone();
    composition.write_into(&mut out);
    Ok(out)
}
