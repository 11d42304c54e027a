use crate::reading::RawReading;
use serde::Serialize;

/// Number of derived features fed to the scaler and model.
pub const FEATURE_COUNT: usize = 11;

/// Feature names, in model input order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "temperature",
    "wind_speed",
    "humidity",
    "wind_gust",
    "pressure",
    "soil_ph",
    "temperature_sq",
    "dryness",
    "wind_product",
    "pressure_scaled",
    "ph_deviation",
];

/// Neutral soil pH, used for the pH deviation feature.
const NEUTRAL_PH: f64 = 7.0;

/// Feature vector derived from a [`RawReading`]
///
/// Built only through [`FeatureVector::from_reading`]; there is no way to
/// mutate it afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    pub fn from_reading(reading: &RawReading) -> Self {
        let RawReading {
            temperature,
            humidity,
            wind_speed,
            wind_gust,
            pressure,
            soil_ph,
        } = *reading;

        Self {
            values: [
                temperature,
                wind_speed,
                humidity,
                wind_gust,
                pressure,
                soil_ph,
                temperature * temperature,
                100.0 - humidity,
                wind_speed * wind_gust,
                pressure * 0.1,
                (soil_ph - NEUTRAL_PH).abs(),
            ],
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn len(&self) -> usize {
        FEATURE_COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn names() -> &'static [&'static str; FEATURE_COUNT] {
        &FEATURE_NAMES
    }

    /// (name, value) pairs in model input order
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.values.iter().copied())
    }
}

impl From<&RawReading> for FeatureVector {
    fn from(reading: &RawReading) -> Self {
        Self::from_reading(reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_features_follow_their_sources() {
        let reading = RawReading::new(31.0, 45.0, 12.0, 20.5, 98.0, 4.5);
        let fv = FeatureVector::from_reading(&reading);

        assert_eq!(fv.len(), FEATURE_COUNT);
        assert_eq!(fv.as_slice()[6], fv.as_slice()[0] * fv.as_slice()[0]);
        assert_eq!(fv.as_slice()[7], 100.0 - fv.as_slice()[2]);
        assert_eq!(fv.as_slice()[8], 12.0 * 20.5);
        assert_eq!(fv.as_slice()[10], (fv.as_slice()[5] - 7.0).abs());
    }

    #[test]
    fn raw_fields_keep_model_order() {
        let reading = RawReading::new(1.0, 2.0, 3.0, 4.0, 85.0, 6.0);
        let fv = FeatureVector::from_reading(&reading);
        assert_eq!(&fv.as_slice()[..6], &[1.0, 3.0, 2.0, 4.0, 85.0, 6.0]);
    }

    #[test]
    fn named_pairs_line_up() {
        let fv = FeatureVector::from_reading(&RawReading::default());
        let dryness = fv.named().find(|(name, _)| *name == "dryness").map(|(_, v)| v);
        assert_eq!(dryness, Some(40.0));
        assert_eq!(fv.get(FEATURE_COUNT), None);
    }

    #[test]
    fn serializes_as_plain_array() {
        let fv = FeatureVector::from_reading(&RawReading::default());
        let json = serde_json::to_value(fv).unwrap();
        assert_eq!(json.as_array().map(|a| a.len()), Some(FEATURE_COUNT));
    }
}
