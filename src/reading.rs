use crate::errors::{HydraError, HydraResult};
use serde::{Deserialize, Serialize};

/// Inclusive range accepted for one reading field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRange {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
}

impl FieldRange {
    pub const fn new(name: &'static str, min: f64, max: f64) -> Self {
        Self { name, min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    fn check(&self, value: f64) -> HydraResult<()> {
        if !value.is_finite() {
            return Err(HydraError::validation(self.name, "must be a finite number"));
        }
        if !self.contains(value) {
            return Err(HydraError::validation(
                self.name,
                format!("{value} is outside [{}, {}]", self.min, self.max),
            ));
        }
        Ok(())
    }
}

pub const TEMPERATURE_RANGE: FieldRange = FieldRange::new("temperature", 0.0, 50.0);
pub const HUMIDITY_RANGE: FieldRange = FieldRange::new("humidity", 0.0, 100.0);
pub const WIND_SPEED_RANGE: FieldRange = FieldRange::new("windSpeed", 0.0, 50.0);
pub const WIND_GUST_RANGE: FieldRange = FieldRange::new("windGust", 0.0, 80.0);
pub const PRESSURE_RANGE: FieldRange = FieldRange::new("pressure", 80.0, 120.0);
pub const SOIL_PH_RANGE: FieldRange = FieldRange::new("soilPh", 0.0, 14.0);

/// Soil pH is entered in half-unit steps.
pub const SOIL_PH_STEP: f64 = 0.5;

/// The six environmental measurements supplied for one prediction.
///
/// Units: temperature in °C, humidity in %, wind speed and gust in km/h,
/// pressure in kPa.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReading {
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub wind_gust: f64,
    pub pressure: f64,
    pub soil_ph: f64,
}

impl Default for RawReading {
    fn default() -> Self {
        Self {
            temperature: 25.0,
            humidity: 60.0,
            wind_speed: 5.0,
            wind_gust: 10.0,
            pressure: 101.3,
            soil_ph: 7.0,
        }
    }
}

impl RawReading {
    pub fn new(
        temperature: f64,
        humidity: f64,
        wind_speed: f64,
        wind_gust: f64,
        pressure: f64,
        soil_ph: f64,
    ) -> Self {
        Self {
            temperature,
            humidity,
            wind_speed,
            wind_gust,
            pressure,
            soil_ph,
        }
    }

    /// Reject readings outside the accepted domain.
    ///
    /// Values are never clamped. The first offending field is reported.
    pub fn validate(&self) -> HydraResult<()> {
        TEMPERATURE_RANGE.check(self.temperature)?;
        HUMIDITY_RANGE.check(self.humidity)?;
        WIND_SPEED_RANGE.check(self.wind_speed)?;
        WIND_GUST_RANGE.check(self.wind_gust)?;
        PRESSURE_RANGE.check(self.pressure)?;
        SOIL_PH_RANGE.check(self.soil_ph)?;

        let steps = self.soil_ph / SOIL_PH_STEP;
        if (steps - steps.round()).abs() > 1e-9 {
            return Err(HydraError::validation(
                SOIL_PH_RANGE.name,
                format!("{} is not a multiple of {SOIL_PH_STEP}", self.soil_ph),
            ));
        }

        Ok(())
    }

    /// Validate and hand the reading back, for use in `?` chains.
    pub fn validated(self) -> HydraResult<Self> {
        self.validate()?;
        Ok(self)
    }
}
