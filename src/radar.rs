use crate::reading::RawReading;
use serde::Serialize;

/// One spoke of the input radar chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadarAxis {
    pub label: &'static str,
    pub value: f64,
}

/// Inputs scaled to roughly [0, 1] for the radar chart shown beside a
/// prediction. Pressure is not charted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarProfile {
    pub axes: Vec<RadarAxis>,
}

// full-scale value per axis
const TEMP_SCALE: f64 = 50.0;
const WIND_SCALE: f64 = 50.0;
const HUMIDITY_SCALE: f64 = 100.0;
const GUST_SCALE: f64 = 80.0;
const PH_SCALE: f64 = 14.0;

impl RadarProfile {
    pub fn from_reading(reading: &RawReading) -> Self {
        let axes = vec![
            RadarAxis { label: "Temp", value: reading.temperature / TEMP_SCALE },
            RadarAxis { label: "Wind", value: reading.wind_speed / WIND_SCALE },
            RadarAxis { label: "Humidity", value: reading.humidity / HUMIDITY_SCALE },
            RadarAxis { label: "Gust", value: reading.wind_gust / GUST_SCALE },
            RadarAxis { label: "pH", value: reading.soil_ph / PH_SCALE },
        ];
        Self { axes }
    }

    pub fn values(&self) -> Vec<f64> {
        self.axes.iter().map(|a| a.value).collect()
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.axes.iter().map(|a| a.label).collect()
    }
}
