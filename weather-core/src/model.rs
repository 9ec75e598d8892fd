use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Offset between the Celsius and Kelvin scales.
pub const KELVIN_OFFSET: f64 = 273.15;

pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + KELVIN_OFFSET
}

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

/// Averaged temperature for one city, as served over HTTP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReport {
    pub city: String,
    /// Kelvin.
    pub temp: f64,
    pub took: String,
}

impl TemperatureReport {
    pub fn new(city: impl Into<String>, temp: f64, took: Duration) -> Self {
        Self { city: city.into(), temp, took: format!("{took:?}") }
    }
}
