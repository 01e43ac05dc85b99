//! Flow-rate quantities and unit conversions.

use uom::si::f64::VolumeRate as UomVolumeRate;
use uom::si::volume_rate::{cubic_meter_per_hour, liter_per_minute};

// Public canonical unit types (SI, f64)
pub type FlowRate = UomVolumeRate;

#[inline]
pub fn m3ph(v: f64) -> FlowRate {
    FlowRate::new::<cubic_meter_per_hour>(v)
}

/// Converts a flow given in m³/hr to L/min.
#[inline]
pub fn m3_per_hr_to_l_per_min(v: f64) -> f64 {
    m3ph(v).get::<liter_per_minute>()
}

pub mod defaults {
    /// Design water temperature assumed when a payload does not carry one.
    pub const WATER_TEMPERATURE_C: f64 = 25.0;
    /// Freshwater unless stated otherwise.
    pub const SALINITY_PPT: f64 = 0.0;
    /// Sea level unless stated otherwise.
    pub const ELEVATION_M: f64 = 0.0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{Tolerances, nearly_equal};

    #[test]
    fn six_cubic_meters_per_hour_is_one_hundred_liters_per_minute() {
        assert!(nearly_equal(
            m3_per_hr_to_l_per_min(6.0),
            100.0,
            Tolerances::default()
        ));
    }
}
