use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// the two supported travel modes. parsing is case-insensitive.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    Walk,
    Bike,
}

impl FromStr for TravelMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "walk" => Ok(TravelMode::Walk),
            "bike" => Ok(TravelMode::Bike),
            _ => Err(format!("unknown travel mode '{s}', expected walk or bike")),
        }
    }
}

impl Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TravelMode::Walk => write!(f, "walk"),
            TravelMode::Bike => write!(f, "bike"),
        }
    }
}

/// configured mode-to-speed mapping in km/h, used only to size the ROI
/// prefilter buffer. the native mode string is what reaches the routing
/// engine; swapping engine modes is a configuration concern, not a code one.
#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
pub struct ModeSpeeds {
    pub walk_kmh: f64,
    pub bike_kmh: f64,
}

impl Default for ModeSpeeds {
    fn default() -> Self {
        ModeSpeeds {
            walk_kmh: 5.0,
            bike_kmh: 16.0,
        }
    }
}

impl ModeSpeeds {
    pub fn speed_kmh(&self, mode: TravelMode) -> f64 {
        match mode {
            TravelMode::Walk => self.walk_kmh,
            TravelMode::Bike => self.bike_kmh,
        }
    }

    /// buffer radius in meters a traveler could cover in the time budget:
    /// speed [km/h] x minutes / 60 x 1000.
    pub fn buffer_meters(&self, mode: TravelMode, minutes: u32) -> f64 {
        self.speed_kmh(mode) * (f64::from(minutes) / 60.0) * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_mode_parse_case_insensitive() {
        assert_eq!(TravelMode::from_str("Walk").unwrap(), TravelMode::Walk);
        assert_eq!(TravelMode::from_str("BIKE").unwrap(), TravelMode::Bike);
        assert!(TravelMode::from_str("car").is_err());
    }

    #[test]
    fn test_buffer_meters() {
        let speeds = ModeSpeeds::default();
        // 5 km/h for 15 minutes = 1250 m
        assert_eq!(speeds.buffer_meters(TravelMode::Walk, 15), 1250.0);
        // 16 km/h for 15 minutes = 4000 m
        assert_eq!(speeds.buffer_meters(TravelMode::Bike, 15), 4000.0);
    }
}
