use std::fmt;
use std::str::FromStr;

use crate::error::{ConfigError, ConfigResult};

pub const MPS_TO_MPH: f64 = 2.2369362920544;
pub const MPS_TO_KPH: f64 = 3.6;
pub const MPS_TO_KNOTS: f64 = 1.9438444924406;
pub const METERS_TO_FEET: f64 = 3.2808398950131;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedUnit {
    Mph,
    Kph,
    Knots,
}

impl SpeedUnit {
    pub fn label(self) -> &'static str {
        match self {
            SpeedUnit::Mph => "mph",
            SpeedUnit::Kph => "km/h",
            SpeedUnit::Knots => "knots",
        }
    }

    pub fn factor(self) -> f64 {
        match self {
            SpeedUnit::Mph => MPS_TO_MPH,
            SpeedUnit::Kph => MPS_TO_KPH,
            SpeedUnit::Knots => MPS_TO_KNOTS,
        }
    }
}

impl FromStr for SpeedUnit {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        match s {
            "mph" => Ok(SpeedUnit::Mph),
            "km/h" => Ok(SpeedUnit::Kph),
            "knots" => Ok(SpeedUnit::Knots),
            other => Err(ConfigError::InvalidSpeedUnit(other.to_string())),
        }
    }
}

impl fmt::Display for SpeedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AltitudeUnit {
    Meters,
    Feet,
}

impl AltitudeUnit {
    pub fn label(self) -> &'static str {
        match self {
            AltitudeUnit::Meters => "m",
            AltitudeUnit::Feet => "ft",
        }
    }

    pub fn factor(self) -> f64 {
        match self {
            AltitudeUnit::Meters => 1.0,
            AltitudeUnit::Feet => METERS_TO_FEET,
        }
    }
}

impl FromStr for AltitudeUnit {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        match s {
            "m" => Ok(AltitudeUnit::Meters),
            "ft" => Ok(AltitudeUnit::Feet),
            other => Err(ConfigError::InvalidAltitudeUnit(other.to_string())),
        }
    }
}

impl fmt::Display for AltitudeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Named presets offered on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSystem {
    Imperial,
    Traditional,
    Metric,
    Nautical,
}

impl UnitSystem {
    pub fn units(self) -> (SpeedUnit, AltitudeUnit) {
        match self {
            UnitSystem::Imperial | UnitSystem::Traditional => (SpeedUnit::Mph, AltitudeUnit::Feet),
            UnitSystem::Nautical => (SpeedUnit::Knots, AltitudeUnit::Feet),
            UnitSystem::Metric => (SpeedUnit::Kph, AltitudeUnit::Meters),
        }
    }
}

impl FromStr for UnitSystem {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        match s {
            "imperial" => Ok(UnitSystem::Imperial),
            "traditional" => Ok(UnitSystem::Traditional),
            "metric" => Ok(UnitSystem::Metric),
            "nautical" => Ok(UnitSystem::Nautical),
            other => Err(ConfigError::InvalidUnitSystem(other.to_string())),
        }
    }
}

/// Multiplicative factors from SI (m/s, m) to the selected display units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitConverter {
    speed: SpeedUnit,
    altitude: AltitudeUnit,
}

impl UnitConverter {
    pub fn new(speed: &str, altitude: &str) -> ConfigResult<Self> {
        Ok(Self::from_units(speed.parse()?, altitude.parse()?))
    }

    pub fn from_units(speed: SpeedUnit, altitude: AltitudeUnit) -> Self {
        Self { speed, altitude }
    }

    pub fn speed_unit(&self) -> SpeedUnit {
        self.speed
    }

    pub fn altitude_unit(&self) -> AltitudeUnit {
        self.altitude
    }

    pub fn speed_factor(&self) -> f64 {
        self.speed.factor()
    }

    pub fn altitude_factor(&self) -> f64 {
        self.altitude.factor()
    }
}

impl Default for UnitConverter {
    fn default() -> Self {
        Self::from_units(SpeedUnit::Mph, AltitudeUnit::Feet)
    }
}
