use thiserror::Error;

/// Misconfiguration detected while building the engine. Fatal to construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0:?} is not a valid speed unit (expected mph, km/h or knots)")]
    InvalidSpeedUnit(String),
    #[error("{0:?} is not a valid altitude unit (expected m or ft)")]
    InvalidAltitudeUnit(String),
    #[error("{0:?} is not a valid unit system (expected imperial, traditional, metric or nautical)")]
    InvalidUnitSystem(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
