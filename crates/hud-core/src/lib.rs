//! Telemetry interpretation for a GPS head-up display.
//!
//! Reports from the positioning daemon are merged into a [`TelemetryState`]
//! by the [`ReportDispatcher`], which then derives a fresh [`DisplayModel`]
//! for whatever [`DisplayRenderer`] the host plugs in.

pub mod dispatch;
pub mod display;
pub mod doctor;
pub mod error;
pub mod fix;
pub mod sky;
pub mod solar;
pub mod state;
pub mod units;

pub use dispatch::{Clock, FixedClock, ReportDispatcher, SystemClock};
pub use display::{ColorScheme, DisplayModel, DisplayRenderer};
pub use error::ConfigError;
pub use sky::SatelliteStats;
pub use solar::DayNight;
pub use state::{FixMode, TelemetryState};
pub use units::{AltitudeUnit, SpeedUnit, UnitConverter, UnitSystem};
