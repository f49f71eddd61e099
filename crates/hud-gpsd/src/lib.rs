pub mod doctor;
pub mod source;

pub use source::{TelemetrySource, GPSD_PORT};
