pub mod report;

pub use report::{GpsdMessage, Report, SatelliteEntry, SkyReport, TpvReport};
