use serde::{Deserialize, Serialize};

/// One line of the gpsd JSON stream, discriminated by its `class` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class")]
pub enum GpsdMessage {
    #[serde(rename = "TPV")]
    Tpv(TpvReport),
    #[serde(rename = "SKY")]
    Sky(SkyReport),
    // VERSION, DEVICES, WATCH, PPS, TOFF, ...
    #[serde(other)]
    Other,
}

impl GpsdMessage {
    pub fn from_line(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }

    /// Reports the display cares about; everything else is dropped.
    pub fn into_report(self) -> Option<Report> {
        match self {
            GpsdMessage::Tpv(r) => Some(Report::Tpv(r)),
            GpsdMessage::Sky(r) => Some(Report::Sky(r)),
            GpsdMessage::Other => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    Tpv(TpvReport),
    Sky(SkyReport),
}

/// Time-position-velocity. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TpvReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,
    /// m/s
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// degrees from true north
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    /// height above the WGS84 ellipsoid, meters
    #[serde(rename = "altHAE", default, skip_serializing_if = "Option::is_none")]
    pub alt_hae: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eph: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epv: Option<f64>,
    /// ISO 8601 / RFC 3339, e.g. `2024-06-21T10:15:00.000Z`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

/// Snapshot of the satellites the receiver is tracking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkyReport {
    #[serde(rename = "uSat", default, skip_serializing_if = "Option::is_none")]
    pub used_sats: Option<u32>,
    #[serde(rename = "nSat", default, skip_serializing_if = "Option::is_none")]
    pub visible_sats: Option<u32>,
    #[serde(default)]
    pub satellites: Vec<SatelliteEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SatelliteEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gnssid: Option<u8>,
    #[serde(rename = "PRN")]
    pub prn: i32,
    #[serde(default)]
    pub used: bool,
    /// dB-Hz
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ss: Option<f64>,
}
