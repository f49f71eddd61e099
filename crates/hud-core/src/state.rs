use hud_proto::{SkyReport, TpvReport};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::warn;

/// Highest status index gpsd defines (P(Y)).
pub const MAX_STATUS: u8 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FixMode {
    #[default]
    Unknown,
    NoFix,
    Fix2D,
    Fix3D,
}

impl FixMode {
    /// Anything gpsd might send outside 0..=3 collapses to `Unknown`.
    pub fn from_wire(mode: i64) -> Self {
        match mode {
            1 => FixMode::NoFix,
            2 => FixMode::Fix2D,
            3 => FixMode::Fix3D,
            _ => FixMode::Unknown,
        }
    }

    pub fn has_fix(self) -> bool {
        matches!(self, FixMode::Fix2D | FixMode::Fix3D)
    }
}

/// Latest known fix attributes, refined field by field as reports arrive.
#[derive(Debug, Clone, Default)]
pub struct TelemetryState {
    pub mode: FixMode,
    pub status: u8,
    /// m/s
    pub speed: f64,
    /// degrees
    pub heading: f64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// ellipsoidal height, meters
    pub altitude: Option<f64>,
    pub eph: Option<f64>,
    pub epv: Option<f64>,
    /// Time of the most recent TPV; `None` when that TPV had none.
    pub fix_time: Option<OffsetDateTime>,
    pub skyview: Option<SkyReport>,
}

impl TelemetryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mode always overwrites; every other field only when present.
    pub fn merge_tpv(&mut self, tpv: &TpvReport) {
        self.mode = FixMode::from_wire(tpv.mode.unwrap_or(0));

        if let Some(status) = tpv.status {
            match u8::try_from(status) {
                Ok(s) if s <= MAX_STATUS => self.status = s,
                _ => warn!("ignoring out-of-range TPV status {}", status),
            }
        }
        if let Some(speed) = tpv.speed {
            self.speed = speed;
        }
        if let Some(track) = tpv.track {
            self.heading = track;
        }
        if let Some(lat) = tpv.lat {
            self.latitude = Some(lat);
        }
        if let Some(lon) = tpv.lon {
            self.longitude = Some(lon);
        }
        if let Some(alt) = tpv.alt_hae {
            self.altitude = Some(alt);
        }
        if let Some(eph) = tpv.eph {
            self.eph = Some(eph);
        }
        if let Some(epv) = tpv.epv {
            self.epv = Some(epv);
        }
        // only the latest TPV's time counts; an older one would freeze the clock
        self.fix_time = tpv.time.as_deref().and_then(|ts| match OffsetDateTime::parse(ts, &Rfc3339) {
            Ok(t) => Some(t),
            Err(e) => {
                warn!("ignoring unparsable TPV time {:?}: {}", ts, e);
                None
            }
        });
    }

    /// SKY reports are whole snapshots.
    pub fn replace_sky(&mut self, sky: SkyReport) {
        self.skyview = Some(sky);
    }

    pub fn position(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}
