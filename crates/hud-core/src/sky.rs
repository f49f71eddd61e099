//! Per-constellation satellite usage and signal-strength statistics.

use std::collections::BTreeMap;

use hud_proto::SkyReport;

/// gpsd `gnssid` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constellation {
    Gps,
    Sbas,
    Galileo,
    Beidou,
    Imes,
    Qzss,
    Glonass,
}

impl Constellation {
    pub fn from_gnssid(id: u8) -> Option<Self> {
        Some(match id {
            0 => Constellation::Gps,
            1 => Constellation::Sbas,
            2 => Constellation::Galileo,
            3 => Constellation::Beidou,
            4 => Constellation::Imes,
            5 => Constellation::Qzss,
            6 => Constellation::Glonass,
            _ => return None,
        })
    }

    /// Country the system is associated with. SBAS has none.
    pub fn iso_country(self) -> Option<&'static str> {
        match self {
            Constellation::Gps => Some("US"),
            Constellation::Sbas => None,
            Constellation::Galileo => Some("EU"),
            Constellation::Beidou => Some("CN"),
            Constellation::Imes => Some("IN"),
            Constellation::Qzss => Some("JP"),
            Constellation::Glonass => Some("RU"),
        }
    }

    /// Regional-indicator flag for the country, or a satellite for SBAS.
    pub fn glyph(self) -> String {
        match self.iso_country() {
            Some(iso) => iso.chars().filter_map(regional_indicator).collect(),
            None => "\u{1F6F0}".to_string(),
        }
    }
}

fn regional_indicator(c: char) -> Option<char> {
    if !c.is_ascii_uppercase() {
        return None;
    }
    char::from_u32(0x1F1E6 + (c as u32 - 'A' as u32))
}

/// Glyph for a raw gnssid; ids we don't know are shown by number.
pub fn gnss_glyph(id: u8) -> String {
    match Constellation::from_gnssid(id) {
        Some(c) => c.glyph(),
        None => format!("#{}", id),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstellationCount {
    pub gnssid: u8,
    pub used: u32,
    pub total: u32,
}

/// min/max always, mean and sample stdev only with two or more samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnrSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub spread: Option<SnrSpread>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnrSpread {
    pub mean: f64,
    pub stdev: f64,
}

impl SnrSummary {
    pub fn from_samples<I: IntoIterator<Item = f64>>(samples: I) -> Option<Self> {
        let values: Vec<f64> = samples.into_iter().collect();
        let first = *values.first()?;
        let (min, max) = values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));

        let n = values.len();
        let spread = (n > 1).then(|| {
            let mean = values.iter().sum::<f64>() / n as f64;
            let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            SnrSpread { mean, stdev: var.sqrt() }
        });

        Some(Self { count: n, min, max, spread })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SatelliteStats {
    pub used_sats: Option<u32>,
    pub visible_sats: Option<u32>,
    /// In order of first appearance in the report.
    pub constellations: Vec<ConstellationCount>,
    /// PRN -> ss for every satellite with a signal reading.
    pub all_snr: BTreeMap<i32, f64>,
    /// Same, restricted to satellites used in the solution.
    pub used_snr: BTreeMap<i32, f64>,
}

impl SatelliteStats {
    /// `None` means no SKY report has arrived yet; that is not an error.
    pub fn aggregate(sky: Option<&SkyReport>) -> Self {
        let Some(sky) = sky else {
            return Self::default();
        };

        let mut stats = SatelliteStats {
            used_sats: sky.used_sats,
            visible_sats: sky.visible_sats,
            ..Default::default()
        };

        for sat in &sky.satellites {
            if let Some(id) = sat.gnssid {
                let i = match stats.constellations.iter().position(|c| c.gnssid == id) {
                    Some(i) => i,
                    None => {
                        stats.constellations.push(ConstellationCount { gnssid: id, used: 0, total: 0 });
                        stats.constellations.len() - 1
                    }
                };
                let entry = &mut stats.constellations[i];
                entry.total += 1;
                if sat.used {
                    entry.used += 1;
                }
            }
            if let Some(ss) = sat.ss {
                stats.all_snr.insert(sat.prn, ss);
                if sat.used {
                    stats.used_snr.insert(sat.prn, ss);
                }
            }
        }
        stats
    }

    /// `(used, glyph)` for every constellation contributing to the fix.
    pub fn breakdown(&self) -> Vec<(u32, String)> {
        self.constellations
            .iter()
            .filter(|c| c.used > 0)
            .map(|c| (c.used, gnss_glyph(c.gnssid)))
            .collect()
    }

    pub fn all_snr_summary(&self) -> Option<SnrSummary> {
        SnrSummary::from_samples(self.all_snr.values().copied())
    }

    pub fn used_snr_summary(&self) -> Option<SnrSummary> {
        SnrSummary::from_samples(self.used_snr.values().copied())
    }
}
