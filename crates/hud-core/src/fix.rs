use std::fmt::Write as _;

use crate::sky::{SatelliteStats, SnrSummary};
use crate::state::FixMode;
use crate::units::AltitudeUnit;

const STATUS_LABELS: [&str; 10] = [
    "Unknown",
    "Normal",
    "DGPS",
    "RTK Fixed",
    "RTK Floating",
    "DR",
    "GNSS+DR",
    "Time (surveyed)",
    "Simulated",
    "P(Y)",
];

/// Narrative for a nonzero status; 0 and unknown values read as nothing.
pub fn status_label(status: u8) -> &'static str {
    match status {
        0 => "",
        s => STATUS_LABELS.get(s as usize).copied().unwrap_or(""),
    }
}

/// An error estimate already converted to display units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorEstimate {
    pub value: f64,
    pub unit: AltitudeUnit,
}

/// Multi-line fix quality text. Every segment is independently optional.
pub fn narrate(
    status: u8,
    mode: FixMode,
    stats: &SatelliteStats,
    horizontal_error: Option<ErrorEstimate>,
) -> String {
    // NOTE: status 0 is gpsd's explicit "Unknown" but is indistinguishable
    // here from "never received"; both narrate as nothing.
    let mut text = status_label(status).to_string();
    match mode {
        FixMode::Fix2D => text.push_str(" 2D fix"),
        FixMode::Fix3D => text.push_str(" 3D fix"),
        FixMode::NoFix => text = "No fix".to_string(),
        FixMode::Unknown => text = "Unknown fix".to_string(),
    }

    if let (Some(used), Some(visible)) = (stats.used_sats, stats.visible_sats) {
        let _ = write!(text, ", {}/{} SVs", used, visible);
    }

    let breakdown = stats.breakdown();
    if !breakdown.is_empty() {
        let parts: Vec<String> = breakdown
            .iter()
            .map(|(used, glyph)| format!("{} {}", used, glyph))
            .collect();
        text.push('\n');
        text.push_str(&parts.join(" "));
    }

    if let Some(s) = stats.all_snr_summary() {
        text.push('\n');
        text.push_str(&snr_line("All SNR", &s));
    }
    if let Some(s) = stats.used_snr_summary() {
        text.push('\n');
        text.push_str(&snr_line("Used SNR", &s));
    }

    if let Some(cep) = horizontal_error {
        let _ = write!(text, "\nCEP: \u{b1}\u{200a}{:.1} {}", cep.value, cep.unit);
    }
    text
}

fn snr_line(label: &str, s: &SnrSummary) -> String {
    let mut line = format!("{}: {:.0}\u{2013}{:.0}", label, s.min, s.max);
    if let Some(spread) = s.spread {
        // x-bar and s in mathematical italics
        let _ = write!(
            line,
            ", \u{1D465}\u{0305}={:.1}, \u{1D460}={:.1}",
            spread.mean, spread.stdev
        );
    }
    line
}
