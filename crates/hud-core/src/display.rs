use anyhow::Result;
use serde::Serialize;

use crate::solar::DayNight;
use crate::state::FixMode;
use crate::units::{AltitudeUnit, UnitConverter};

const COMPASS_POINTS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];
const HAIR_SPACE: char = '\u{200a}';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    Day,
    Night,
}

impl ColorScheme {
    pub fn foreground(self) -> &'static str {
        match self {
            ColorScheme::Day => "#FFFFFF",
            ColorScheme::Night => "#BBBBBB",
        }
    }

    pub fn unit_color(self) -> &'static str {
        match self {
            ColorScheme::Day => "#888888",
            ColorScheme::Night => "#666666",
        }
    }
}

impl From<DayNight> for ColorScheme {
    fn from(d: DayNight) -> Self {
        match d {
            DayNight::Day => ColorScheme::Day,
            DayNight::Night => ColorScheme::Night,
        }
    }
}

/// Everything the renderer shows, rebuilt from scratch on every update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayModel {
    pub speed_text: String,
    pub speed_unit: String,
    pub direction_text: String,
    pub fix_text: String,
    pub position_text: String,
    pub date_text: String,
    pub time_text: String,
    pub color_scheme: ColorScheme,
}

/// Sink for display models. Presentation (fonts, layout, colors) is its business.
pub trait DisplayRenderer {
    fn render(&mut self, model: &DisplayModel) -> Result<()>;
}

impl<R: DisplayRenderer + ?Sized> DisplayRenderer for Box<R> {
    fn render(&mut self, model: &DisplayModel) -> Result<()> {
        (**self).render(model)
    }
}

pub fn speed_text(mode: FixMode, speed: f64, units: &UnitConverter) -> String {
    if !mode.has_fix() {
        return "-".to_string();
    }
    format!("{:.0}", speed * units.speed_factor())
}

pub fn direction_text(mode: FixMode, heading: f64) -> String {
    if !mode.has_fix() {
        return "-".to_string();
    }
    COMPASS_POINTS[compass_index(heading)].to_string()
}

/// 8-point bucket; exact boundaries go to the next point clockwise.
pub fn compass_index(heading: f64) -> usize {
    ((heading + 22.5) / 45.0).floor().rem_euclid(8.0) as usize
}

pub fn format_latitude(lat: f64) -> String {
    let hemisphere = if lat >= 0.0 { 'N' } else { 'S' };
    format!("{:.5}\u{b0}{}{}", lat.abs(), HAIR_SPACE, hemisphere)
}

pub fn format_longitude(lon: f64) -> String {
    let hemisphere = if lon >= 0.0 { 'E' } else { 'W' };
    format!("{:.5}\u{b0}{}{}", lon.abs(), HAIR_SPACE, hemisphere)
}

/// Five significant digits, trailing zeros kept: `123.46`, `12.300`.
/// Exponent notation from 1e5 up, as `1.0000e+05`.
pub fn format_altitude(value: f64) -> String {
    const SIGNIFICANT: i32 = 5;
    if value == 0.0 || !value.is_finite() {
        return format!("{:.*}", (SIGNIFICANT - 1) as usize, value);
    }
    // exponent of the rounded value, so a carry (9.99996 -> 10.000) moves it
    let sci = format!("{:.*e}", (SIGNIFICANT - 1) as usize, value);
    let Some((mantissa, exponent)) = sci.split_once('e').and_then(|(m, e)| Some((m, e.parse::<i32>().ok()?))) else {
        return sci;
    };
    if !(-4..SIGNIFICANT).contains(&exponent) {
        return format!("{}e{:+03}", mantissa, exponent);
    }
    format!("{:.*}", (SIGNIFICANT - 1 - exponent) as usize, value)
}

/// Empty until both coordinates are known.
pub fn position_text(
    position: Option<(f64, f64)>,
    altitude: Option<f64>,
    epv: Option<f64>,
    units: &UnitConverter,
) -> String {
    let Some((lat, lon)) = position else {
        return String::new();
    };
    let mut text = format!("{}\n{}", format_latitude(lat), format_longitude(lon));

    if let Some(alt) = altitude {
        let unit: AltitudeUnit = units.altitude_unit();
        let alt = format_altitude(alt * units.altitude_factor());
        match epv {
            Some(epv) => text.push_str(&format!(
                "\n{}{hs}\u{b1}{hs}{:.1} {}",
                alt,
                epv * units.altitude_factor(),
                unit,
                hs = HAIR_SPACE
            )),
            None => text.push_str(&format!("\n{} {}", alt, unit)),
        }
    }
    text
}
