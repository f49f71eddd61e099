use anyhow::Result;
use hud_proto::Report;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};
use tracing::{debug, warn};

use crate::display::{self, ColorScheme, DisplayModel, DisplayRenderer};
use crate::fix::{self, ErrorEstimate};
use crate::sky::SatelliteStats;
use crate::solar;
use crate::state::TelemetryState;
use crate::units::UnitConverter;

/// Source of "now" when the receiver hasn't supplied a fix time.
pub trait Clock {
    fn now(&self) -> OffsetDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

/// Owns the telemetry state; every report is merged then the whole display
/// model is derived again.
pub struct ReportDispatcher<C: Clock = SystemClock> {
    state: TelemetryState,
    units: UnitConverter,
    clock: C,
    display_offset: UtcOffset,
}

impl ReportDispatcher<SystemClock> {
    pub fn new(units: UnitConverter) -> Self {
        Self::with_clock(units, SystemClock)
    }
}

impl<C: Clock> ReportDispatcher<C> {
    pub fn with_clock(units: UnitConverter, clock: C) -> Self {
        Self {
            state: TelemetryState::new(),
            units,
            clock,
            display_offset: UtcOffset::UTC,
        }
    }

    /// Civil offset for the date and time lines.
    pub fn with_display_offset(mut self, offset: UtcOffset) -> Self {
        self.display_offset = offset;
        self
    }

    pub fn state(&self) -> &TelemetryState {
        &self.state
    }

    pub fn dispatch(&mut self, report: Report) -> DisplayModel {
        match report {
            Report::Tpv(tpv) => {
                debug!(mode = ?tpv.mode, status = ?tpv.status, "TPV");
                self.state.merge_tpv(&tpv);
            }
            Report::Sky(sky) => {
                debug!(used = ?sky.used_sats, visible = ?sky.visible_sats, sats = sky.satellites.len(), "SKY");
                self.state.replace_sky(sky);
            }
        }
        self.recompute()
    }

    /// Dispatch and hand the fresh model to the renderer.
    pub fn dispatch_to<R: DisplayRenderer + ?Sized>(&mut self, report: Report, renderer: &mut R) -> Result<()> {
        let model = self.dispatch(report);
        renderer.render(&model)
    }

    /// The fix time while we have a fix, otherwise the host clock.
    pub fn reference_instant(&self) -> OffsetDateTime {
        match self.state.fix_time {
            Some(t) if self.state.mode.has_fix() => t,
            _ => self.clock.now(),
        }
    }

    pub fn recompute(&self) -> DisplayModel {
        let st = &self.state;
        let now = self.reference_instant();
        let position = st.position();

        let stats = SatelliteStats::aggregate(st.skyview.as_ref());
        let cep = position.and(st.eph).map(|eph| ErrorEstimate {
            value: eph * self.units.altitude_factor(),
            unit: self.units.altitude_unit(),
        });

        let (date_text, time_text) = clock_lines(now.to_offset(self.display_offset));

        DisplayModel {
            speed_text: display::speed_text(st.mode, st.speed, &self.units),
            speed_unit: self.units.speed_unit().label().to_uppercase(),
            direction_text: display::direction_text(st.mode, st.heading),
            fix_text: fix::narrate(st.status, st.mode, &stats, cep),
            position_text: display::position_text(position, st.altitude, st.epv, &self.units),
            date_text,
            time_text,
            color_scheme: ColorScheme::from(solar::classify(position, now)),
        }
    }
}

fn clock_lines(t: OffsetDateTime) -> (String, String) {
    let date_fmt = format_description!("[weekday repr:short], [month repr:short] [day padding:none]");
    let time_fmt = format_description!("[hour repr:12 padding:none]:[minute] [period]");
    let date = t.format(&date_fmt).unwrap_or_else(|e| {
        warn!("date format failed: {}", e);
        String::new()
    });
    let time = t.format(&time_fmt).unwrap_or_else(|e| {
        warn!("time format failed: {}", e);
        String::new()
    });
    (date, time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hud_proto::{SatelliteEntry, SkyReport, TpvReport};
    use time::macros::{datetime, offset};

    fn dispatcher() -> ReportDispatcher<FixedClock> {
        let units = UnitConverter::new("km/h", "m").unwrap();
        ReportDispatcher::with_clock(units, FixedClock(datetime!(2024-03-20 12:00 UTC)))
    }

    #[test]
    fn empty_state_renders_placeholders() {
        let model = dispatcher().recompute();
        assert_eq!(model.speed_text, "-");
        assert_eq!(model.direction_text, "-");
        assert_eq!(model.fix_text, "Unknown fix");
        assert_eq!(model.position_text, "");
        assert_eq!(model.speed_unit, "KM/H");
        assert_eq!(model.color_scheme, ColorScheme::Day);
        assert_eq!(model.date_text, "Wed, Mar 20");
        assert_eq!(model.time_text, "12:00 PM");
    }

    #[test]
    fn tpv_then_sky() {
        let mut d = dispatcher();
        let model = d.dispatch(Report::Tpv(TpvReport {
            mode: Some(3),
            status: Some(1),
            speed: Some(10.0),
            track: Some(95.0),
            lat: Some(0.5),
            lon: Some(0.5),
            eph: Some(2.0),
            ..Default::default()
        }));
        assert_eq!(model.speed_text, "36");
        assert_eq!(model.direction_text, "E");
        assert_eq!(model.fix_text, "Normal 3D fix\nCEP: \u{b1}\u{200a}2.0 m");

        let model = d.dispatch(Report::Sky(SkyReport {
            used_sats: Some(1),
            visible_sats: Some(1),
            satellites: vec![SatelliteEntry { gnssid: Some(0), prn: 4, used: true, ss: Some(33.0) }],
        }));
        assert!(model.fix_text.starts_with("Normal 3D fix, 1/1 SVs\n1 \u{1F1FA}\u{1F1F8}\nAll SNR: 33\u{2013}33\n"));
        // speed survives the SKY update
        assert_eq!(model.speed_text, "36");
    }

    #[test]
    fn fix_time_drives_clock_and_theme() {
        let mut d = dispatcher().with_display_offset(offset!(+2));
        let model = d.dispatch(Report::Tpv(TpvReport {
            mode: Some(2),
            lat: Some(0.0),
            lon: Some(0.0),
            time: Some("2024-03-20T23:05:00Z".into()),
            ..Default::default()
        }));
        assert_eq!(model.color_scheme, ColorScheme::Night);
        assert_eq!(model.date_text, "Thu, Mar 21");
        assert_eq!(model.time_text, "1:05 AM");

        // losing the fix falls back to the host clock (noon)
        let model = d.dispatch(Report::Tpv(TpvReport { mode: Some(1), ..Default::default() }));
        assert_eq!(model.color_scheme, ColorScheme::Day);
        assert_eq!(model.time_text, "2:00 PM");
    }

    #[test]
    fn tpv_without_time_stops_using_the_old_fix_time() {
        let mut d = dispatcher();
        let fix = |time: Option<&str>| TpvReport {
            mode: Some(3),
            lat: Some(0.0),
            lon: Some(0.0),
            time: time.map(str::to_string),
            ..Default::default()
        };
        let model = d.dispatch(Report::Tpv(fix(Some("2024-03-20T23:05:00Z"))));
        assert_eq!(model.time_text, "11:05 PM");
        assert_eq!(model.color_scheme, ColorScheme::Night);

        let model = d.dispatch(Report::Tpv(fix(None)));
        assert_eq!(model.time_text, "12:00 PM");
        assert_eq!(model.color_scheme, ColorScheme::Day);
    }

    struct Capture(Vec<DisplayModel>);

    impl DisplayRenderer for Capture {
        fn render(&mut self, model: &DisplayModel) -> Result<()> {
            self.0.push(model.clone());
            Ok(())
        }
    }

    #[test]
    fn every_report_reaches_the_renderer() {
        let mut d = dispatcher();
        let mut sink = Capture(Vec::new());
        d.dispatch_to(Report::Sky(SkyReport::default()), &mut sink).unwrap();
        d.dispatch_to(Report::Tpv(TpvReport { mode: Some(1), ..Default::default() }), &mut sink).unwrap();
        assert_eq!(sink.0.len(), 2);
        assert_eq!(sink.0[1].fix_text, "No fix");
    }
}
