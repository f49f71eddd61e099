use hud_core::{ColorScheme, FixMode, FixedClock, ReportDispatcher, UnitConverter};
use hud_proto::GpsdMessage;
use time::macros::datetime;

const SESSION: &str = r#"{"class":"VERSION","release":"3.25","rev":"3.25","proto_major":3,"proto_minor":15}
{"class":"DEVICES","devices":[{"class":"DEVICE","path":"/dev/ttyACM0","driver":"u-blox"}]}
{"class":"WATCH","enable":true,"json":true}
{"class":"TPV","device":"/dev/ttyACM0","mode":1}
{"class":"SKY","device":"/dev/ttyACM0","uSat":3,"nSat":4,"satellites":[{"PRN":2,"gnssid":0,"ss":38.0,"used":true},{"PRN":14,"gnssid":0,"ss":22.0,"used":false},{"PRN":211,"gnssid":2,"ss":41.0,"used":true},{"PRN":71,"gnssid":6,"ss":30.0,"used":true}]}
{"class":"TPV","device":"/dev/ttyACM0","mode":3,"status":2,"time":"2024-06-21T19:30:00.000Z","lat":47.6205,"lon":-122.3493,"altHAE":92.4,"track":181.5,"speed":13.4112,"eph":3.0,"epv":5.0}
{"class":"TPV","device":"/dev/ttyACM0","mode":3,"speed":5.0}
"#;

fn replay(lines: &str) -> (ReportDispatcher<FixedClock>, Vec<hud_core::DisplayModel>) {
    let units = UnitConverter::new("mph", "ft").unwrap();
    let mut d = ReportDispatcher::with_clock(units, FixedClock(datetime!(2024-06-21 08:00 UTC)));
    let mut models = Vec::new();
    for line in lines.lines() {
        if let Some(report) = GpsdMessage::from_line(line).unwrap().into_report() {
            models.push(d.dispatch(report));
        }
    }
    (d, models)
}

#[test]
fn only_tpv_and_sky_drive_updates() {
    let (_, models) = replay(SESSION);
    assert_eq!(models.len(), 4);
}

#[test]
fn no_fix_then_fix() {
    let (d, models) = replay(SESSION);

    assert_eq!(models[0].fix_text, "No fix");
    assert_eq!(models[0].speed_text, "-");
    // no position yet: daytime theme even though the host clock says night in Seattle
    assert_eq!(models[0].color_scheme, ColorScheme::Day);

    let fixed = &models[2];
    assert_eq!(fixed.speed_text, "30");
    assert_eq!(fixed.direction_text, "S");
    let lines: Vec<&str> = fixed.fix_text.lines().collect();
    assert_eq!(lines[0], "DGPS 3D fix, 3/4 SVs");
    assert_eq!(lines[1], "1 \u{1F1FA}\u{1F1F8} 1 \u{1F1EA}\u{1F1FA} 1 \u{1F1F7}\u{1F1FA}");
    assert!(lines[2].starts_with("All SNR: 22\u{2013}41, "));
    assert!(lines[3].starts_with("Used SNR: 30\u{2013}41, \u{1D465}\u{0305}=36.3"));
    assert_eq!(lines[4], "CEP: \u{b1}\u{200a}9.8 ft");
    assert_eq!(
        fixed.position_text,
        "47.62050\u{b0}\u{200a}N\n122.34930\u{b0}\u{200a}W\n303.15\u{200a}\u{b1}\u{200a}16.4 ft"
    );
    // 11:30 local solar time
    assert_eq!(fixed.color_scheme, ColorScheme::Day);

    let st = d.state();
    assert_eq!(st.mode, FixMode::Fix3D);
    assert_eq!(st.speed, 5.0);
    assert_eq!(st.position(), Some((47.6205, -122.3493)));
    assert_eq!(st.altitude, Some(92.4));
    assert_eq!(models[3].speed_text, "11");
    // last TPV carried no time: back to the host clock, local solar midnight
    assert_eq!(models[3].time_text, "8:00 AM");
    assert_eq!(models[3].color_scheme, ColorScheme::Night);
}

#[test]
fn sky_snapshot_replaces_previous() {
    let extra = r#"{"class":"SKY","uSat":0,"nSat":1,"satellites":[{"PRN":9,"gnssid":0,"used":false}]}"#;
    let session = format!("{}{}\n", SESSION, extra);
    let (_, models) = replay(&session);
    let last = models.last().unwrap();
    assert_eq!(last.fix_text.lines().next(), Some("DGPS 3D fix, 0/1 SVs"));
    assert!(!last.fix_text.contains("SNR"));
}
