//! Day/night classification from sunrise and sunset at the observer.
//!
//! Solar position follows the NOAA low-accuracy equations (declination and
//! equation of time from the Julian century), which are good to about a
//! minute and plenty for choosing a display theme.

use time::{Date, Duration, OffsetDateTime, UtcOffset};

/// Apparent zenith of the sun's upper limb at rise/set, refraction included.
const SUNRISE_ZENITH_DEG: f64 = 90.833;
const J2000: f64 = 2_451_545.0;
const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayNight {
    Day,
    Night,
}

/// Solar-noon aligned offset: whole hours, `floor((lon + 7.5) / 15)`.
pub fn solar_offset(longitude: f64) -> UtcOffset {
    let hours = ((longitude + 7.5) / 15.0).floor().clamp(-12.0, 12.0) as i8;
    UtcOffset::from_hms(hours, 0, 0).unwrap_or(UtcOffset::UTC)
}

/// Day when no position is known yet.
pub fn classify(position: Option<(f64, f64)>, now: OffsetDateTime) -> DayNight {
    let Some((lat, lon)) = position else {
        return DayNight::Day;
    };

    let offset = solar_offset(lon);
    let date = now.to_offset(offset).date();

    match daylight(lat, lon, date, offset) {
        Some((sunrise, sunset)) if sunrise <= now && now <= sunset => DayNight::Day,
        Some(_) => DayNight::Night,
        // The sun never crosses the horizon today: polar day or polar night.
        None if noon_elevation(lat, lon, date) < 0.0 => DayNight::Night,
        None => DayNight::Day,
    }
}

/// Sunrise and sunset falling on `date` as seen at `offset`, or `None` when
/// the date has no sunrise or no sunset after its sunrise.
pub fn daylight(lat: f64, lon: f64, date: Date, offset: UtcOffset) -> Option<(OffsetDateTime, OffsetDateTime)> {
    let sunrise = event_on_local_date(lat, lon, date, offset, Event::Rise)?;
    let sunset = event_on_local_date(lat, lon, date, offset, Event::Set)?;
    // a sunset before sunrise belongs to the previous evening; this date's
    // own sunset slipped past local midnight
    (sunrise <= sunset).then_some((sunrise, sunset))
}

/// Degrees above the horizon at solar noon.
pub fn noon_elevation(lat: f64, lon: f64, date: Date) -> f64 {
    let jd0 = julian_day_at_midnight(date);
    let t = julian_century(jd0 + 0.5 - lon / 360.0);
    let noon_min = 720.0 - 4.0 * lon - equation_of_time(t);
    let dec = declination(julian_century(jd0 + noon_min / 1440.0)).to_radians();
    let lat = lat.to_radians();
    (lat.sin() * dec.sin() + lat.cos() * dec.cos()).clamp(-1.0, 1.0).asin().to_degrees()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Rise,
    Set,
}

fn event_on_local_date(lat: f64, lon: f64, date: Date, offset: UtcOffset, event: Event) -> Option<OffsetDateTime> {
    let mut at = event_utc(lat, lon, date, event)?;
    let local = at.to_offset(offset).date();
    if local > date {
        at = event_utc(lat, lon, date.previous_day()?, event)?;
    } else if local < date {
        at = event_utc(lat, lon, date.next_day()?, event)?;
    }
    // near the polar circles the neighbouring day's event can miss the date too
    (at.to_offset(offset).date() == date).then_some(at)
}

fn event_utc(lat: f64, lon: f64, date: Date, event: Event) -> Option<OffsetDateTime> {
    let jd0 = julian_day_at_midnight(date);
    // first pass around solar noon, second pass at the estimated event
    let minutes = event_minutes(julian_century(jd0 + 0.5 - lon / 360.0), lat, lon, event)?;
    let minutes = event_minutes(julian_century(jd0 + minutes / 1440.0), lat, lon, event)?;
    Some(date.midnight().assume_utc() + Duration::seconds_f64(minutes * 60.0))
}

/// Minutes after 00:00 UTC of the date the century was derived from.
fn event_minutes(t: f64, lat: f64, lon: f64, event: Event) -> Option<f64> {
    let ha = hour_angle(lat, declination(t))?;
    let ha = match event {
        Event::Rise => ha,
        Event::Set => -ha,
    };
    Some(720.0 - 4.0 * (lon + ha) - equation_of_time(t))
}

fn hour_angle(lat: f64, dec: f64) -> Option<f64> {
    let (lat, dec) = (lat.to_radians(), dec.to_radians());
    let cos_ha = SUNRISE_ZENITH_DEG.to_radians().cos() / (lat.cos() * dec.cos()) - lat.tan() * dec.tan();
    if (-1.0..=1.0).contains(&cos_ha) {
        Some(cos_ha.acos().to_degrees())
    } else {
        None
    }
}

fn julian_day_at_midnight(date: Date) -> f64 {
    date.to_julian_day() as f64 - 0.5
}

fn julian_century(jd: f64) -> f64 {
    (jd - J2000) / DAYS_PER_JULIAN_CENTURY
}

fn geom_mean_long_sun(t: f64) -> f64 {
    (280.46646 + t * (36000.76983 + 0.0003032 * t)).rem_euclid(360.0)
}

fn geom_mean_anomaly_sun(t: f64) -> f64 {
    357.52911 + t * (35999.05029 - 0.0001537 * t)
}

fn earth_orbit_eccentricity(t: f64) -> f64 {
    0.016708634 - t * (0.000042037 + 0.0000001267 * t)
}

fn obliquity_correction(t: f64) -> f64 {
    let seconds = 21.448 - t * (46.8150 + t * (0.00059 - t * 0.001813));
    let mean = 23.0 + (26.0 + seconds / 60.0) / 60.0;
    let omega = 125.04 - 1934.136 * t;
    mean + 0.00256 * omega.to_radians().cos()
}

fn declination(t: f64) -> f64 {
    let m = geom_mean_anomaly_sun(t).to_radians();
    let center = m.sin() * (1.914602 - t * (0.004817 + 0.000014 * t))
        + (2.0 * m).sin() * (0.019993 - 0.000101 * t)
        + (3.0 * m).sin() * 0.000289;
    let true_long = geom_mean_long_sun(t) + center;
    let omega = 125.04 - 1934.136 * t;
    let apparent_long = true_long - 0.00569 - 0.00478 * omega.to_radians().sin();

    let e = obliquity_correction(t).to_radians();
    (e.sin() * apparent_long.to_radians().sin()).asin().to_degrees()
}

/// Minutes.
fn equation_of_time(t: f64) -> f64 {
    let e = obliquity_correction(t).to_radians();
    let l0 = geom_mean_long_sun(t).to_radians();
    let m = geom_mean_anomaly_sun(t).to_radians();
    let ecc = earth_orbit_eccentricity(t);
    let y = (e / 2.0).tan().powi(2);

    let eq = y * (2.0 * l0).sin() - 2.0 * ecc * m.sin() + 4.0 * ecc * y * m.sin() * (2.0 * l0).cos()
        - 0.5 * y * y * (4.0 * l0).sin()
        - 1.25 * ecc * ecc * (2.0 * m).sin();
    4.0 * eq.to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime, offset};

    #[test]
    fn solar_offsets() {
        assert_eq!(solar_offset(0.0), offset!(UTC));
        assert_eq!(solar_offset(7.5), offset!(+1));
        assert_eq!(solar_offset(-122.3), offset!(-8));
        assert_eq!(solar_offset(179.9), offset!(+12));
        assert_eq!(solar_offset(-180.0), offset!(-12));
    }

    #[test]
    fn equator_noon_and_midnight() {
        let pos = Some((0.0, 0.0));
        assert_eq!(classify(pos, datetime!(2024-03-20 12:00 UTC)), DayNight::Day);
        assert_eq!(classify(pos, datetime!(2024-03-20 00:00 UTC)), DayNight::Night);
    }

    #[test]
    fn western_longitude_uses_solar_time() {
        // local solar midnight and noon at 90W
        let pos = Some((0.0, -90.0));
        assert_eq!(classify(pos, datetime!(2024-03-20 06:00 UTC)), DayNight::Night);
        assert_eq!(classify(pos, datetime!(2024-03-20 18:00 UTC)), DayNight::Day);
    }

    #[test]
    fn equinox_sunrise_near_six() {
        let (rise, set) = daylight(0.0, 0.0, date!(2024-03-20), offset!(UTC)).unwrap();
        assert!(rise > datetime!(2024-03-20 05:55 UTC) && rise < datetime!(2024-03-20 06:15 UTC), "{rise}");
        assert!(set > datetime!(2024-03-20 17:55 UTC) && set < datetime!(2024-03-20 18:20 UTC), "{set}");
    }

    #[test]
    fn mid_latitude_summer_evening() {
        let seattle = Some((47.6, -122.3));
        assert_eq!(classify(seattle, datetime!(2024-06-21 20:00 UTC)), DayNight::Day);
        assert_eq!(classify(seattle, datetime!(2024-06-21 06:00 UTC)), DayNight::Night);
    }

    #[test]
    fn polar_day_and_night_fall_back_to_noon_elevation() {
        let (lat, lon) = (78.2, 15.6);
        assert!(daylight(lat, lon, date!(2024-06-21), solar_offset(lon)).is_none());
        assert!(noon_elevation(lat, lon, date!(2024-06-21)) > 0.0);
        assert_eq!(classify(Some((lat, lon)), datetime!(2024-06-21 23:30 UTC)), DayNight::Day);

        assert!(daylight(lat, lon, date!(2024-12-21), solar_offset(lon)).is_none());
        assert!(noon_elevation(lat, lon, date!(2024-12-21)) < 0.0);
        assert_eq!(classify(Some((lat, lon)), datetime!(2024-12-21 11:00 UTC)), DayNight::Night);
    }

    #[test]
    fn subarctic_june_noon_is_day() {
        // sunset drifts across local midnight here around the solstice
        for lon in [-7.4, 7.4] {
            let offset = solar_offset(lon);
            let mut d = date!(2024-06-01);
            while d <= date!(2024-06-30) {
                let noon = d.midnight().assume_offset(offset) + Duration::hours(12);
                assert_eq!(classify(Some((65.6, lon)), noon), DayNight::Day, "lon {lon} on {d}");
                if let Some((rise, set)) = daylight(65.6, lon, d, offset) {
                    assert!(rise <= set, "lon {lon} on {d}: {rise} > {set}");
                    assert_eq!(set.to_offset(offset).date(), d);
                }
                d = d.next_day().unwrap();
            }
        }
        let noon = datetime!(2024-06-16 12:00 UTC);
        assert_eq!(classify(Some((65.6, -7.4)), noon), DayNight::Day);
        assert_eq!(classify(Some((65.6, 7.4)), noon), DayNight::Day);
    }

    #[test]
    fn unknown_position_is_day() {
        assert_eq!(classify(None, datetime!(2024-12-21 00:00 UTC)), DayNight::Day);
    }
}
