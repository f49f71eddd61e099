use anyhow::Result;

/// Civil offsets in use run from UTC-12 to UTC+14.
pub fn check_display_offset(hours: i8) -> Result<()> {
    anyhow::ensure!((-12..=14).contains(&hours), "display.utc_offset_hours should be -12..14, got {}", hours);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets() {
        assert!(check_display_offset(14).is_ok());
        assert!(check_display_offset(-12).is_ok());
        assert!(check_display_offset(15).is_err());
    }
}
