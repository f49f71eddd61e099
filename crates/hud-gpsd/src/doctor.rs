use anyhow::Result;
use std::path::Path;

pub fn check_endpoint(host: &str, port: u16) -> Result<()> {
    anyhow::ensure!(!host.trim().is_empty(), "gpsd.host is empty");
    anyhow::ensure!(port > 0, "gpsd.port must be non-zero");
    Ok(())
}

pub fn check_replay_file(path: &str) -> Result<()> {
    let p = Path::new(path);
    anyhow::ensure!(p.exists(), "gpsd.file missing: {}", path);
    anyhow::ensure!(p.is_file(), "gpsd.file is not a file: {}", path);
    Ok(())
}
