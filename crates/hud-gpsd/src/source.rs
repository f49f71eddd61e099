use anyhow::{Context, Result};
use hud_proto::{GpsdMessage, Report};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

pub const GPSD_PORT: u16 = 2947;

/// Ask gpsd to stream JSON reports.
const WATCH_COMMAND: &[u8] = b"?WATCH={\"enable\":true,\"json\":true};\n";

/// Ordered stream of typed reports from gpsd or a captured session.
pub enum TelemetrySource {
    Gpsd(BufReader<TcpStream>),
    File(BufReader<File>),
}

impl TelemetrySource {
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        let mut stream = TcpStream::connect((host, port))
            .await
            .with_context(|| format!("connect to gpsd at {}:{}", host, port))?;
        stream.write_all(WATCH_COMMAND).await.context("send gpsd WATCH")?;
        info!("gpsd: watching {}:{}", host, port);
        Ok(Self::Gpsd(BufReader::new(stream)))
    }

    pub async fn file(path: &str) -> Result<Self> {
        let f = File::open(path).await.with_context(|| format!("open replay file {}", path))?;
        info!("replaying {}", path);
        Ok(Self::File(BufReader::new(f)))
    }

    /// Next TPV or SKY report. `Ok(None)` means the stream ended (gpsd hung
    /// up or the replay is exhausted).
    pub async fn next_report(&mut self) -> Result<Option<Report>> {
        let mut line = String::new();
        loop {
            line.clear();
            let n = match self {
                TelemetrySource::Gpsd(r) => r.read_line(&mut line).await.context("read from gpsd")?,
                TelemetrySource::File(r) => r.read_line(&mut line).await.context("read replay file")?,
            };
            if n == 0 {
                return Ok(None);
            }
            if let Some(report) = decode_line(line.trim()) {
                return Ok(Some(report));
            }
        }
    }
}

/// Blank lines, other classes and undecodable lines yield nothing.
fn decode_line(line: &str) -> Option<Report> {
    if line.is_empty() {
        return None;
    }
    match GpsdMessage::from_line(line) {
        Ok(msg) => {
            let report = msg.into_report();
            if report.is_none() {
                debug!("skipping non-display report");
            }
            report
        }
        Err(e) => {
            warn!("undecodable gpsd line ({}): {}", e, line);
            None
        }
    }
}
