mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use time::UtcOffset;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use hud_core::{doctor as core_doctor, DisplayRenderer, ReportDispatcher, UnitConverter, UnitSystem};
use hud_gpsd::{doctor as gpsd_doctor, TelemetrySource, GPSD_PORT};

use render::{JsonRenderer, TerminalRenderer};

#[derive(Debug, Parser)]
#[command(name = "gpshud", version, about = "gpshud - head-up display for gpsd")]
struct Cli {
    #[arg(long)]
    config: Option<String>,

    /// imperial | traditional | metric | nautical
    #[arg(long, short = 'u')]
    units: Option<String>,

    /// gpsd host (default: localhost)
    #[arg(long)]
    host: Option<String>,

    /// gpsd port (default: 2947)
    #[arg(long)]
    port: Option<u16>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Connect to gpsd and keep the display updated.
    Run,
    /// Feed a captured gpsd JSON session through the display.
    Replay { file: String },
    /// Validate the configuration.
    Doctor,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct Config {
    gpsd: GpsdCfg,
    units: UnitsCfg,
    display: DisplayCfg,
}

#[derive(Debug, serde::Deserialize)]
#[serde(default)]
struct GpsdCfg {
    source: String,
    host: String,
    port: u16,
    file: Option<String>,
    reconnect: bool,
    reconnect_delay_ms: u64,
}

impl Default for GpsdCfg {
    fn default() -> Self {
        Self {
            source: "tcp".into(),
            host: "localhost".into(),
            port: GPSD_PORT,
            file: None,
            reconnect: true,
            reconnect_delay_ms: 2000,
        }
    }
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct UnitsCfg {
    system: Option<String>,
    speed: Option<String>,
    altitude: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(default)]
struct DisplayCfg {
    renderer: String,
    clear_screen: bool,
    utc_offset_hours: i8,
}

impl Default for DisplayCfg {
    fn default() -> Self {
        Self { renderer: "terminal".into(), clear_screen: true, utc_offset_hours: 0 }
    }
}

fn load_config(path: Option<&str>) -> Result<Config> {
    let Some(path) = path else { return Ok(Config::default()); };
    let s = std::fs::read_to_string(path).with_context(|| format!("read config {}", path))?;
    toml::from_str(&s).context("parse config toml")
}

impl Config {
    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(u) = &cli.units {
            // an explicit --units wins over per-unit settings in the file
            self.units = UnitsCfg { system: Some(u.clone()), speed: None, altitude: None };
        }
        if let Some(h) = &cli.host {
            self.gpsd.host = h.clone();
        }
        if let Some(p) = cli.port {
            self.gpsd.port = p;
        }
    }

    fn unit_converter(&self) -> Result<UnitConverter> {
        let (speed, altitude) = match &self.units.system {
            Some(s) => s.parse::<UnitSystem>()?.units(),
            None => {
                let d = UnitConverter::default();
                (d.speed_unit(), d.altitude_unit())
            }
        };
        let speed = match &self.units.speed {
            Some(s) => s.parse()?,
            None => speed,
        };
        let altitude = match &self.units.altitude {
            Some(a) => a.parse()?,
            None => altitude,
        };
        Ok(UnitConverter::from_units(speed, altitude))
    }

    fn display_offset(&self) -> Result<UtcOffset> {
        core_doctor::check_display_offset(self.display.utc_offset_hours)?;
        UtcOffset::from_hms(self.display.utc_offset_hours, 0, 0).context("display.utc_offset_hours")
    }

    fn renderer(&self) -> Result<Box<dyn DisplayRenderer>> {
        match self.display.renderer.as_str() {
            "terminal" => Ok(Box::new(TerminalRenderer::new(std::io::stdout(), self.display.clear_screen))),
            "json" => Ok(Box::new(JsonRenderer::new(std::io::stdout()))),
            other => anyhow::bail!("unknown display.renderer: {}", other),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    let mut cfg = load_config(cli.config.as_deref())?;
    cfg.apply_cli(&cli);

    match cli.cmd {
        Command::Doctor => doctor(&cfg)?,
        Command::Run => run(&cfg).await?,
        Command::Replay { file } => replay(&cfg, &file).await?,
    }
    Ok(())
}

fn doctor(cfg: &Config) -> Result<()> {
    info!("doctor: starting");

    let units = cfg.unit_converter().context("units")?;
    cfg.display_offset()?;
    cfg.renderer()?;

    match cfg.gpsd.source.as_str() {
        "tcp" => gpsd_doctor::check_endpoint(&cfg.gpsd.host, cfg.gpsd.port)?,
        "file" => gpsd_doctor::check_replay_file(cfg.gpsd.file.as_deref().context("gpsd.file missing")?)?,
        other => anyhow::bail!("unknown gpsd.source: {}", other),
    }

    info!("doctor: OK (speed {}, altitude {})", units.speed_unit(), units.altitude_unit());
    Ok(())
}

enum Outcome {
    Ended,
    Interrupted,
}

async fn pump<R: DisplayRenderer>(
    src: &mut TelemetrySource,
    dispatcher: &mut ReportDispatcher,
    renderer: &mut R,
) -> Result<Outcome> {
    loop {
        tokio::select! {
            next = src.next_report() => match next? {
                Some(report) => dispatcher.dispatch_to(report, renderer)?,
                None => return Ok(Outcome::Ended),
            },
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                return Ok(Outcome::Interrupted);
            }
        }
    }
}

fn build(cfg: &Config) -> Result<(ReportDispatcher, Box<dyn DisplayRenderer>)> {
    let units = cfg.unit_converter()?;
    let dispatcher = ReportDispatcher::new(units).with_display_offset(cfg.display_offset()?);
    let mut renderer = cfg.renderer()?;
    // something on screen before the first report
    renderer.render(&dispatcher.recompute())?;
    Ok((dispatcher, renderer))
}

async fn run(cfg: &Config) -> Result<()> {
    if cfg.gpsd.source == "file" {
        let file = cfg.gpsd.file.as_deref().context("gpsd.file missing (source = \"file\")")?;
        return replay(cfg, file).await;
    }
    anyhow::ensure!(cfg.gpsd.source == "tcp", "unknown gpsd.source: {}", cfg.gpsd.source);

    let (mut dispatcher, mut renderer) = build(cfg)?;
    let delay = std::time::Duration::from_millis(cfg.gpsd.reconnect_delay_ms);

    loop {
        match TelemetrySource::connect(&cfg.gpsd.host, cfg.gpsd.port).await {
            Ok(mut src) => match pump(&mut src, &mut dispatcher, &mut renderer).await {
                Ok(Outcome::Interrupted) => return Ok(()),
                Ok(Outcome::Ended) => {
                    anyhow::ensure!(cfg.gpsd.reconnect, "gpsd has stopped sending data");
                    warn!("gpsd has stopped sending data; reconnecting in {:?}", delay);
                }
                Err(e) => {
                    if !cfg.gpsd.reconnect {
                        return Err(e.context("gpsd stream failed"));
                    }
                    warn!("gpsd stream failed: {:#}; reconnecting in {:?}", e, delay);
                }
            },
            Err(e) => {
                if !cfg.gpsd.reconnect {
                    return Err(e.context("failed to connect to gpsd; make sure that gpsd is running"));
                }
                warn!("{:#}; retrying in {:?}", e, delay);
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                return Ok(());
            }
        }
    }
}

async fn replay(cfg: &Config, file: &str) -> Result<()> {
    let (mut dispatcher, mut renderer) = build(cfg)?;
    let mut src = TelemetrySource::file(file).await?;
    if let Outcome::Ended = pump(&mut src, &mut dispatcher, &mut renderer).await? {
        info!("replay finished");
    }
    Ok(())
}
