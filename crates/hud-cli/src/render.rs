use std::io::Write;

use anyhow::{Context, Result};
use hud_core::{ColorScheme, DisplayModel, DisplayRenderer};
use serde::Serialize;

const RESET: &str = "\x1b[0m";

/// 24-bit foreground escape for a `#RRGGBB` palette entry.
fn ansi_fg(hex: &str) -> String {
    let channel = |i: usize| hex.get(i..i + 2).and_then(|c| u8::from_str_radix(c, 16).ok()).unwrap_or(0xFF);
    format!("\x1b[38;2;{};{};{}m", channel(1), channel(3), channel(5))
}

/// Redraws the whole screen on every update.
pub struct TerminalRenderer<W: Write> {
    out: W,
    clear: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, clear: bool) -> Self {
        Self { out, clear }
    }
}

impl<W: Write> DisplayRenderer for TerminalRenderer<W> {
    fn render(&mut self, m: &DisplayModel) -> Result<()> {
        let mut frame = String::new();
        if self.clear {
            frame.push_str("\x1b[2J\x1b[H");
        }
        let fg = ansi_fg(m.color_scheme.foreground());
        let unit = ansi_fg(m.color_scheme.unit_color());

        frame.push_str(&format!("{fg}{:>4}  {}\n", m.direction_text, m.date_text));
        frame.push_str(&format!("{:>4}  {}\n", m.speed_text, m.time_text));
        frame.push_str(&format!("{unit}{:>4}{fg}\n\n", m.speed_unit));
        frame.push_str(&m.fix_text);
        frame.push_str("\n\n");
        if !m.position_text.is_empty() {
            frame.push_str(&m.position_text);
            frame.push('\n');
        }
        frame.push_str(RESET);
        self.out.write_all(frame.as_bytes()).context("write frame")?;
        self.out.flush().context("flush frame")
    }
}

/// One JSON object per update, for piping into other tools.
pub struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

/// The model plus the resolved palette, so consumers need not know the colors.
#[derive(Serialize)]
struct JsonFrame<'a> {
    #[serde(flatten)]
    model: &'a DisplayModel,
    foreground: &'static str,
    unit_color: &'static str,
}

impl<'a> JsonFrame<'a> {
    fn new(model: &'a DisplayModel) -> Self {
        let scheme: ColorScheme = model.color_scheme;
        Self { model, foreground: scheme.foreground(), unit_color: scheme.unit_color() }
    }
}

impl<W: Write> DisplayRenderer for JsonRenderer<W> {
    fn render(&mut self, m: &DisplayModel) -> Result<()> {
        serde_json::to_writer(&mut self.out, &JsonFrame::new(m)).context("encode display model")?;
        self.out.write_all(b"\n").context("write display model")?;
        Ok(())
    }
}
