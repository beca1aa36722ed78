//! TerminalRenderer: flushes a glyph frame to a real terminal.
//!
//! Every draw is a full redraw. Frames are small enough that diffing buys
//! nothing here.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal, QueueableCommand,
};

use crate::frame::{Frame, Tone};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    buf: Vec<u8>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Draw `frame` centered in the current terminal.
    pub fn draw(&mut self, frame: &Frame) -> Result<()> {
        let (cols, rows) = terminal::size().unwrap_or((frame.width(), frame.height()));
        let origin = (
            cols.saturating_sub(frame.width()) / 2,
            rows.saturating_sub(frame.height()) / 2,
        );
        self.buf.clear();
        encode_frame_into(frame, origin, &mut self.buf)?;
        self.flush_buf()
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

/// Encode a full redraw of `frame` at `origin` into `out`.
///
/// This builds a sequence of crossterm commands without writing to stdout.
pub fn encode_frame_into(frame: &Frame, origin: (u16, u16), out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let mut current: Option<Tone> = None;
    for y in 0..frame.height() {
        out.queue(cursor::MoveTo(origin.0, origin.1.saturating_add(y)))?;
        for x in 0..frame.width() {
            let glyph = frame.get(x, y).unwrap_or_default();
            if current != Some(glyph.tone) {
                apply_tone_into(out, glyph.tone)?;
                current = Some(glyph.tone);
            }
            out.queue(Print(glyph.ch))?;
        }
    }

    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

fn apply_tone_into(out: &mut Vec<u8>, tone: Tone) -> Result<()> {
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(SetForegroundColor(tone_color(tone)))?;
    if tone == Tone::Text {
        out.queue(SetAttribute(Attribute::Bold))?;
    }
    Ok(())
}

pub fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Blank | Tone::Well => Color::Reset,
        Tone::Border => Color::Rgb {
            r: 90,
            g: 90,
            b: 110,
        },
        Tone::Active => Color::Rgb {
            r: 0,
            g: 200,
            b: 220,
        },
        Tone::Locked => Color::Rgb {
            r: 170,
            g: 170,
            b: 180,
        },
        Tone::Shadow => Color::Rgb {
            r: 80,
            g: 80,
            b: 90,
        },
        Tone::Ended => Color::Rgb {
            r: 200,
            g: 60,
            b: 60,
        },
        Tone::Text => Color::White,
    }
}
