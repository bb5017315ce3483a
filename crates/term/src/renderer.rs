//! TerminalRenderer: flushes a framebuffer to a real terminal.
//!
//! The first frame and every resize are full redraws. After that only the changed
//! runs of each row are written. Runs separated by a short unchanged gap are merged,
//! since reprinting a few cells is cheaper than another cursor move. Style changes
//! are tracked by a [`Pen`] so only the parts that differ are re-emitted.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};

const WINDOW_TITLE: &str = "Connect Four";

/// Unchanged cells bridged inside one run.
const MAX_GAP: u16 = 3;

/// A changed stretch of one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub x: u16,
    pub y: u16,
    pub len: u16,
}

pub struct TerminalRenderer {
    stdout: io::Stdout,
    last: Option<FrameBuffer>,
    buf: Vec<u8>,
    runs: Vec<Run>,
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
            last: None,
            buf: Vec::with_capacity(32 * 1024),
            runs: Vec::with_capacity(64),
        }
    }

    /// Raw mode, alternate screen, hidden cursor and mouse reporting.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(terminal::SetTitle(WINDOW_TITLE))?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.buf.queue(EnableMouseCapture)?;
        self.flush_buf()
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(DisableMouseCapture)?;
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next draw to be a full redraw (after a resize).
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Draw `fb`, then swap it with the previous frame.
    ///
    /// On return `fb` holds stale content of the right size; the caller redraws
    /// into it next frame, so no frame is ever cloned.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        self.buf.clear();
        let mut prev = match self.last.take() {
            Some(prev) if prev.width() == fb.width() && prev.height() == fb.height() => {
                collect_runs(&prev, fb, &mut self.runs);
                encode_runs_into(fb, &self.runs, &mut self.buf)?;
                prev
            }
            stale => {
                encode_full_into(fb, &mut self.buf)?;
                let mut prev = stale.unwrap_or_else(|| FrameBuffer::new(0, 0));
                prev.resize(fb.width(), fb.height());
                prev
            }
        };
        self.flush_buf()?;

        std::mem::swap(&mut prev, fb);
        self.last = Some(prev);
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

/// Last style sent to the terminal.
#[derive(Debug, Default)]
struct Pen {
    current: Option<CellStyle>,
}

impl Pen {
    fn print(&mut self, out: &mut Vec<u8>, cell: Cell) -> Result<()> {
        let style = cell.style;
        match self.current {
            Some(cur) if cur == style => {}
            Some(cur) if cur.bold == style.bold && cur.dim == style.dim => {
                if cur.fg != style.fg {
                    out.queue(SetForegroundColor(rgb_to_color(style.fg)))?;
                }
                if cur.bg != style.bg {
                    out.queue(SetBackgroundColor(rgb_to_color(style.bg)))?;
                }
            }
            _ => {
                // Attribute reset also clears colors on some terminals.
                out.queue(SetAttribute(Attribute::Reset))?;
                out.queue(SetForegroundColor(rgb_to_color(style.fg)))?;
                out.queue(SetBackgroundColor(rgb_to_color(style.bg)))?;
                if style.bold {
                    out.queue(SetAttribute(Attribute::Bold))?;
                }
                if style.dim {
                    out.queue(SetAttribute(Attribute::Dim))?;
                }
            }
        }
        self.current = Some(style);
        out.queue(Print(cell.ch))?;
        Ok(())
    }

    fn finish(self, out: &mut Vec<u8>) -> Result<()> {
        out.queue(ResetColor)?;
        out.queue(SetAttribute(Attribute::Reset))?;
        Ok(())
    }
}

/// Encode a full-frame redraw into `out`.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let mut pen = Pen::default();
    for y in 0..fb.height() {
        out.queue(cursor::MoveTo(0, y))?;
        for &cell in fb.row(y) {
            pen.print(out, cell)?;
        }
    }
    pen.finish(out)
}

/// Encode only what changed between two frames of the same size.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut runs = Vec::new();
    collect_runs(prev, next, &mut runs);
    encode_runs_into(next, &runs, out)
}

fn encode_runs_into(next: &FrameBuffer, runs: &[Run], out: &mut Vec<u8>) -> Result<()> {
    if runs.is_empty() {
        return Ok(());
    }
    let mut pen = Pen::default();
    for run in runs {
        out.queue(cursor::MoveTo(run.x, run.y))?;
        let row = next.row(run.y);
        let start = run.x as usize;
        for &cell in &row[start..start + run.len as usize] {
            pen.print(out, cell)?;
        }
    }
    pen.finish(out)
}

/// Changed runs per row, gaps of up to [`MAX_GAP`] cells bridged.
///
/// Frames of different sizes yield one run per row of `next`.
pub fn collect_runs(prev: &FrameBuffer, next: &FrameBuffer, runs: &mut Vec<Run>) {
    runs.clear();
    if prev.width() != next.width() || prev.height() != next.height() {
        runs.extend((0..next.height()).map(|y| Run {
            x: 0,
            y,
            len: next.width(),
        }));
        return;
    }

    for y in 0..next.height() {
        let before = prev.row(y);
        let after = next.row(y);
        let mut open: Option<Run> = None;
        for (x, (a, b)) in before.iter().zip(after).enumerate() {
            if a == b {
                continue;
            }
            let x = x as u16;
            open = match open {
                Some(mut run) if x - (run.x + run.len) <= MAX_GAP => {
                    run.len = x - run.x + 1;
                    Some(run)
                }
                Some(run) => {
                    runs.push(run);
                    Some(Run { x, y, len: 1 })
                }
                None => Some(Run { x, y, len: 1 }),
            };
        }
        runs.extend(open);
    }
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}
