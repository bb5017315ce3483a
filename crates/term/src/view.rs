//! ScreenView: maps an app [`FrameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). Every render also records where targets and board
//! columns landed in a [`HitMap`], so pointer input resolves against the frame the
//! player actually saw.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::core::{stage_label, FrameSnapshot, TargetKind};
use crate::fb::{CellStyle, FrameBuffer};
use crate::theme::Palette;
use crate::types::{
    PointerEvent, PointerKind, ScreenId, UiCommand, BOARD_HEIGHT, BOARD_WIDTH, CELL_UNITS,
    HEADER_ROWS, TRANSITION_FRAME_WIDTH,
};

/// Widest column of menu text and buttons.
const MENU_WIDTH: u16 = 64;
const MIN_BUTTON_WIDTH: u16 = 20;
const SLIDER_WIDTH: u16 = 41;
/// First terminal row of the drop lane on game screens.
const LANE_TOP: u16 = 3;

const THINKING_TEXT: &str = "Computer is thinking...";

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

impl Rect {
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x
            && y >= self.y
            && (x - self.x) < self.w
            && (y - self.y) < self.h
    }
}

/// What a region of the screen stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitZone {
    Target(usize),
    Slider { target: usize, min: u8, max: u8 },
    Column(u8),
}

/// Clickable regions of the last rendered frame.
#[derive(Debug, Clone, Default)]
pub struct HitMap {
    zones: Vec<(Rect, HitZone)>,
}

impl HitMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.zones.clear();
    }

    pub fn push(&mut self, rect: Rect, zone: HitZone) {
        self.zones.push((rect, zone));
    }

    pub fn zones(&self) -> &[(Rect, HitZone)] {
        &self.zones
    }

    /// Topmost zone under a cell; later zones are drawn above earlier ones.
    pub fn zone_at(&self, x: u16, y: u16) -> Option<(Rect, HitZone)> {
        self.zones
            .iter()
            .rev()
            .find(|(rect, _)| rect.contains(x, y))
            .copied()
    }

    /// Turn a pointer event into a command.
    pub fn resolve(&self, event: PointerEvent) -> Option<UiCommand> {
        let (rect, zone) = self.zone_at(event.x, event.y)?;
        match (event.kind, zone) {
            (PointerKind::Move, HitZone::Column(column)) => Some(UiCommand::HoverColumn(column)),
            (PointerKind::Press, HitZone::Column(column)) => Some(UiCommand::DropColumn(column)),
            (PointerKind::Press, HitZone::Target(index)) => Some(UiCommand::ActivateTarget(index)),
            (PointerKind::Press | PointerKind::Drag, HitZone::Slider { target, min, max }) => {
                Some(UiCommand::SliderSet {
                    target,
                    value: slider_value(rect, event.x, min, max),
                })
            }
            _ => None,
        }
    }
}

/// Slider value under column `x` of its track.
fn slider_value(track: Rect, x: u16, min: u8, max: u8) -> u8 {
    let span = track.w.saturating_sub(1).max(1) as u32;
    let offset = x.saturating_sub(track.x).min(track.w.saturating_sub(1)) as u32;
    let range = max.saturating_sub(min) as u32;
    (min as u32 + (offset * range + span / 2) / span) as u8
}

/// Track column of a slider value.
fn slider_offset(track_w: u16, value: u8, min: u8, max: u8) -> u16 {
    let span = track_w.saturating_sub(1) as u32;
    let range = max.saturating_sub(min).max(1) as u32;
    let value = value.clamp(min, max.max(min)).saturating_sub(min) as u32;
    ((value * span + range / 2) / range) as u16
}

/// Horizontal span `[left, right)` hidden by the transition cover.
///
/// The cover's leading edge moves twice as fast as its trailing edge, so the screen
/// is fully hidden exactly at the midpoint.
pub fn cover_span(progress: u32, width: u16) -> Option<(u16, u16)> {
    let frame = TRANSITION_FRAME_WIDTH as i64;
    let p = progress as i64;
    let left = (p - frame).clamp(0, frame);
    let right = (2 * p - frame).clamp(0, frame);
    let to_cells = |v: i64| (v * width as i64 / frame) as u16;
    let (left, right) = (to_cells(left), to_cells(right));
    (right > left).then_some((left, right))
}

/// Greedy word wrap; `\n` starts a new paragraph.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let needed = if line.is_empty() {
                word.chars().count()
            } else {
                line.chars().count() + 1 + word.chars().count()
            };
            if needed > width && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }
    lines
}

/// Hash of everything visible in a snapshot. Equal fingerprints draw equal frames.
pub fn fingerprint(snap: &FrameSnapshot<'_>) -> u64 {
    let mut h = DefaultHasher::new();
    snap.screen.id.hash(&mut h);
    snap.theme.hash(&mut h);
    snap.transition.hash(&mut h);
    snap.focus.hash(&mut h);
    snap.difficulty.hash(&mut h);
    snap.board.side_a().hash(&mut h);
    snap.board.side_b().hash(&mut h);
    if let Some(piece) = snap.piece {
        piece.column.hash(&mut h);
        piece.side.hash(&mut h);
        piece.y.to_bits().hash(&mut h);
    }
    snap.hover.hash(&mut h);
    snap.turn.hash(&mut h);
    snap.mode.hash(&mut h);
    snap.thinking.hash(&mut h);
    snap.scores.hash(&mut h);
    snap.banner.hash(&mut h);
    snap.last_result.hash(&mut h);
    h.finish()
}

fn digits(mut n: u32) -> u16 {
    let mut len = 1;
    while n >= 10 {
        n /= 10;
        len += 1;
    }
    len
}

/// Terminal placement of the drop lane and board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardLayout {
    /// Left edge of the frame (border column)
    pub frame_x: u16,
    pub frame_w: u16,
    /// Left edge of column 0
    pub board_left: u16,
    /// Top of the drop lane (header row 0)
    pub lane_top: u16,
    /// Top of the board's top row
    pub board_top: u16,
}

/// A terminal renderer for the Connect Four screens.
pub struct ScreenView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for ScreenView {
    fn default() -> Self {
        // 4x2 keeps discs roughly round on typical terminal glyphs.
        Self {
            cell_w: 4,
            cell_h: 2,
        }
    }
}

impl ScreenView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
        }
    }

    pub fn board_layout(&self, viewport: Viewport) -> BoardLayout {
        let frame_w = BOARD_WIDTH as u16 * self.cell_w + 2;
        let frame_x = viewport.width.saturating_sub(frame_w) / 2;
        BoardLayout {
            frame_x,
            frame_w,
            board_left: frame_x + 1,
            lane_top: LANE_TOP,
            board_top: LANE_TOP + HEADER_ROWS as u16 * self.cell_h,
        }
    }

    /// Top-left terminal cell of board cell `(column, row)`; rows count from the bottom.
    pub fn cell_origin(&self, layout: &BoardLayout, column: u8, row: u8) -> (u16, u16) {
        let x = layout.board_left + column as u16 * self.cell_w;
        let from_top = BOARD_HEIGHT - 1 - row.min(BOARD_HEIGHT - 1);
        let y = layout.board_top + from_top as u16 * self.cell_h;
        (x, y)
    }

    /// Render a snapshot into an existing framebuffer and refresh the hit map.
    pub fn render_into(
        &self,
        snap: &FrameSnapshot<'_>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
        hits: &mut HitMap,
    ) {
        let palette = Palette::for_theme(snap.theme);
        fb.resize(viewport.width, viewport.height);
        fb.clear(palette.blank().into_cell(' '));
        hits.clear();

        if snap.is_game() {
            self.draw_game(fb, hits, snap, &palette, viewport);
        } else {
            self.draw_menu(fb, hits, snap, &palette, viewport);
        }

        if let Some(progress) = snap.transition {
            if let Some((left, right)) = cover_span(progress, viewport.width) {
                fb.fill_rect(left, 0, right - left, viewport.height, ' ', palette.blank());
            }
        }
    }

    /// Convenience helper that allocates a new framebuffer and hit map.
    pub fn render(&self, snap: &FrameSnapshot<'_>, viewport: Viewport) -> (FrameBuffer, HitMap) {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        let mut hits = HitMap::new();
        self.render_into(snap, viewport, &mut fb, &mut hits);
        (fb, hits)
    }

    fn draw_menu(
        &self,
        fb: &mut FrameBuffer,
        hits: &mut HitMap,
        snap: &FrameSnapshot<'_>,
        palette: &Palette,
        viewport: Viewport,
    ) {
        let panel_w = viewport.width.min(MENU_WIDTH);
        let x0 = (viewport.width - panel_w) / 2;
        let text = palette.text_style();
        let mut y = 1u16;

        if let Some(body) = snap.screen.text {
            for line in wrap_text(body, panel_w.saturating_sub(4) as usize) {
                fb.put_str(x0 + 2, y, &line, text);
                y = y.saturating_add(1);
            }
            y = y.saturating_add(1);
        }

        if snap.screen.id == ScreenId::EndScreen {
            if let Some(result) = snap.last_result {
                fb.put_centered(x0, panel_w, y, result, text.bold());
                y = y.saturating_add(1);
            }
            self.draw_score_line(fb, snap.scores, x0, panel_w, y, text);
            y = y.saturating_add(2);
        }

        let button_w = snap
            .screen
            .targets
            .iter()
            .filter(|t| !t.is_slider())
            .map(|t| t.label.chars().count() as u16 + 4)
            .max()
            .unwrap_or(0)
            .max(MIN_BUTTON_WIDTH)
            .min(panel_w);
        let bx = x0 + (panel_w - button_w) / 2;

        for (index, target) in snap.screen.targets.iter().enumerate() {
            let focused = index == snap.focus;
            match target.kind {
                TargetKind::Button => {
                    let rect = Rect {
                        x: bx,
                        y,
                        w: button_w,
                        h: 1,
                    };
                    draw_button(fb, palette, rect, target.label, focused);
                    hits.push(rect, HitZone::Target(index));
                    y = y.saturating_add(2);
                }
                TargetKind::Slider { min, max } => {
                    let track_w = SLIDER_WIDTH.min(panel_w.saturating_sub(6)).max(2);
                    let tx = x0 + panel_w.saturating_sub(track_w) / 2;
                    let value = snap.difficulty.clamp(min, max);

                    let caption = if focused { text.bold() } else { text };
                    let mut x = tx;
                    fb.put_str(x, y, target.label, caption);
                    x += target.label.chars().count() as u16;
                    fb.put_str(x, y, ": ", caption);
                    x += 2;
                    x += fb.put_u32(x, y, value as u32, caption);
                    fb.put_str(x + 2, y, stage_label(value), text);

                    let track = Rect {
                        x: tx,
                        y: y.saturating_add(1),
                        w: track_w,
                        h: 1,
                    };
                    let rail = CellStyle {
                        dim: true,
                        ..text
                    };
                    fb.fill_rect(track.x, track.y, track.w, 1, '─', rail);
                    let knob = tx + slider_offset(track_w, value, min, max);
                    fb.put_char(knob, track.y, '█', text.bold());
                    if focused {
                        fb.put_char(tx.saturating_sub(2), track.y, '◀', text);
                        fb.put_char(tx + track_w + 1, track.y, '▶', text);
                    }
                    hits.push(track, HitZone::Slider { target: index, min, max });
                    y = y.saturating_add(3);
                }
            }
        }
    }

    fn draw_game(
        &self,
        fb: &mut FrameBuffer,
        hits: &mut HitMap,
        snap: &FrameSnapshot<'_>,
        palette: &Palette,
        viewport: Viewport,
    ) {
        let text = palette.text_style();
        let layout = self.board_layout(viewport);
        let board_h = BOARD_HEIGHT as u16 * self.cell_h;

        // Column zones first so buttons stay on top.
        for column in 0..BOARD_WIDTH {
            hits.push(
                Rect {
                    x: layout.board_left + column as u16 * self.cell_w,
                    y: layout.lane_top,
                    w: self.cell_w,
                    h: layout.board_top + board_h - layout.lane_top,
                },
                HitZone::Column(column),
            );
        }

        // Buttons along the top row.
        let mut x = 1u16;
        for (index, target) in snap.screen.targets.iter().enumerate() {
            let rect = Rect {
                x,
                y: 0,
                w: target.label.chars().count() as u16 + 4,
                h: 1,
            };
            draw_button(fb, palette, rect, target.label, index == snap.focus);
            hits.push(rect, HitZone::Target(index));
            x = x.saturating_add(rect.w + 1);
        }

        self.draw_score_line(fb, snap.scores, 0, viewport.width, 1, text);

        // Frame with holes.
        let frame_style = CellStyle::new(palette.text, palette.frame);
        fb.fill_rect(
            layout.frame_x,
            layout.board_top - 1,
            layout.frame_w,
            board_h + 2,
            ' ',
            frame_style,
        );
        draw_border(
            fb,
            layout.frame_x,
            layout.board_top - 1,
            layout.frame_w,
            board_h + 2,
            CellStyle {
                dim: true,
                ..frame_style
            },
        );
        for column in 0..BOARD_WIDTH {
            for row in 0..BOARD_HEIGHT {
                let (cx, cy) = self.cell_origin(&layout, column, row);
                let (hx, hw) = self.hole(cx);
                match snap.board.cell(column, row) {
                    Some(side) => fb.fill_rect(
                        hx,
                        cy,
                        hw,
                        self.cell_h,
                        '█',
                        CellStyle::new(palette.disc(side), palette.background),
                    ),
                    None => fb.fill_rect(hx, cy, hw, self.cell_h, ' ', palette.blank()),
                }
            }
        }

        if let Some(column) = snap.hover {
            let arrow = CellStyle::new(palette.disc(snap.arrow_side()), palette.background).bold();
            let ax = layout.board_left + column.min(BOARD_WIDTH - 1) as u16 * self.cell_w;
            fb.put_centered(ax, self.cell_w, layout.lane_top + self.cell_h, "▼", arrow);
        }

        if let Some(piece) = snap.piece {
            let style = CellStyle::new(palette.disc(piece.side), palette.background);
            let top = layout.lane_top
                + ((piece.y.max(0.0) / CELL_UNITS) * self.cell_h as f32).round() as u16;
            let (hx, hw) = self.hole(layout.board_left + piece.column as u16 * self.cell_w);
            for dy in 0..self.cell_h {
                let py = top + dy;
                // The frame's top border sits in front of the lane.
                if py == layout.board_top - 1 {
                    continue;
                }
                fb.fill_rect(hx, py, hw, 1, '█', style);
            }
        }

        if let Some(banner) = snap.banner {
            fb.put_centered(0, viewport.width, layout.lane_top, banner, text.bold());
        }

        if snap.thinking {
            let y = viewport.height.saturating_sub(1);
            fb.fill_rect(0, y, viewport.width, 1, ' ', palette.blank());
            fb.put_centered(0, viewport.width, y, THINKING_TEXT, text.bold());
        }
    }

    /// Horizontal extent of the visible hole of a cell starting at `x`.
    fn hole(&self, x: u16) -> (u16, u16) {
        if self.cell_w > 2 {
            (x + 1, self.cell_w - 2)
        } else {
            (x, self.cell_w)
        }
    }

    fn draw_score_line(
        &self,
        fb: &mut FrameBuffer,
        scores: [u32; 2],
        x: u16,
        w: u16,
        y: u16,
        style: CellStyle,
    ) {
        const P1: &str = "Player 1: ";
        const GAP: &str = "    Player 2: ";
        let len = P1.len() as u16 + digits(scores[0]) + GAP.len() as u16 + digits(scores[1]);
        let mut cx = x.saturating_add(w.saturating_sub(len) / 2);
        fb.put_str(cx, y, P1, style);
        cx += P1.len() as u16;
        cx += fb.put_u32(cx, y, scores[0], style);
        fb.put_str(cx, y, GAP, style);
        cx += GAP.len() as u16;
        fb.put_u32(cx, y, scores[1], style);
    }
}

fn draw_button(fb: &mut FrameBuffer, palette: &Palette, rect: Rect, label: &str, focused: bool) {
    let style = if focused {
        palette.focused_style()
    } else {
        palette.button_style()
    };
    fb.fill_rect(rect.x, rect.y, rect.w, rect.h, ' ', style);
    fb.put_centered(rect.x, rect.w, rect.y, label, style);
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
    if w < 2 || h < 2 {
        return;
    }

    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}
