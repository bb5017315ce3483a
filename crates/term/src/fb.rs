//! Framebuffer: the grid of styled cells the screen view draws into.
//!
//! All writes clip silently at the edges, so drawing code can place things relative
//! to the viewport without bounds checks of its own.

/// 24-bit terminal color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Colors and attributes of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellStyle {
    pub fg: Rgb,
    pub bg: Rgb,
    pub bold: bool,
    pub dim: bool,
}

impl CellStyle {
    /// Light grey on black, used before any palette is applied.
    pub const PLAIN: Self = Self::new(Rgb::new(220, 220, 220), Rgb::new(0, 0, 0));

    pub const fn new(fg: Rgb, bg: Rgb) -> Self {
        Self {
            fg,
            bg,
            bold: false,
            dim: false,
        }
    }

    pub const fn bold(self) -> Self {
        Self { bold: true, ..self }
    }

    /// Foreground and background swapped (focused buttons).
    pub const fn inverted(self) -> Self {
        Self {
            fg: self.bg,
            bg: self.fg,
            ..self
        }
    }

    pub const fn into_cell(self, ch: char) -> Cell {
        Cell { ch, style: self }
    }
}

impl Default for CellStyle {
    fn default() -> Self {
        Self::PLAIN
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: CellStyle,
}

impl Default for Cell {
    fn default() -> Self {
        CellStyle::PLAIN.into_cell(' ')
    }
}

/// Row-major grid of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); area(width, height)],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Change the grid size, keeping the allocation. Content is unspecified
    /// afterwards; callers clear before drawing.
    pub fn resize(&mut self, width: u16, height: u16) {
        if (self.width, self.height) != (width, height) {
            self.width = width;
            self.height = height;
            self.cells.resize(area(width, height), Cell::default());
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cells of row `y`; empty when out of range.
    pub fn row(&self, y: u16) -> &[Cell] {
        match self.row_span(y) {
            Some((start, end)) => &self.cells[start..end],
            None => &[],
        }
    }

    fn row_span(&self, y: u16) -> Option<(usize, usize)> {
        (y < self.height).then(|| {
            let start = y as usize * self.width as usize;
            (start, start + self.width as usize)
        })
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    /// Fill every cell with `cell`.
    pub fn clear(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    pub fn put_char(&mut self, x: u16, y: u16, ch: char, style: CellStyle) {
        self.set(x, y, style.into_cell(ch));
    }

    /// Write `s` left to right from `x`, clipped at the right edge.
    pub fn put_str(&mut self, x: u16, y: u16, s: &str, style: CellStyle) {
        for (cx, ch) in (x..self.width).zip(s.chars()) {
            self.put_char(cx, y, ch, style);
        }
    }

    /// Write a decimal number without allocating. Returns its digit count.
    pub fn put_u32(&mut self, x: u16, y: u16, value: u32, style: CellStyle) -> u16 {
        let mut digits = [0u8; 10];
        let mut n = value;
        let mut len = 0;
        loop {
            digits[len] = b'0' + (n % 10) as u8;
            len += 1;
            n /= 10;
            if n == 0 {
                break;
            }
        }
        for (i, &d) in digits[..len].iter().rev().enumerate() {
            self.put_char(x.saturating_add(i as u16), y, char::from(d), style);
        }
        len as u16
    }

    /// Write `s` centered within `[x, x + w)`. Returns the starting column.
    pub fn put_centered(&mut self, x: u16, w: u16, y: u16, s: &str, style: CellStyle) -> u16 {
        let len = s.chars().count() as u16;
        let start = x.saturating_add(w.saturating_sub(len) / 2);
        self.put_str(start, y, s, style);
        start
    }

    /// Fill a rectangle, clipped to the grid.
    pub fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, ch: char, style: CellStyle) {
        let cell = style.into_cell(ch);
        let x0 = x.min(self.width) as usize;
        let x1 = x.saturating_add(w).min(self.width) as usize;
        for row in y..y.saturating_add(h).min(self.height) {
            if let Some((start, _)) = self.row_span(row) {
                self.cells[start + x0..start + x1].fill(cell);
            }
        }
    }
}

fn area(width: u16, height: u16) -> usize {
    width as usize * height as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(fb: &FrameBuffer, y: u16) -> String {
        fb.row(y).iter().map(|c| c.ch).collect()
    }

    #[test]
    fn put_str_clips_at_right_edge() {
        let mut fb = FrameBuffer::new(4, 1);
        fb.put_str(2, 0, "abc", CellStyle::PLAIN);
        assert_eq!(text(&fb, 0), "  ab");
    }

    #[test]
    fn put_u32_writes_digits() {
        let mut fb = FrameBuffer::new(8, 1);
        assert_eq!(fb.put_u32(1, 0, 4072, CellStyle::PLAIN), 4);
        assert_eq!(fb.put_u32(6, 0, 0, CellStyle::PLAIN), 1);
        assert_eq!(text(&fb, 0), " 4072 0 ");
    }

    #[test]
    fn put_centered_pads_both_sides() {
        let mut fb = FrameBuffer::new(9, 1);
        let start = fb.put_centered(0, 9, 0, "abc", CellStyle::PLAIN);
        assert_eq!(start, 3);
        assert_eq!(text(&fb, 0), "   abc   ");
    }

    #[test]
    fn fill_rect_clips_to_grid() {
        let mut fb = FrameBuffer::new(3, 3);
        fb.fill_rect(1, 1, 5, 5, '#', CellStyle::PLAIN);
        assert_eq!(text(&fb, 0), "   ");
        assert_eq!(text(&fb, 1), " ##");
        assert_eq!(text(&fb, 2), " ##");
        assert!(fb.get(3, 3).is_none());

        // Entirely outside.
        fb.fill_rect(7, 0, 2, 2, '!', CellStyle::PLAIN);
        assert!(fb.cells().iter().all(|c| c.ch != '!'));
    }

    #[test]
    fn inverted_swaps_colors() {
        let style = CellStyle::new(Rgb::new(1, 2, 3), Rgb::new(4, 5, 6)).inverted();
        assert_eq!(style.fg, Rgb::new(4, 5, 6));
        assert_eq!(style.bg, Rgb::new(1, 2, 3));
        assert!(!style.bold);
        assert!(style.bold().bold);
    }

    #[test]
    fn row_is_empty_out_of_range() {
        let mut fb = FrameBuffer::new(3, 2);
        fb.put_str(0, 1, "xyz", CellStyle::PLAIN);
        assert_eq!(text(&fb, 1), "xyz");
        assert!(fb.row(2).is_empty());
    }

    #[test]
    fn resize_keeps_dimensions_consistent() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.resize(5, 3);
        assert_eq!(fb.cells().len(), 15);
        assert_eq!(fb.row(2).len(), 5);
    }
}
