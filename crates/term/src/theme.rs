//! Theme palettes.

use crate::fb::{CellStyle, Rgb};
use crate::types::{Side, Theme};

/// The four colors every theme defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Board frame and slider track
    pub frame: Rgb,
    /// Button face; also player 2's discs
    pub button: Rgb,
    /// Text; also player 1's discs
    pub text: Rgb,
    pub background: Rgb,
}

impl Palette {
    pub const fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Bubblegum => Self::of((80, 0, 60), (180, 80, 140), (255, 182, 193), (10, 0, 15)),
            Theme::Mint => Self::of((0, 60, 40), (0, 120, 80), (144, 238, 144), (0, 10, 5)),
            Theme::Greyscale => Self::of((40, 40, 40), (80, 80, 80), (220, 220, 220), (5, 5, 5)),
            Theme::Coffee => Self::of((60, 40, 0), (120, 80, 20), (255, 204, 153), (10, 5, 0)),
            Theme::Sleek => Self::of((10, 10, 20), (40, 40, 60), (220, 220, 255), (0, 0, 0)),
            Theme::Magic => Self::of((40, 0, 60), (100, 0, 120), (255, 200, 255), (8, 0, 12)),
            Theme::Jungle => Self::of((0, 40, 0), (0, 80, 0), (152, 251, 152), (0, 8, 0)),
            Theme::Default => Self::of((0, 0, 60), (40, 40, 120), (200, 200, 255), (0, 0, 8)),
        }
    }

    const fn of(
        frame: (u8, u8, u8),
        button: (u8, u8, u8),
        text: (u8, u8, u8),
        background: (u8, u8, u8),
    ) -> Self {
        Self {
            frame: Rgb::new(frame.0, frame.1, frame.2),
            button: Rgb::new(button.0, button.1, button.2),
            text: Rgb::new(text.0, text.1, text.2),
            background: Rgb::new(background.0, background.1, background.2),
        }
    }

    /// Disc color of a side.
    pub const fn disc(&self, side: Side) -> Rgb {
        match side {
            Side::A => self.text,
            Side::B => self.button,
        }
    }

    pub const fn text_style(&self) -> CellStyle {
        CellStyle::new(self.text, self.background)
    }

    pub const fn button_style(&self) -> CellStyle {
        CellStyle::new(self.text, self.button)
    }

    pub const fn focused_style(&self) -> CellStyle {
        self.button_style().inverted().bold()
    }

    pub const fn blank(&self) -> CellStyle {
        CellStyle::new(self.background, self.background)
    }
}
