//! Card geometry, palette and the greedy word wrap used for the message body.
//!
//! Everything here is in logical units on a 1024x1024 canvas. Raster backends
//! apply the device pixel ratio themselves.

pub const WIDTH: f32 = 1024.0;
pub const HEIGHT: f32 = 1024.0;
pub const DEVICE_PIXEL_RATIO: f32 = 2.0;

pub const TIME_ORIGIN: (f32, f32) = (40.0, 40.0);
pub const CARRIER_Y: f32 = 44.0;
pub const AUTHOR_ORIGIN: (f32, f32) = (60.0, 150.0);
pub const SUBTITLE_ORIGIN: (f32, f32) = (60.0, 190.0);
pub const MESSAGE_ORIGIN: (f32, f32) = (60.0, 260.0);
pub const MESSAGE_LINE_HEIGHT: f32 = 46.0;
pub const MESSAGE_MAX_WIDTH: f32 = WIDTH - 120.0;

pub const SIGNAL_BAR_COUNT: u8 = 5;
const SIGNAL_BAR_WIDTH: f32 = 12.0;
const SIGNAL_BAR_GAP: f32 = 5.0;
const SIGNAL_BASE_X: f32 = WIDTH - 220.0;
const SIGNAL_BASE_Y: f32 = 70.0;

const BATTERY_X: f32 = WIDTH - 120.0;
const BATTERY_Y: f32 = 50.0;
const BATTERY_WIDTH: f32 = 50.0;
const BATTERY_HEIGHT: f32 = 22.0;
const BATTERY_INSET: f32 = 3.0;
pub const BATTERY_STROKE_WIDTH: f32 = 2.0;
pub const BATTERY_FILL_MAX_WIDTH: u32 = 44;
const BATTERY_FILL_MIN_WIDTH: u32 = 2;
pub const BATTERY_LOW_THRESHOLD: u8 = 15;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn canvas() -> Self {
        Self::new(0.0, 0.0, WIDTH, HEIGHT)
    }
}

/// Straight (non-premultiplied) color with a fractional alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f32,
}

impl CardColor {
    pub const fn rgb(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
            alpha: 1.0,
        }
    }

    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

pub const BACKGROUND_TOP: CardColor = CardColor::rgb(0x0b1220);
pub const BACKGROUND_BOTTOM: CardColor = CardColor::rgb(0x111827);
pub const WHITE: CardColor = CardColor::rgb(0xffffff);
pub const DIM_WHITE: CardColor = WHITE.with_alpha(0.3);
pub const BATTERY_LOW: CardColor = CardColor::rgb(0xef4444);
pub const BATTERY_OK: CardColor = CardColor::rgb(0x22c55e);
pub const AUTHOR_COLOR: CardColor = CardColor::rgb(0xe5e7eb);
pub const SUBTITLE_COLOR: CardColor = CardColor::rgb(0x9ca3af);
pub const MESSAGE_COLOR: CardColor = CardColor::rgb(0xf3f4f6);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub weight: u16,
    pub size: f32,
}

pub const TIME_FONT: FontSpec = FontSpec {
    weight: 600,
    size: 36.0,
};
pub const CARRIER_FONT: FontSpec = FontSpec {
    weight: 500,
    size: 28.0,
};
pub const AUTHOR_FONT: FontSpec = FontSpec {
    weight: 700,
    size: 36.0,
};
pub const SUBTITLE_FONT: FontSpec = FontSpec {
    weight: 400,
    size: 28.0,
};
pub const MESSAGE_FONT: FontSpec = FontSpec {
    weight: 500,
    size: 32.0,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalBar {
    pub rect: Rect,
    pub color: CardColor,
}

/// Bars grow taller left to right; the first `signal` of them are opaque.
pub fn signal_bars(signal: u8) -> impl Iterator<Item = SignalBar> {
    (0..SIGNAL_BAR_COUNT).map(move |index| {
        let i = f32::from(index);
        let height = 12.0 + i * 6.0;
        SignalBar {
            rect: Rect::new(
                SIGNAL_BASE_X + i * (SIGNAL_BAR_WIDTH + SIGNAL_BAR_GAP),
                SIGNAL_BASE_Y - height,
                SIGNAL_BAR_WIDTH,
                height,
            ),
            color: if index < signal { WHITE } else { DIM_WHITE },
        }
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryGlyph {
    pub outline: Rect,
    pub fill: Rect,
    pub fill_color: CardColor,
    pub nub: Rect,
}

pub fn battery_glyph(battery: u8) -> BatteryGlyph {
    BatteryGlyph {
        outline: Rect::new(BATTERY_X, BATTERY_Y, BATTERY_WIDTH, BATTERY_HEIGHT),
        fill: Rect::new(
            BATTERY_X + BATTERY_INSET,
            BATTERY_Y + BATTERY_INSET,
            battery_fill_width(battery) as f32,
            BATTERY_HEIGHT - 2.0 * BATTERY_INSET,
        ),
        fill_color: battery_fill_color(battery),
        nub: Rect::new(
            BATTERY_X + BATTERY_WIDTH + 2.0,
            BATTERY_Y + BATTERY_HEIGHT / 4.0,
            4.0,
            BATTERY_HEIGHT / 2.0,
        ),
    }
}

/// `round(44 * battery / 100)`, never below 2.
pub fn battery_fill_width(battery: u8) -> u32 {
    let battery = u32::from(battery.min(100));
    ((BATTERY_FILL_MAX_WIDTH * battery + 50) / 100).max(BATTERY_FILL_MIN_WIDTH)
}

pub fn battery_fill_color(battery: u8) -> CardColor {
    if battery < BATTERY_LOW_THRESHOLD {
        BATTERY_LOW
    } else {
        BATTERY_OK
    }
}

pub fn centered_x(text_width: f32) -> f32 {
    WIDTH / 2.0 - text_width / 2.0
}

pub fn message_line_y(line_index: usize) -> f32 {
    MESSAGE_ORIGIN.1 + line_index as f32 * MESSAGE_LINE_HEIGHT
}

/// Space that separates message words and precedes level digits: ASCII
/// whitespace plus vertical tab, the Unicode space separators, the line and
/// paragraph separators and U+FEFF. U+0085 is not included.
pub fn is_separator_space(ch: char) -> bool {
    matches!(
        ch,
        '\t' | '\n' | '\u{0b}' | '\u{0c}' | '\r' | ' ' | '\u{a0}' | '\u{1680}'
            | '\u{2000}'..='\u{200a}'
            | '\u{2028}' | '\u{2029}' | '\u{202f}' | '\u{205f}' | '\u{3000}' | '\u{feff}'
    )
}

/// Splits on runs of [`is_separator_space`]. A leading or trailing run yields
/// an empty word, and empty text is a single empty word.
pub fn split_words(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return vec![""];
    }

    let mut words = Vec::new();
    if text.starts_with(is_separator_space) {
        words.push("");
    }
    words.extend(
        text.split(is_separator_space)
            .filter(|word| !word.is_empty()),
    );
    if text.ends_with(is_separator_space) {
        words.push("");
    }
    words
}

/// Greedy wrap. Each word is appended with a trailing space; a line is
/// committed once the next candidate would be wider than `max_width`. The
/// first word is never wrapped, even when it alone overflows.
pub fn wrap_words<E>(
    text: &str,
    max_width: f32,
    mut measure: impl FnMut(&str) -> Result<f32, E>,
) -> Result<Vec<String>, E> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for (index, word) in split_words(text).into_iter().enumerate() {
        let candidate = format!("{line}{word} ");
        if measure(&candidate)? > max_width && index > 0 {
            lines.push(std::mem::replace(&mut line, format!("{word} ")));
        } else {
            line = candidate;
        }
    }
    lines.push(line);

    Ok(lines)
}
