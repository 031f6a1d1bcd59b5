use std::collections::HashMap;

use super::layout::is_separator_space;

pub const DEFAULT_TIME: &str = "11:26";
pub const DEFAULT_MESSAGE_TEXT: &str = "Stay focused and keep building!";
pub const DEFAULT_CARRIER_NAME: &str = "INDOSAT OOREDOO";
pub const DEFAULT_BATTERY_PERCENTAGE: i64 = 88;
pub const DEFAULT_SIGNAL_STRENGTH: i64 = 4;
pub const DEFAULT_AUTHOR: &str = "Unknown";

pub const MAX_BATTERY_PERCENTAGE: u8 = 100;
pub const MAX_SIGNAL_STRENGTH: u8 = 5;

pub const TIME_KEY: &str = "time";
pub const MESSAGE_TEXT_KEY: &str = "messageText";
pub const CARRIER_NAME_KEY: &str = "carrierName";
pub const BATTERY_PERCENTAGE_KEY: &str = "batteryPercentage";
pub const SIGNAL_STRENGTH_KEY: &str = "signalStrength";
pub const AUTHOR_KEY: &str = "author";
pub const SUBTITLE_KEY: &str = "subtitle";

/// Normalized card parameters. Built once per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub time: String,
    pub message_text: String,
    pub carrier_name: String,
    /// Always within `0..=100`.
    pub battery_percentage: u8,
    /// Always within `0..=5`.
    pub signal_strength: u8,
    pub author: String,
    /// Empty means the subtitle line is not drawn.
    pub subtitle: String,
}

impl Default for RenderRequest {
    fn default() -> Self {
        Self {
            time: DEFAULT_TIME.to_owned(),
            message_text: DEFAULT_MESSAGE_TEXT.to_owned(),
            carrier_name: DEFAULT_CARRIER_NAME.to_owned(),
            battery_percentage: clamp_level(DEFAULT_BATTERY_PERCENTAGE, MAX_BATTERY_PERCENTAGE),
            signal_strength: clamp_level(DEFAULT_SIGNAL_STRENGTH, MAX_SIGNAL_STRENGTH),
            author: DEFAULT_AUTHOR.to_owned(),
            subtitle: String::new(),
        }
    }
}

impl RenderRequest {
    /// Builds a request from raw query parameters. Missing keys fall back to
    /// defaults and malformed numbers are clamped instead of rejected.
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        let text = |key: &str, default: &str| {
            params
                .get(key)
                .cloned()
                .unwrap_or_else(|| default.to_owned())
        };

        let battery_percentage = params
            .get(BATTERY_PERCENTAGE_KEY)
            .map_or(DEFAULT_BATTERY_PERCENTAGE, |raw| parse_level(raw));
        let signal_strength = params
            .get(SIGNAL_STRENGTH_KEY)
            .map_or(DEFAULT_SIGNAL_STRENGTH, |raw| parse_level(raw));

        Self {
            time: text(TIME_KEY, DEFAULT_TIME),
            message_text: text(MESSAGE_TEXT_KEY, DEFAULT_MESSAGE_TEXT),
            carrier_name: text(CARRIER_NAME_KEY, DEFAULT_CARRIER_NAME),
            battery_percentage: clamp_level(battery_percentage, MAX_BATTERY_PERCENTAGE),
            signal_strength: clamp_level(signal_strength, MAX_SIGNAL_STRENGTH),
            author: text(AUTHOR_KEY, DEFAULT_AUTHOR),
            subtitle: text(SUBTITLE_KEY, ""),
        }
    }

    pub fn has_subtitle(&self) -> bool {
        !self.subtitle.is_empty()
    }
}

/// Parses a level the way a lenient integer parser would: leading
/// [`is_separator_space`] chars are skipped, an optional sign is accepted and
/// the longest run of decimal digits wins. Input without digits yields 0.
pub fn parse_level(raw: &str) -> i64 {
    parse_leading_int(raw).unwrap_or(0)
}

fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start_matches(is_separator_space);
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for byte in digits.bytes() {
        if !byte.is_ascii_digit() {
            break;
        }
        seen_digit = true;
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(byte - b'0'));
    }

    seen_digit.then_some(if negative { -value } else { value })
}

fn clamp_level(value: i64, max: u8) -> u8 {
    u8::try_from(value.clamp(0, i64::from(max))).unwrap_or(max)
}
