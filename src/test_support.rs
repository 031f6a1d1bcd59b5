use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::card::canvas::Canvas;
use crate::card::layout::{CardColor, FontSpec, Rect};
use crate::error::RenderError;

pub fn temp_path(prefix: &str) -> PathBuf {
    let now_ns = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir().join(format!(
        "lockcard_{prefix}_{}_{}",
        std::process::id(),
        now_ns
    ))
}

pub fn card_url(addr: SocketAddr, query: &str) -> String {
    if query.is_empty() {
        format!("http://{addr}/api/iqc")
    } else {
        format!("http://{addr}/api/iqc?{query}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Gradient {
        rect: Rect,
        top: CardColor,
        bottom: CardColor,
    },
    Rect {
        rect: Rect,
        color: CardColor,
    },
    StrokeRect {
        rect: Rect,
        color: CardColor,
        width: f32,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        font: FontSpec,
        color: CardColor,
    },
}

/// Canvas that records draw calls instead of rasterizing. Every char measures
/// `advance` units regardless of font.
pub struct RecordingCanvas {
    advance: f32,
    fail_text: bool,
    calls: Vec<DrawCall>,
}

impl RecordingCanvas {
    pub fn new(advance: f32) -> Self {
        Self {
            advance,
            fail_text: false,
            calls: Vec::new(),
        }
    }

    /// Text operations fail as if no font were installed.
    pub fn failing_text() -> Self {
        Self {
            fail_text: true,
            ..Self::new(0.0)
        }
    }

    pub fn into_calls(self) -> Vec<DrawCall> {
        self.calls
    }

    fn check_font(&self, font: FontSpec) -> Result<(), RenderError> {
        if self.fail_text {
            return Err(RenderError::NoFontFace {
                weight: font.weight,
            });
        }
        Ok(())
    }
}

impl Canvas for RecordingCanvas {
    fn fill_vertical_gradient(
        &mut self,
        rect: Rect,
        top: CardColor,
        bottom: CardColor,
    ) -> Result<(), RenderError> {
        self.calls.push(DrawCall::Gradient { rect, top, bottom });
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: CardColor) -> Result<(), RenderError> {
        self.calls.push(DrawCall::Rect { rect, color });
        Ok(())
    }

    fn stroke_rect(
        &mut self,
        rect: Rect,
        color: CardColor,
        width: f32,
    ) -> Result<(), RenderError> {
        self.calls.push(DrawCall::StrokeRect { rect, color, width });
        Ok(())
    }

    fn measure_text(&mut self, text: &str, font: FontSpec) -> Result<f32, RenderError> {
        self.check_font(font)?;
        Ok(text.chars().count() as f32 * self.advance)
    }

    fn fill_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        font: FontSpec,
        color: CardColor,
    ) -> Result<(), RenderError> {
        self.check_font(font)?;
        self.calls.push(DrawCall::Text {
            text: text.to_owned(),
            x,
            y,
            font,
            color,
        });
        Ok(())
    }
}
