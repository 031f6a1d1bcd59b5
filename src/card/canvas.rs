use crate::error::RenderError;

use super::layout::{CardColor, FontSpec, Rect};

/// Drawing surface the card is painted on. Coordinates are logical units;
/// text is positioned by the top of its line box.
pub trait Canvas {
    fn fill_vertical_gradient(
        &mut self,
        rect: Rect,
        top: CardColor,
        bottom: CardColor,
    ) -> Result<(), RenderError>;

    fn fill_rect(&mut self, rect: Rect, color: CardColor) -> Result<(), RenderError>;

    fn stroke_rect(&mut self, rect: Rect, color: CardColor, width: f32)
    -> Result<(), RenderError>;

    fn measure_text(&mut self, text: &str, font: FontSpec) -> Result<f32, RenderError>;

    fn fill_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        font: FontSpec,
        color: CardColor,
    ) -> Result<(), RenderError>;
}
