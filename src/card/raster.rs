use tiny_skia::{
    Color, FillRule, GradientStop, LinearGradient, Paint, PathBuilder, Pixmap, Point, SpreadMode,
    Stroke, Transform,
};
use tracing::debug;

use crate::error::RenderError;

use super::canvas::Canvas;
use super::fonts::FontBook;
use super::layout::{CardColor, DEVICE_PIXEL_RATIO, FontSpec, HEIGHT, Rect, WIDTH};
use super::paint::paint_card;
use super::request::RenderRequest;

/// Renders `request` and returns PNG bytes for a 2048x2048 image.
pub fn render_png(request: &RenderRequest, fonts: &FontBook) -> Result<Vec<u8>, RenderError> {
    let mut canvas = PixmapCanvas::new(fonts)?;
    paint_card(&mut canvas, request)?;
    let png = canvas.into_png()?;
    debug!(bytes = png.len(), "encoded card PNG");
    Ok(png)
}

/// `tiny-skia` canvas with the device pixel ratio folded into every draw.
pub struct PixmapCanvas<'a> {
    pixmap: Pixmap,
    fonts: &'a FontBook,
    transform: Transform,
}

impl<'a> PixmapCanvas<'a> {
    pub fn new(fonts: &'a FontBook) -> Result<Self, RenderError> {
        let width = (WIDTH * DEVICE_PIXEL_RATIO) as u32;
        let height = (HEIGHT * DEVICE_PIXEL_RATIO) as u32;
        let pixmap =
            Pixmap::new(width, height).ok_or(RenderError::CanvasAllocation { width, height })?;

        Ok(Self {
            pixmap,
            fonts,
            transform: Transform::from_scale(DEVICE_PIXEL_RATIO, DEVICE_PIXEL_RATIO),
        })
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn into_png(self) -> Result<Vec<u8>, RenderError> {
        self.pixmap
            .encode_png()
            .map_err(|error| RenderError::Encode(error.to_string()))
    }
}

fn skia_color(color: CardColor) -> Color {
    let mut skia = Color::from_rgba8(color.r, color.g, color.b, 255);
    skia.set_alpha(color.alpha);
    skia
}

fn solid_paint(color: CardColor) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(skia_color(color));
    paint.anti_alias = true;
    paint
}

fn skia_rect(rect: Rect, what: &'static str) -> Result<tiny_skia::Rect, RenderError> {
    tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height)
        .ok_or(RenderError::InvalidGeometry { what })
}

impl Canvas for PixmapCanvas<'_> {
    fn fill_vertical_gradient(
        &mut self,
        rect: Rect,
        top: CardColor,
        bottom: CardColor,
    ) -> Result<(), RenderError> {
        let shader = LinearGradient::new(
            Point::from_xy(rect.x, rect.y),
            Point::from_xy(rect.x, rect.y + rect.height),
            vec![
                GradientStop::new(0.0, skia_color(top)),
                GradientStop::new(1.0, skia_color(bottom)),
            ],
            SpreadMode::Pad,
            Transform::identity(),
        )
        .ok_or(RenderError::InvalidGeometry {
            what: "background gradient",
        })?;

        let paint = Paint {
            shader,
            anti_alias: true,
            ..Paint::default()
        };
        self.pixmap.fill_rect(
            skia_rect(rect, "background")?,
            &paint,
            self.transform,
            None,
        );
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: CardColor) -> Result<(), RenderError> {
        self.pixmap.fill_rect(
            skia_rect(rect, "filled rectangle")?,
            &solid_paint(color),
            self.transform,
            None,
        );
        Ok(())
    }

    fn stroke_rect(
        &mut self,
        rect: Rect,
        color: CardColor,
        width: f32,
    ) -> Result<(), RenderError> {
        let path = PathBuilder::from_rect(skia_rect(rect, "stroked rectangle")?);
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &solid_paint(color), &stroke, self.transform, None);
        Ok(())
    }

    fn measure_text(&mut self, text: &str, font: FontSpec) -> Result<f32, RenderError> {
        self.fonts.measure(text, font)
    }

    fn fill_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        font: FontSpec,
        color: CardColor,
    ) -> Result<(), RenderError> {
        // Whitespace-only runs resolve a face but produce no path.
        if let Some(path) = self.fonts.text_path(text, x, y, font)? {
            self.pixmap.fill_path(
                &path,
                &solid_paint(color),
                FillRule::Winding,
                self.transform,
                None,
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::card::canvas::Canvas;
    use crate::card::fonts::FontBook;
    use crate::card::layout::{
        BACKGROUND_BOTTOM, BACKGROUND_TOP, DIM_WHITE, Rect, battery_glyph,
    };
    use crate::card::request::RenderRequest;
    use crate::error::RenderError;

    use super::{PixmapCanvas, render_png};

    const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn pixel(canvas: &PixmapCanvas<'_>, x: u32, y: u32) -> (u8, u8, u8, u8) {
        let color = canvas.pixmap().pixel(x, y).unwrap();
        (color.red(), color.green(), color.blue(), color.alpha())
    }

    #[test]
    fn canvas_is_allocated_at_device_resolution() {
        let fonts = FontBook::empty();
        let canvas = PixmapCanvas::new(&fonts).unwrap();
        assert_eq!(canvas.pixmap().width(), 2048);
        assert_eq!(canvas.pixmap().height(), 2048);
    }

    #[test]
    fn gradient_runs_from_navy_to_slate() {
        let fonts = FontBook::empty();
        let mut canvas = PixmapCanvas::new(&fonts).unwrap();
        canvas
            .fill_vertical_gradient(Rect::canvas(), BACKGROUND_TOP, BACKGROUND_BOTTOM)
            .unwrap();

        let (r, g, b, a) = pixel(&canvas, 1024, 0);
        assert_eq!(a, 255);
        assert!(r.abs_diff(0x0b) <= 1 && g.abs_diff(0x12) <= 1 && b.abs_diff(0x20) <= 1);
        let (r, g, b, _) = pixel(&canvas, 1024, 2047);
        assert!(r.abs_diff(0x11) <= 1 && g.abs_diff(0x18) <= 1 && b.abs_diff(0x27) <= 1);
    }

    #[test]
    fn rects_are_scaled_by_device_pixel_ratio() {
        let fonts = FontBook::empty();
        let mut canvas = PixmapCanvas::new(&fonts).unwrap();
        let glyph = battery_glyph(88);
        canvas.fill_rect(glyph.fill, glyph.fill_color).unwrap();

        // Fill spans logical x 907..946, y 53..69.
        assert_eq!(pixel(&canvas, 1820, 120), (0x22, 0xc5, 0x5e, 255));
        assert_eq!(pixel(&canvas, 1800, 120).3, 0);
        assert_eq!(pixel(&canvas, 1900, 120).3, 0);
    }

    #[test]
    fn dim_white_is_translucent() {
        let fonts = FontBook::empty();
        let mut canvas = PixmapCanvas::new(&fonts).unwrap();
        canvas
            .fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), DIM_WHITE)
            .unwrap();
        let alpha = pixel(&canvas, 5, 5).3;
        assert!((76..=77).contains(&alpha), "alpha={alpha}");
    }

    #[test]
    fn rendering_without_fonts_fails() {
        let error = render_png(&RenderRequest::default(), &FontBook::empty()).unwrap_err();
        assert!(matches!(error, RenderError::NoFontFace { .. }));
    }

    #[test]
    fn rendering_is_deterministic_png() {
        let fonts = FontBook::system();
        if fonts.is_empty() {
            eprintln!("skipping: no system fonts installed");
            return;
        }
        let request = RenderRequest {
            battery_percentage: 42,
            subtitle: "Weekend shift".to_owned(),
            ..RenderRequest::default()
        };

        let one = render_png(&request, &fonts).unwrap();
        let two = render_png(&request, &fonts).unwrap();
        assert!(one.starts_with(PNG_SIGNATURE));
        assert_eq!(one, two);

        let other = render_png(
            &RenderRequest {
                battery_percentage: 43,
                ..request
            },
            &fonts,
        )
        .unwrap();
        assert_ne!(one, other);
    }
}
