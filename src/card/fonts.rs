//! Font lookup for card text.
//!
//! Faces are resolved through `fontdb` by weight against a generic sans-serif
//! family, then a few common sans families, then whatever face is loaded.
//! Metrics and outlines come from `ttf-parser`; there is no shaping or
//! kerning, each char maps to one glyph.

use std::path::Path;

use fontdb::{Database, Family, ID, Query, Stretch, Style, Weight};
use tiny_skia::{Path as SkiaPath, PathBuilder, Transform};
use tracing::debug;

use crate::error::RenderError;

use super::layout::FontSpec;

const SANS_FALLBACK_FAMILIES: &[&str] = &[
    "Inter",
    "Helvetica Neue",
    "Helvetica",
    "Arial",
    "Liberation Sans",
    "DejaVu Sans",
    "Noto Sans",
    "Roboto",
    "Ubuntu",
    "Cantarell",
];

pub struct FontBook {
    db: Database,
}

impl FontBook {
    pub fn empty() -> Self {
        Self {
            db: Database::new(),
        }
    }

    pub fn system() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        debug!(face_count = db.len(), "loaded system fonts");
        Self { db }
    }

    /// Adds every font found under `dir` to the book.
    pub fn with_font_dir(mut self, dir: &Path) -> Self {
        let before = self.db.len();
        self.db.load_fonts_dir(dir);
        debug!(
            dir = %dir.display(),
            added = self.db.len() - before,
            "loaded fonts from directory"
        );
        self
    }

    pub fn len(&self) -> usize {
        self.db.len()
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    fn resolve(&self, weight: u16) -> Result<ID, RenderError> {
        let query = |families: &[Family<'_>]| {
            self.db.query(&Query {
                families,
                weight: Weight(weight),
                stretch: Stretch::Normal,
                style: Style::Normal,
            })
        };

        query(&[Family::SansSerif])
            .or_else(|| {
                SANS_FALLBACK_FAMILIES
                    .iter()
                    .find_map(|name| query(&[Family::Name(name)]))
            })
            .or_else(|| self.db.faces().next().map(|face| face.id))
            .ok_or(RenderError::NoFontFace { weight })
    }

    /// Runs `f` against the face chosen for `weight`.
    pub fn with_face<T>(
        &self,
        weight: u16,
        f: impl FnOnce(&ttf_parser::Face<'_>) -> T,
    ) -> Result<T, RenderError> {
        let id = self.resolve(weight)?;
        self.db
            .with_face_data(id, |data, index| {
                ttf_parser::Face::parse(data, index)
                    .map(|face| f(&face))
                    .map_err(|error| RenderError::FontParse(error.to_string()))
            })
            .ok_or_else(|| RenderError::FontParse(format!("face data unavailable for {id:?}")))?
    }

    pub fn measure(&self, text: &str, font: FontSpec) -> Result<f32, RenderError> {
        self.with_face(font.weight, |face| {
            let scale = font.size / f32::from(face.units_per_em());
            text.chars()
                .map(|ch| f32::from(glyph_advance(face, glyph_for(face, ch))))
                .sum::<f32>()
                * scale
        })
    }

    /// Builds one path for the whole run in logical units, with `(x, y)` as
    /// the top-left of the line box.
    pub fn text_path(
        &self,
        text: &str,
        x: f32,
        y: f32,
        font: FontSpec,
    ) -> Result<Option<SkiaPath>, RenderError> {
        self.with_face(font.weight, |face| {
            let scale = font.size / f32::from(face.units_per_em());
            let baseline = y + f32::from(face.ascender()) * scale;
            let mut builder = PathBuilder::new();
            let mut pen_x = x;

            for ch in text.chars() {
                let glyph = glyph_for(face, ch);
                if let Some(outline) = glyph_outline(face, glyph) {
                    let transform = Transform::from_row(scale, 0.0, 0.0, -scale, pen_x, baseline);
                    if let Some(placed) = outline.transform(transform) {
                        builder.push_path(&placed);
                    }
                }
                pen_x += f32::from(glyph_advance(face, glyph)) * scale;
            }

            builder.finish()
        })
    }
}

fn glyph_for(face: &ttf_parser::Face<'_>, ch: char) -> ttf_parser::GlyphId {
    face.glyph_index(ch).unwrap_or(ttf_parser::GlyphId(0))
}

fn glyph_advance(face: &ttf_parser::Face<'_>, glyph: ttf_parser::GlyphId) -> u16 {
    face.glyph_hor_advance(glyph).unwrap_or(0)
}

fn glyph_outline(face: &ttf_parser::Face<'_>, glyph: ttf_parser::GlyphId) -> Option<SkiaPath> {
    let mut builder = OutlineBuilder(PathBuilder::new());
    face.outline_glyph(glyph, &mut builder)?;
    builder.0.finish()
}

/// Collects `ttf-parser` outline commands in font design units (y-up).
struct OutlineBuilder(PathBuilder);

impl ttf_parser::OutlineBuilder for OutlineBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.0.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.0.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.0.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.0.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.0.close();
    }
}
