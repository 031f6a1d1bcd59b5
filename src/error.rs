#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("no usable font face for weight {weight}")]
    NoFontFace { weight: u16 },

    #[error("failed to parse font face: {0}")]
    FontParse(String),

    #[error("failed to allocate {width}x{height} canvas")]
    CanvasAllocation { width: u32, height: u32 },

    #[error("invalid geometry for {what}")]
    InvalidGeometry { what: &'static str },

    #[error("PNG encoding failed: {0}")]
    Encode(String),
}
