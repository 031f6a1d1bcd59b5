pub mod canvas;
pub mod fonts;
pub mod layout;
pub mod paint;
pub mod raster;
pub mod request;

pub use fonts::FontBook;
pub use raster::render_png;
pub use request::RenderRequest;
