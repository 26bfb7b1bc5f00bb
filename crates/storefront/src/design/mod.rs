//! Single-image design composition over a product silhouette.
//!
//! A [`DesignComposer`] owns one [`DesignScene`]: a fixed colored
//! silhouette at the center plus at most one uploaded image layer that can
//! be scaled and rotated. Scenes are flattened to PNG through a
//! [`Surface`]; [`SkiaSurface`] is the built-in CPU implementation.

mod composer;
mod custom_item;
mod scene;
mod skia;
mod source;
mod surface;

use thiserror::Error;

pub use composer::{DesignComposer, LoadOutcome, LoadTicket, MAX_SCENE_EDGE};
pub use custom_item::custom_line_item;
pub use scene::{
    Bounds, CANVAS_BACKGROUND, ComposerConfig, DesignScene, ImageLayer, ImageTransform, LayerId,
    Point, Silhouette,
};
pub use skia::SkiaSurface;
pub use source::{DecodedDesign, DesignSource, decode, decode_async, sniff_image};
pub use surface::{MAX_MULTIPLIER, RenderError, RenderOptions, RenderedDesign, Surface};

/// Design composition errors.
#[derive(Debug, Error)]
pub enum DesignError {
    #[error("design scene has not been initialized")]
    NotInitialized,

    #[error("design composer has been disposed")]
    Disposed,

    #[error("invalid scene dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("upload is not a supported image: {0}")]
    NotAnImage(String),

    #[error("malformed data URI: {0}")]
    DataUri(String),

    #[error("image decode failed: {0}")]
    Decode(String),

    #[error("invalid composer config: {0}")]
    InvalidConfig(String),

    #[error("transform value must be finite, got {0}")]
    InvalidTransform(f32),

    #[error("no design has been uploaded")]
    NoDesign,

    #[error(transparent)]
    Render(#[from] RenderError),
}
