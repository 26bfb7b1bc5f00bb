//! The in-memory design scene: a fixed product silhouette plus at most one
//! uploaded image layer.

use std::sync::Arc;

use image::RgbaImage;
use teehub_core::Rgb;

use super::DesignError;

/// Default canvas background behind the silhouette.
pub const CANVAS_BACKGROUND: Rgb = Rgb::new(0xf8, 0xfa, 0xfc);

/// A position in scene units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Inclusive range a user-supplied value is clamped into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f32,
    pub max: f32,
}

impl Bounds {
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Finite with `min <= max`.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    /// Clamp `value` into the range. Only meaningful when [`is_valid`](Self::is_valid).
    #[must_use]
    pub fn clamp(&self, value: f32) -> f32 {
        value.max(self.min).min(self.max)
    }
}

/// Layout and limits for a composer's scenes.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposerConfig {
    /// Fill behind everything.
    pub canvas_background: Rgb,
    /// Silhouette circle radius in scene units.
    pub silhouette_radius: f32,
    /// Silhouette fill opacity, 0.0 to 1.0.
    pub silhouette_opacity: f32,
    /// Box an uploaded image is fitted into, as `(width, height)`.
    pub fit_box: (f32, f32),
    /// Allowed uniform scale.
    pub scale: Bounds,
    /// Allowed rotation in degrees.
    pub rotation: Bounds,
}

impl ComposerConfig {
    /// Check the layout and limits before a scene is built from them.
    ///
    /// # Errors
    ///
    /// Returns `DesignError::InvalidConfig` naming the first bad field.
    pub fn validate(&self) -> Result<(), DesignError> {
        let invalid = |field: &str| Err(DesignError::InvalidConfig(field.to_string()));
        if !self.scale.is_valid() || self.scale.min <= 0.0 {
            return invalid("scale");
        }
        if !self.rotation.is_valid() {
            return invalid("rotation");
        }
        let (box_w, box_h) = self.fit_box;
        if !(box_w.is_finite() && box_h.is_finite() && box_w > 0.0 && box_h > 0.0) {
            return invalid("fit_box");
        }
        if !(self.silhouette_radius.is_finite() && self.silhouette_radius >= 0.0) {
            return invalid("silhouette_radius");
        }
        if !(0.0..=1.0).contains(&self.silhouette_opacity) {
            return invalid("silhouette_opacity");
        }
        Ok(())
    }
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            canvas_background: CANVAS_BACKGROUND,
            silhouette_radius: 150.0,
            silhouette_opacity: 0.3,
            fit_box: (200.0, 200.0),
            scale: Bounds::new(0.1, 3.0),
            rotation: Bounds::new(-180.0, 180.0),
        }
    }
}

/// The product silhouette. Always present, never removed, never hit-tested.
#[derive(Debug, Clone, PartialEq)]
pub struct Silhouette {
    pub center: Point,
    pub radius: f32,
    pub fill: Rgb,
    pub opacity: f32,
}

/// Identifier of an image layer, unique within a composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub(crate) u64);

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "layer-{}", self.0)
    }
}

/// Uniform scale and rotation of an image layer about its center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageTransform {
    pub scale: f32,
    /// Degrees, clockwise.
    pub rotation: f32,
}

impl Default for ImageTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            rotation: 0.0,
        }
    }
}

/// The uploaded design, anchored at its center.
#[derive(Debug, Clone)]
pub struct ImageLayer {
    pub(crate) id: LayerId,
    pub(crate) pixels: Arc<RgbaImage>,
    pub(crate) center: Point,
    pub(crate) transform: ImageTransform,
}

impl ImageLayer {
    #[must_use]
    pub const fn id(&self) -> LayerId {
        self.id
    }

    /// Decoded RGBA pixels (straight alpha).
    #[must_use]
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Source size in pixels.
    #[must_use]
    pub fn source_size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    #[must_use]
    pub const fn center(&self) -> Point {
        self.center
    }

    #[must_use]
    pub const fn transform(&self) -> ImageTransform {
        self.transform
    }
}

/// Background silhouette plus an optional image layer.
#[derive(Debug, Clone)]
pub struct DesignScene {
    width: u32,
    height: u32,
    canvas_background: Rgb,
    silhouette: Silhouette,
    image: Option<ImageLayer>,
}

impl DesignScene {
    pub(crate) fn new(width: u32, height: u32, fill: Rgb, config: &ComposerConfig) -> Self {
        #[allow(clippy::cast_precision_loss)] // Scene dimensions are small
        let center = Point::new(width as f32 / 2.0, height as f32 / 2.0);
        Self {
            width,
            height,
            canvas_background: config.canvas_background,
            silhouette: Silhouette {
                center,
                radius: config.silhouette_radius,
                fill,
                opacity: config.silhouette_opacity,
            },
            image: None,
        }
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// The visual center, where uploaded images are anchored.
    #[must_use]
    pub const fn center(&self) -> Point {
        self.silhouette.center
    }

    #[must_use]
    pub const fn canvas_background(&self) -> Rgb {
        self.canvas_background
    }

    #[must_use]
    pub const fn silhouette(&self) -> &Silhouette {
        &self.silhouette
    }

    #[must_use]
    pub const fn image_layer(&self) -> Option<&ImageLayer> {
        self.image.as_ref()
    }

    pub(crate) fn set_silhouette_fill(&mut self, fill: Rgb) {
        self.silhouette.fill = fill;
    }

    /// Insert `layer`, returning the layer it replaced.
    pub(crate) fn replace_image(&mut self, layer: ImageLayer) -> Option<ImageLayer> {
        self.image.replace(layer)
    }

    pub(crate) fn take_image(&mut self) -> Option<ImageLayer> {
        self.image.take()
    }

    /// The image layer user transforms apply to.
    pub(crate) fn image_layer_mut(&mut self) -> Option<&mut ImageLayer> {
        self.image.as_mut()
    }
}
