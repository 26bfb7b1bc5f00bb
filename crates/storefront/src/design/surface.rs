//! Rendering collaborator interface.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

use super::scene::{DesignScene, LayerId};

/// Largest accepted render multiplier.
pub const MAX_MULTIPLIER: f32 = 4.0;

/// Errors from rasterizing a scene.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
    #[error("render multiplier must be in (0, {MAX_MULTIPLIER}], got {0}")]
    InvalidMultiplier(f32),

    #[error("cannot allocate a {width}x{height} raster")]
    InvalidSize { width: u32, height: u32 },

    #[error("png encoding failed: {0}")]
    Encode(String),
}

/// Options for [`Surface::rasterize`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Output size relative to the scene (0.5 renders at half size).
    pub multiplier: f32,
}

impl RenderOptions {
    /// Half-size render used for cart thumbnails.
    #[must_use]
    pub const fn thumbnail() -> Self {
        Self { multiplier: 0.5 }
    }

    #[must_use]
    pub const fn with_multiplier(multiplier: f32) -> Self {
        Self { multiplier }
    }

    /// Reject zero, negative, non-finite or oversized multipliers.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::InvalidMultiplier`.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.multiplier.is_finite() && self.multiplier > 0.0 && self.multiplier <= MAX_MULTIPLIER
        {
            Ok(())
        } else {
            Err(RenderError::InvalidMultiplier(self.multiplier))
        }
    }

    /// Output dimensions for a scene of the given size. Never zero.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )] // Validated multiplier keeps results within u32
    pub fn output_size(&self, width: u32, height: u32) -> (u32, u32) {
        let scale = |v: u32| ((v as f32) * self.multiplier).round().max(1.0) as u32;
        (scale(width), scale(height))
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { multiplier: 1.0 }
    }
}

/// A flattened PNG snapshot of a scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDesign {
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

impl RenderedDesign {
    /// `data:image/png;base64,...` form, usable as a cart item image.
    #[must_use]
    pub fn to_data_uri(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }
}

/// A 2D drawing surface that can flatten a [`DesignScene`].
pub trait Surface {
    /// Draw the scene and encode the result.
    ///
    /// # Errors
    ///
    /// Returns `RenderError` if the options are invalid or the raster
    /// cannot be produced. The scene is never modified.
    fn rasterize(
        &mut self,
        scene: &DesignScene,
        options: &RenderOptions,
    ) -> Result<RenderedDesign, RenderError>;

    /// Drop any resources held for a layer that left the scene.
    fn forget_layer(&mut self, _layer: LayerId) {}

    /// Release everything held by the surface.
    fn release(&mut self);
}

impl<T: Surface + ?Sized> Surface for Box<T> {
    fn rasterize(
        &mut self,
        scene: &DesignScene,
        options: &RenderOptions,
    ) -> Result<RenderedDesign, RenderError> {
        (**self).rasterize(scene, options)
    }

    fn forget_layer(&mut self, layer: LayerId) {
        (**self).forget_layer(layer);
    }

    fn release(&mut self) {
        (**self).release();
    }
}
