//! Design composer: owns one scene and its render surface.

use teehub_core::Rgb;
use tracing::{debug, info, instrument, warn};

use super::DesignError;
use super::scene::{ComposerConfig, DesignScene, ImageLayer, ImageTransform, LayerId};
use super::source::{self, DecodedDesign, DesignSource};
use super::surface::{RenderOptions, RenderedDesign, Surface};

/// Largest accepted scene edge, in scene units.
pub const MAX_SCENE_EDGE: u32 = 4096;

/// Handle for an in-flight image load.
///
/// Only the most recently issued ticket can apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// What happened to a finished load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadOutcome {
    /// The image became the scene's layer at the given fit scale.
    Applied { layer: LayerId, scale: f32 },
    /// A newer load was started, or the composer was disposed, first.
    Superseded,
}

/// Composes an uploaded design over a product silhouette.
///
/// Lifecycle: [`initialize`](Self::initialize) once, mutate, then
/// [`dispose`](Self::dispose). Mutations before `initialize` are no-ops.
pub struct DesignComposer<S: Surface> {
    surface: S,
    config: ComposerConfig,
    scene: Option<DesignScene>,
    load_seq: u64,
    next_layer: u64,
    disposed: bool,
}

impl<S: Surface> DesignComposer<S> {
    #[must_use]
    pub fn new(surface: S) -> Self {
        Self::with_config(surface, ComposerConfig::default())
    }

    #[must_use]
    pub const fn with_config(surface: S, config: ComposerConfig) -> Self {
        Self {
            surface,
            config,
            scene: None,
            load_seq: 0,
            next_layer: 0,
            disposed: false,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &ComposerConfig {
        &self.config
    }

    /// Current scene, once initialized.
    #[must_use]
    pub const fn scene(&self) -> Option<&DesignScene> {
        self.scene.as_ref()
    }

    #[must_use]
    pub const fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Create the scene with a centered silhouette filled with `color`.
    ///
    /// Re-initializing replaces the previous scene and drops its image layer.
    ///
    /// # Errors
    ///
    /// Returns `DesignError::InvalidDimensions` for a zero or oversized edge,
    /// `DesignError::InvalidConfig` if the composer's config is unusable,
    /// and `DesignError::Disposed` after [`dispose`](Self::dispose).
    #[instrument(skip(self))]
    pub fn initialize(&mut self, width: u32, height: u32, color: Rgb) -> Result<(), DesignError> {
        if self.disposed {
            return Err(DesignError::Disposed);
        }
        self.config
            .validate()
            .inspect_err(|e| warn!(error = %e, "Refusing to build design scene"))?;
        if width == 0 || height == 0 || width > MAX_SCENE_EDGE || height > MAX_SCENE_EDGE {
            return Err(DesignError::InvalidDimensions { width, height });
        }

        let previous = self
            .scene
            .replace(DesignScene::new(width, height, color, &self.config));
        if let Some(layer) = previous.and_then(|mut scene| scene.take_image()) {
            self.surface.forget_layer(layer.id());
        }
        // Loads started against the old scene must not land on the new one
        self.load_seq += 1;

        info!(width, height, color = %color, "Design scene initialized");
        Ok(())
    }

    /// Recolor the silhouette. No-op before `initialize`.
    pub fn set_background_color(&mut self, color: Rgb) {
        if let Some(scene) = self.scene.as_mut() {
            scene.set_silhouette_fill(color);
            debug!(color = %color, "Silhouette recolored");
        }
    }

    /// Start a load. Any earlier ticket becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.load_seq += 1;
        LoadTicket(self.load_seq)
    }

    /// Apply a decoded upload if `ticket` is still the latest load.
    ///
    /// On success the image replaces any existing layer, is anchored at the
    /// scene center and scaled to fit the configured box.
    ///
    /// # Errors
    ///
    /// Returns the decode error for the current load, or
    /// `DesignError::NotInitialized` if there is no scene. Stale results are
    /// reported as [`LoadOutcome::Superseded`] whether they succeeded or not.
    /// The scene is unchanged on every error.
    #[instrument(skip(self, result))]
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<DecodedDesign, DesignError>,
    ) -> Result<LoadOutcome, DesignError> {
        if self.disposed || ticket.0 != self.load_seq {
            debug!(ticket = ticket.0, latest = self.load_seq, "Discarding stale load");
            return Ok(LoadOutcome::Superseded);
        }
        let decoded = result.inspect_err(|e| warn!(error = %e, "Design upload failed"))?;
        let scene = self.scene.as_mut().ok_or(DesignError::NotInitialized)?;

        let scale = fit_scale(self.config.fit_box, decoded.width(), decoded.height());
        self.next_layer += 1;
        let layer = ImageLayer {
            id: LayerId(self.next_layer),
            pixels: decoded.into_pixels(),
            center: scene.center(),
            transform: ImageTransform {
                scale,
                rotation: 0.0,
            },
        };
        let id = layer.id;
        let (width, height) = layer.source_size();

        if let Some(old) = scene.replace_image(layer) {
            self.surface.forget_layer(old.id());
        }
        info!(layer = %id, width, height, scale, "Design image applied");
        Ok(LoadOutcome::Applied { layer: id, scale })
    }

    /// Decode `source` off the async executor and apply it.
    ///
    /// # Errors
    ///
    /// See [`finish_load`](Self::finish_load).
    pub async fn load_image(&mut self, source: DesignSource) -> Result<LoadOutcome, DesignError> {
        if self.disposed {
            return Ok(LoadOutcome::Superseded);
        }
        let ticket = self.begin_load();
        let result = source::decode_async(source).await;
        self.finish_load(ticket, result)
    }

    /// Set uniform scale on the image layer, clamped to the configured
    /// bounds. No-op without an image.
    ///
    /// # Errors
    ///
    /// Returns `DesignError::InvalidTransform` for NaN or infinite values.
    pub fn set_scale(&mut self, scale: f32) -> Result<(), DesignError> {
        if !scale.is_finite() {
            return Err(DesignError::InvalidTransform(scale));
        }
        let bounds = self.config.scale;
        if let Some(layer) = self.image_layer_mut() {
            layer.transform.scale = bounds.clamp(scale);
            debug!(scale = layer.transform.scale, "Design scale set");
        }
        Ok(())
    }

    /// Set rotation in degrees on the image layer, clamped to the
    /// configured bounds. No-op without an image.
    ///
    /// # Errors
    ///
    /// Returns `DesignError::InvalidTransform` for NaN or infinite values.
    pub fn set_rotation(&mut self, degrees: f32) -> Result<(), DesignError> {
        if !degrees.is_finite() {
            return Err(DesignError::InvalidTransform(degrees));
        }
        let bounds = self.config.rotation;
        if let Some(layer) = self.image_layer_mut() {
            layer.transform.rotation = bounds.clamp(degrees);
            debug!(rotation = layer.transform.rotation, "Design rotation set");
        }
        Ok(())
    }

    /// Transform of the current image, or the identity when there is none.
    #[must_use]
    pub fn transform(&self) -> ImageTransform {
        self.scene
            .as_ref()
            .and_then(DesignScene::image_layer)
            .map(ImageLayer::transform)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn has_custom_design(&self) -> bool {
        self.scene
            .as_ref()
            .is_some_and(|scene| scene.image_layer().is_some())
    }

    /// Remove the image layer. The silhouette is kept.
    pub fn clear(&mut self) {
        // Pending loads should not resurrect a cleared design
        self.load_seq += 1;
        if let Some(layer) = self.scene.as_mut().and_then(DesignScene::take_image) {
            self.surface.forget_layer(layer.id());
            info!(layer = %layer.id(), "Design cleared");
        }
    }

    /// Flatten the scene to PNG.
    ///
    /// # Errors
    ///
    /// Returns `DesignError::NotInitialized` before `initialize`, or
    /// `DesignError::Render` if the surface fails.
    pub fn render(&mut self, options: &RenderOptions) -> Result<RenderedDesign, DesignError> {
        let scene = self.scene.as_ref().ok_or(DesignError::NotInitialized)?;
        Ok(self.surface.rasterize(scene, options)?)
    }

    /// Release the scene and the surface. Later calls are no-ops.
    pub fn dispose(&mut self) {
        if self.disposed {
            warn!("Design composer already disposed");
            return;
        }
        self.disposed = true;
        self.load_seq += 1;
        self.scene = None;
        self.surface.release();
        info!("Design composer disposed");
    }

    fn image_layer_mut(&mut self) -> Option<&mut ImageLayer> {
        self.scene.as_mut().and_then(DesignScene::image_layer_mut)
    }
}

impl<S: Surface> Drop for DesignComposer<S> {
    fn drop(&mut self) {
        if !self.disposed {
            self.surface.release();
        }
    }
}

/// Uniform scale that fits `width x height` inside `fit_box`.
#[allow(clippy::cast_precision_loss)] // Image sizes fit f32
fn fit_scale(fit_box: (f32, f32), width: u32, height: u32) -> f32 {
    let (box_w, box_h) = fit_box;
    (box_w / width as f32).min(box_h / height as f32)
}
