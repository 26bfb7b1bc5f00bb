//! `tiny-skia` implementation of [`Surface`].

use std::collections::HashMap;

use image::RgbaImage;
use teehub_core::Rgb;
use tiny_skia::{
    Color, ColorU8, FillRule, FilterQuality, Paint, PathBuilder, Pixmap, PixmapPaint, Transform,
};
use tracing::debug;

use super::scene::{DesignScene, ImageLayer, LayerId};
use super::surface::{RenderError, RenderOptions, RenderedDesign, Surface};

/// CPU rasterizer backed by a `tiny-skia` pixmap.
///
/// Each image layer is converted to a premultiplied pixmap once and cached
/// until the layer leaves the scene.
#[derive(Default)]
pub struct SkiaSurface {
    layers: HashMap<LayerId, Pixmap>,
}

impl SkiaSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached layer pixmaps.
    #[must_use]
    pub fn cached_layers(&self) -> usize {
        self.layers.len()
    }

    fn layer_pixmap(&mut self, layer: &ImageLayer) -> Result<&Pixmap, RenderError> {
        if !self.layers.contains_key(&layer.id()) {
            let pixmap = to_pixmap(layer.pixels())?;
            debug!(layer = %layer.id(), "Cached layer pixmap");
            self.layers.insert(layer.id(), pixmap);
        }
        self.layers
            .get(&layer.id())
            .ok_or(RenderError::InvalidSize {
                width: layer.pixels().width(),
                height: layer.pixels().height(),
            })
    }
}

impl Surface for SkiaSurface {
    fn rasterize(
        &mut self,
        scene: &DesignScene,
        options: &RenderOptions,
    ) -> Result<RenderedDesign, RenderError> {
        options.validate()?;
        let (width, height) = options.output_size(scene.width(), scene.height());
        let mut canvas = Pixmap::new(width, height).ok_or(RenderError::InvalidSize { width, height })?;
        let base = Transform::from_scale(options.multiplier, options.multiplier);

        canvas.fill(opaque(scene.canvas_background()));

        let silhouette = scene.silhouette();
        if let Some(circle) =
            PathBuilder::from_circle(silhouette.center.x, silhouette.center.y, silhouette.radius)
        {
            let mut paint = Paint::default();
            paint.set_color(with_opacity(silhouette.fill, silhouette.opacity));
            paint.anti_alias = true;
            canvas.fill_path(&circle, &paint, FillRule::Winding, base, None);
        }

        if let Some(layer) = scene.image_layer() {
            #[allow(clippy::cast_precision_loss)] // Image sizes fit f32
            let (w, h) = {
                let (w, h) = layer.source_size();
                (w as f32, h as f32)
            };
            let t = layer.transform();
            let placement = base
                .pre_translate(layer.center().x, layer.center().y)
                .pre_concat(Transform::from_rotate(t.rotation))
                .pre_scale(t.scale, t.scale)
                .pre_translate(-w / 2.0, -h / 2.0);

            let paint = PixmapPaint {
                quality: FilterQuality::Bilinear,
                ..PixmapPaint::default()
            };
            let source = self.layer_pixmap(layer)?;
            canvas.draw_pixmap(0, 0, source.as_ref(), &paint, placement, None);
        }

        let png = canvas
            .encode_png()
            .map_err(|e| RenderError::Encode(e.to_string()))?;
        Ok(RenderedDesign { width, height, png })
    }

    fn forget_layer(&mut self, layer: LayerId) {
        self.layers.remove(&layer);
    }

    fn release(&mut self) {
        self.layers.clear();
    }
}

fn opaque(rgb: Rgb) -> Color {
    Color::from_rgba8(rgb.r, rgb.g, rgb.b, 0xff)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Clamped to 0..=255
fn with_opacity(rgb: Rgb, opacity: f32) -> Color {
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::from_rgba8(rgb.r, rgb.g, rgb.b, alpha)
}

/// Convert straight-alpha RGBA into a premultiplied pixmap.
fn to_pixmap(image: &RgbaImage) -> Result<Pixmap, RenderError> {
    let (width, height) = image.dimensions();
    let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::InvalidSize { width, height })?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}
