//! Custom design composition.
//!
//! Loads an image onto a 400x500 garment scene, optionally writes a preview
//! and adds the result to the cart as a custom item.

use std::path::PathBuf;

use serde::Serialize;
use teehub_core::Size;
use teehub_storefront::design::{
    DesignComposer, DesignSource, ImageTransform, LoadOutcome, RenderOptions, SkiaSurface,
    custom_line_item, sniff_image,
};
use tracing::{info, warn};

use super::{Context, print_json};

const SCENE_WIDTH: u32 = 400;
const SCENE_HEIGHT: u32 = 500;

/// Options collected from the command line.
pub struct DesignRequest {
    pub image: PathBuf,
    pub template: String,
    pub color: String,
    pub size: Size,
    pub scale: Option<f32>,
    pub rotation: Option<f32>,
    pub out: Option<PathBuf>,
    pub add_to_cart: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DesignReport {
    template: String,
    color: String,
    scale: f32,
    rotation: f32,
    preview: Option<PathBuf>,
    added_item_id: Option<String>,
}

/// Compose the design described by `request`.
pub async fn compose(ctx: &mut Context, request: DesignRequest) -> teehub_storefront::Result<()> {
    let template = ctx.catalog.design_template(&request.template)?.clone();
    if !ctx.catalog.palette().contains(&request.color) {
        warn!(color = %request.color, "Color is not in the palette");
    }
    let fill = ctx.catalog.color(&request.color);

    let bytes = tokio::fs::read(&request.image).await?;
    sniff_image(&bytes)?;

    let mut composer = DesignComposer::new(SkiaSurface::new());
    composer.initialize(SCENE_WIDTH, SCENE_HEIGHT, fill)?;
    if let LoadOutcome::Applied { layer, scale } =
        composer.load_image(DesignSource::Bytes(bytes)).await?
    {
        info!(%layer, scale, "Design loaded");
    }
    if let Some(scale) = request.scale {
        composer.set_scale(scale)?;
    }
    if let Some(rotation) = request.rotation {
        composer.set_rotation(rotation)?;
    }

    if let Some(out) = &request.out {
        let preview = composer.render(&RenderOptions::default())?;
        tokio::fs::write(out, &preview.png).await?;
        info!(path = %out.display(), "Preview written");
    }

    let added_item_id = if request.add_to_cart {
        let item = custom_line_item(
            &mut composer,
            &template,
            request.size,
            &request.color,
            ctx.config.custom_surcharge,
            &ctx.config.thumbnail,
        )?;
        let id = item.id.clone();
        ctx.cart.add_item(item)?;
        Some(id)
    } else {
        None
    };

    let ImageTransform { scale, rotation } = composer.transform();
    composer.dispose();

    print_json(&DesignReport {
        template: template.name,
        color: request.color,
        scale,
        rotation,
        preview: request.out,
        added_item_id,
    })
}
