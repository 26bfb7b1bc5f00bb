//! Turning the current design into a cart line.

use rust_decimal::Decimal;
use teehub_core::Size;
use tracing::{info, instrument};

use super::DesignError;
use super::composer::DesignComposer;
use super::surface::{RenderOptions, Surface};
use crate::cart::LineItem;
use crate::catalog::DesignTemplate;

/// Build a one-off cart item from the composer's current design.
///
/// The image is a `data:image/png` thumbnail rendered with `options`. The
/// price is the template's base price plus `surcharge`. Every call produces
/// a fresh `custom-<uuid>` id, so two identical designs never merge.
///
/// # Errors
///
/// Returns `DesignError::NoDesign` if no image has been uploaded, or the
/// render error if the thumbnail cannot be produced. Nothing is built on
/// error.
#[instrument(skip(composer, template, options), fields(template = %template.id))]
pub fn custom_line_item<S: Surface>(
    composer: &mut DesignComposer<S>,
    template: &DesignTemplate,
    size: Size,
    color: &str,
    surcharge: Decimal,
    options: &RenderOptions,
) -> Result<LineItem, DesignError> {
    if !composer.has_custom_design() {
        return Err(DesignError::NoDesign);
    }
    let thumbnail = composer.render(options)?;

    let item = LineItem {
        id: format!("custom-{}", uuid::Uuid::new_v4()),
        name: format!("Custom {}", template.name),
        price: template.base_price + surcharge,
        image: thumbnail.to_data_uri(),
        quantity: 1,
        size: size.to_string(),
        color: color.to_string(),
        is_custom: true,
    };
    info!(id = %item.id, price = %item.price, "Custom design ready for cart");
    Ok(item)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::design::{DecodedDesign, SkiaSurface};
    use image::{Rgba, RgbaImage};
    use teehub_core::Rgb;

    fn hoodie() -> DesignTemplate {
        Catalog::default().design_template("hoodie").unwrap().clone()
    }

    #[test]
    fn test_requires_design() {
        let mut composer = DesignComposer::new(SkiaSurface::new());
        composer.initialize(400, 500, Rgb::BLACK).unwrap();
        let result = custom_line_item(
            &mut composer,
            &hoodie(),
            Size::L,
            "black",
            Decimal::TEN,
            &RenderOptions::thumbnail(),
        );
        assert!(matches!(result, Err(DesignError::NoDesign)));
    }

    #[test]
    fn test_builds_custom_line() {
        let mut composer = DesignComposer::new(SkiaSurface::new());
        composer.initialize(400, 500, Rgb::BLACK).unwrap();
        let ticket = composer.begin_load();
        composer
            .finish_load(
                ticket,
                Ok(DecodedDesign::from_rgba(RgbaImage::from_pixel(
                    20,
                    20,
                    Rgba([255, 255, 255, 255]),
                ))),
            )
            .unwrap();

        let item = custom_line_item(
            &mut composer,
            &hoodie(),
            Size::L,
            "black",
            Decimal::TEN,
            &RenderOptions::thumbnail(),
        )
        .unwrap();

        assert!(item.id.starts_with("custom-"));
        assert_eq!(item.name, "Custom Hoodie");
        assert_eq!(item.price, Decimal::from(65));
        assert_eq!(item.quantity, 1);
        assert_eq!(item.size, "L");
        assert_eq!(item.color, "black");
        assert!(item.is_custom);
        assert!(item.image.starts_with("data:image/png;base64,"));

        let again = custom_line_item(
            &mut composer,
            &hoodie(),
            Size::L,
            "black",
            Decimal::TEN,
            &RenderOptions::thumbnail(),
        )
        .unwrap();
        assert_ne!(item.id, again.id);
    }
}
