//! End-to-end renders over a real raster surface.

use super::test_harness::{
    encode, gradient_photo, logo_data_uri, sample_context, skip, test_engine,
};
use image::{GenericImageView, ImageFormat, Rgba};
use photomark::watermark::surface::{DrawOp, RecordingSurface};
use photomark::watermark::{
    Layout, Locale, LogoOutcome, OutputFormat, StyleCatalog, WatermarkContext, WatermarkError,
};

#[tokio::test]
async fn test_classic_render_keeps_size_and_leaves_top_untouched() {
    let Some(engine) = test_engine() else {
        return skip("test_classic_render_keeps_size_and_leaves_top_untouched");
    };
    let photo = gradient_photo(1000, 800);
    let style = StyleCatalog::builtin().get("classic");

    let rendered = engine
        .render(&photo, &sample_context(), &style)
        .await
        .unwrap();

    assert_eq!(rendered.image.dimensions(), (1000, 800));
    assert_eq!(rendered.logo, LogoOutcome::Skipped);

    let original = photo.to_rgba8();
    // Bottom-left stack: the upper half of the photo is not touched
    for (x, y) in [(10, 10), (500, 100), (990, 300)] {
        assert_eq!(rendered.image.get_pixel(x, y), original.get_pixel(x, y));
    }
    // Something was drawn near the anchor
    let changed = (0..500)
        .flat_map(|x| (500..780).map(move |y| (x, y)))
        .filter(|&(x, y)| rendered.image.get_pixel(x, y) != original.get_pixel(x, y))
        .count();
    assert!(changed > 1000, "only {} pixels changed", changed);
}

#[tokio::test]
async fn test_render_is_deterministic() {
    let Some(engine) = test_engine() else {
        return skip("test_render_is_deterministic");
    };
    let photo = gradient_photo(640, 480);
    let style = StyleCatalog::builtin().get("neon");
    let ctx = sample_context();

    let first = engine.render(&photo, &ctx, &style).await.unwrap();
    let second = engine.render(&photo, &ctx, &style).await.unwrap();
    assert_eq!(first.image, second.image);
}

#[tokio::test]
async fn test_every_preset_renders() {
    let Some(engine) = test_engine() else {
        return skip("test_every_preset_renders");
    };
    let photo = gradient_photo(480, 360);
    let catalog = StyleCatalog::builtin();
    let ctx = sample_context();

    for name in catalog.names() {
        let style = catalog.get(name);
        let rendered = engine.render(&photo, &ctx, &style).await.unwrap();
        assert_eq!(rendered.image.dimensions(), (480, 360), "preset {}", name);
        assert_ne!(rendered.image, photo.to_rgba8(), "preset {} drew nothing", name);
    }
}

#[tokio::test]
async fn test_hidden_style_returns_photo_unchanged() {
    let Some(engine) = test_engine() else {
        return skip("test_hidden_style_returns_photo_unchanged");
    };
    let photo = gradient_photo(320, 240);
    let style = StyleCatalog::builtin().get("classic").hidden();

    let rendered = engine
        .render(&photo, &sample_context(), &style)
        .await
        .unwrap();
    assert_eq!(rendered.image, photo.to_rgba8());
}

#[tokio::test]
async fn test_logo_drawn_top_right_without_upscaling() {
    let Some(engine) = test_engine() else {
        return skip("test_logo_drawn_top_right_without_upscaling");
    };
    let photo = gradient_photo(1000, 800);
    let style = StyleCatalog::builtin().get("classic");
    let ctx = sample_context().with_logo(logo_data_uri(100, 50, [255, 0, 0, 255]));

    let rendered = engine.render(&photo, &ctx, &style).await.unwrap();

    match rendered.logo {
        LogoOutcome::Drawn(rect) => {
            assert_eq!((rect.x, rect.y), (880.0, 20.0));
            assert_eq!((rect.width, rect.height), (100.0, 50.0));
        }
        other => panic!("expected a drawn logo, got {:?}", other),
    }
    assert_eq!(*rendered.image.get_pixel(930, 45), Rgba([255, 0, 0, 255]));
}

#[tokio::test]
async fn test_large_logo_is_scaled_to_fifteen_percent() {
    let Some(engine) = test_engine() else {
        return skip("test_large_logo_is_scaled_to_fifteen_percent");
    };
    let photo = gradient_photo(1000, 800);
    let style = StyleCatalog::builtin().get("classic");
    let ctx = sample_context().with_logo(logo_data_uri(600, 300, [0, 0, 255, 255]));

    let rendered = engine.render(&photo, &ctx, &style).await.unwrap();
    let LogoOutcome::Drawn(rect) = rendered.logo else {
        panic!("expected a drawn logo, got {:?}", rendered.logo);
    };
    assert!((rect.width - 150.0).abs() < 1e-3);
    assert!((rect.height - 75.0).abs() < 1e-3);
    assert!((rect.x - 830.0).abs() < 1e-3);
}

#[tokio::test]
async fn test_logo_respects_show_logo_flag() {
    let Some(engine) = test_engine() else {
        return skip("test_logo_respects_show_logo_flag");
    };
    let photo = gradient_photo(400, 300);
    let style = StyleCatalog::builtin().get("minimal");
    assert!(!style.show_logo);
    let ctx = sample_context().with_logo(logo_data_uri(40, 40, [0, 255, 0, 255]));

    let rendered = engine.render(&photo, &ctx, &style).await.unwrap();
    assert_eq!(rendered.logo, LogoOutcome::Skipped);
}

#[tokio::test]
async fn test_render_bytes_png_and_jpeg() {
    let Some(engine) = test_engine() else {
        return skip("test_render_bytes_png_and_jpeg");
    };
    let input = encode(&gradient_photo(300, 200), ImageFormat::Jpeg);
    let style = StyleCatalog::builtin().get("bold");
    let ctx = sample_context();

    let png = engine
        .render_bytes(&input, &ctx, &style, OutputFormat::Png, 90)
        .await
        .unwrap();
    assert_eq!(png.encoded.content_type(), "image/png");
    let decoded = image::load_from_memory(&png.encoded.data).unwrap();
    assert_eq!(decoded.dimensions(), (300, 200));

    let jpeg = engine
        .render_bytes(&input, &ctx, &style, OutputFormat::Jpeg, 80)
        .await
        .unwrap();
    assert_eq!(&jpeg.encoded.data[..2], &[0xFF, 0xD8]);
    assert_eq!((jpeg.encoded.width, jpeg.encoded.height), (300, 200));
}

#[tokio::test]
async fn test_undecodable_input_is_decode_error() {
    let Some(engine) = test_engine() else {
        return skip("test_undecodable_input_is_decode_error");
    };
    let style = StyleCatalog::builtin().get("classic");
    let err = engine
        .render_bytes(b"definitely not an image", &sample_context(), &style, OutputFormat::Png, 90)
        .await
        .unwrap_err();
    assert!(matches!(err, WatermarkError::DecodeError(_)));
}

#[tokio::test]
async fn test_english_locale_labels() {
    let Some(engine) = test_engine() else {
        return skip("test_english_locale_labels");
    };
    let engine = engine.with_locale(Locale::En);
    let style = StyleCatalog::builtin().get("classic");
    let mut surface = RecordingSurface::new(1000, 800);

    engine
        .render_onto(&mut surface, &sample_context(), &style)
        .await;

    let texts = surface.filled_text();
    assert_eq!(&texts[..4], &["10:23", "19 January 2024", "Friday", "Alice"]);
}

#[tokio::test]
async fn test_top_right_layout_is_right_aligned() {
    let Some(engine) = test_engine() else {
        return skip("test_top_right_layout_is_right_aligned");
    };
    let mut style = StyleCatalog::builtin().get("classic");
    style.layout = Layout::TopRight;
    let ctx = WatermarkContext::at(sample_context().timestamp);
    let mut surface = RecordingSurface::new(1000, 800);

    engine.render_onto(&mut surface, &ctx, &style).await;

    let fills: Vec<(f32, f32)> = surface
        .ops()
        .iter()
        .filter_map(|op| match op {
            DrawOp::FillText { x, y, .. } => Some((*x, *y)),
            _ => None,
        })
        .collect();
    assert_eq!(fills.len(), 3);
    assert!(fills.iter().all(|&(x, _)| (x - 960.0).abs() < 1e-3));
    assert!((fills[0].1 - 160.0).abs() < 1e-3);
    assert!(fills.windows(2).all(|w| w[0].1 < w[1].1));
}
