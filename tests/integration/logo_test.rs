//! Logo loading never fails a render: missing, broken and slow logos all
//! produce a watermarked photo without a logo.

use super::test_harness::{encode, gradient_photo, logo_data_uri, sample_context, skip, test_engine};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use photomark::watermark::surface::RecordingSurface;
use photomark::watermark::{
    composite_logo, LogoFetcher, LogoFetcherConfig, LogoOutcome, StyleCatalog,
};
use std::time::{Duration, Instant};

/// Accepts connections and never answers.
async fn silent_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{}/logo.png", addr)
}

#[tokio::test]
async fn test_slow_logo_times_out_and_render_completes() {
    let Some(engine) = test_engine() else {
        return skip("test_slow_logo_times_out_and_render_completes");
    };
    let engine = engine.with_logo_timeout(Duration::from_millis(250));
    let photo = gradient_photo(400, 300);
    let style = StyleCatalog::builtin().get("classic");
    let ctx = sample_context().with_logo(silent_server().await);

    let started = Instant::now();
    let rendered = engine.render(&photo, &ctx, &style).await.unwrap();

    assert_eq!(rendered.logo, LogoOutcome::TimedOut);
    assert!(started.elapsed() < Duration::from_secs(3));
    assert_ne!(rendered.image, photo.to_rgba8());
}

#[tokio::test]
async fn test_logo_result_matches_render_without_logo() {
    let Some(engine) = test_engine() else {
        return skip("test_logo_result_matches_render_without_logo");
    };
    let photo = gradient_photo(400, 300);
    let style = StyleCatalog::builtin().get("modern");

    let without = engine
        .render(&photo, &sample_context(), &style)
        .await
        .unwrap();
    let broken = engine
        .render(
            &photo,
            &sample_context().with_logo("/nonexistent/company-logo.png"),
            &style,
        )
        .await
        .unwrap();

    assert!(matches!(broken.logo, LogoOutcome::Failed(_)));
    assert_eq!(without.image, broken.image);
}

#[tokio::test]
async fn test_blank_logo_reference_is_skipped() {
    let fetcher = LogoFetcher::new(LogoFetcherConfig::default()).unwrap();
    let ctx = sample_context().with_logo("   ");
    let mut surface = RecordingSurface::new(800, 600);

    let outcome =
        composite_logo(&mut surface, &fetcher, ctx.logo(), Duration::from_millis(3000)).await;

    assert_eq!(outcome, LogoOutcome::Skipped);
    assert!(surface.ops().is_empty());
}

#[tokio::test]
async fn test_file_logo_is_loaded_and_cached() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logo.png");
    let logo = DynamicImage::ImageRgba8(RgbaImage::from_pixel(64, 32, Rgba([9, 9, 9, 255])));
    std::fs::write(&path, encode(&logo, ImageFormat::Png)).unwrap();
    let source = path.display().to_string();

    let fetcher = LogoFetcher::new(LogoFetcherConfig::default()).unwrap();
    let mut surface = RecordingSurface::new(800, 600);
    let outcome =
        composite_logo(&mut surface, &fetcher, Some(&source), Duration::from_millis(3000)).await;

    let LogoOutcome::Drawn(rect) = outcome else {
        panic!("expected a drawn logo, got {:?}", outcome);
    };
    assert_eq!((rect.width, rect.height), (64.0, 32.0));
    assert_eq!((rect.x, rect.y), (800.0 - 64.0 - 20.0, 20.0));
    assert!(fetcher.is_cached(&source).await);

    // Served from the cache once the file is gone
    std::fs::remove_file(&path).unwrap();
    let mut again = RecordingSurface::new(800, 600);
    let outcome =
        composite_logo(&mut again, &fetcher, Some(&source), Duration::from_millis(3000)).await;
    assert!(outcome.is_drawn());
}

#[tokio::test]
async fn test_data_uri_logo_on_small_canvas() {
    let fetcher = LogoFetcher::new(LogoFetcherConfig::default()).unwrap();
    let uri = logo_data_uri(200, 200, [255, 255, 255, 255]);
    let mut surface = RecordingSurface::new(200, 100);

    let outcome = composite_logo(&mut surface, &fetcher, Some(&uri), Duration::from_millis(3000)).await;

    let LogoOutcome::Drawn(rect) = outcome else {
        panic!("expected a drawn logo, got {:?}", outcome);
    };
    // 15% of 200x100 is 30x15; the square logo is bound by the height
    assert!((rect.width - 15.0).abs() < 1e-3);
    assert!((rect.height - 15.0).abs() < 1e-3);
    assert!((rect.x - 165.0).abs() < 1e-3);
}
