//! Shared fixtures for the integration tests.

use base64::Engine as _;
use chrono::DateTime;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use photomark::watermark::fonts::{discover_system_fonts, load_font_file};
use photomark::watermark::{
    AddressInfo, FontBook, GeoPoint, LogoFetcher, LogoFetcherConfig, WatermarkContext,
    WatermarkEngine,
};
use std::io::Cursor;
use std::sync::Arc;

/// Fonts from the first system location that has them.
pub fn test_fonts() -> Option<Arc<FontBook>> {
    let (regular, bold) = discover_system_fonts()?;
    let regular = load_font_file(&regular).ok()?;
    let bold = bold.and_then(|path| load_font_file(&path).ok());
    Some(Arc::new(FontBook::new(regular, bold)))
}

/// Engine with default settings, or `None` when no font is installed.
pub fn test_engine() -> Option<WatermarkEngine> {
    let fonts = test_fonts()?;
    let fetcher = LogoFetcher::new(LogoFetcherConfig::default()).ok()?;
    Some(WatermarkEngine::new(fonts, fetcher))
}

pub fn skip(test_name: &str) {
    eprintln!("{}: no system font found, skipping", test_name);
}

/// Opaque photo with a horizontal gradient so overlays are visible.
pub fn gradient_photo(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, _| {
        let v = (x * 255 / width.max(1)) as u8;
        Rgba([v, 96, 255 - v, 255])
    }))
}

pub fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    // The JPEG encoder has no alpha channel
    let image = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()),
        _ => image.clone(),
    };
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, format).unwrap();
    buffer.into_inner()
}

/// `data:` URI holding a solid PNG logo.
pub fn logo_data_uri(width: u32, height: u32, color: [u8; 4]) -> String {
    let logo = DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(color)));
    let png = encode(&logo, ImageFormat::Png);
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    )
}

/// Friday 19 January 2024, 10:23 in Ho Chi Minh City.
pub fn sample_context() -> WatermarkContext {
    let ts = DateTime::parse_from_rfc3339("2024-01-19T10:23:00+07:00").unwrap();
    WatermarkContext::at(ts)
        .with_user_name("Alice")
        .with_address(AddressInfo {
            house_number: Some("12".to_string()),
            street: Some("Nguyễn Huệ".to_string()),
            ward: Some("Bến Nghé".to_string()),
            district: Some("Quận 1".to_string()),
            province: Some("Hồ Chí Minh".to_string()),
            country: Some("Việt Nam".to_string()),
            display_name: None,
        })
        .with_location(GeoPoint::new(10.7769, 106.7009))
}
