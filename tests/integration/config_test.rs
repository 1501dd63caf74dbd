//! Configuration file to working engine.

use super::test_harness::{gradient_photo, sample_context, skip};
use photomark::config::Config;
use photomark::watermark::fonts::discover_system_fonts;
use photomark::watermark::surface::RecordingSurface;
use photomark::watermark::{Layout, Locale, Theme};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn write_config(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[tokio::test]
async fn test_engine_from_config_uses_locale_and_timeout() {
    let Some((regular, bold)) = discover_system_fonts() else {
        return skip("test_engine_from_config_uses_locale_and_timeout");
    };
    let bold_line = bold
        .map(|p| format!("  bold: {}\n", p.display()))
        .unwrap_or_default();
    let yaml = format!(
        "locale: en\nfonts:\n  regular: {}\n{}  discover: false\nlogo:\n  timeout_ms: 750\n",
        regular.display(),
        bold_line
    );
    let file = write_config(&yaml);

    let config = Config::from_file(file.path()).unwrap();
    config.validate().unwrap();
    let engine = config.build_engine().unwrap();

    assert_eq!(engine.locale(), Locale::En);
    assert_eq!(engine.logo_timeout(), Duration::from_millis(750));

    let mut surface = RecordingSurface::new(1000, 800);
    let style = config.style_catalog().get("classic");
    engine
        .render_onto(&mut surface, &sample_context(), &style)
        .await;
    assert!(surface.filled_text().contains(&"Friday"));
}

#[tokio::test]
async fn test_custom_style_from_config_renders() {
    let Some((regular, _)) = discover_system_fonts() else {
        return skip("test_custom_style_from_config_renders");
    };
    let yaml = format!(
        r##"
fonts:
  regular: {}
styles:
  site-inspection:
    layout: center
    theme: neon
    show_coordinates: true
    show_logo: false
    font_size: small
    primary_color: "#00ffff"
    secondary_color: "rgba(255, 0, 255, 0.8)"
    background_blur: true
"##,
        regular.display()
    );
    let file = write_config(&yaml);
    let config = Config::from_file(file.path()).unwrap();
    config.validate().unwrap();

    let catalog = config.style_catalog();
    assert_eq!(catalog.len(), 13);
    let style = catalog.get("Site-Inspection");
    assert_eq!(style.layout, Layout::Center);
    assert_eq!(style.theme, Theme::Neon);
    assert_eq!(style.secondary_color.a, 204);

    let engine = config.build_engine().unwrap();
    let photo = gradient_photo(640, 480);
    let rendered = engine
        .render(&photo, &sample_context(), &style)
        .await
        .unwrap();
    assert_ne!(rendered.image, photo.to_rgba8());
}

#[test]
fn test_engine_without_any_font_is_surface_error() {
    let config = Config::from_yaml_with_env("fonts:\n  discover: false\n").unwrap();
    let err = config.build_engine().unwrap_err();
    assert!(err.to_string().contains("no font configured"));
}
