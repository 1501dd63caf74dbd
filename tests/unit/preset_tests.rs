use photomark::watermark::{FontSize, Layout, StyleCatalog, Theme};
use rstest::rstest;

#[rstest]
#[case("classic", Layout::BottomLeft, Theme::Classic, FontSize::Medium, false)]
#[case("modern", Layout::BottomRight, Theme::Modern, FontSize::Medium, false)]
#[case("minimal", Layout::BottomLeft, Theme::Minimal, FontSize::Large, false)]
#[case("elegant", Layout::BottomCenter, Theme::Elegant, FontSize::Medium, false)]
#[case("bold", Layout::BottomLeft, Theme::Bold, FontSize::Large, true)]
#[case("neon", Layout::BottomRight, Theme::Neon, FontSize::Medium, false)]
#[case("vintage", Layout::BottomLeft, Theme::Vintage, FontSize::Medium, false)]
#[case("professional", Layout::BottomLeft, Theme::Professional, FontSize::Small, true)]
#[case("dark", Layout::BottomRight, Theme::Modern, FontSize::Medium, false)]
#[case("sunrise", Layout::BottomLeft, Theme::Modern, FontSize::Medium, false)]
#[case("ocean", Layout::BottomCenter, Theme::Elegant, FontSize::Medium, true)]
#[case("forest", Layout::TopLeft, Theme::Modern, FontSize::Medium, false)]
fn test_builtin_preset(
    #[case] name: &str,
    #[case] layout: Layout,
    #[case] theme: Theme,
    #[case] font_size: FontSize,
    #[case] coordinates: bool,
) {
    let catalog = StyleCatalog::builtin();
    assert!(catalog.contains(name));

    let style = catalog.get(name);
    assert_eq!(style.layout, layout);
    assert_eq!(style.theme, theme);
    assert_eq!(style.font_size, font_size);
    assert_eq!(style.show_coordinates, coordinates);
    assert!(style.show_time && style.show_date, "{} hides the time", name);
    assert!(style.shadow_enabled);
}

#[rstest]
#[case("Classic")]
#[case("  NEON ")]
#[case("Ocean")]
fn test_lookup_ignores_case_and_whitespace(#[case] name: &str) {
    let catalog = StyleCatalog::builtin();
    assert!(catalog.contains(name));
    assert_eq!(catalog.get(name), catalog.get(&name.trim().to_lowercase()));
}

#[test]
fn test_unknown_preset_falls_back_to_classic() {
    let catalog = StyleCatalog::builtin();
    assert!(!catalog.contains("polaroid"));
    assert_eq!(catalog.get("polaroid"), catalog.get("classic"));
    assert_eq!(catalog.get(""), catalog.get("classic"));
}
