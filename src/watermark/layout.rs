//! Placement math for the content stack and the logo.
//!
//! All distances scale with the canvas width so the watermark looks the
//! same on a 640px preview and a 4000px capture.
//!
//! # Example
//!
//! ```
//! use photomark::watermark::layout::{resolve_origin, Growth};
//! use photomark::watermark::style::Layout;
//! use photomark::watermark::surface::TextAlign;
//!
//! let origin = resolve_origin(1000, 800, Layout::BottomLeft);
//! assert_eq!((origin.x, origin.y), (40.0, 760.0));
//! assert_eq!(origin.align, TextAlign::Start);
//! assert_eq!(origin.growth, Growth::Upward);
//! ```

use super::style::Layout;
use super::surface::{Rect, TextAlign};

/// Margin from every edge, as a fraction of canvas width.
pub const PADDING_RATIO: f32 = 0.04;

/// Logo bounding box, as a fraction of each canvas dimension.
pub const LOGO_MAX_RATIO: f32 = 0.15;

/// Fixed logo offset from the top and right edges, in pixels.
pub const LOGO_OFFSET: f32 = 20.0;

/// Direction in which the content stack extends from its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Growth {
    /// Content ends flush at the anchor and extends above it.
    Upward,
    /// Content starts at the anchor and extends below it.
    Downward,
}

/// Where and how the content stack is anchored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Origin {
    pub x: f32,
    pub y: f32,
    pub align: TextAlign,
    pub growth: Growth,
}

pub fn padding(canvas_width: u32) -> f32 {
    canvas_width as f32 * PADDING_RATIO
}

/// Resolve the content origin for `layout` on a `width` x `height` canvas.
pub fn resolve_origin(width: u32, height: u32, layout: Layout) -> Origin {
    let w = width as f32;
    let h = height as f32;
    let pad = padding(width);

    let (x, align) = match layout {
        Layout::BottomLeft | Layout::TopLeft => (pad, TextAlign::Start),
        Layout::BottomRight | Layout::TopRight => (w - pad, TextAlign::End),
        Layout::BottomCenter | Layout::Center => (w / 2.0, TextAlign::Center),
    };

    let (y, growth) = match layout {
        Layout::BottomLeft | Layout::BottomRight | Layout::BottomCenter => (h - pad, Growth::Upward),
        Layout::TopLeft | Layout::TopRight => (4.0 * pad, Growth::Downward),
        Layout::Center => (h / 2.0, Growth::Downward),
    };

    Origin {
        x,
        y,
        align,
        growth,
    }
}

/// Destination rectangle for a `logo_w` x `logo_h` logo.
///
/// The logo is scaled down (never up) to fit 15% of each canvas dimension
/// and anchored at the top-right corner, 20px in from both edges.
pub fn logo_rect(canvas_w: u32, canvas_h: u32, logo_w: u32, logo_h: u32) -> Option<Rect> {
    if logo_w == 0 || logo_h == 0 {
        return None;
    }

    let max_w = canvas_w as f32 * LOGO_MAX_RATIO;
    let max_h = canvas_h as f32 * LOGO_MAX_RATIO;
    let scale = (max_w / logo_w as f32)
        .min(max_h / logo_h as f32)
        .min(1.0);

    let width = logo_w as f32 * scale;
    let height = logo_h as f32 * scale;
    Some(Rect::new(
        canvas_w as f32 - width - LOGO_OFFSET,
        LOGO_OFFSET,
        width,
        height,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Layout::BottomLeft, 40.0, 760.0, TextAlign::Start, Growth::Upward)]
    #[case(Layout::BottomRight, 960.0, 760.0, TextAlign::End, Growth::Upward)]
    #[case(Layout::BottomCenter, 500.0, 760.0, TextAlign::Center, Growth::Upward)]
    #[case(Layout::TopLeft, 40.0, 160.0, TextAlign::Start, Growth::Downward)]
    #[case(Layout::TopRight, 960.0, 160.0, TextAlign::End, Growth::Downward)]
    #[case(Layout::Center, 500.0, 400.0, TextAlign::Center, Growth::Downward)]
    fn test_resolve_origin(
        #[case] layout: Layout,
        #[case] x: f32,
        #[case] y: f32,
        #[case] align: TextAlign,
        #[case] growth: Growth,
    ) {
        let origin = resolve_origin(1000, 800, layout);
        assert!((origin.x - x).abs() < 1e-3, "x for {layout}: {}", origin.x);
        assert!((origin.y - y).abs() < 1e-3, "y for {layout}: {}", origin.y);
        assert_eq!(origin.align, align);
        assert_eq!(origin.growth, growth);
    }

    #[test]
    fn test_unknown_layout_resolves_like_bottom_left() {
        let unknown = resolve_origin(1000, 800, Layout::parse("sideways"));
        assert_eq!(unknown, resolve_origin(1000, 800, Layout::BottomLeft));
    }

    #[test]
    fn test_padding_uses_width_only() {
        let tall = resolve_origin(500, 2000, Layout::BottomLeft);
        assert_eq!(tall.x, 20.0);
        assert_eq!(tall.y, 1980.0);
    }

    #[test]
    fn test_logo_rect_scales_down_to_fit() {
        // 15% of 1000x800 is 150x120; a 300x300 logo scales by 0.4
        let rect = logo_rect(1000, 800, 300, 300).unwrap();
        assert!((rect.width - 120.0).abs() < 1e-3);
        assert!((rect.height - 120.0).abs() < 1e-3);
        assert!((rect.x - 860.0).abs() < 1e-3);
        assert_eq!(rect.y, 20.0);
    }

    #[test]
    fn test_logo_rect_never_upscales() {
        let rect = logo_rect(1000, 800, 50, 20).unwrap();
        assert_eq!((rect.width, rect.height), (50.0, 20.0));
        assert_eq!(rect.x, 930.0);
    }

    #[test]
    fn test_logo_rect_empty_logo() {
        assert!(logo_rect(1000, 800, 0, 10).is_none());
    }
}
