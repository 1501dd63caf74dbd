//! Drawing surfaces.
//!
//! [`DrawingSurface`] is the small 2D API the renderer draws through: text
//! fill/stroke with alignment, rectangles, scaled images and an optional
//! glow. [`RasterSurface`] implements it over an owned RGBA buffer;
//! [`RecordingSurface`] records the calls instead, with deterministic text
//! metrics, which makes layout easy to assert on.
//!
//! Coordinates are in pixels with the origin at the top-left. Text `y` is
//! the alphabetic baseline. Every write is clipped to the canvas bounds.

use super::color::Color;
use super::fonts::{text_width, FontBook};
use super::WatermarkError;
use ab_glyph::{point, Font, GlyphId, PxScale, ScaleFont};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};
use std::ops::Range;
use std::sync::Arc;

/// Horizontal anchoring of a text run relative to its `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Start,
    Center,
    End,
}

/// Font selection for one text draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextSpec<'a> {
    pub family: &'a str,
    pub size: f32,
    pub bold: bool,
    pub align: TextAlign,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// A soft halo drawn under text, like a canvas shadow with zero offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub color: Color,
    pub blur: f32,
}

pub trait DrawingSurface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Advance width of `text` in pixels.
    fn measure_text(&self, text: &str, spec: &TextSpec<'_>) -> f32;

    fn fill_text(&mut self, text: &str, x: f32, y: f32, spec: &TextSpec<'_>, color: Color);

    /// Stroke glyph outlines with a pen `line_width` wide, centered on the outline.
    fn stroke_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        spec: &TextSpec<'_>,
        color: Color,
        line_width: f32,
    );

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32);

    /// Draw `image` scaled into `dest`.
    fn draw_image(&mut self, image: &RgbaImage, dest: Rect);

    /// Set or clear the glow applied to subsequent text draws.
    fn set_glow(&mut self, glow: Option<Glow>);
}

/// Coverage mask positioned on the canvas.
struct Mask {
    left: i32,
    top: i32,
    coverage: GrayImage,
}

/// Owned RGBA canvas with font-backed text rendering.
pub struct RasterSurface {
    canvas: RgbaImage,
    fonts: Arc<FontBook>,
    glow: Option<Glow>,
}

impl std::fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterSurface")
            .field("dimensions", &self.canvas.dimensions())
            .field("glow", &self.glow)
            .finish()
    }
}

impl RasterSurface {
    /// Transparent canvas of the given size.
    pub fn new(width: u32, height: u32, fonts: Arc<FontBook>) -> Result<Self, WatermarkError> {
        Self::from_rgba(RgbaImage::new(width, height), fonts)
    }

    /// Canvas initialised with a copy of `image`.
    pub fn from_image(image: &DynamicImage, fonts: Arc<FontBook>) -> Result<Self, WatermarkError> {
        Self::from_rgba(image.to_rgba8(), fonts)
    }

    pub fn from_rgba(canvas: RgbaImage, fonts: Arc<FontBook>) -> Result<Self, WatermarkError> {
        let (width, height) = canvas.dimensions();
        if width == 0 || height == 0 {
            return Err(WatermarkError::SurfaceError(format!(
                "canvas is {}x{}",
                width, height
            )));
        }
        Ok(Self {
            canvas,
            fonts,
            glow: None,
        })
    }

    pub fn image(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn into_image(self) -> RgbaImage {
        self.canvas
    }

    /// Rasterise `text` into a coverage mask with `margin` spare pixels on
    /// every side.
    fn text_mask(&self, text: &str, x: f32, y: f32, spec: &TextSpec<'_>, margin: f32) -> Option<Mask> {
        if text.is_empty() || spec.size <= 0.0 {
            return None;
        }

        let choice = self.fonts.resolve(spec.family, spec.bold);
        let font = choice.font;
        let scale = PxScale::from(spec.size);
        let scaled = font.as_scaled(scale);
        let width = text_width(font, spec.size, text);

        let start_x = match spec.align {
            TextAlign::Start => x,
            TextAlign::Center => x - width / 2.0,
            TextAlign::End => x - width,
        };

        let embolden = if choice.synthetic_bold {
            (spec.size / 32.0).max(0.5)
        } else {
            0.0
        };
        let pad = margin + embolden.ceil() + 2.0;
        let left = (start_x - pad).floor();
        let top = (y - scaled.ascent() - pad).floor();
        let mask_w = (width + 2.0 * pad).ceil() as u32 + 1;
        let mask_h = (scaled.ascent() - scaled.descent() + 2.0 * pad).ceil() as u32 + 1;
        let mut coverage = GrayImage::new(mask_w, mask_h);

        let mut cursor = start_x;
        let mut prev: Option<GlyphId> = None;
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = prev {
                cursor += scaled.kern(prev, id);
            }

            let glyph = id.with_scale_and_position(scale, point(cursor - left, y - top));
            if let Some(outlined) = font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|px, py, cov| {
                    let gx = px as i32 + bounds.min.x as i32;
                    let gy = py as i32 + bounds.min.y as i32;
                    if gx >= 0 && gy >= 0 && (gx as u32) < mask_w && (gy as u32) < mask_h {
                        let value = (cov.clamp(0.0, 1.0) * 255.0).round() as u8;
                        let pixel = coverage.get_pixel_mut(gx as u32, gy as u32);
                        pixel[0] = pixel[0].saturating_add(value);
                    }
                });
            }

            cursor += scaled.h_advance(id);
            prev = Some(id);
        }

        if embolden > 0.0 {
            coverage = dilate(&coverage, embolden);
        }

        Some(Mask {
            left: left as i32,
            top: top as i32,
            coverage,
        })
    }

    fn glow_margin(&self) -> f32 {
        self.glow.map(|g| (g.blur * 1.5).ceil()).unwrap_or(0.0)
    }

    /// Draw the glow for `mask`, if a glow is set.
    fn paint_glow(&mut self, mask: &Mask) {
        if let Some(glow) = self.glow {
            let sigma = glow.blur / 2.0;
            if sigma > 0.0 {
                let blurred = imageproc::filter::gaussian_blur_f32(&mask.coverage, sigma);
                self.paint_coverage(mask.left, mask.top, &blurred, glow.color);
            }
        }
    }

    fn paint_coverage(&mut self, left: i32, top: i32, coverage: &GrayImage, color: Color) {
        let (canvas_w, canvas_h) = self.canvas.dimensions();
        let fg = color.to_rgba();

        for (mx, my, value) in coverage.enumerate_pixels() {
            if value[0] == 0 {
                continue;
            }
            let cx = left + mx as i32;
            let cy = top + my as i32;
            if cx < 0 || cy < 0 || cx as u32 >= canvas_w || cy as u32 >= canvas_h {
                continue;
            }
            let opacity = value[0] as f32 / 255.0;
            let bg = *self.canvas.get_pixel(cx as u32, cy as u32);
            self.canvas
                .put_pixel(cx as u32, cy as u32, blend_pixels(bg, fg, opacity));
        }
    }
}

impl DrawingSurface for RasterSurface {
    fn width(&self) -> u32 {
        self.canvas.width()
    }

    fn height(&self) -> u32 {
        self.canvas.height()
    }

    fn measure_text(&self, text: &str, spec: &TextSpec<'_>) -> f32 {
        let choice = self.fonts.resolve(spec.family, spec.bold);
        text_width(choice.font, spec.size, text)
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, spec: &TextSpec<'_>, color: Color) {
        if let Some(mask) = self.text_mask(text, x, y, spec, self.glow_margin()) {
            self.paint_glow(&mask);
            self.paint_coverage(mask.left, mask.top, &mask.coverage, color);
        }
    }

    fn stroke_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        spec: &TextSpec<'_>,
        color: Color,
        line_width: f32,
    ) {
        let radius = (line_width / 2.0).max(0.0);
        let margin = radius.ceil() + self.glow_margin();
        if let Some(mut mask) = self.text_mask(text, x, y, spec, margin) {
            mask.coverage = dilate(&mask.coverage, radius);
            self.paint_glow(&mask);
            self.paint_coverage(mask.left, mask.top, &mask.coverage, color);
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let xs = pixel_span(rect.x, rect.right(), self.canvas.width());
        let ys = pixel_span(rect.y, rect.bottom(), self.canvas.height());
        let fg = color.to_rgba();

        for y in ys {
            for x in xs.clone() {
                let bg = *self.canvas.get_pixel(x, y);
                self.canvas.put_pixel(x, y, blend_pixels(bg, fg, 1.0));
            }
        }
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32) {
        let half = line_width / 2.0;
        let outer_w = rect.width + line_width;
        let inner_h = rect.height - line_width;

        // Four non-overlapping bands so translucent colors are not doubled.
        self.fill_rect(Rect::new(rect.x - half, rect.y - half, outer_w, line_width), color);
        self.fill_rect(
            Rect::new(rect.x - half, rect.bottom() - half, outer_w, line_width),
            color,
        );
        if inner_h > 0.0 {
            self.fill_rect(Rect::new(rect.x - half, rect.y + half, line_width, inner_h), color);
            self.fill_rect(
                Rect::new(rect.right() - half, rect.y + half, line_width, inner_h),
                color,
            );
        }
    }

    fn draw_image(&mut self, image: &RgbaImage, dest: Rect) {
        let w = dest.width.round() as u32;
        let h = dest.height.round() as u32;
        if w == 0 || h == 0 || image.width() == 0 || image.height() == 0 {
            return;
        }

        let scaled;
        let source = if (w, h) == image.dimensions() {
            image
        } else {
            scaled = imageops::resize(image, w, h, FilterType::Triangle);
            &scaled
        };

        let left = dest.x.round() as i64;
        let top = dest.y.round() as i64;
        imageops::overlay(&mut self.canvas, source, left, top);
    }

    fn set_glow(&mut self, glow: Option<Glow>) {
        self.glow = glow;
    }
}

/// Pixels whose centers fall inside `[start, end)`, clipped to `0..max`.
fn pixel_span(start: f32, end: f32, max: u32) -> Range<u32> {
    let lo = (start - 0.5).ceil().max(0.0);
    let hi = (end - 0.5).ceil().clamp(0.0, max as f32);
    if hi <= lo {
        return 0..0;
    }
    lo as u32..hi as u32
}

/// Grow coverage outward by `radius` pixels (max filter over a disc).
fn dilate(mask: &GrayImage, radius: f32) -> GrayImage {
    if radius <= 0.0 {
        return mask.clone();
    }

    let reach = radius.ceil() as i32;
    let offsets: Vec<(i32, i32)> = (-reach..=reach)
        .flat_map(|dy| (-reach..=reach).map(move |dx| (dx, dy)))
        .filter(|(dx, dy)| ((dx * dx + dy * dy) as f32) <= radius * radius + 0.01)
        .collect();

    let (w, h) = mask.dimensions();
    GrayImage::from_fn(w, h, |x, y| {
        let mut best = 0u8;
        for (dx, dy) in &offsets {
            let sx = x as i32 + dx;
            let sy = y as i32 + dy;
            if sx >= 0 && sy >= 0 && (sx as u32) < w && (sy as u32) < h {
                best = best.max(mask.get_pixel(sx as u32, sy as u32)[0]);
            }
        }
        Luma([best])
    })
}

/// Porter-Duff "over" with an extra opacity applied to the foreground.
pub(crate) fn blend_pixels(background: Rgba<u8>, foreground: Rgba<u8>, opacity: f32) -> Rgba<u8> {
    let fg_alpha = (foreground[3] as f32 / 255.0) * opacity.clamp(0.0, 1.0);
    let bg_alpha = background[3] as f32 / 255.0;

    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);

    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let fg_f = fg as f32 / 255.0;
        let bg_f = bg as f32 / 255.0;
        let result = (fg_f * fg_alpha + bg_f * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        (result * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend_channel(foreground[0], background[0]),
        blend_channel(foreground[1], background[1]),
        blend_channel(foreground[2], background[2]),
        (out_alpha * 255.0).round() as u8,
    ])
}

/// One recorded call on a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillText {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        bold: bool,
        align: TextAlign,
        color: Color,
        glow: Option<Glow>,
    },
    StrokeText {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        color: Color,
        line_width: f32,
    },
    FillRect {
        rect: Rect,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
        line_width: f32,
    },
    Image {
        dest: Rect,
    },
}

/// Surface that records draw calls instead of rasterising them.
///
/// Text is measured as `chars * size * 0.5`, so layouts are reproducible
/// without any font files.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    glow: Option<Glow>,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            glow: None,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Text of every fill in draw order.
    pub fn filled_text(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl DrawingSurface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn measure_text(&self, text: &str, spec: &TextSpec<'_>) -> f32 {
        text.chars().count() as f32 * spec.size * 0.5
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, spec: &TextSpec<'_>, color: Color) {
        self.ops.push(DrawOp::FillText {
            text: text.to_string(),
            x,
            y,
            size: spec.size,
            bold: spec.bold,
            align: spec.align,
            color,
            glow: self.glow,
        });
    }

    fn stroke_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        spec: &TextSpec<'_>,
        color: Color,
        line_width: f32,
    ) {
        self.ops.push(DrawOp::StrokeText {
            text: text.to_string(),
            x,
            y,
            size: spec.size,
            color,
            line_width,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(DrawOp::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32) {
        self.ops.push(DrawOp::StrokeRect {
            rect,
            color,
            line_width,
        });
    }

    fn draw_image(&mut self, _image: &RgbaImage, dest: Rect) {
        self.ops.push(DrawOp::Image { dest });
    }

    fn set_glow(&mut self, glow: Option<Glow>) {
        self.glow = glow;
    }
}
