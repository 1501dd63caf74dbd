//! Content stack rendering.
//!
//! The stack is drawn in a fixed order (time, date and weekday, username,
//! address, coordinates) whatever the layout. Each block is gated by its
//! style flag and by the presence of its data. For anchors where content
//! must end at the origin, a pre-pass sums each block's footprint and the
//! cursor starts that far above the origin.
//!
//! All sizes derive from the canvas width:
//!
//! | metric      | value                          |
//! |-------------|--------------------------------|
//! | base        | `0.035 * width * multiplier`   |
//! | time        | `base * 2.5`                   |
//! | date        | `base * 0.9`                   |
//! | line height | `base * 1.3`                   |
//! | coordinates | `base * 0.8`                   |

use super::color::Color;
use super::context::WatermarkContext;
use super::datetime::Locale;
use super::layout::{padding, Growth, Origin};
use super::style::{Layout, WatermarkStyle};
use super::surface::{DrawingSurface, Glow, Rect, TextAlign, TextSpec};

/// Outline drawn under text when the style's shadow flag is on.
const SHADOW_COLOR: Color = Color::with_alpha(0, 0, 0, 204);
const SHADOW_WIDTH: f32 = 3.0;

const PANEL_COLOR: Color = Color::with_alpha(0, 0, 0, 77);
const BORDER_WIDTH: f32 = 3.0;

const GLOW_BLUR: f32 = 20.0;

/// Address lines wrap at this fraction of the canvas width.
const WRAP_RATIO: f32 = 0.7;

/// Font sizes and spacing for one canvas width and size class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub padding: f32,
    pub base: f32,
    pub time: f32,
    pub date: f32,
    pub line_height: f32,
    pub coordinates: f32,
}

impl Metrics {
    pub fn new(canvas_width: u32, style: &WatermarkStyle) -> Self {
        let base = canvas_width as f32 * 0.035 * style.font_size.multiplier();
        Self {
            padding: padding(canvas_width),
            base,
            time: base * 2.5,
            date: base * 0.9,
            line_height: base * 1.3,
            coordinates: base * 0.8,
        }
    }
}

/// One visible piece of overlay information.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Time(String),
    Date { date: String, weekday: String },
    Username(String),
    Address(String),
    Coordinates(String),
}

impl ContentBlock {
    /// Height this block reserves when the stack is lifted above its anchor.
    fn footprint(&self, m: &Metrics) -> f32 {
        match self {
            Self::Time(_) => m.time,
            Self::Date { .. } => m.line_height * 2.2,
            Self::Username(_) => m.line_height * 1.2,
            Self::Address(_) => m.line_height * 1.5,
            Self::Coordinates(_) => m.line_height,
        }
    }

    /// Height used to size the background panel and border.
    fn panel_height(&self, m: &Metrics) -> f32 {
        match self {
            Self::Time(_) => m.time,
            Self::Date { .. } | Self::Address(_) => m.line_height * 2.0,
            Self::Username(_) => m.line_height * 1.2,
            Self::Coordinates(_) => m.line_height,
        }
    }
}

/// Visible blocks for `ctx` under `style`, in draw order.
pub fn collect_blocks(
    ctx: &WatermarkContext,
    style: &WatermarkStyle,
    locale: Locale,
) -> Vec<ContentBlock> {
    let mut blocks = Vec::with_capacity(5);

    if style.show_time {
        blocks.push(ContentBlock::Time(locale.time_label(&ctx.timestamp)));
    }
    if style.show_date {
        blocks.push(ContentBlock::Date {
            date: locale.date_label(&ctx.timestamp),
            weekday: locale.weekday_label(&ctx.timestamp).to_string(),
        });
    }
    if style.show_username {
        if let Some(name) = ctx.user_name() {
            blocks.push(ContentBlock::Username(name.to_string()));
        }
    }
    if style.show_address {
        if let Some(line) = ctx.address_line() {
            blocks.push(ContentBlock::Address(line));
        }
    }
    if style.show_coordinates {
        if let Some(point) = ctx.location {
            blocks.push(ContentBlock::Coordinates(point.display()));
        }
    }

    blocks
}

/// Greedy word wrap.
///
/// Words are appended while the line (measured with a trailing space) fits
/// `max_width`. A word that alone exceeds the width gets a line of its own.
pub fn wrap_text<S: DrawingSurface + ?Sized>(
    surface: &S,
    text: &str,
    spec: &TextSpec<'_>,
    max_width: f32,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let candidate = format!("{}{} ", line, word);
        if surface.measure_text(&candidate, spec) > max_width && !line.is_empty() {
            lines.push(line.trim_end().to_string());
            line = format!("{} ", word);
        } else {
            line = candidate;
        }
    }

    if !line.trim().is_empty() {
        lines.push(line.trim_end().to_string());
    }

    lines
}

/// Vertical band the panel and border cover, as `(top, height)`.
fn band(layout: Layout, origin: &Origin, content: f32, pad: f32) -> ((f32, f32), (f32, f32)) {
    if layout.is_top() {
        ((0.0, content + 3.0 * pad), (pad / 2.0, content + pad))
    } else {
        (
            (origin.y - content - 2.0 * pad, content + 3.0 * pad),
            (origin.y - content - 1.5 * pad, content + pad),
        )
    }
}

/// Draws the content stack for one render.
pub struct ContentStack<'a> {
    style: &'a WatermarkStyle,
    blocks: Vec<ContentBlock>,
    metrics: Metrics,
}

impl<'a> ContentStack<'a> {
    pub fn new(
        ctx: &WatermarkContext,
        style: &'a WatermarkStyle,
        locale: Locale,
        canvas_width: u32,
    ) -> Self {
        Self {
            style,
            blocks: collect_blocks(ctx, style, locale),
            metrics: Metrics::new(canvas_width, style),
        }
    }

    pub fn blocks(&self) -> &[ContentBlock] {
        &self.blocks
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    fn spec(&self, size: f32, bold: bool, align: TextAlign) -> TextSpec<'a> {
        TextSpec {
            family: &self.style.font_family,
            size,
            bold,
            align,
        }
    }

    fn draw_text<S: DrawingSurface + ?Sized>(
        &self,
        surface: &mut S,
        text: &str,
        x: f32,
        y: f32,
        spec: &TextSpec<'_>,
        color: Color,
    ) {
        if self.style.shadow_enabled {
            surface.stroke_text(text, x, y, spec, SHADOW_COLOR, SHADOW_WIDTH);
        }
        surface.fill_text(text, x, y, spec, color);
    }

    /// Render the stack onto `surface`, anchored at `origin`.
    pub fn render<S: DrawingSurface + ?Sized>(&self, surface: &mut S, origin: &Origin) {
        let m = &self.metrics;
        let style = self.style;
        let width = surface.width() as f32;

        let address_spec = self.spec(m.base, false, origin.align);
        let address = self.blocks.iter().find_map(|b| match b {
            ContentBlock::Address(text) => Some(text),
            _ => None,
        });
        let address_lines = match address {
            Some(text) => wrap_text(&*surface, text, &address_spec, width * WRAP_RATIO),
            None => Vec::new(),
        };
        // Downward stacks make room for wrapped lines; upward ones keep the fixed footprint.
        let extra_lines = match origin.growth {
            Growth::Downward => address_lines.len().saturating_sub(1) as f32 * m.line_height,
            Growth::Upward => 0.0,
        };

        let panel_content: f32 =
            self.blocks.iter().map(|b| b.panel_height(m)).sum::<f32>() + extra_lines;
        let ((panel_y, panel_h), (border_y, border_h)) =
            band(style.layout, origin, panel_content, m.padding);

        if style.background_blur {
            surface.fill_rect(Rect::new(0.0, panel_y, width, panel_h), PANEL_COLOR);
        }
        if style.border_enabled {
            let (x, w) = if origin.align == TextAlign::Center {
                (width * 0.1, width * 0.8)
            } else {
                (m.padding / 2.0, width - m.padding)
            };
            surface.stroke_rect(
                Rect::new(x, border_y, w, border_h),
                style.accent_color,
                BORDER_WIDTH,
            );
        }

        // Top anchors grow down from the origin; everything else ends at it.
        let mut y = if style.layout.is_top() {
            origin.y
        } else {
            let total: f32 = self.blocks.iter().map(|b| b.footprint(m)).sum();
            origin.y - total
        };
        let x = origin.x;

        for block in &self.blocks {
            match block {
                ContentBlock::Time(label) => {
                    if style.theme.has_glow() {
                        surface.set_glow(Some(Glow {
                            color: style.secondary_color,
                            blur: GLOW_BLUR,
                        }));
                    }
                    let spec = self.spec(m.time, true, origin.align);
                    self.draw_text(surface, label, x, y, &spec, style.primary_color);
                    surface.set_glow(None);
                    y += m.time * 0.3;
                }
                ContentBlock::Date { date, weekday } => {
                    let spec = self.spec(m.date, false, origin.align);
                    y += m.line_height;
                    self.draw_text(surface, date, x, y, &spec, style.primary_color);
                    y += m.line_height;
                    self.draw_text(surface, weekday, x, y, &spec, style.secondary_color);
                }
                ContentBlock::Username(name) => {
                    let spec = self.spec(m.base, false, origin.align);
                    y += m.line_height * 1.2;
                    self.draw_text(surface, name, x, y, &spec, style.primary_color);
                }
                ContentBlock::Address(_) => {
                    y += m.line_height * 1.2;
                    let mut line_y = y;
                    for (i, line) in address_lines.iter().enumerate() {
                        if i > 0 {
                            match origin.growth {
                                Growth::Upward => line_y -= m.line_height,
                                Growth::Downward => line_y += m.line_height,
                            }
                        }
                        self.draw_text(surface, line, x, line_y, &address_spec, style.primary_color);
                    }
                    if origin.growth == Growth::Downward {
                        y = line_y;
                    }
                }
                ContentBlock::Coordinates(coords) => {
                    let spec = self.spec(m.coordinates, false, origin.align);
                    y += m.line_height;
                    self.draw_text(surface, coords, x, y, &spec, style.secondary_color);
                }
            }
        }
    }
}

/// Render the content stack for `ctx` and `style` onto `surface`.
pub fn render_stack<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    ctx: &WatermarkContext,
    style: &WatermarkStyle,
    origin: &Origin,
    locale: Locale,
) {
    ContentStack::new(ctx, style, locale, surface.width()).render(surface, origin);
}
