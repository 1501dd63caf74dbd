//! The compositing pipeline.
//!
//! One render: decode the photo, copy it onto a fresh surface, resolve the
//! origin, draw the content stack, composite the logo, then hand back the
//! pixels (or encoded bytes). The logo fetch is the only await point.
//!
//! ```ignore
//! let engine = WatermarkEngine::new(fonts, LogoFetcher::new(LogoFetcherConfig::default())?);
//! let style = StyleCatalog::builtin().get("classic");
//! let ctx = WatermarkContext::now().with_user_name("Alice");
//! let rendered = engine.render(&photo, &ctx, &style).await?;
//! ```

use super::content::render_stack;
use super::context::WatermarkContext;
use super::datetime::Locale;
use super::encoder::{encode, EncodedImage, OutputFormat};
use super::fonts::FontBook;
use super::layout::resolve_origin;
use super::logo::{composite_logo, LogoFetcher, LogoOutcome, DEFAULT_LOGO_TIMEOUT};
use super::style::WatermarkStyle;
use super::surface::{DrawingSurface, RasterSurface};
use super::WatermarkError;
use image::{DynamicImage, RgbaImage};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Output of a render before encoding.
#[derive(Debug)]
pub struct Rendered {
    pub image: RgbaImage,
    pub logo: LogoOutcome,
}

/// Output of a render after encoding.
#[derive(Debug)]
pub struct RenderedBytes {
    pub encoded: EncodedImage,
    pub logo: LogoOutcome,
}

/// Shared, cheaply cloneable watermark renderer.
///
/// The engine holds no per-render state. Each render owns its surface, so
/// concurrent renders never share mutable data.
#[derive(Debug, Clone)]
pub struct WatermarkEngine {
    fonts: Arc<FontBook>,
    fetcher: LogoFetcher,
    locale: Locale,
    logo_timeout: Duration,
}

impl WatermarkEngine {
    pub fn new(fonts: Arc<FontBook>, fetcher: LogoFetcher) -> Self {
        Self {
            fonts,
            fetcher,
            locale: Locale::default(),
            logo_timeout: DEFAULT_LOGO_TIMEOUT,
        }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_logo_timeout(mut self, timeout: Duration) -> Self {
        self.logo_timeout = timeout;
        self
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn logo_timeout(&self) -> Duration {
        self.logo_timeout
    }

    pub fn fetcher(&self) -> &LogoFetcher {
        &self.fetcher
    }

    /// Draw the watermark onto an existing surface.
    ///
    /// Content is drawn synchronously; the returned future only suspends
    /// while the logo loads.
    pub async fn render_onto<S: DrawingSurface + ?Sized>(
        &self,
        surface: &mut S,
        ctx: &WatermarkContext,
        style: &WatermarkStyle,
    ) -> LogoOutcome {
        let origin = resolve_origin(surface.width(), surface.height(), style.layout);
        render_stack(surface, ctx, style, &origin, self.locale);

        let logo = ctx.logo().filter(|_| style.show_logo);
        composite_logo(surface, &self.fetcher, logo, self.logo_timeout).await
    }

    /// Render a watermarked copy of `image`.
    ///
    /// # Errors
    ///
    /// Returns `SurfaceError` if `image` has no pixels. Logo problems never
    /// cause an error; see [`Rendered::logo`].
    pub async fn render(
        &self,
        image: &DynamicImage,
        ctx: &WatermarkContext,
        style: &WatermarkStyle,
    ) -> Result<Rendered, WatermarkError> {
        let started = Instant::now();
        let mut surface = RasterSurface::from_image(image, self.fonts.clone())?;

        let logo = self.render_onto(&mut surface, ctx, style).await;

        tracing::debug!(
            width = surface.width(),
            height = surface.height(),
            layout = %style.layout,
            logo = ?logo,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Watermark rendered"
        );

        Ok(Rendered {
            image: surface.into_image(),
            logo,
        })
    }

    /// Decode `input`, render, and encode the result as `format`.
    ///
    /// # Errors
    ///
    /// `DecodeError` when `input` is not a supported image, `SurfaceError`
    /// for an empty image, `EncodeError` when encoding fails.
    pub async fn render_bytes(
        &self,
        input: &[u8],
        ctx: &WatermarkContext,
        style: &WatermarkStyle,
        format: OutputFormat,
        quality: u8,
    ) -> Result<RenderedBytes, WatermarkError> {
        let image = image::load_from_memory(input)?;
        let rendered = self.render(&image, ctx, style).await?;
        let encoded = encode(&rendered.image, format, quality)?;

        Ok(RenderedBytes {
            encoded,
            logo: rendered.logo,
        })
    }
}
