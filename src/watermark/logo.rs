//! Logo fetching and compositing.
//!
//! A logo reference can be an `http(s)://` URL, a `data:` URI or a local
//! file (plain path or `file://` URL). Decoded logos are cached by their
//! reference string.
//!
//! Compositing a logo never fails a render. The fetch is attempted once,
//! raced against a timeout, and any problem is reported as a
//! [`LogoOutcome`] and logged.
//!
//! # Example
//!
//! ```ignore
//! use photomark::watermark::logo::{composite_logo, LogoFetcher, LogoFetcherConfig};
//!
//! let fetcher = LogoFetcher::new(LogoFetcherConfig::default())?;
//! let outcome = composite_logo(&mut surface, &fetcher, Some("https://cdn.example.com/logo.png"),
//!     Duration::from_millis(3000)).await;
//! ```

use super::layout::logo_rect;
use super::surface::{DrawingSurface, Rect};
use super::WatermarkError;
use crate::constants::{
    DEFAULT_LOGO_CACHE_ENTRIES, DEFAULT_LOGO_CACHE_TTL_SECS, DEFAULT_LOGO_HTTP_TIMEOUT_SECS,
    DEFAULT_LOGO_TIMEOUT_MS,
};
use base64::Engine as _;
use image::{ImageFormat, RgbaImage};
use moka::future::Cache;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default time allowed for a logo to load.
pub const DEFAULT_LOGO_TIMEOUT: Duration = Duration::from_millis(DEFAULT_LOGO_TIMEOUT_MS);

#[derive(Debug, Clone)]
pub struct LogoFetcherConfig {
    /// Maximum number of cached logos.
    pub max_cache_entries: u64,
    /// Time-to-live for cached logos.
    pub cache_ttl: Duration,
    /// Timeout applied by the HTTP client itself.
    pub http_timeout: Duration,
}

impl Default for LogoFetcherConfig {
    fn default() -> Self {
        Self {
            max_cache_entries: DEFAULT_LOGO_CACHE_ENTRIES,
            cache_ttl: Duration::from_secs(DEFAULT_LOGO_CACHE_TTL_SECS),
            http_timeout: Duration::from_secs(DEFAULT_LOGO_HTTP_TIMEOUT_SECS),
        }
    }
}

/// Parsed logo reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoSource {
    Http(String),
    /// Inline payload from a `data:` URI, already decoded.
    Data {
        media_type: Option<String>,
        bytes: Vec<u8>,
    },
    File(PathBuf),
}

impl LogoSource {
    /// Parse a logo reference.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` for an empty reference or a malformed `data:` URI.
    pub fn parse(source: &str) -> Result<Self, WatermarkError> {
        let source = source.trim();
        if source.is_empty() {
            return Err(WatermarkError::FetchError(
                "Empty logo reference".to_string(),
            ));
        }

        let lower = source.to_ascii_lowercase();
        if lower.starts_with("https://") || lower.starts_with("http://") {
            Ok(Self::Http(source.to_string()))
        } else if lower.starts_with("data:") {
            parse_data_uri(&source[5..])
        } else if lower.starts_with("file://") {
            Ok(Self::File(PathBuf::from(&source[7..])))
        } else {
            Ok(Self::File(PathBuf::from(source)))
        }
    }

    /// Hint used when the payload's magic bytes are not recognised.
    fn format_hint(&self) -> String {
        match self {
            Self::Http(url) => url.split(['?', '#']).next().unwrap_or(url).to_string(),
            Self::Data { media_type, .. } => media_type
                .as_deref()
                .and_then(|m| m.strip_prefix("image/"))
                .map(|ext| format!("inline.{ext}"))
                .unwrap_or_default(),
            Self::File(path) => path.to_string_lossy().into_owned(),
        }
    }
}

fn parse_data_uri(rest: &str) -> Result<LogoSource, WatermarkError> {
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| WatermarkError::FetchError("data: URI has no payload".to_string()))?;

    let (meta, is_base64) = match meta.strip_suffix(";base64") {
        Some(m) => (m, true),
        None => (meta, false),
    };
    let media_type = meta
        .split(';')
        .next()
        .filter(|m| !m.is_empty())
        .map(str::to_ascii_lowercase);

    let bytes = if is_base64 {
        base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| WatermarkError::FetchError(format!("Invalid base64 payload: {e}")))?
    } else {
        urlencoding::decode_binary(payload.as_bytes()).into_owned()
    };

    Ok(LogoSource::Data { media_type, bytes })
}

/// Decoded logo, shared between renders.
#[derive(Clone)]
pub struct CachedLogo {
    pub image: Arc<RgbaImage>,
}

impl std::fmt::Debug for CachedLogo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedLogo")
            .field("dimensions", &self.image.dimensions())
            .finish()
    }
}

/// Loads logos with an in-memory cache.
#[derive(Clone)]
pub struct LogoFetcher {
    cache: Cache<String, CachedLogo>,
    http_client: reqwest::Client,
}

impl std::fmt::Debug for LogoFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogoFetcher")
            .field("cached", &self.cache.entry_count())
            .finish()
    }
}

impl LogoFetcher {
    /// # Errors
    ///
    /// Returns `WatermarkError::ConfigError` if the HTTP client cannot be created.
    pub fn new(config: LogoFetcherConfig) -> Result<Self, WatermarkError> {
        let cache = Cache::builder()
            .max_capacity(config.max_cache_entries)
            .time_to_live(config.cache_ttl)
            .build();

        let http_client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| {
                WatermarkError::ConfigError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { cache, http_client })
    }

    /// Load and decode the logo referenced by `source`.
    pub async fn fetch(&self, source: &str) -> Result<CachedLogo, WatermarkError> {
        let key = source.trim().to_string();
        if let Some(cached) = self.cache.get(&key).await {
            return Ok(cached);
        }

        let parsed = LogoSource::parse(&key)?;
        let bytes = match &parsed {
            LogoSource::Http(url) => self.fetch_http(url).await?,
            LogoSource::Data { bytes, .. } => bytes.clone(),
            LogoSource::File(path) => tokio::fs::read(path).await.map_err(|e| {
                WatermarkError::FetchError(format!("Cannot read {}: {e}", path.display()))
            })?,
        };

        let format = detect_image_format(&bytes, &parsed.format_hint())?;
        let image = image::load_from_memory_with_format(&bytes, format)
            .map_err(|e| WatermarkError::DecodeError(format!("logo: {e}")))?
            .to_rgba8();

        let cached = CachedLogo {
            image: Arc::new(image),
        };
        self.cache.insert(key, cached.clone()).await;

        Ok(cached)
    }

    async fn fetch_http(&self, url: &str) -> Result<Vec<u8>, WatermarkError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| WatermarkError::FetchError(format!("HTTP fetch failed: {e}")))?;

        if !response.status().is_success() {
            return Err(WatermarkError::FetchError(format!(
                "HTTP request failed with status: {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| WatermarkError::FetchError(format!("Failed to read HTTP body: {e}")))?;

        Ok(bytes.to_vec())
    }

    pub fn cache_size(&self) -> u64 {
        self.cache.entry_count()
    }

    pub async fn is_cached(&self, source: &str) -> bool {
        self.cache.get(source.trim()).await.is_some()
    }

    pub async fn clear_cache(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }
}

/// Detect image format from magic bytes, then from the file extension.
fn detect_image_format(data: &[u8], hint: &str) -> Result<ImageFormat, WatermarkError> {
    if let Ok(format) = image::guess_format(data) {
        return Ok(format);
    }

    let ext = hint
        .rsplit('.')
        .next()
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => Ok(ImageFormat::Png),
        "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
        "gif" => Ok(ImageFormat::Gif),
        "webp" => Ok(ImageFormat::WebP),
        _ => Err(WatermarkError::DecodeError(format!(
            "Unsupported logo format: {ext}"
        ))),
    }
}

/// Result of the logo step of a render.
#[derive(Debug, Clone, PartialEq)]
pub enum LogoOutcome {
    /// The logo was drawn into this rectangle.
    Drawn(Rect),
    /// No logo was requested.
    Skipped,
    /// The logo could not be loaded or decoded.
    Failed(String),
    /// The logo did not load within the timeout.
    TimedOut,
}

impl LogoOutcome {
    pub fn is_drawn(&self) -> bool {
        matches!(self, Self::Drawn(_))
    }
}

/// Draw the logo referenced by `logo` at the top-right of `surface`.
///
/// Resolves immediately with `Skipped` when `logo` is `None`. Otherwise the
/// fetch is raced against `timeout`; if the timeout wins the fetch future is
/// dropped, which cancels it, and nothing is drawn.
pub async fn composite_logo<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    fetcher: &LogoFetcher,
    logo: Option<&str>,
    timeout: Duration,
) -> LogoOutcome {
    let Some(source) = logo else {
        return LogoOutcome::Skipped;
    };

    let started = Instant::now();
    let loaded = match tokio::time::timeout(timeout, fetcher.fetch(source)).await {
        Ok(Ok(loaded)) => loaded,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Logo unavailable, rendering without it");
            return LogoOutcome::Failed(e.to_string());
        }
        Err(_) => {
            tracing::warn!(
                timeout_ms = timeout.as_millis() as u64,
                "Logo load timed out, rendering without it"
            );
            return LogoOutcome::TimedOut;
        }
    };

    let (logo_w, logo_h) = loaded.image.dimensions();
    match logo_rect(surface.width(), surface.height(), logo_w, logo_h) {
        Some(rect) => {
            surface.draw_image(&loaded.image, rect);
            tracing::debug!(
                width = rect.width,
                height = rect.height,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Logo drawn"
            );
            LogoOutcome::Drawn(rect)
        }
        None => LogoOutcome::Failed("logo has no pixels".to_string()),
    }
}
