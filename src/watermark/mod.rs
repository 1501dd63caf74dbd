//! Watermark compositing for captured photos.
//!
//! Burns a configurable overlay into a photo: capture time, long-form date
//! and weekday, username, address, coordinates and a company logo. Which
//! blocks appear, where they are anchored and how they are colored is
//! decided by a [`WatermarkStyle`], usually one of the named presets in the
//! [`StyleCatalog`].
//!
//! # Pipeline
//!
//! 1. [`layout::resolve_origin`] maps the style's anchor to an origin point,
//!    text alignment and growth direction.
//! 2. [`content::render_stack`] draws the visible content blocks.
//! 3. [`logo::composite_logo`] loads the logo with a timeout and draws it
//!    top-right. Failure only means no logo.
//!
//! [`WatermarkEngine`] ties the steps together over a [`RasterSurface`].
//!
//! # Configuration Example
//!
//! ```yaml
//! locale: vi
//! logo:
//!   timeout_ms: 3000
//! styles:
//!   company:
//!     layout: bottom-right
//!     show_coordinates: true
//!     primary_color: "#FFFFFF"
//!     secondary_color: "#F59E0B"
//! ```

pub mod color;
pub mod content;
pub mod context;
pub mod datetime;
pub mod encoder;
pub mod engine;
pub mod error;
pub mod fonts;
pub mod layout;
pub mod logo;
pub mod style;
pub mod surface;

pub use color::{parse_color, Color};
pub use content::{render_stack, ContentBlock, ContentStack, Metrics};
pub use context::{AddressInfo, GeoPoint, WatermarkContext};
pub use datetime::Locale;
pub use encoder::{compress_jpeg, encode, EncodedImage, OutputFormat};
pub use engine::{Rendered, RenderedBytes, WatermarkEngine};
pub use error::WatermarkError;
pub use fonts::{FontBook, FontSettings};
pub use layout::{resolve_origin, Growth, Origin};
pub use logo::{composite_logo, LogoFetcher, LogoFetcherConfig, LogoOutcome, LogoSource};
pub use style::{FontSize, Layout, StyleCatalog, Theme, WatermarkStyle};
pub use surface::{DrawingSurface, RasterSurface, RecordingSurface, TextAlign};
