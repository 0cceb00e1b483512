//! deckstrip renders a slide deck's progress strip: one PNG per slide, with
//! right-to-left chapter labels and per-chapter bullet markers colored by
//! whether each slide is visited, current, or upcoming.
//!
//! # Pipeline overview
//!
//! 1. **Layout**: [`compute_scene`] maps `(Deck, SlideIndex, Canvas)` to a
//!    [`Scene`] of label and bullet placements. Pure and deterministic.
//! 2. **Render**: [`CpuRenderer`] rasterizes a scene into premultiplied RGBA8.
//! 3. **Encode**: [`encode_png`] writes `slide_<n>.png` with 300 dpi metadata.
//!
//! [`render_deck`] drives the whole range; slides are independent, so the
//! driver can fan out over a thread pool. External IO (font bytes, shaped
//! label layouts) is front-loaded before the first slide is rendered.
#![forbid(unsafe_code)]

pub mod core;
pub mod encode_png;
pub mod error;
pub mod font;
pub mod layout;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod text;

pub use crate::core::{Canvas, Point, Rgba8, SlideIndex};
pub use crate::encode_png::{OUTPUT_DPI, slide_file_name, write_png};
pub use crate::error::{DeckstripError, DeckstripResult};
pub use crate::font::{FontOrigin, FontResource, find_fallback_font, load_font};
pub use crate::layout::{
    BulletPlacement, BulletState, LabelPlacement, Scene, compute_scene,
};
pub use crate::model::{Chapter, Deck};
pub use crate::pipeline::{
    DEFAULT_CANVAS, DEFAULT_FONT_SIZE_PX, RenderOpts, RenderStats, RenderThreading, render_deck,
};
pub use crate::render::{CpuRenderer, FrameRgba, unpremultiply_rgba8};
pub use crate::text::{ParleyShaper, ShapedLabel, TextShaper};
