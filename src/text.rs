//! Text shaping behind a swappable seam.
//!
//! Labels can be right-to-left script, so their glyph order and joined forms
//! differ from the input character order. [`TextShaper`] is the injected
//! capability; [`ParleyShaper`] implements it with Parley, which performs the
//! bidi reordering and glyph joining before the width is measured.

use std::sync::Arc;

use crate::{
    core::Rgba8,
    error::{DeckstripError, DeckstripResult},
    font::FontResource,
};

/// Shaped label ready for rendering, plus the measured width of the shaped
/// glyph run (which can differ from any per-character estimate).
#[derive(Clone)]
pub struct ShapedLabel {
    pub layout: Arc<parley::Layout<Rgba8>>,
    pub width_px: f32,
}

impl std::fmt::Debug for ShapedLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapedLabel")
            .field("layout_ptr", &Arc::as_ptr(&self.layout))
            .field("width_px", &self.width_px)
            .finish()
    }
}

pub trait TextShaper {
    fn shape(&mut self, text: &str, size_px: f32, brush: Rgba8) -> DeckstripResult<ShapedLabel>;
}

/// Parley-backed shaper bound to a single loaded font face.
pub struct ParleyShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
    family_name: String,
    font_bytes: Arc<Vec<u8>>,
}

impl ParleyShaper {
    pub fn new(font: &FontResource) -> DeckstripResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font.bytes.as_ref().clone()),
            None,
        );
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            DeckstripError::validation("no font families registered from font bytes")
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| DeckstripError::validation("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font_bytes: font.bytes.clone(),
        })
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Raw bytes of the face this shaper was built from; the renderer draws
    /// glyph runs against the same data.
    pub fn font_bytes(&self) -> &Arc<Vec<u8>> {
        &self.font_bytes
    }
}

impl TextShaper for ParleyShaper {
    fn shape(&mut self, text: &str, size_px: f32, brush: Rgba8) -> DeckstripResult<ShapedLabel> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(DeckstripError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(None);

        // Measured on the shaped result; shaping can merge or reorder glyphs,
        // so per-character estimates are not usable here.
        let mut width_px = 0.0f32;
        for line in layout.lines() {
            width_px = width_px.max(line.metrics().advance);
        }

        Ok(ShapedLabel {
            layout: Arc::new(layout),
            width_px,
        })
    }
}
