//! Pure layout pass: deck + slide index -> renderable scene.
//!
//! All horizontal arithmetic is integer pixel math. Chapters read right to
//! left: chapter 0 sits at the right edge and bullet 0 of a chapter is its
//! rightmost bullet (slide 1).

use crate::{
    core::{Canvas, Point, Rgba8, SlideIndex},
    error::{DeckstripError, DeckstripResult},
    model::Deck,
};

pub const BULLET_DIAMETER: i64 = 10;
pub const BULLET_SPACING: i64 = 15;
pub const BULLET_PITCH: i64 = BULLET_DIAMETER + BULLET_SPACING;
pub const RIGHT_MARGIN: i64 = 150;
pub const INTER_CHAPTER_GAP: i64 = 100;
pub const BULLET_Y: i64 = 50;
pub const LABEL_Y: i64 = BULLET_Y - BULLET_DIAMETER - 50;

pub const CURRENT_FILL: Rgba8 = Rgba8::opaque(0xfb, 0x6f, 0x92);
pub const VISITED_FILL: Rgba8 = Rgba8::opaque(0x33, 0x3f, 0x4c);
pub const UPCOMING_FILL: Rgba8 = Rgba8::opaque(0x59, 0x74, 0x7b);

/// Three-way classification of a bullet relative to the slide being rendered.
/// Never stored; recomputed fresh for every slide index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulletState {
    Current,
    Visited,
    Upcoming,
}

impl BulletState {
    pub fn fill(self) -> Rgba8 {
        match self {
            Self::Current => CURRENT_FILL,
            Self::Visited => VISITED_FILL,
            Self::Upcoming => UPCOMING_FILL,
        }
    }
}

/// Where a chapter label is drawn. `origin` is the top-left corner of the
/// shaped text run.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelPlacement {
    pub chapter: usize,
    pub text: String,
    pub origin: Point,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BulletPlacement {
    pub chapter: usize,
    /// 0-based slide position within the chapter (0 = rightmost = slide 1).
    pub slide_in_chapter: u32,
    pub center: Point,
    pub diameter: f64,
    pub state: BulletState,
}

/// Ephemeral output of one layout pass: exactly one label per chapter and one
/// bullet per slide of the deck.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub canvas: Canvas,
    pub labels: Vec<LabelPlacement>,
    pub bullets: Vec<BulletPlacement>,
}

/// Rightmost bullet center for chapter `i`. Spacing uses the *largest*
/// chapter's block width, so short chapters leave unused space rather than
/// compacting.
fn anchor_x(canvas_width: i64, max_slides: i64, chapter: i64) -> i64 {
    let block_width = BULLET_PITCH * max_slides - BULLET_SPACING;
    canvas_width - RIGHT_MARGIN - chapter * (block_width + INTER_CHAPTER_GAP)
}

/// Classify bullet `k` (0-based) of the chapter whose slides start after
/// `base` earlier slides.
///
/// The visited test rebases the current index into this chapter before
/// comparing. For chapters wholly before the current slide the rebased index
/// exceeds every bullet position, so they all classify visited; for chapters
/// after it the rebased value is non-positive and everything falls through to
/// upcoming.
fn bullet_state(index: SlideIndex, base: u32, k: u32) -> BulletState {
    let global = i64::from(base) + i64::from(k) + 1;
    if i64::from(index.0) == global {
        BulletState::Current
    } else if i64::from(k) + 1 < i64::from(index.0) - i64::from(base) {
        BulletState::Visited
    } else {
        BulletState::Upcoming
    }
}

/// Compute the scene for one slide.
///
/// `label_widths` carries the measured pixel width of each chapter's *shaped*
/// label, one entry per chapter, so label centering accounts for bidi
/// reordering and ligatures. Out-of-range indices are programming errors and
/// fail immediately; they are never clamped.
pub fn compute_scene(
    deck: &Deck,
    index: SlideIndex,
    canvas: Canvas,
    label_widths: &[f32],
) -> DeckstripResult<Scene> {
    deck.validate()?;
    if canvas.width == 0 || canvas.height == 0 {
        return Err(DeckstripError::validation("canvas width/height must be > 0"));
    }
    if label_widths.len() != deck.chapters.len() {
        return Err(DeckstripError::layout(format!(
            "expected {} label widths, got {}",
            deck.chapters.len(),
            label_widths.len()
        )));
    }
    let total = deck.total_slides();
    if index.0 < 1 || index.0 > total {
        return Err(DeckstripError::layout(format!(
            "slide index {} out of range 1..={total}",
            index.0
        )));
    }

    let canvas_width = i64::from(canvas.width);
    let max_slides = i64::from(deck.max_slides());

    let mut labels = Vec::with_capacity(deck.chapters.len());
    for (i, chapter) in deck.chapters.iter().enumerate() {
        let anchor = anchor_x(canvas_width, max_slides, i as i64);
        // Midpoint of this chapter's own bullet span, integer division.
        let center = anchor - (i64::from(chapter.slide_count) - 1) * BULLET_PITCH / 2;
        let origin_x = center as f64 - f64::from(label_widths[i]) / 2.0;
        labels.push(LabelPlacement {
            chapter: i,
            text: chapter.name.clone(),
            origin: Point::new(origin_x, LABEL_Y as f64),
        });
    }

    let mut bullets = Vec::with_capacity(total as usize);
    for (i, chapter) in deck.chapters.iter().enumerate() {
        let anchor = anchor_x(canvas_width, max_slides, i as i64);
        let base = deck.base_offset(i);
        for k in 0..chapter.slide_count {
            let x = anchor - i64::from(k) * BULLET_PITCH;
            bullets.push(BulletPlacement {
                chapter: i,
                slide_in_chapter: k,
                center: Point::new(x as f64, BULLET_Y as f64),
                diameter: BULLET_DIAMETER as f64,
                state: bullet_state(index, base, k),
            });
        }
    }

    Ok(Scene {
        canvas,
        labels,
        bullets,
    })
}
