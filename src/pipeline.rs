//! Batch driver: deck in, one PNG per slide out.
//!
//! IO is front-loaded (font bytes, shaped labels) so the per-slide cycle is a
//! pure compute-render-encode pass; slides share no mutable state, which makes
//! the opt-in parallel path a straight fan-out over the index range.

use std::path::{Path, PathBuf};

use anyhow::Context;
use rayon::prelude::*;

use crate::{
    core::{Canvas, Rgba8, SlideIndex},
    encode_png,
    error::{DeckstripError, DeckstripResult},
    font,
    layout::compute_scene,
    model::Deck,
    render::CpuRenderer,
    text::{ParleyShaper, ShapedLabel, TextShaper},
};

pub const DEFAULT_CANVAS: Canvas = Canvas {
    width: 1920,
    height: 57,
};
pub const DEFAULT_FONT_SIZE_PX: f32 = 30.0;

#[derive(Clone, Debug, Default)]
pub struct RenderThreading {
    pub parallel: bool,
    pub threads: Option<usize>,
}

#[derive(Clone, Debug)]
pub struct RenderOpts {
    pub canvas: Canvas,
    /// Requested label font; `None` (or an unreadable path) falls back to a
    /// system face.
    pub font_path: Option<PathBuf>,
    pub font_size_px: f32,
    pub label_fill: Rgba8,
    pub out_dir: PathBuf,
    pub threading: RenderThreading,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            canvas: DEFAULT_CANVAS,
            font_path: None,
            font_size_px: DEFAULT_FONT_SIZE_PX,
            label_fill: Rgba8::opaque(0, 0, 0),
            out_dir: PathBuf::from("."),
            threading: RenderThreading::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub slides_total: u64,
    pub slides_written: u64,
}

/// Render every slide of `deck` to `opts.out_dir`.
///
/// Fails fast on invalid input before any file is touched. A failed write
/// aborts the run with the offending path in the error; files already written
/// stay on disk.
#[tracing::instrument(skip(deck, opts))]
pub fn render_deck(deck: &Deck, opts: &RenderOpts) -> DeckstripResult<RenderStats> {
    deck.validate()?;
    let canvas = Canvas::new(opts.canvas.width, opts.canvas.height)?;

    let font = font::load_font(opts.font_path.as_deref())?;
    let mut shaper = ParleyShaper::new(&font)?;
    let mut labels = Vec::with_capacity(deck.chapters.len());
    for chapter in &deck.chapters {
        labels.push(shaper.shape(&chapter.name, opts.font_size_px, opts.label_fill)?);
    }
    let widths: Vec<f32> = labels.iter().map(|l| l.width_px).collect();

    std::fs::create_dir_all(&opts.out_dir)
        .with_context(|| format!("create output dir '{}'", opts.out_dir.display()))?;

    let total = deck.total_slides();
    let font_bytes = font.bytes.clone();

    if !opts.threading.parallel {
        let mut renderer = CpuRenderer::new(canvas, &font_bytes);
        for i in 1..=total {
            render_one(
                deck,
                SlideIndex(i),
                canvas,
                &widths,
                &labels,
                &mut renderer,
                &opts.out_dir,
            )?;
        }
    } else {
        let pool = build_thread_pool(opts.threading.threads)?;
        let results: Vec<DeckstripResult<()>> = pool.install(|| {
            (1..=total)
                .into_par_iter()
                .map_init(
                    || CpuRenderer::new(canvas, &font_bytes),
                    |renderer, i| {
                        render_one(
                            deck,
                            SlideIndex(i),
                            canvas,
                            &widths,
                            &labels,
                            renderer,
                            &opts.out_dir,
                        )
                    },
                )
                .collect()
        });
        for result in results {
            result?;
        }
    }

    Ok(RenderStats {
        slides_total: u64::from(total),
        slides_written: u64::from(total),
    })
}

fn render_one(
    deck: &Deck,
    index: SlideIndex,
    canvas: Canvas,
    widths: &[f32],
    labels: &[ShapedLabel],
    renderer: &mut CpuRenderer,
    out_dir: &Path,
) -> DeckstripResult<()> {
    let scene = compute_scene(deck, index, canvas, widths)?;
    let frame = renderer.render_scene(&scene, labels)?;
    let path = out_dir.join(encode_png::slide_file_name(index));
    encode_png::write_png(&path, &frame)?;
    tracing::debug!(index = index.0, path = %path.display(), "wrote slide");
    Ok(())
}

fn build_thread_pool(threads: Option<usize>) -> DeckstripResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(DeckstripError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| DeckstripError::render(format!("failed to build rayon thread pool: {e}")))
}
