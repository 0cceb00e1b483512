//! CPU rasterization of a [`Scene`] into premultiplied RGBA8 pixels.

use std::sync::Arc;

use vello_cpu::kurbo::Shape as _;

use crate::{
    core::Canvas,
    error::{DeckstripError, DeckstripResult},
    layout::Scene,
    text::ShapedLabel,
};

#[derive(Clone, Debug)]
pub struct FrameRgba {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

/// Draws labels (glyph run by glyph run) and bullets (filled circles) onto a
/// transparent canvas. One renderer per thread; no IO happens here.
pub struct CpuRenderer {
    canvas: Canvas,
    font: vello_cpu::peniko::FontData,
}

impl CpuRenderer {
    pub fn new(canvas: Canvas, font_bytes: &Arc<Vec<u8>>) -> Self {
        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font_bytes.as_ref().clone()),
            0,
        );
        Self { canvas, font }
    }

    /// Render one scene. `labels` holds the shaped layout for each chapter,
    /// indexed by chapter position.
    pub fn render_scene(
        &mut self,
        scene: &Scene,
        labels: &[ShapedLabel],
    ) -> DeckstripResult<FrameRgba> {
        if scene.canvas != self.canvas {
            return Err(DeckstripError::render(
                "scene canvas does not match renderer canvas",
            ));
        }
        if labels.len() != scene.labels.len() {
            return Err(DeckstripError::render(format!(
                "expected {} shaped labels, got {}",
                scene.labels.len(),
                labels.len()
            )));
        }

        let width: u16 = self
            .canvas
            .width
            .try_into()
            .map_err(|_| DeckstripError::render("canvas width exceeds u16"))?;
        let height: u16 = self
            .canvas
            .height
            .try_into()
            .map_err(|_| DeckstripError::render("canvas height exceeds u16"))?;

        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        let mut ctx = vello_cpu::RenderContext::new(width, height);

        for placement in &scene.labels {
            let shaped = labels.get(placement.chapter).ok_or_else(|| {
                DeckstripError::render(format!(
                    "no shaped label for chapter {}",
                    placement.chapter
                ))
            })?;
            ctx.set_transform(vello_cpu::kurbo::Affine::translate((
                placement.origin.x,
                placement.origin.y,
            )));

            for line in shaped.layout.lines() {
                for item in line.items() {
                    let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                        continue;
                    };

                    let brush = run.style().brush;
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                        brush.r, brush.g, brush.b, brush.a,
                    ));

                    let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                    ctx.glyph_run(&self.font)
                        .font_size(run.run().font_size())
                        .fill_glyphs(glyphs);
                }
            }
        }

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        for bullet in &scene.bullets {
            let fill = bullet.state.fill();
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                fill.r, fill.g, fill.b, fill.a,
            ));
            let circle = vello_cpu::kurbo::Circle::new(
                (bullet.center.x, bullet.center.y),
                bullet.diameter / 2.0,
            );
            ctx.fill_path(&circle.to_path(0.1));
        }

        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        Ok(FrameRgba {
            width: u32::from(width),
            height: u32::from(height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

/// Convert premultiplied RGBA8 to straight alpha in place.
pub fn unpremultiply_rgba8(data: &mut [u8]) {
    for px in data.chunks_exact_mut(4) {
        let a = px[3];
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
        } else if a < 255 {
            let a16 = u16::from(a);
            for c in &mut px[..3] {
                let v = u16::from(*c) * 255 + a16 / 2;
                *c = (v / a16).min(255) as u8;
            }
        }
    }
}
