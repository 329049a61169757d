use std::{collections::HashMap, sync::Arc};

use crate::{
    assets::{
        store::{AssetStore, PreparedImage},
        text::TextEngine,
    },
    effects::{blur::blur_layer, composite::over_in_place},
    foundation::{
        core::{Canvas, Rgba8},
        error::{WrappedError, WrappedResult},
    },
    render::{
        frame::FrameRGBA,
        plan::{DrawOp, LayerPass, PanelPlan},
    },
    report::spec::HAlign,
};

/// Rasterizes panel plans with `vello_cpu`, one transparent pixmap per layer.
pub struct CpuRenderer {
    ctx: Option<vello_cpu::RenderContext>,
    text: TextEngine,
    fonts: HashMap<String, vello_cpu::peniko::FontData>,
    images: HashMap<String, vello_cpu::Image>,
}

impl Default for CpuRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuRenderer {
    pub fn new() -> Self {
        Self {
            ctx: None,
            text: TextEngine::new(),
            fonts: HashMap::new(),
            images: HashMap::new(),
        }
    }

    /// Shaper shared with plan compilation so both agree on metrics.
    pub fn text_engine(&mut self) -> &mut TextEngine {
        &mut self.text
    }

    pub fn render(&mut self, plan: &PanelPlan, assets: &AssetStore) -> WrappedResult<FrameRGBA> {
        let (w, h) = canvas_u16(plan.canvas)?;
        let mut frame = FrameRGBA::transparent(plan.canvas)?;
        if let Some(clear) = plan.clear {
            let px = clear.premultiplied();
            for dst in frame.data.chunks_exact_mut(4) {
                dst.copy_from_slice(&px);
            }
        }

        for layer in &plan.layers {
            let mut pixmap = vello_cpu::Pixmap::new(w, h);
            self.draw_layer(layer, assets, w, h, &mut pixmap)?;
            let drawn = pixmap.data_as_u8_slice();
            match layer.blur {
                Some(spec) => {
                    let blurred = blur_layer(drawn, plan.canvas.width, plan.canvas.height, spec)?;
                    over_in_place(&mut frame.data, &blurred, 1.0)?;
                }
                None => over_in_place(&mut frame.data, drawn, 1.0)?,
            }
        }
        Ok(frame)
    }

    fn draw_layer(
        &mut self,
        layer: &LayerPass,
        assets: &AssetStore,
        w: u16,
        h: u16,
        dst: &mut vello_cpu::Pixmap,
    ) -> WrappedResult<()> {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();
        let out = layer
            .ops
            .iter()
            .try_for_each(|op| self.draw_op(&mut ctx, op, assets));
        if out.is_ok() {
            ctx.flush();
            ctx.render_to_pixmap(dst);
        }
        self.ctx = Some(ctx);
        out
    }

    fn draw_op(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        op: &DrawOp,
        assets: &AssetStore,
    ) -> WrappedResult<()> {
        match op {
            DrawOp::Image { source, origin } => {
                let prepared = assets.image(source)?;
                let paint = self.image_paint(source, prepared)?;
                ctx.set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
                ctx.set_paint(paint);
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(prepared.width),
                    f64::from(prepared.height),
                ));
            }
            DrawOp::Rect {
                rect,
                color,
                stroke_px,
            } => {
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(paint_color(*color));
                let r = vello_cpu::kurbo::Rect::new(rect.x0, rect.y0, rect.x1, rect.y1);
                match stroke_px {
                    Some(px) => {
                        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(f64::from(*px) * 2.0));
                        ctx.stroke_rect(&r);
                    }
                    None => ctx.fill_rect(&r),
                }
            }
            DrawOp::Text {
                font,
                text,
                origin,
                align,
                color,
                stroke_px,
            } => {
                let prepared = assets.font(&font.source)?;
                let layout =
                    self.text
                        .layout_line(&font.source, prepared, text, font.size_px, *color)?;
                let font_data = self
                    .fonts
                    .entry(font.source.clone())
                    .or_insert_with(|| {
                        vello_cpu::peniko::FontData::new(
                            vello_cpu::peniko::Blob::from(prepared.bytes.as_ref().clone()),
                            0,
                        )
                    })
                    .clone();

                let width = f64::from(layout.width());
                let x = match align {
                    HAlign::Left => origin.x,
                    HAlign::Center => origin.x - width / 2.0,
                    HAlign::Right => origin.x - width,
                };
                ctx.set_transform(vello_cpu::kurbo::Affine::translate((x, origin.y)));
                ctx.set_paint(paint_color(*color));

                for line in layout.lines() {
                    for item in line.items() {
                        let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                            continue;
                        };
                        let size = run.run().font_size();
                        let glyphs = || {
                            run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                                id: g.id,
                                x: g.x,
                                y: g.y,
                            })
                        };
                        ctx.glyph_run(&font_data).font_size(size).fill_glyphs(glyphs());
                        if let Some(r) = *stroke_px
                            && r > 0.0
                        {
                            ctx.set_stroke(vello_cpu::kurbo::Stroke::new(f64::from(r) * 2.0));
                            ctx.glyph_run(&font_data)
                                .font_size(size)
                                .stroke_glyphs(glyphs());
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn image_paint(
        &mut self,
        key: &str,
        prepared: &PreparedImage,
    ) -> WrappedResult<vello_cpu::Image> {
        if let Some(p) = self.images.get(key) {
            return Ok(p.clone());
        }
        let pixmap = pixmap_from_premul_bytes(&prepared.rgba8_premul, prepared.width, prepared.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.images.insert(key.to_string(), paint.clone());
        Ok(paint)
    }
}

fn paint_color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn canvas_u16(canvas: Canvas) -> WrappedResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| WrappedError::validation("canvas width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| WrappedError::validation("canvas height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(WrappedError::validation("canvas must be non-empty"));
    }
    Ok((w, h))
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> WrappedResult<vello_cpu::Pixmap> {
    let (w, h) = canvas_u16(Canvas { width, height })?;
    let expected = Canvas { width, height }.byte_len()?;
    if bytes.len() != expected {
        return Err(WrappedError::validation("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
