use crate::{
    assets::store::AssetStore,
    effects::blur::BlurSpec,
    foundation::{
        core::{Canvas, Period, Point, Rect, Rgba8},
        error::WrappedResult,
    },
    layout::text::{BlockGrowth, FontMetricsSource, FontSpec, anchor_block, truncate, wrap},
    report::spec::{
        Background, HAlign, ImageSource, LabelContent, PanelSpec, TextEffect, TextFit, TextStyle,
        TotalKind,
    },
    stats::{aggregate::Aggregate, rank::RankSource},
};

/// Everything a panel can bind to besides its own spec.
pub struct PanelContext<'a> {
    pub aggregate: &'a Aggregate,
    pub period: Period,
    pub assets: &'a AssetStore,
    /// Asset path of the top game's cover art, if the period has a top game.
    pub top_cover: Option<&'a str>,
}

/// Compositing slot of a layer. Layers are composited in ascending order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LayerKind {
    Background,
    Images,
    Shadow,
    /// Outline strokes, outermost (0) first.
    Outline(u8),
    Fill,
    BarFill,
    BarOutline,
    BarLabel,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Paste a loaded image at its native size.
    Image { source: String, origin: Point },
    /// One shaped line. `origin` is the top of the line box at the edge named by `align`.
    Text {
        font: FontSpec,
        text: String,
        origin: Point,
        align: HAlign,
        color: Rgba8,
        /// Outline radius; the glyphs are filled and stroked at twice this width.
        stroke_px: Option<f32>,
    },
    /// Filled rectangle, or its outline (radius `stroke_px` around the edge) when set.
    Rect {
        rect: Rect,
        color: Rgba8,
        stroke_px: Option<f32>,
    },
}

/// Ops drawn onto one transparent canvas-sized layer.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerPass {
    pub kind: LayerKind,
    /// Applied to the whole layer before it is composited.
    pub blur: Option<BlurSpec>,
    pub ops: Vec<DrawOp>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PanelPlan {
    pub name: String,
    pub canvas: Canvas,
    /// Solid color under every layer; transparent when absent.
    pub clear: Option<Rgba8>,
    pub layers: Vec<LayerPass>,
}

impl PanelPlan {
    pub fn layer(&self, kind: LayerKind) -> Option<&LayerPass> {
        self.layers.iter().find(|l| l.kind == kind)
    }

    pub fn op_count(&self) -> usize {
        self.layers.iter().map(|l| l.ops.len()).sum()
    }
}

#[derive(Default)]
struct LayerSet {
    layers: Vec<LayerPass>,
}

impl LayerSet {
    fn push(&mut self, kind: LayerKind, blur: Option<BlurSpec>, op: DrawOp) {
        match self
            .layers
            .iter_mut()
            .find(|l| l.kind == kind && l.blur == blur)
        {
            Some(l) => l.ops.push(op),
            None => self.layers.push(LayerPass {
                kind,
                blur,
                ops: vec![op],
            }),
        }
    }

    fn finish(mut self) -> Vec<LayerPass> {
        self.layers.sort_by_key(|l| l.kind);
        self.layers
    }
}

/// Pixel length of a bar for `count` when `top` spans the full `axis_px`.
pub fn bar_length(count: u64, top: u64, axis_px: f64) -> f64 {
    if top == 0 {
        return 0.0;
    }
    (count as f64 / top as f64 * axis_px).round()
}

/// Split `text` into display lines according to `fit`.
pub fn fit_lines(text: &str, fit: TextFit, uppercase: bool) -> Vec<String> {
    let text = if uppercase {
        text.to_uppercase()
    } else {
        text.to_string()
    };
    match fit {
        TextFit::Line if text.trim().is_empty() => Vec::new(),
        TextFit::Line => vec![text],
        TextFit::Wrap { max_chars } => wrap(&text, max_chars),
        TextFit::Truncate { max_chars } => vec![truncate(&text, max_chars)],
        TextFit::WordPerLine => text.split_whitespace().map(str::to_string).collect(),
    }
}

struct TextBlock<'s> {
    anchor: Point,
    align: HAlign,
    growth: BlockGrowth,
    font: &'s FontSpec,
    style: &'s TextStyle,
}

fn push_text_block(
    layers: &mut LayerSet,
    metrics: &mut dyn FontMetricsSource,
    block: TextBlock<'_>,
    lines: Vec<String>,
) -> WrappedResult<()> {
    if lines.is_empty() {
        return Ok(());
    }
    let m = metrics.metrics(block.font)?;
    let heights = vec![m.line_height(); lines.len()];
    let origins = anchor_block(block.anchor, &heights, block.growth);

    for (text, origin) in lines.into_iter().zip(origins) {
        let op = |color: Rgba8, stroke_px: Option<f32>| DrawOp::Text {
            font: block.font.clone(),
            text: text.clone(),
            origin,
            align: block.align,
            color,
            stroke_px,
        };
        match &block.style.effect {
            TextEffect::Plain => {}
            TextEffect::Outline { strokes } => {
                for (i, s) in strokes.iter().enumerate() {
                    let depth = u8::try_from(i).unwrap_or(u8::MAX);
                    layers.push(LayerKind::Outline(depth), None, op(s.color, Some(s.radius)));
                }
            }
            TextEffect::Shadow {
                color,
                radius,
                blur,
            } => layers.push(LayerKind::Shadow, Some(*blur), op(*color, Some(*radius))),
        }
        layers.push(LayerKind::Fill, None, op(block.style.color, None));
    }
    Ok(())
}

fn label_text(content: &LabelContent, ctx: &PanelContext<'_>) -> Option<String> {
    match content {
        LabelContent::Static { text } => Some(text.clone()),
        LabelContent::PeriodName => Some(ctx.period.display_name()),
        LabelContent::Total { total } => {
            let t = ctx.aggregate.totals(ctx.period);
            let n = match total {
                TotalKind::Plays => t.plays,
                TotalKind::CountedPlays => t.counted_plays,
                TotalKind::GamesPlayed => t.games_played,
                TotalKind::PlayersActive => t.players_active,
            };
            Some(n.to_string())
        }
        LabelContent::TopMechanic => ctx
            .aggregate
            .rank(RankSource::Mechanics, ctx.period, 1)
            .into_iter()
            .next()
            .map(|r| r.label),
    }
}

/// Resolve a panel spec against period data into an ordered set of layers.
///
/// Ranked content binds to fixed slots; a ranking with no entries leaves the panel with its
/// static chrome only.
pub fn compile_panel(
    spec: &PanelSpec,
    ctx: &PanelContext<'_>,
    metrics: &mut dyn FontMetricsSource,
) -> WrappedResult<PanelPlan> {
    let mut layers = LayerSet::default();

    let (canvas, clear) = match &spec.background {
        Background::Image { source } => {
            let img = ctx.assets.image(source)?;
            layers.push(
                LayerKind::Background,
                None,
                DrawOp::Image {
                    source: source.clone(),
                    origin: Point::ZERO,
                },
            );
            (
                Canvas {
                    width: img.width,
                    height: img.height,
                },
                None,
            )
        }
        Background::Fill { color, canvas } => (*canvas, Some(*color)),
    };

    for slot in &spec.images {
        let source = match &slot.source {
            ImageSource::Path { path } => path.as_str(),
            ImageSource::TopGameCover => match ctx.top_cover {
                Some(p) => p,
                None => continue,
            },
        };
        layers.push(
            LayerKind::Images,
            None,
            DrawOp::Image {
                source: source.to_string(),
                origin: slot.origin,
            },
        );
    }

    for label in &spec.labels {
        let Some(text) = label_text(&label.content, ctx) else {
            continue;
        };
        push_text_block(
            &mut layers,
            metrics,
            TextBlock {
                anchor: label.anchor,
                align: label.align,
                growth: label.growth,
                font: &label.font,
                style: &label.style,
            },
            fit_lines(&text, label.fit, label.uppercase),
        )?;
    }

    for list in &spec.lists {
        let rows = ctx.aggregate.rank(
            list.source,
            ctx.period,
            list.limit.min(list.slots.len()),
        );
        for (row, slot) in rows.iter().zip(&list.slots) {
            let mut lines = fit_lines(&row.label, slot.fit.unwrap_or(list.fit), list.uppercase);
            if list.numbered
                && let Some(first) = lines.first_mut()
            {
                *first = format!("{} {first}", row.rank);
            }
            push_text_block(
                &mut layers,
                metrics,
                TextBlock {
                    anchor: slot.anchor,
                    align: slot.align,
                    growth: list.growth,
                    font: &list.font,
                    style: &list.style,
                },
                lines,
            )?;
        }
    }

    for bar in &spec.bars {
        let rows = ctx
            .aggregate
            .rank(bar.source, ctx.period, bar.limit.min(bar.origins.len()));
        let Some(top) = rows.first().map(|r| r.count) else {
            continue;
        };
        tracing::debug!(panel = %spec.name, top, axis_px = bar.axis_px, "bar scale");

        for (row, origin) in rows.iter().zip(&bar.origins) {
            let len = bar_length(row.count, top, bar.axis_px);
            let rect = Rect::new(origin.x, origin.y, origin.x + len, origin.y + bar.thickness_px);
            layers.push(
                LayerKind::BarFill,
                None,
                DrawOp::Rect {
                    rect,
                    color: bar.fill,
                    stroke_px: None,
                },
            );
            if let Some(outline) = bar.outline {
                layers.push(
                    LayerKind::BarOutline,
                    None,
                    DrawOp::Rect {
                        rect,
                        color: outline.color,
                        stroke_px: Some(outline.radius),
                    },
                );
            }
            if let Some(label) = &bar.label {
                let m = metrics.metrics(&label.font)?;
                let y = origin.y + (bar.thickness_px - m.line_height()) / 2.0;
                layers.push(
                    LayerKind::BarLabel,
                    None,
                    DrawOp::Text {
                        font: label.font.clone(),
                        text: row.count.to_string(),
                        origin: Point::new(rect.x1 + label.gap_px, y),
                        align: HAlign::Left,
                        color: label.color,
                        stroke_px: None,
                    },
                );
            }
        }
    }

    let plan = PanelPlan {
        name: spec.name.clone(),
        canvas,
        clear,
        layers: layers.finish(),
    };
    tracing::debug!(
        panel = %plan.name,
        layers = plan.layers.len(),
        ops = plan.op_count(),
        shadow = plan.layer(LayerKind::Shadow).is_some(),
        "compiled panel"
    );
    Ok(plan)
}

#[cfg(test)]
#[path = "../../tests/unit/render/plan.rs"]
mod tests;
