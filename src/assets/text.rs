use std::collections::HashMap;

use crate::{
    assets::store::{AssetStore, PreparedFont},
    foundation::{
        core::Rgba8,
        error::{WrappedError, WrappedResult},
    },
    layout::text::{FontMetrics, FontMetricsSource, FontSpec},
};

/// Probe string whose first line yields representative ascent/descent.
const METRICS_PROBE: &str = "Hg";

/// Parley-backed shaper for single-line labels.
///
/// Fonts are registered once per asset key; the resolved family name is cached so repeated
/// layouts with the same font do not re-register its bytes.
pub struct TextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
    families: HashMap<String, String>,
    metrics: HashMap<(String, u32), FontMetrics>,
}

impl Default for TextEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextEngine {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
            metrics: HashMap::new(),
        }
    }

    fn family_for(&mut self, key: &str, font: &PreparedFont) -> WrappedResult<String> {
        if let Some(name) = self.families.get(key) {
            return Ok(name.clone());
        }
        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font.bytes.as_ref().clone()),
            None,
        );
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| WrappedError::asset(format!("font '{key}' has no usable faces")))?;
        let name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| WrappedError::asset(format!("font '{key}' family has no name")))?
            .to_string();
        self.families.insert(key.to_string(), name.clone());
        Ok(name)
    }

    /// Shape `text` as a single unbroken line.
    pub fn layout_line(
        &mut self,
        key: &str,
        font: &PreparedFont,
        text: &str,
        size_px: f32,
        color: Rgba8,
    ) -> WrappedResult<parley::Layout<Rgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(WrappedError::validation(
                "font size_px must be finite and > 0",
            ));
        }
        let family = self.family_for(key, font)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(color));

        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    pub fn metrics(
        &mut self,
        key: &str,
        font: &PreparedFont,
        size_px: f32,
    ) -> WrappedResult<FontMetrics> {
        let cache_key = (key.to_string(), size_px.to_bits());
        if let Some(m) = self.metrics.get(&cache_key) {
            return Ok(*m);
        }
        let layout = self.layout_line(key, font, METRICS_PROBE, size_px, Rgba8::BLACK)?;
        let line = layout
            .lines()
            .next()
            .ok_or_else(|| WrappedError::asset(format!("font '{key}' produced no line")))?;
        let lm = line.metrics();
        let m = FontMetrics {
            ascent: lm.ascent,
            descent: lm.descent,
        };
        self.metrics.insert(cache_key, m);
        Ok(m)
    }
}

/// Serves font metrics for plan compilation from loaded assets.
pub struct StoreMetrics<'a> {
    pub store: &'a AssetStore,
    pub engine: &'a mut TextEngine,
}

impl FontMetricsSource for StoreMetrics<'_> {
    fn metrics(&mut self, font: &FontSpec) -> WrappedResult<FontMetrics> {
        let prepared = self.store.font(&font.source)?;
        self.engine.metrics(&font.source, prepared, font.size_px)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/text.rs"]
mod tests;
