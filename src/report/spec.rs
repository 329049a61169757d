use std::path::Path;

use anyhow::Context as _;

use crate::{
    effects::blur::BlurSpec,
    foundation::{
        core::{Canvas, Point, Rgba8},
        error::{WrappedError, WrappedResult},
    },
    layout::text::{BlockGrowth, FontSpec},
    stats::rank::{DEFAULT_LIMIT, RankSource},
};

/// Ordered list of panels making up one report.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ReportLayout {
    pub panels: Vec<PanelSpec>,
}

impl ReportLayout {
    pub fn from_path(path: &Path) -> WrappedResult<Self> {
        let f = std::fs::File::open(path)
            .with_context(|| format!("open layout '{}'", path.display()))?;
        let layout: Self = serde_json::from_reader(std::io::BufReader::new(f))?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn validate(&self) -> WrappedResult<()> {
        if self.panels.is_empty() {
            return Err(WrappedError::validation("layout must contain at least one panel"));
        }
        for (i, p) in self.panels.iter().enumerate() {
            if self.panels[..i].iter().any(|q| q.name == p.name) {
                return Err(WrappedError::validation(format!(
                    "duplicate panel name '{}'",
                    p.name
                )));
            }
            p.validate()?;
        }
        Ok(())
    }
}

/// Static descriptor of one output image.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PanelSpec {
    /// Output file stem; the panel is written as `<name>.png`.
    pub name: String,
    pub background: Background,
    #[serde(default)]
    pub images: Vec<ImageSlot>,
    #[serde(default)]
    pub labels: Vec<LabelSpec>,
    #[serde(default)]
    pub lists: Vec<ListSpec>,
    #[serde(default)]
    pub bars: Vec<BarSpec>,
}

impl PanelSpec {
    pub fn validate(&self) -> WrappedResult<()> {
        if self.name.trim().is_empty()
            || self.name.contains(['/', '\\'])
            || self.name.starts_with('.')
        {
            return Err(WrappedError::validation(format!(
                "panel name '{}' is not a plain file stem",
                self.name
            )));
        }
        if let Background::Fill { canvas, .. } = &self.background
            && (canvas.width == 0 || canvas.height == 0)
        {
            return Err(WrappedError::validation(format!(
                "panel '{}' canvas must be non-empty",
                self.name
            )));
        }
        let fonts = self
            .labels
            .iter()
            .map(|l| &l.font)
            .chain(self.lists.iter().map(|l| &l.font))
            .chain(self.bars.iter().filter_map(|b| b.label.as_ref().map(|l| &l.font)));
        for f in fonts {
            if !f.size_px.is_finite() || f.size_px <= 0.0 {
                return Err(WrappedError::validation(format!(
                    "panel '{}' font '{}' size must be finite and > 0",
                    self.name, f.source
                )));
            }
        }
        for b in &self.bars {
            if !(b.axis_px.is_finite() && b.axis_px > 0.0) {
                return Err(WrappedError::validation(format!(
                    "panel '{}' bar axis must be finite and > 0",
                    self.name
                )));
            }
        }
        Ok(())
    }

    /// Asset-root relative fonts referenced anywhere in the panel.
    pub fn font_sources(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        let all = self
            .labels
            .iter()
            .map(|l| l.font.source.as_str())
            .chain(self.lists.iter().map(|l| l.font.source.as_str()))
            .chain(
                self.bars
                    .iter()
                    .filter_map(|b| b.label.as_ref().map(|l| l.font.source.as_str())),
            );
        for s in all {
            if !out.contains(&s) {
                out.push(s);
            }
        }
        out
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Background {
    /// Template image; the canvas takes its size.
    Image { source: String },
    Fill { color: Rgba8, canvas: Canvas },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ImageSlot {
    pub source: ImageSource,
    /// Top-left corner.
    pub origin: Point,
    /// Resample to this size before pasting.
    #[serde(default)]
    pub size: Option<Canvas>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageSource {
    Path { path: String },
    /// Cover art of the period's most played game. Omitted when nothing was played.
    TopGameCover,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// How a string is fitted into a slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TextFit {
    /// Single line, as-is.
    #[default]
    Line,
    Wrap { max_chars: usize },
    /// Single line cut to `max_chars` including the ellipsis.
    Truncate { max_chars: usize },
    /// One word per line.
    WordPerLine,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StrokeSpec {
    pub color: Rgba8,
    /// Outline radius in pixels around the glyph edge.
    pub radius: f32,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TextEffect {
    #[default]
    Plain,
    /// Strokes listed outermost first; each gets its own layer.
    Outline { strokes: Vec<StrokeSpec> },
    /// Solid glyphs widened by `radius` and blurred on a separate layer.
    Shadow {
        color: Rgba8,
        radius: f32,
        blur: BlurSpec,
    },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextStyle {
    pub color: Rgba8,
    #[serde(default)]
    pub effect: TextEffect,
}

impl TextStyle {
    pub fn plain(color: Rgba8) -> Self {
        Self {
            color,
            effect: TextEffect::Plain,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalKind {
    Plays,
    CountedPlays,
    GamesPlayed,
    PlayersActive,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LabelContent {
    Static { text: String },
    /// `2023` or `All Time`.
    PeriodName,
    Total { total: TotalKind },
    /// Name of the most played mechanic; the label is omitted when there is none.
    TopMechanic,
}

/// A single text block not tied to a rank.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LabelSpec {
    pub content: LabelContent,
    pub anchor: Point,
    #[serde(default)]
    pub align: HAlign,
    #[serde(default)]
    pub growth: BlockGrowth,
    #[serde(default)]
    pub fit: TextFit,
    #[serde(default)]
    pub uppercase: bool,
    pub font: FontSpec,
    pub style: TextStyle,
}

/// Fixed anchor for one rank position.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SlotSpec {
    pub anchor: Point,
    #[serde(default)]
    pub align: HAlign,
    /// Overrides the list's fit for this slot.
    #[serde(default)]
    pub fit: Option<TextFit>,
}

impl SlotSpec {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            anchor: Point::new(x, y),
            align: HAlign::Left,
            fit: None,
        }
    }
}

/// Ranked names placed into fixed per-rank slots.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ListSpec {
    pub source: RankSource,
    #[serde(default = "default_limit")]
    pub limit: usize,
    pub slots: Vec<SlotSpec>,
    #[serde(default)]
    pub growth: BlockGrowth,
    #[serde(default)]
    pub fit: TextFit,
    /// Prefix each entry with its rank, as in `1 Catan`.
    #[serde(default)]
    pub numbered: bool,
    #[serde(default)]
    pub uppercase: bool,
    pub font: FontSpec,
    pub style: TextStyle,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BarLabelSpec {
    pub font: FontSpec,
    pub color: Rgba8,
    /// Horizontal gap between the bar end and its count.
    #[serde(default)]
    pub gap_px: f64,
}

/// Horizontal bars scaled so the top entry spans `axis_px`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BarSpec {
    pub source: RankSource,
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Top-left corner of the bar for each rank.
    pub origins: Vec<Point>,
    pub axis_px: f64,
    pub thickness_px: f64,
    pub fill: Rgba8,
    #[serde(default)]
    pub outline: Option<StrokeSpec>,
    #[serde(default)]
    pub label: Option<BarLabelSpec>,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

#[cfg(test)]
#[path = "../../tests/unit/report/spec.rs"]
mod tests;
