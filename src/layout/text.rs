use crate::foundation::{core::Point, error::WrappedResult};

pub const ELLIPSIS: &str = "...";

/// Greedy word wrap at whitespace. `max_chars` is a soft width: a single word longer than it
/// gets a line of its own rather than being split.
pub fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut cur = String::new();
    let mut cur_len = 0usize;

    for word in text.split_whitespace() {
        let len = word.chars().count();
        if cur_len == 0 {
            cur.push_str(word);
            cur_len = len;
        } else if cur_len + 1 + len <= max_chars {
            cur.push(' ');
            cur.push_str(word);
            cur_len += 1 + len;
        } else {
            lines.push(std::mem::take(&mut cur));
            cur.push_str(word);
            cur_len = len;
        }
    }
    if cur_len > 0 {
        lines.push(cur);
    }
    lines
}

/// Shorten `text` to at most `max_chars` characters, replacing the tail with [`ELLIPSIS`].
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let ellipsis_len = ELLIPSIS.chars().count();
    if max_chars <= ellipsis_len {
        return ELLIPSIS.chars().take(max_chars).collect();
    }
    let mut out: String = text.chars().take(max_chars - ellipsis_len).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Vertical font metrics in pixels at a given size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontMetrics {
    pub ascent: f32,
    pub descent: f32,
}

impl FontMetrics {
    /// Vertical advance between consecutive lines: the ascent alone, descent excluded.
    pub fn line_height(self) -> f64 {
        f64::from(self.ascent)
    }

    pub fn block_height(self, lines: usize) -> f64 {
        self.line_height() * lines as f64
    }
}

/// Font asset plus pixel size, as referenced by layouts.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FontSpec {
    /// Asset-root relative path of a TrueType/OpenType file.
    pub source: String,
    pub size_px: f32,
}

impl FontSpec {
    pub fn new(source: impl Into<String>, size_px: f32) -> Self {
        Self {
            source: source.into(),
            size_px,
        }
    }
}

pub trait FontMetricsSource {
    fn metrics(&mut self, font: &FontSpec) -> WrappedResult<FontMetrics>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockGrowth {
    /// `origin` marks the bottom of the block; extra lines push it upward.
    #[default]
    Up,
    /// `origin` marks the top of the block.
    Down,
}

/// Top-left origin of every line in a block laid out top-to-bottom.
pub fn anchor_block(origin: Point, line_heights: &[f64], growth: BlockGrowth) -> Vec<Point> {
    let total: f64 = line_heights.iter().sum();
    let mut y = match growth {
        BlockGrowth::Up => origin.y - total,
        BlockGrowth::Down => origin.y,
    };
    line_heights
        .iter()
        .map(|h| {
            let p = Point::new(origin.x, y);
            y += h;
            p
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/layout/text.rs"]
mod tests;
