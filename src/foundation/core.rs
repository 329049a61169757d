use std::fmt;

use crate::foundation::error::{WrappedError, WrappedResult};

pub use kurbo::{Point, Rect};

/// Counter bucket: a calendar year or the all-time aggregate.
///
/// Serialized as a string (`"2023"` or `"all"`) so that period-keyed maps stay valid JSON
/// objects in the entity cache and in layouts.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(into = "String", try_from = "String")]
pub enum Period {
    Year(i32),
    AllTime,
}

impl Period {
    pub fn from_year(year: Option<i32>) -> Self {
        year.map_or(Self::AllTime, Self::Year)
    }

    pub fn year(self) -> Option<i32> {
        match self {
            Self::Year(y) => Some(y),
            Self::AllTime => None,
        }
    }

    /// Human label used on title panels.
    pub fn display_name(self) -> String {
        match self {
            Self::Year(y) => y.to_string(),
            Self::AllTime => "All Time".to_string(),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year(y) => write!(f, "{y}"),
            Self::AllTime => f.write_str("all"),
        }
    }
}

impl From<Period> for String {
    fn from(p: Period) -> Self {
        p.to_string()
    }
}

impl TryFrom<String> for Period {
    type Error = WrappedError;

    fn try_from(s: String) -> WrappedResult<Self> {
        if s == "all" {
            return Ok(Self::AllTime);
        }
        s.parse::<i32>()
            .map(Self::Year)
            .map_err(|_| WrappedError::serde(format!("invalid period key '{s}'")))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn byte_len(self) -> WrappedResult<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| WrappedError::validation("canvas byte size overflow"))
    }
}

/// Straight (non-premultiplied) RGBA8 color as written in layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    255
}

impl Rgba8 {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn premultiplied(self) -> [u8; 4] {
        let a = u16::from(self.a);
        let premul = |c: u8| crate::foundation::math::mul_div255_u8(u16::from(c), a);
        [premul(self.r), premul(self.g), premul(self.b), self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
