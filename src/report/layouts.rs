//! Built-in report layouts. Coordinates are the contract the bundled templates are drawn for.

use crate::{
    effects::blur::BlurSpec,
    foundation::core::{Canvas, Point, Rgba8},
    layout::text::{BlockGrowth, FontSpec},
    report::spec::{
        Background, BarLabelSpec, BarSpec, HAlign, ImageSlot, ImageSource, LabelContent,
        LabelSpec, ListSpec, PanelSpec, ReportLayout, SlotSpec, StrokeSpec, TextEffect, TextFit,
        TextStyle, TotalKind,
    },
    stats::{
        aggregate::PlayerMetric,
        rank::{DEFAULT_LIMIT, RankSource},
    },
};

const GAMES_FONT: &str = "fonts/SATANICK.TTF";
const PLAYERS_FONT: &str = "fonts/IBMPlexSans-Thin.ttf";
const MECHANICS_FONT: &str = "fonts/plump.ttf";
const CARD_FONT: &str = "fonts/Courier Prime.ttf";
const CARD_FONT_BOLD: &str = "fonts/Courier Prime Bold.ttf";

const GAMES_FILL: Rgba8 = Rgba8::rgb(251, 194, 0);
const MECHANICS_FILL: Rgba8 = Rgba8::rgb(237, 227, 217);
const CARD_BACKGROUND: Rgba8 = Rgba8::rgb(20, 20, 20);

/// Name of the single output written by the story-card style.
pub const STORY_CARD_NAME: &str = "wrapped";

/// Title, totals, games, players and mechanics, in that order.
pub fn panels() -> ReportLayout {
    ReportLayout {
        panels: vec![
            title_panel(),
            totals_panel(),
            games_panel(),
            players_panel(),
            mechanics_panel(),
        ],
    }
}

pub fn story_card() -> ReportLayout {
    ReportLayout {
        panels: vec![story_card_panel()],
    }
}

fn double_outline(color: Rgba8) -> TextStyle {
    TextStyle {
        color,
        effect: TextEffect::Outline {
            strokes: vec![
                StrokeSpec {
                    color: Rgba8::WHITE,
                    radius: 10.0,
                },
                StrokeSpec {
                    color: Rgba8::BLACK,
                    radius: 5.0,
                },
            ],
        },
    }
}

fn label(content: LabelContent, x: f64, y: f64, font: FontSpec, style: TextStyle) -> LabelSpec {
    LabelSpec {
        content,
        anchor: Point::new(x, y),
        align: HAlign::Left,
        growth: BlockGrowth::Up,
        fit: TextFit::Line,
        uppercase: false,
        font,
        style,
    }
}

fn template(name: &str) -> Background {
    Background::Image {
        source: format!("images/{name}.png"),
    }
}

pub fn title_panel() -> PanelSpec {
    let centered = |content, y, size| LabelSpec {
        align: HAlign::Center,
        ..label(
            content,
            540.0,
            y,
            FontSpec::new(GAMES_FONT, size),
            double_outline(GAMES_FILL),
        )
    };
    PanelSpec {
        name: "title".to_string(),
        background: template("title"),
        images: Vec::new(),
        labels: vec![
            centered(LabelContent::PeriodName, 900.0, 192.0),
            centered(
                LabelContent::Static {
                    text: "Board Game Wrapped".to_string(),
                },
                1040.0,
                96.0,
            ),
        ],
        lists: Vec::new(),
        bars: Vec::new(),
    }
}

pub fn totals_panel() -> PanelSpec {
    let rows = [
        ("Total Plays", TotalKind::Plays),
        ("Games Played", TotalKind::GamesPlayed),
        ("Players", TotalKind::PlayersActive),
    ];
    let mut labels = Vec::new();
    for (i, (heading, total)) in rows.into_iter().enumerate() {
        let y = 380.0 + 320.0 * i as f64;
        labels.push(label(
            LabelContent::Static {
                text: heading.to_uppercase(),
            },
            220.0,
            y,
            FontSpec::new(PLAYERS_FONT, 64.0),
            TextStyle::plain(Rgba8::BLACK),
        ));
        labels.push(label(
            LabelContent::Total { total },
            220.0,
            y + 180.0,
            FontSpec::new(PLAYERS_FONT, 160.0),
            TextStyle::plain(Rgba8::BLACK),
        ));
    }
    PanelSpec {
        name: "totals".to_string(),
        background: template("totals"),
        images: Vec::new(),
        labels,
        lists: Vec::new(),
        bars: Vec::new(),
    }
}

pub fn games_panel() -> PanelSpec {
    let slot = |x, y, align| SlotSpec {
        anchor: Point::new(x, y),
        align,
        fit: None,
    };
    PanelSpec {
        name: "games".to_string(),
        background: template("games"),
        images: Vec::new(),
        labels: Vec::new(),
        lists: vec![ListSpec {
            source: RankSource::Games,
            limit: DEFAULT_LIMIT,
            slots: vec![
                slot(356.0, 500.0, HAlign::Left),
                slot(1212.0, 766.0, HAlign::Right),
                slot(356.0, 1040.0, HAlign::Left),
                slot(1212.0, 1297.0, HAlign::Right),
                slot(356.0, 1545.0, HAlign::Left),
            ],
            growth: BlockGrowth::Up,
            fit: TextFit::Wrap { max_chars: 14 },
            numbered: false,
            uppercase: false,
            font: FontSpec::new(GAMES_FONT, 96.0),
            style: double_outline(GAMES_FILL),
        }],
        bars: Vec::new(),
    }
}

pub fn players_panel() -> PanelSpec {
    PanelSpec {
        name: "players".to_string(),
        background: template("players"),
        images: Vec::new(),
        labels: Vec::new(),
        lists: vec![ListSpec {
            source: RankSource::Players {
                metric: PlayerMetric::Plays,
            },
            limit: DEFAULT_LIMIT,
            slots: (0..5u8)
                .map(|i| SlotSpec::at(220.0, 380.0 + 120.0 * f64::from(i)))
                .collect(),
            growth: BlockGrowth::Up,
            fit: TextFit::Wrap { max_chars: 15 },
            numbered: false,
            uppercase: true,
            font: FontSpec::new(PLAYERS_FONT, 64.0),
            style: TextStyle::plain(Rgba8::BLACK),
        }],
        bars: vec![BarSpec {
            source: RankSource::Players {
                metric: PlayerMetric::Plays,
            },
            limit: DEFAULT_LIMIT,
            origins: (0..5u8)
                .map(|i| Point::new(220.0, 392.0 + 120.0 * f64::from(i)))
                .collect(),
            axis_px: 640.0,
            thickness_px: 24.0,
            fill: GAMES_FILL,
            outline: Some(StrokeSpec {
                color: Rgba8::BLACK,
                radius: 1.0,
            }),
            label: Some(BarLabelSpec {
                font: FontSpec::new(PLAYERS_FONT, 32.0),
                color: Rgba8::BLACK,
                gap_px: 16.0,
            }),
        }],
    }
}

pub fn mechanics_panel() -> PanelSpec {
    let slot = |x, y, max_chars| SlotSpec {
        anchor: Point::new(x, y),
        align: HAlign::Left,
        fit: Some(TextFit::Wrap { max_chars }),
    };
    PanelSpec {
        name: "mechanics".to_string(),
        background: template("mechanics"),
        images: Vec::new(),
        labels: Vec::new(),
        lists: vec![ListSpec {
            source: RankSource::Mechanics,
            limit: DEFAULT_LIMIT,
            slots: vec![
                slot(656.0, 174.0, 14),
                slot(500.0, 491.0, 16),
                slot(656.0, 803.0, 14),
                slot(347.0, 1118.0, 19),
                slot(656.0, 1428.0, 14),
            ],
            growth: BlockGrowth::Up,
            fit: TextFit::Wrap { max_chars: 14 },
            numbered: false,
            uppercase: false,
            font: FontSpec::new(MECHANICS_FONT, 96.0),
            style: TextStyle {
                color: MECHANICS_FILL,
                effect: TextEffect::Shadow {
                    color: Rgba8::BLACK,
                    radius: 5.0,
                    blur: BlurSpec::Box { radius: 5 },
                },
            },
        }],
        bars: Vec::new(),
    }
}

pub fn story_card_panel() -> PanelSpec {
    let white = || TextStyle::plain(Rgba8::WHITE);
    let heading = |text: &str, x, y| LabelSpec {
        growth: BlockGrowth::Down,
        ..label(
            LabelContent::Static {
                text: text.to_string(),
            },
            x,
            y,
            FontSpec::new(CARD_FONT, 36.0),
            white(),
        )
    };
    let big = |content, x, y, fit| LabelSpec {
        growth: BlockGrowth::Down,
        fit,
        ..label(content, x, y, FontSpec::new(CARD_FONT_BOLD, 68.0), white())
    };
    let list = |source, x: f64| ListSpec {
        source,
        limit: DEFAULT_LIMIT,
        slots: (0..5u8)
            .map(|i| SlotSpec::at(x, 1080.0 + 45.0 * f64::from(i)))
            .collect(),
        growth: BlockGrowth::Down,
        fit: TextFit::Truncate { max_chars: 15 },
        numbered: true,
        uppercase: false,
        font: FontSpec::new(CARD_FONT_BOLD, 36.0),
        style: white(),
    };

    PanelSpec {
        name: STORY_CARD_NAME.to_string(),
        background: Background::Fill {
            color: CARD_BACKGROUND,
            canvas: Canvas {
                width: 1080,
                height: 1920,
            },
        },
        images: vec![
            ImageSlot {
                source: ImageSource::Path {
                    path: "images/backdrop.png".to_string(),
                },
                origin: Point::new(100.0, 80.0),
                size: None,
            },
            ImageSlot {
                source: ImageSource::TopGameCover,
                origin: Point::new(268.0, 264.0),
                size: Some(Canvas {
                    width: 544,
                    height: 544,
                }),
            },
        ],
        labels: vec![
            heading("Top Players", 100.0, 1000.0),
            heading("Top Games", 560.0, 1000.0),
            heading("Total Plays", 100.0, 1440.0),
            heading("Top Mechanic", 560.0, 1440.0),
            big(
                LabelContent::Total {
                    total: TotalKind::Plays,
                },
                100.0,
                1520.0,
                TextFit::Line,
            ),
            big(LabelContent::TopMechanic, 560.0, 1520.0, TextFit::WordPerLine),
        ],
        lists: vec![
            list(
                RankSource::Players {
                    metric: PlayerMetric::Plays,
                },
                100.0,
            ),
            list(RankSource::Games, 560.0),
        ],
        bars: Vec::new(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/report/layouts.rs"]
mod tests;
