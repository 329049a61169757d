use std::path::PathBuf;

use super::*;
use crate::{
    entity::model::{EntityMap, Game, GameMetadata, Player},
    foundation::core::{Canvas, Point, Rgba8},
    playlog::model::{Play, PlayLog, PlayerScore},
    report::spec::{BarSpec, ImageSlot},
    stats::{aggregate::aggregate, rank::DEFAULT_LIMIT},
};

fn fixture(top_is_placeholder: bool) -> Aggregate {
    let entities = EntityMap {
        games: vec![
            Game::resolved(
                1,
                "Azul",
                230802,
                GameMetadata {
                    image: "https://example.invalid/azul.jpg".to_string(),
                    mechanics: vec!["Tile Placement".to_string()],
                },
            ),
            Game::placeholder(2, "Homebrew"),
        ],
        players: vec![Player {
            id: 10,
            name: "Ada".to_string(),
        }],
    };
    let (top, other) = if top_is_placeholder { (2, 1) } else { (1, 2) };
    let play = |game| Play {
        play_date: "2023-05-05 18:30:00".to_string(),
        game_ref_id: game,
        ignored: false,
        player_scores: vec![PlayerScore {
            player_ref_id: 10,
            winner: true,
            start_player: false,
        }],
    };
    let log = PlayLog {
        plays: vec![play(top), play(top), play(other)],
        ..PlayLog::default()
    };
    aggregate(&log, &entities).unwrap()
}

fn asset_root(name: &str) -> PathBuf {
    let root = PathBuf::from("target").join(name);
    let _ = std::fs::remove_dir_all(&root);
    std::fs::create_dir_all(root.join("covers")).unwrap();
    std::fs::create_dir_all(root.join("images")).unwrap();
    root
}

fn write_png(path: PathBuf, w: u32, h: u32, rgba: [u8; 4]) {
    image::RgbaImage::from_pixel(w, h, image::Rgba(rgba))
        .save(path)
        .unwrap();
}

fn write_jpeg(path: PathBuf, w: u32, h: u32, rgb: [u8; 3]) {
    image::RgbImage::from_pixel(w, h, image::Rgb(rgb))
        .save(path)
        .unwrap();
}

/// Text-free panel: solid background, the top cover and a bar chart.
fn font_free_layout() -> ReportLayout {
    ReportLayout {
        panels: vec![PanelSpec {
            name: "bars".to_string(),
            background: Background::Fill {
                color: Rgba8::rgb(20, 20, 20),
                canvas: Canvas {
                    width: 64,
                    height: 48,
                },
            },
            images: vec![ImageSlot {
                source: ImageSource::TopGameCover,
                origin: Point::new(0.0, 0.0),
                size: Some(Canvas {
                    width: 8,
                    height: 8,
                }),
            }],
            labels: Vec::new(),
            lists: Vec::new(),
            bars: vec![BarSpec {
                source: RankSource::Games,
                limit: DEFAULT_LIMIT,
                origins: vec![Point::new(10.0, 20.0), Point::new(10.0, 30.0)],
                axis_px: 40.0,
                thickness_px: 6.0,
                fill: Rgba8::rgb(251, 194, 0),
                outline: None,
                label: None,
            }],
        }],
    }
}

#[test]
fn default_output_dirs_name_the_period() {
    assert_eq!(default_output_dir(Period::Year(2023)), PathBuf::from("wrapped2023"));
    assert_eq!(default_output_dir(Period::AllTime), PathBuf::from("wrappedAllTime"));
}

#[test]
fn styles_select_builtin_layouts() {
    assert_eq!(ReportStyle::Panels.layout().panels.len(), 5);
    assert_eq!(ReportStyle::StoryCard.layout().panels.len(), 1);
    let req = ReportRequest::new(Period::Year(2024), "assets", ReportStyle::StoryCard);
    assert_eq!(req.output_dir, PathBuf::from("wrapped2024"));
    assert_eq!(req.assets_root, PathBuf::from("assets"));
}

#[test]
fn placeholder_top_game_uses_bundled_cover() {
    let agg = fixture(true);
    let assets = AssetStore::new(asset_root("assemble_cover_placeholder"));
    assert_eq!(
        top_cover_source(&agg, Period::Year(2023), &assets).unwrap(),
        Some("images/none_game.png".to_string())
    );
}

#[test]
fn resolved_top_game_uses_local_cover_file() {
    let agg = fixture(false);
    let root = asset_root("assemble_cover_resolved");
    let assets = AssetStore::new(&root);

    let err = top_cover_source(&agg, Period::Year(2023), &assets).unwrap_err();
    assert!(matches!(err, WrappedError::Asset(_)));
    assert!(
        err.to_string().contains("https://example.invalid/azul.jpg"),
        "{err}"
    );

    write_jpeg(root.join("covers").join("230802.jpg"), 2, 2, [9, 9, 9]);
    assert_eq!(
        top_cover_source(&agg, Period::Year(2023), &assets).unwrap(),
        Some("covers/230802.jpg".to_string())
    );
    let mut decoded = AssetStore::new(&root);
    decoded.load_image("covers/230802.jpg").unwrap();
    let cover = decoded.image("covers/230802.jpg").unwrap();
    assert_eq!((cover.width, cover.height), (2, 2));
    assert_eq!(cover.rgba8_premul[3], 255);

    write_png(root.join("covers").join("230802.png"), 2, 2, [9, 9, 9, 255]);
    assert_eq!(
        top_cover_source(&agg, Period::Year(2023), &assets).unwrap(),
        Some("covers/230802.png".to_string())
    );

    assert_eq!(top_cover_source(&agg, Period::Year(2000), &assets).unwrap(), None);
}

#[test]
fn missing_templates_abort_before_rendering() {
    let agg = fixture(true);
    let root = asset_root("assemble_missing_templates");
    let err = render_report(&layouts::panels(), &agg, Period::Year(2023), &root).unwrap_err();
    assert!(matches!(err, WrappedError::Asset(_)));
    assert!(err.to_string().contains("title.png"), "{err}");
}

#[test]
fn font_free_panel_renders_cover_and_bars() {
    let agg = fixture(true);
    let root = asset_root("assemble_font_free");
    write_png(root.join("images").join("none_game.png"), 16, 16, [0, 0, 255, 255]);

    let frames =
        render_report(&font_free_layout(), &agg, Period::Year(2023), &root).unwrap();
    assert_eq!(frames.len(), 1);
    let (name, frame) = &frames[0];
    assert_eq!(name, "bars");

    // Cover resized to 8x8 at the origin.
    let cover = frame.pixel(3, 3).unwrap();
    assert!(cover[0] <= 4 && cover[2] >= 250 && cover[3] >= 250, "{cover:?}");
    assert_eq!(frame.pixel(12, 3), Some([20, 20, 20, 255]));
    // Top bar spans the full 40px axis, the runner-up half of it.
    assert_eq!(frame.pixel(48, 22), Some([251, 194, 0, 255]));
    assert_eq!(frame.pixel(28, 32), Some([251, 194, 0, 255]));
    assert_eq!(frame.pixel(32, 32), Some([20, 20, 20, 255]));
}

#[test]
fn generate_report_writes_fixed_names_and_is_repeatable() {
    let agg = fixture(true);
    let root = asset_root("assemble_generate");
    write_png(root.join("images").join("none_game.png"), 16, 16, [0, 0, 255, 255]);

    let req = ReportRequest {
        period: Period::Year(2023),
        output_dir: root.join("out").join("wrapped2023"),
        assets_root: root.clone(),
        layout: font_free_layout(),
    };
    let first = generate_report(&req, &agg).unwrap();
    let second = generate_report(&req, &agg).unwrap();

    assert_eq!(first.len(), 1);
    assert_eq!(first[0].path, req.output_dir.join("bars.png"));
    assert!(first[0].path.is_file());
    assert_eq!(first, second);

    let written = image::open(&first[0].path).unwrap().to_rgba8();
    assert_eq!(written.dimensions(), (64, 48));
    assert!(written.get_pixel(3, 3).0[2] >= 250);
}

#[test]
fn unwritable_output_dir_is_an_asset_error() {
    let agg = fixture(true);
    let root = asset_root("assemble_unwritable");
    write_png(root.join("images").join("none_game.png"), 4, 4, [0, 0, 255, 255]);
    let blocker = root.join("blocker");
    std::fs::write(&blocker, b"file, not a directory").unwrap();

    let req = ReportRequest {
        period: Period::Year(2023),
        output_dir: blocker.join("out"),
        assets_root: root,
        layout: font_free_layout(),
    };
    assert!(matches!(
        generate_report(&req, &agg),
        Err(WrappedError::Asset(_))
    ));
}
