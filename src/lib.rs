//! bgwrapped turns a board-game play log into "year in review" images.
//!
//! # Pipeline overview
//!
//! 1. **Load**: `PlayLog` from the export JSON, plus an `EntityMap` of games and players either
//!    read from the entity cache or built by a `GameResolver`.
//! 2. **Aggregate**: `PlayLog + EntityMap -> Aggregate`, period-keyed counters per game, player
//!    and mechanic.
//! 3. **Rank**: `Aggregate + Period -> Vec<Ranked>`, descending by count with stable ties.
//! 4. **Compile**: `PanelSpec -> PanelPlan`, ranked rows bound to fixed slots and split into
//!    ordered effect layers.
//! 5. **Render**: `PanelPlan -> FrameRGBA` on the CPU, then written as PNG.
//!
//! Aggregation and plan compilation are pure; IO is confined to asset loading, the entity cache
//! and output writing. Frames are premultiplied RGBA8 until they are encoded.
#![forbid(unsafe_code)]

mod assets;
mod effects;
mod entity;
mod foundation;
mod layout;
mod playlog;
mod render;
mod report;
mod stats;

pub use assets::decode::{decode_image, decode_image_resized};
pub use assets::store::{AssetStore, PreparedFont, PreparedImage, normalize_rel_path};
pub use assets::text::{StoreMetrics, TextEngine};
pub use effects::blur::{BlurSpec, blur_layer};
pub use effects::composite::{PremulRgba8, over, over_in_place};
pub use entity::cache::{CachePolicy, EntityCache, JsonFileCache, load_or_resolve};
pub use entity::model::{
    CoverArt, EntityMap, Game, GameKind, GameMetadata, PLACEHOLDER_COVER, Player,
};
pub use entity::resolve::{
    GameResolver, MetadataFileResolver, ThrottledResolver, resolve_entities,
};
pub use foundation::core::{Canvas, Period, Point, Rect, Rgba8};
pub use foundation::error::{WrappedError, WrappedResult};
pub use layout::text::{
    BlockGrowth, ELLIPSIS, FontMetrics, FontMetricsSource, FontSpec, anchor_block, truncate, wrap,
};
pub use playlog::model::{LogGame, LogPlayer, PLAY_DATE_FORMAT, Play, PlayLog, PlayerScore};
pub use render::cpu::CpuRenderer;
pub use render::frame::FrameRGBA;
pub use render::plan::{
    DrawOp, LayerKind, LayerPass, PanelContext, PanelPlan, bar_length, compile_panel, fit_lines,
};
pub use report::assemble::{
    ReportRequest, ReportStyle, WrittenPanel, default_output_dir, generate_report, render_report,
    top_cover_source,
};
pub use report::layouts;
pub use report::spec::{
    Background, BarLabelSpec, BarSpec, HAlign, ImageSlot, ImageSource, LabelContent, LabelSpec,
    ListSpec, PanelSpec, ReportLayout, SlotSpec, StrokeSpec, TextEffect, TextFit, TextStyle,
    TotalKind,
};
pub use stats::aggregate::{
    Aggregate, GameTally, MechanicTally, PlayerMetric, PlayerTally, Totals, aggregate,
};
pub use stats::counter::PeriodCounter;
pub use stats::rank::{DEFAULT_LIMIT, RankEntry, RankSource, Ranked, rank_by};
