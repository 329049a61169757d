use std::path::{Path, PathBuf};

use crate::{
    assets::{store::AssetStore, text::StoreMetrics},
    entity::model::CoverArt,
    foundation::{
        core::Period,
        error::{WrappedError, WrappedResult},
    },
    render::{
        cpu::CpuRenderer,
        frame::FrameRGBA,
        plan::{PanelContext, compile_panel},
    },
    report::{
        layouts,
        spec::{Background, ImageSource, PanelSpec, ReportLayout},
    },
    stats::{aggregate::Aggregate, rank::RankSource},
};

/// Which built-in layout to render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStyle {
    /// One image per panel.
    #[default]
    Panels,
    /// A single combined card.
    StoryCard,
}

impl ReportStyle {
    pub fn layout(self) -> ReportLayout {
        match self {
            Self::Panels => layouts::panels(),
            Self::StoryCard => layouts::story_card(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ReportRequest {
    pub period: Period,
    pub output_dir: PathBuf,
    /// Root for templates, fonts and cover art.
    pub assets_root: PathBuf,
    pub layout: ReportLayout,
}

impl ReportRequest {
    pub fn new(period: Period, assets_root: impl Into<PathBuf>, style: ReportStyle) -> Self {
        Self {
            period,
            output_dir: default_output_dir(period),
            assets_root: assets_root.into(),
            layout: style.layout(),
        }
    }
}

/// One panel written to disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrittenPanel {
    pub name: String,
    pub path: PathBuf,
    pub digest: u64,
}

/// `wrapped2023` for a year, `wrappedAllTime` otherwise.
pub fn default_output_dir(period: Period) -> PathBuf {
    match period {
        Period::Year(y) => PathBuf::from(format!("wrapped{y}")),
        Period::AllTime => PathBuf::from("wrappedAllTime"),
    }
}

/// Cover art for the most played game of `period`, as an asset path.
///
/// Placeholder games use the bundled placeholder image. Resolved games use `covers/<id>.png`
/// or `covers/<id>.jpg` under the asset root; neither existing is an asset error.
pub fn top_cover_source(
    aggregate: &Aggregate,
    period: Period,
    assets: &AssetStore,
) -> WrappedResult<Option<String>> {
    let Some(top) = aggregate.rank(RankSource::Games, period, 1).into_iter().next() else {
        return Ok(None);
    };
    let game = &aggregate
        .games
        .get(top.index)
        .ok_or_else(|| WrappedError::reference(format!("ranked game index {}", top.index)))?
        .game;
    match game.cover_art() {
        CoverArt::Local(path) => Ok(Some(path)),
        CoverArt::Remote { bgg_id, uri } => {
            let png = format!("covers/{bgg_id}.png");
            let jpg = format!("covers/{bgg_id}.jpg");
            assets
                .find_existing(&[png.as_str(), jpg.as_str()])
                .map(|p| Some(p.to_string()))
                .ok_or_else(|| {
                    WrappedError::asset(format!(
                        "no cover art for '{}' (expected {png} or {jpg}, download {uri})",
                        game.name
                    ))
                })
        }
    }
}

fn uses_top_cover(layout: &ReportLayout) -> bool {
    layout
        .panels
        .iter()
        .flat_map(|p| &p.images)
        .any(|i| i.source == ImageSource::TopGameCover)
}

fn prepare_panel_assets(
    assets: &mut AssetStore,
    panel: &PanelSpec,
    top_cover: Option<&str>,
) -> WrappedResult<()> {
    if let Background::Image { source } = &panel.background {
        assets.load_image(source)?;
    }
    for slot in &panel.images {
        let source = match &slot.source {
            ImageSource::Path { path } => path.as_str(),
            ImageSource::TopGameCover => match top_cover {
                Some(p) => p,
                None => continue,
            },
        };
        match slot.size {
            Some(size) => assets.load_image_resized(source, size.width, size.height)?,
            None => assets.load_image(source)?,
        }
    }
    for font in panel.font_sources() {
        assets.load_font(font)?;
    }
    Ok(())
}

/// Render every panel of `layout` in order without touching the output directory.
///
/// All templates and fonts are loaded before the first panel is drawn, so a missing asset
/// fails the run before any work is done.
pub fn render_report(
    layout: &ReportLayout,
    aggregate: &Aggregate,
    period: Period,
    assets_root: &Path,
) -> WrappedResult<Vec<(String, FrameRGBA)>> {
    layout.validate()?;
    let mut assets = AssetStore::new(assets_root);
    let top_cover = if uses_top_cover(layout) {
        top_cover_source(aggregate, period, &assets)?
    } else {
        None
    };
    for panel in &layout.panels {
        prepare_panel_assets(&mut assets, panel, top_cover.as_deref())?;
    }

    let mut renderer = CpuRenderer::new();
    let mut out = Vec::with_capacity(layout.panels.len());
    for panel in &layout.panels {
        let ctx = PanelContext {
            aggregate,
            period,
            assets: &assets,
            top_cover: top_cover.as_deref(),
        };
        let plan = compile_panel(
            panel,
            &ctx,
            &mut StoreMetrics {
                store: &assets,
                engine: renderer.text_engine(),
            },
        )?;
        let frame = renderer.render(&plan, &assets)?;
        out.push((panel.name.clone(), frame));
    }
    Ok(out)
}

/// Render the requested report and write one PNG per panel into the output directory.
#[tracing::instrument(skip_all, fields(period = %req.period, out = %req.output_dir.display()))]
pub fn generate_report(req: &ReportRequest, aggregate: &Aggregate) -> WrappedResult<Vec<WrittenPanel>> {
    let frames = render_report(&req.layout, aggregate, req.period, &req.assets_root)?;

    std::fs::create_dir_all(&req.output_dir).map_err(|e| {
        WrappedError::asset(format!(
            "create output dir '{}': {e}",
            req.output_dir.display()
        ))
    })?;

    let mut written = Vec::with_capacity(frames.len());
    for (name, frame) in frames {
        let path = req.output_dir.join(format!("{name}.png"));
        frame.save_png(&path)?;
        let digest = frame.digest();
        tracing::info!(
            panel = %name,
            path = %path.display(),
            digest = %format!("{digest:016x}"),
            "wrote panel"
        );
        written.push(WrittenPanel { name, path, digest });
    }
    Ok(written)
}

#[cfg(test)]
#[path = "../../tests/unit/report/assemble.rs"]
mod tests;
