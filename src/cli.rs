use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use log::{LevelFilter, info, warn};
use serde::Serialize;
use simplelog::{Config, WriteLogger};

use boxcutter::panic_handler::initialize_panic_handler;
use boxcutter::pdf::MupdfBackend;
use boxcutter::pdf::geometry::{Point, to_surface_space};
use boxcutter::pdf::selection::PointerKind;
use boxcutter::settings;
use boxcutter::{BoxCutter, BoxCutterConfig, PointerEvent, Snippet, ViewStatus};

const RENDER_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Parser, Debug)]
#[command(name = "boxcutter", version, about = "Cut snippets and tables of contents out of PDF pages")]
struct Cli {
    /// Settings file to use instead of the per-user config.yaml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true, default_value = "boxcutter.log")]
    log_file: PathBuf,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print the document outline as a JSON table of contents
    Toc {
        file: PathBuf,

        /// Outline levels to keep
        #[arg(long)]
        depth: Option<usize>,
    },

    /// Cut rectangles out of a page and write them as PNG files
    Cut {
        file: PathBuf,

        /// 1-based page, clamped into range
        #[arg(long, default_value_t = 1)]
        page: i64,

        #[arg(long)]
        scale: Option<f64>,

        /// Corners in document units, X0,Y0,X1,Y1. Repeat for several cuts.
        #[arg(long = "rect", required = true, value_parser = parse_corners)]
        rects: Vec<Corners>,

        /// Combine all rectangles into one snippet
        #[arg(long)]
        combine: bool,

        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

#[derive(Clone, Copy, Debug)]
struct Corners {
    from: Point,
    to: Point,
}

fn parse_corners(raw: &str) -> Result<Corners, String> {
    let values = raw
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid coordinate in {raw:?}: {e}"))?;
    match values.as_slice() {
        [x0, y0, x1, y1] => Ok(Corners {
            from: Point::new(*x0, *y0),
            to: Point::new(*x1, *y1),
        }),
        _ => Err(format!("expected X0,Y0,X1,Y1, got {raw:?}")),
    }
}

/// One line of `snippets.json`
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ManifestEntry<'a> {
    id: &'a str,
    file: String,
    page_number: u32,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Settings decide the level, so start wide open and narrow once loaded
    WriteLogger::init(
        LevelFilter::Trace,
        Config::default(),
        File::create(&cli.log_file)
            .with_context(|| format!("Failed to create log file {:?}", cli.log_file))?,
    )?;
    initialize_panic_handler();

    match &cli.config {
        Some(path) => settings::load_settings_from_path(path),
        None => settings::load_settings(),
    }
    log::set_max_level(settings::get_log_level());
    info!("Starting boxcutter");

    let config = settings::component_config();
    match cli.command {
        Cmd::Toc { file, depth } => run_toc(&file, depth, config),
        Cmd::Cut {
            file,
            page,
            scale,
            rects,
            combine,
            out,
        } => run_cut(&file, page, scale, &rects, combine, &out, config),
    }
}

fn open(file: &Path, config: BoxCutterConfig) -> Result<BoxCutter<MupdfBackend>> {
    let bytes = fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let mut cutter = BoxCutter::new(MupdfBackend, config);
    cutter.load_document(Some(Arc::from(bytes)));
    if let ViewStatus::Error(e) = cutter.status() {
        bail!("{}: {e}", file.display());
    }
    Ok(cutter)
}

fn run_toc(file: &Path, depth: Option<usize>, mut config: BoxCutterConfig) -> Result<()> {
    if let Some(depth) = depth {
        config.outline_max_depth = depth;
    }
    let mut cutter = open(file, config)?;
    if cutter.extract_outline().is_none() {
        warn!("{} has no usable outline", file.display());
    }
    let json = serde_json::to_string_pretty(cutter.toc())?;
    println!("{json}");
    Ok(())
}

fn run_cut(
    file: &Path,
    page: i64,
    scale: Option<f64>,
    rects: &[Corners],
    combine: bool,
    out: &Path,
    mut config: BoxCutterConfig,
) -> Result<()> {
    if let Some(scale) = scale {
        config.default_scale = scale;
    }
    let mut cutter = open(file, config)?;
    if cutter.status() == ViewStatus::NoPages {
        bail!("{} has no pages", file.display());
    }
    cutter.jump_to_page(page);

    loop {
        match cutter.status() {
            ViewStatus::Page => break,
            ViewStatus::Error(e) => bail!("{}: {e}", file.display()),
            _ => {
                if !cutter.wait_for_render(RENDER_TIMEOUT) {
                    bail!("Timed out rendering page {}", cutter.current_page());
                }
            }
        }
    }
    info!(
        "Cutting {} rectangles from page {} at scale {}",
        rects.len(),
        cutter.current_page(),
        cutter.scale()
    );

    let scale = cutter.scale();
    let event = |p: Point| {
        let (x, y) = (to_surface_space(p.x, scale), to_surface_space(p.y, scale));
        PointerEvent::at(PointerKind::Mouse, x, y).with_shift(combine)
    };
    for corners in rects {
        cutter.pointer_down(&event(corners.from));
        cutter.pointer_move(&event(corners.to));
        cutter.pointer_up(&event(corners.to));
    }
    if combine {
        cutter.key_up();
    }

    write_snippets(cutter.snippets(), out)
}

fn write_snippets(snippets: &[Snippet], out: &Path) -> Result<()> {
    if snippets.is_empty() {
        bail!("No snippets were cut; rectangles may be too small or off the page");
    }
    fs::create_dir_all(out).with_context(|| format!("Failed to create {}", out.display()))?;

    let mut manifest = Vec::with_capacity(snippets.len());
    for (i, snippet) in snippets.iter().enumerate() {
        let name = format!("snippet-{}-p{}.png", i + 1, snippet.page_number);
        let path = out.join(&name);
        fs::write(&path, &snippet.image)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("{}", path.display());
        manifest.push(ManifestEntry {
            id: &snippet.id,
            file: name,
            page_number: snippet.page_number,
            x: snippet.x,
            y: snippet.y,
            width: snippet.width,
            height: snippet.height,
        });
    }

    let path = out.join("snippets.json");
    fs::write(&path, serde_json::to_string_pretty(&manifest)?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {} snippets to {}", snippets.len(), out.display());
    Ok(())
}
