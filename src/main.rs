mod config;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use plan::doc::{DocStore, Element, FloorPlan};
use plan::editor::EditorCore;
use plan::geom::{Point, Viewport};
use plan::hit::{booth_at_screen, element_at_screen};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, ConfigError, parse_cell_size};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("cannot read {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("invalid floor plan JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no booth with id or number '{0}'")]
    UnknownBooth(String),
}

#[derive(Parser, Debug)]
#[command(name = "boothmap", about = "Floor-plan booth lookup and routing")]
struct Cli {
    /// Routing cell size in canvas units. Overrides BOOTHMAP_CELL_SIZE.
    #[arg(long, global = true)]
    cell_size: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct PlanArg {
    /// Floor-plan JSON file.
    #[arg(long)]
    plan: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List booths, optionally filtered.
    Booths {
        #[command(flatten)]
        plan: PlanArg,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Compute the walking route between two booths.
    Route {
        #[command(flatten)]
        plan: PlanArg,
        /// Start booth id or number.
        #[arg(long)]
        from: String,
        /// End booth id or number.
        #[arg(long)]
        to: String,
    },
    /// Report the element under a screen point.
    Pick {
        #[command(flatten)]
        plan: PlanArg,
        #[arg(long, allow_negative_numbers = true)]
        x: f64,
        #[arg(long, allow_negative_numbers = true)]
        y: f64,
        #[arg(long, default_value_t = 1.0)]
        zoom: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        offset_x: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        offset_y: f64,
    },
}

#[derive(Debug, Serialize)]
struct RouteReport {
    start: String,
    end: String,
    points: Vec<f64>,
    length: f64,
}

fn main() -> Result<(), CliError> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("warning: ignoring .env: {e}");
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env()?;
    if let Some(raw) = cli.cell_size.as_deref() {
        config.cell_size = Some(parse_cell_size("--cell-size", raw)?);
    }

    match cli.command {
        Command::Booths { plan, search, category } => {
            let editor = open(&plan.plan, &config)?;
            run_booths(&editor.doc, search.as_deref(), category.as_deref());
            Ok(())
        }
        Command::Route { plan, from, to } => {
            let mut editor = open(&plan.plan, &config)?;
            run_route(&mut editor, &from, &to)
        }
        Command::Pick { plan, x, y, zoom, offset_x, offset_y } => {
            let mut editor = open(&plan.plan, &config)?;
            editor.viewport = Viewport { offset_x, offset_y, zoom };
            run_pick(&editor, Point::new(x, y));
            Ok(())
        }
    }
}

fn open(path: &Path, config: &AppConfig) -> Result<EditorCore, CliError> {
    let raw = fs::read_to_string(path).map_err(|source| CliError::Io { path: path.to_owned(), source })?;
    let plan: FloorPlan = serde_json::from_str(&raw)?;
    let mut editor = EditorCore::with_config(config.route_config(), config.history_depth);
    editor.load(plan);
    info!(path = %path.display(), elements = editor.doc.len(), "plan opened");
    Ok(editor)
}

fn run_booths(doc: &DocStore, search: Option<&str>, category: Option<&str>) {
    let mut ids: Option<Vec<String>> = None;
    if let Some(term) = search {
        ids = Some(doc.search_booths(term));
    }
    if let Some(cat) = category {
        let in_cat = doc.booths_by_category(cat);
        ids = Some(match ids {
            Some(found) => found.into_iter().filter(|id| in_cat.contains(id)).collect(),
            None => in_cat,
        });
    }
    for (element, booth) in doc.booths() {
        if ids.as_ref().is_some_and(|keep| !keep.contains(&element.id)) {
            continue;
        }
        let company = booth.exhibitor.as_ref().map_or("-", |ex| ex.company_name.as_str());
        println!("{}\t{:?}\t{}\t{}", booth.number, booth.status, company, element.id);
    }
}

fn run_route(editor: &mut EditorCore, from: &str, to: &str) -> Result<(), CliError> {
    let start = booth_id(&editor.doc, from)?;
    let end = booth_id(&editor.doc, to)?;

    editor.toggle_path_mode();
    editor.route.set_start(&editor.doc, &start);
    editor.route.set_end(&editor.doc, &end);

    let report = RouteReport { start, end, points: editor.path_points(), length: editor.route.path_length() };
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}

fn booth_id(doc: &DocStore, id_or_number: &str) -> Result<String, CliError> {
    doc.find_booth(id_or_number)
        .map(|e| e.id.clone())
        .ok_or_else(|| CliError::UnknownBooth(id_or_number.to_owned()))
}

fn run_pick(editor: &EditorCore, screen_pt: Point) {
    match element_at_screen(&editor.doc, &editor.viewport, screen_pt) {
        Some(element) => println!("{}", describe(element)),
        None => println!("nothing"),
    }
    if let Some(booth) = booth_at_screen(&editor.doc, &editor.viewport, screen_pt) {
        println!("booth: {}", describe(booth));
    }
}

fn describe(element: &Element) -> String {
    let label = element.as_booth().map_or_else(String::new, |b| format!(" {}", b.number));
    format!("{:?}{} {} at ({}, {}) {}x{}", element.kind(), label, element.id, element.x, element.y, element.width, element.height)
}
