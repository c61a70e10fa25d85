//! Standalone terminal binary for Phosphor.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing::info;

use phosphor_audio::AudioDirector;
use phosphor_engine::{FileStore, GameController, Settings};
use phosphor_story::{StoryGraph, demo_story};
use phosphor_tui::app::App;

#[derive(Parser)]
#[command(
    name = "phosphor",
    about = "A terminal player for branching stories with timed choices",
    version
)]
struct Args {
    /// Story graph JSON file. Omit to play the built-in story.
    story: Option<PathBuf>,

    /// Directory for the save file, settings, and log
    #[arg(long, default_value = ".phosphor")]
    data: PathBuf,

    /// Directory searched for music and sound assets
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    /// Check the story graph for integrity issues and exit
    #[arg(long)]
    validate: bool,
}

fn main() {
    let args = Args::parse();

    let graph = match load_story(args.story.as_deref()) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    if args.validate {
        let issues = graph.validate();
        if issues.is_empty() {
            println!("ok: {} nodes, no integrity issues", graph.len());
            return;
        }
        for issue in &issues {
            eprintln!("integrity: {issue}");
        }
        process::exit(1);
    }

    init_logging(&args.data);
    info!(nodes = graph.len(), "story loaded");

    let settings = Settings::load_from(&args.data);
    let save = FileStore::new(args.data.join("save.json"));
    let audio = AudioDirector::new(open_backend(&args.assets));

    let controller = GameController::new(graph, Box::new(save), audio);
    let app = App::new(controller, settings, Some(args.data.clone()));

    if let Err(e) = phosphor_tui::terminal::run(app) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

/// Read and parse a story file, or fall back to the built-in story.
fn load_story(path: Option<&Path>) -> Result<StoryGraph, String> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
            StoryGraph::from_json(&json).map_err(|e| format!("{}: {e}", path.display()))
        }
        None => Ok(demo_story()),
    }
}

/// Log to a file in the data directory. The terminal is busy drawing frames,
/// so nothing may write to stdout or stderr while the app runs.
fn init_logging(data: &Path) {
    if fs::create_dir_all(data).is_err() {
        return;
    }
    let Ok(file) = fs::File::create(data.join("phosphor.log")) else {
        return;
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}

#[cfg(feature = "audio")]
fn open_backend(assets: &Path) -> Box<dyn phosphor_audio::Backend> {
    match phosphor_audio::RodioBackend::new(assets) {
        Ok(backend) => Box::new(backend),
        Err(e) => {
            // Silence over failure: the game plays fine without a device.
            eprintln!("audio unavailable: {e}");
            Box::new(phosphor_audio::NullBackend)
        }
    }
}

#[cfg(not(feature = "audio"))]
fn open_backend(_assets: &Path) -> Box<dyn phosphor_audio::Backend> {
    Box::new(phosphor_audio::NullBackend)
}
