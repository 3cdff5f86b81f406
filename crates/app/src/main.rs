use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono_timeline_core::{
    ItemDescriptor, Key, LayoutMode, RecordingHost, SimulatedSurface, SlideshowState, TextDensity,
    TimelineConfig, TimelineEngine, TimelineError,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

type Engine = TimelineEngine<RecordingHost, SimulatedSurface>;

fn main() -> chrono_timeline_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            items,
            config,
            children,
            script,
        } => run_script(items.as_deref(), config.as_deref(), children, &script),
        Commands::Slideshow { items, config } => run_slideshow(&items, config.as_deref()),
    }
}

fn run_script(
    items: Option<&Path>,
    config: Option<&Path>,
    children: usize,
    script: &[String],
) -> chrono_timeline_core::Result<()> {
    let commands = script
        .iter()
        .map(|raw| raw.parse::<Command>())
        .collect::<chrono_timeline_core::Result<Vec<_>>>()?;

    let mut engine = build_engine(config)?;
    let descriptors = items.map(read_items).transpose()?;
    engine.load_items(descriptors.as_deref(), children);
    tracing::info!(
        timeline = engine.timeline_id(),
        items = engine.items().len(),
        mode = engine.mode().as_str(),
        "timeline loaded"
    );

    for command in commands {
        apply(&mut engine, &command);
        tracing::info!(
            ?command,
            active = ?engine.active_index(),
            slideshow = ?engine.slideshow_state(),
            "applied"
        );
    }
    engine.tick();

    report(&engine)
}

fn run_slideshow(items: &Path, config: Option<&Path>) -> chrono_timeline_core::Result<()> {
    let mut engine = build_engine(config)?;
    let descriptors = read_items(items)?;
    engine.load_items(Some(&descriptors), 0);

    engine.restart_slideshow();
    engine.tick();
    while engine.slideshow_state() == SlideshowState::Running {
        let Some(active) = engine.store().active_item().map(|item| item.id.clone()) else {
            break;
        };
        tracing::info!(item = %active, settle = ?engine.scroll_settle(), "dwell elapsed");
        engine.on_elapsed(&active);
        engine.tick();
    }

    report(&engine)
}

fn build_engine(config: Option<&Path>) -> chrono_timeline_core::Result<Engine> {
    let config = match config {
        Some(path) => TimelineConfig::load(path)?,
        None => TimelineConfig::default(),
    };
    TimelineEngine::new(config, RecordingHost::default(), SimulatedSurface::new())
}

fn read_items(path: &Path) -> chrono_timeline_core::Result<Vec<ItemDescriptor>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn apply(engine: &mut Engine, command: &Command) {
    match command {
        Command::Next => {
            engine.next();
        }
        Command::Previous => {
            engine.previous();
        }
        Command::First => {
            engine.first();
        }
        Command::Last => {
            engine.last();
        }
        Command::Jump(index) => {
            engine.jump_to(*index);
        }
        Command::Click => engine.pointer_down(),
        Command::KeyDown(key) => {
            engine.key_down(*key);
        }
        Command::KeyUp(key) => engine.key_up(*key),
        Command::Restart => engine.restart_slideshow(),
        Command::Pause => engine.pause(),
        Command::Elapsed => {
            if let Some(id) = engine.store().active_item().map(|item| item.id.clone()) {
                engine.on_elapsed(&id);
            }
        }
        Command::Tick => {
            engine.tick();
        }
        Command::Mode(mode) => engine.switch_mode(*mode),
        Command::Density(density) => engine.set_text_density(*density),
        Command::ScrollTo(offset) => {
            let metrics = if engine.mode().is_horizontal() {
                engine.surface_mut().scroll_horizontally_to(*offset)
            } else {
                engine.surface_mut().scroll_vertically_to(*offset)
            };
            engine.on_scroll(metrics);
        }
    }
}

fn report(engine: &Engine) -> chrono_timeline_core::Result<()> {
    let host = engine.host();
    let summary = serde_json::json!({
        "timeline": engine.timeline_id(),
        "active": engine.active_index(),
        "mode": engine.mode(),
        "slideshow": engine.slideshow_state(),
        "selections": host.selected,
        "scrollEnds": host.scroll_ends,
        "allCards": host.all_cards,
        "toolbar": engine.toolbar(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

/// One scripted step. Parsed from tokens such as `next`, `jump:3`,
/// `key:ArrowRight`, `mode:vertical` or `scroll:600`.
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Next,
    Previous,
    First,
    Last,
    Jump(usize),
    Click,
    KeyDown(Key),
    KeyUp(Key),
    Restart,
    Pause,
    Elapsed,
    Tick,
    Mode(LayoutMode),
    Density(TextDensity),
    ScrollTo(f32),
}

impl FromStr for Command {
    type Err = TimelineError;

    fn from_str(raw: &str) -> chrono_timeline_core::Result<Self> {
        let unknown = || TimelineError::UnknownCommand(raw.to_string());
        let (name, arg) = match raw.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (raw, None),
        };

        let command = match (name, arg) {
            ("next", None) => Self::Next,
            ("previous" | "prev", None) => Self::Previous,
            ("first", None) => Self::First,
            ("last", None) => Self::Last,
            ("click", None) => Self::Click,
            ("restart", None) => Self::Restart,
            ("pause", None) => Self::Pause,
            ("elapsed", None) => Self::Elapsed,
            ("tick", None) => Self::Tick,
            ("jump", Some(index)) => Self::Jump(index.parse().map_err(|_| unknown())?),
            ("key", Some(key)) => Self::KeyDown(Key::from_name(key)),
            ("keyup", Some(key)) => Self::KeyUp(Key::from_name(key)),
            ("mode", Some(mode)) => Self::Mode(mode.parse()?),
            ("density", Some("low" | "LOW")) => Self::Density(TextDensity::Low),
            ("density", Some("high" | "HIGH")) => Self::Density(TextDensity::High),
            ("scroll", Some(offset)) => Self::ScrollTo(offset.parse().map_err(|_| unknown())?),
            _ => return Err(unknown()),
        };
        Ok(command)
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless driver for the timeline engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load a timeline and apply a scripted sequence of intents.
    Run {
        /// JSON array of item descriptors. Without it, placeholder items are
        /// derived from `--children`.
        #[arg(short, long)]
        items: Option<PathBuf>,
        /// JSON timeline configuration.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Number of child placeholders when no item file is given.
        #[arg(long, default_value_t = 0)]
        children: usize,
        /// Steps such as `click next jump:3 key:End mode:vertical tick`.
        script: Vec<String>,
    },
    /// Play the slideshow from the first to the last item.
    Slideshow {
        /// JSON array of item descriptors.
        items: PathBuf,
        /// JSON timeline configuration.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}
