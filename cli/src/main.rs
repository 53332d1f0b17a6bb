use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

use clap::{Args, Parser, Subcommand};
use marquee::{
    CaptureLossPolicy, CornerResolution, ElementBox, ElementId, EngineConfig, GridConfig, GridLayout, ModifierKey,
    SelectionEngine, SelectionSet,
};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod script;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("io failed: {0}")]
    Io(#[from] io::Error),
    #[error("invalid event on line {line}: {source}")]
    Script { line: usize, source: serde_json::Error },
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("element {id} is outside the grid ({count} cells)")]
    UnknownElement { id: ElementId, count: usize },
}

#[derive(Parser, Debug)]
#[command(name = "marquee", about = "Replay drag-to-select scripts against a computed element grid")]
struct Cli {
    #[command(flatten)]
    grid: GridArgs,

    #[command(subcommand)]
    command: Command,
}

/// Grid overrides. Unset flags fall back to `MARQUEE_GRID_*`, then defaults.
#[derive(Args, Debug)]
struct GridArgs {
    #[arg(long, global = true, help = "Number of cells")]
    count: Option<usize>,

    #[arg(long, global = true, help = "Cell edge length in px")]
    cell: Option<f64>,

    #[arg(long, global = true, help = "Gap between cells in px")]
    gap: Option<f64>,

    #[arg(long, global = true, help = "Container padding in px")]
    padding: Option<f64>,

    #[arg(long, global = true, help = "Container width in px")]
    max_width: Option<f64>,
}

impl GridArgs {
    fn resolve(&self) -> GridConfig {
        let mut config = GridConfig::from_env();
        if let Some(count) = self.count {
            config.count = count;
        }
        if let Some(cell) = self.cell {
            config.cell_size = cell;
        }
        if let Some(gap) = self.gap {
            config.gap = gap;
        }
        if let Some(padding) = self.padding {
            config.padding = padding;
        }
        if let Some(max_width) = self.max_width {
            config.max_width = max_width;
        }
        config
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Feed a JSON-lines event script to the engine and print the committed selection.
    Replay(ReplayArgs),
    /// Print the grid dimensions, or one element's box.
    Layout {
        #[arg(long)]
        id: Option<ElementId>,
    },
}

#[derive(Args, Debug)]
struct ReplayArgs {
    #[arg(help = "Script file path, or - for stdin")]
    script: String,

    #[arg(long, default_value_t = false, help = "Print every emitted action as a JSON line")]
    actions: bool,

    #[arg(long, help = "Merge modifier (shift, ctrl, alt, meta)")]
    merge_modifier: Option<ModifierKey>,

    #[arg(long, help = "Capture loss policy (commit, cancel)")]
    capture_loss: Option<CaptureLossPolicy>,

    #[arg(long, help = "Corner resolution (anchored, previous-edge)")]
    corner: Option<CornerResolution>,
}

impl ReplayArgs {
    fn engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig::from_env();
        if let Some(modifier) = self.merge_modifier {
            config.merge_modifier = modifier;
        }
        if let Some(policy) = self.capture_loss {
            config.capture_loss = policy;
        }
        if let Some(rule) = self.corner {
            config.corner_resolution = rule;
        }
        config
    }
}

#[derive(Serialize)]
struct Summary<'a> {
    committed: &'a SelectionSet,
    count: usize,
}

#[derive(Serialize)]
struct GridSummary {
    count: usize,
    columns: usize,
    rows: usize,
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let grid = GridLayout::new(cli.grid.resolve());

    match cli.command {
        Command::Replay(args) => replay(grid, &args),
        Command::Layout { id } => layout(&grid, id),
    }
}

fn replay(grid: GridLayout, args: &ReplayArgs) -> Result<(), CliError> {
    let events = script::read_script(open_input(&args.script)?)?;
    let mut engine = SelectionEngine::with_config(grid, args.engine_config());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for event in &events {
        let actions = event.apply(&mut engine);
        if args.actions {
            for action in &actions {
                write_json_line(&mut out, action)?;
            }
        }
    }

    if engine.is_dragging() {
        warn!("script ended mid-drag; candidates were not committed");
    }
    info!(events = events.len(), committed = engine.committed().len(), "replay finished");

    let committed = engine.committed();
    write_json_line(&mut out, &Summary { committed, count: committed.len() })
}

fn layout(grid: &GridLayout, id: Option<ElementId>) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let Some(id) = id else {
        let summary = GridSummary { count: grid.config().count, columns: grid.columns(), rows: grid.rows() };
        return write_json_line(&mut out, &summary);
    };
    let Some(bounds) = grid.cell(id) else {
        return Err(CliError::UnknownElement { id, count: grid.config().count });
    };
    write_json_line(&mut out, &ElementBox::new(id, bounds))
}

fn open_input(path: &str) -> Result<Box<dyn BufRead>, CliError> {
    if path == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    Ok(Box::new(BufReader::new(File::open(path)?)))
}

fn write_json_line<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<(), CliError> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
