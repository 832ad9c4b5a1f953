use std::fs::{self, File};
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;

use corsair_game::{CardCatalog, DemoEngine, GameStateSpec, SimulationMode};
use corsair_sim::{
    BatchConfig, SimulateError, reports, simulate, trade_row_candidates,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Authority-over-time curve plus overall win rate
    Standard,
    /// Win-rate delta per purchasable trade-row card
    BuyImpact,
    /// Win rate per candidate bot policy
    BotComparison,
}

impl ModeArg {
    const fn mode(self) -> SimulationMode {
        match self {
            Self::Standard => SimulationMode::Standard,
            Self::BuyImpact => SimulationMode::BuyImpact,
            Self::BotComparison => SimulationMode::BotComparison,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "corsair-sim", version)]
#[command(about = "Batch playout simulator for in-progress Corsair duels")]
struct Args {
    /// Path to a JSON game-state description
    #[arg(long)]
    state: PathBuf,

    /// Simulation mode
    #[arg(long, value_enum, default_value_t = ModeArg::Standard)]
    mode: ModeArg,

    /// Number of playouts (defaults to the mode's usual batch size)
    #[arg(long)]
    trials: Option<u32>,

    /// Master seed; per-trial seeds are derived from it
    #[arg(long, default_value_t = 1337)]
    seed: u64,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["console", "json", "markdown"])]
    report: String,

    /// Optional path to write the report instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let json = fs::read_to_string(&args.state)
        .with_context(|| format!("failed to read {}", args.state.display()))?;
    let spec: GameStateSpec = serde_json::from_str(&json)
        .with_context(|| format!("failed to parse {}", args.state.display()))?;

    let catalog = CardCatalog::builtin();
    let mode = args.mode.mode();
    let trials = args.trials.unwrap_or(mode.default_trials());

    let mut config = BatchConfig::new(mode, trials, args.seed);
    if mode == SimulationMode::BuyImpact {
        config = config.with_buy_candidates(trade_row_candidates(&spec, catalog));
    }

    let engine = DemoEngine::default();
    let start_time = Instant::now();

    match simulate(&spec, &config, catalog, &engine) {
        Ok(report) => {
            let duration = start_time.elapsed();
            let mut output_target = OutputTarget::new(args.output.clone())?;
            match args.report.as_str() {
                "json" => reports::generate_json_report(&mut output_target, &report)?,
                "markdown" => reports::generate_markdown_report(&mut output_target, &report)?,
                _ => reports::generate_console_report(&mut output_target, &report, duration)?,
            }
            output_target.flush_inner()?;
            Ok(())
        }
        Err(SimulateError::Invalid(errors)) => {
            eprintln!("{}", "❌ The game state did not validate:".red().bold());
            for error in &errors {
                eprintln!("  • {}", error.message.red());
            }
            std::process::exit(1);
        }
    }
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
