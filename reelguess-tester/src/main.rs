mod common;
mod logic;
mod play;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use reelguess_game::{DateKey, GameMode, MemoryStorage};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use common::scenario::{get_scenario, list_scenarios};
use common::{FileStorage, split_csv};
use logic::{
    GameTester, LogicTester, ScenarioResult, TesterAssets, resolve_date_inputs,
    resolve_seed_inputs,
};
use play::{PlayRequest, play_session};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RunMode {
    /// Run logic scenarios across dates and seeds
    Scenarios,
    /// Play the daily puzzle with the given guesses
    Daily,
    /// Play a seeded random puzzle with the given guesses
    Random,
}

#[derive(Debug, Parser)]
#[command(name = "reelguess-tester", version)]
#[command(about = "Automated QA and replay tooling for the Reelguess movie-guessing engine")]
struct Args {
    /// What to run: logic scenarios, or a daily/random play session
    #[arg(long, value_enum, default_value_t = RunMode::Scenarios)]
    mode: RunMode,

    /// Day to play in daily mode (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    date: Option<String>,

    /// Session seed in random mode (defaults to a fresh seed)
    #[arg(long)]
    seed: Option<String>,

    /// Titles to guess in play modes (comma-separated)
    #[arg(long, default_value = "")]
    guesses: String,

    /// Scenarios to run (comma-separated, or "all")
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Dates to run scenarios on (comma-separated; "today" or ranges A..B)
    #[arg(long, default_value = "today")]
    dates: String,

    /// Seeds to run (comma-separated; decimal, 0x hex, or "random")
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per date and seed
    #[arg(long, default_value_t = 3)]
    iterations: usize,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Movie bank fixture to use instead of the bundled one
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Directory for persisted play sessions (in-memory when omitted)
    #[arg(long)]
    state_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    let assets = Arc::new(load_assets(&args)?);

    match args.mode {
        RunMode::Scenarios => {
            let results = run_scenarios(&args, &assets)?;
            if results.iter().any(|r| !r.passed) {
                std::process::exit(1);
            }
        }
        RunMode::Daily | RunMode::Random => run_play(&args, &assets)?,
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:20} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🎬 Reelguess Automated Tester".bright_cyan().bold());
    println!("{}", "=============================".cyan());
}

fn load_assets(args: &Args) -> Result<TesterAssets> {
    match &args.catalog {
        Some(path) => TesterAssets::from_path(path),
        None => TesterAssets::load_default(),
    }
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut scenarios = split_csv(scenarios_arg);
    if scenarios.iter().any(|s| s == "all") {
        scenarios.retain(|s| s != "all");
        for (key, _) in list_scenarios() {
            if !scenarios.iter().any(|s| s == key) {
                scenarios.push(key.to_string());
            }
        }
    }
    scenarios
}

fn run_scenarios(args: &Args, assets: &Arc<TesterAssets>) -> Result<Vec<ScenarioResult>> {
    let start_time = Instant::now();
    let scenarios = expand_scenarios(&args.scenarios);
    let dates = resolve_date_inputs(&split_csv(&args.dates))?;
    let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;
    let game_tester = GameTester::new(Arc::clone(assets), args.verbose);

    println!("{}", "🧠 Running Logic Tests".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());
    log::info!(
        "{} scenarios x {} dates x {} seeds over {} movies",
        scenarios.len(),
        dates.len(),
        seeds.len(),
        game_tester.catalog().len()
    );

    let logic_tester = LogicTester::new(game_tester);
    let mut results = Vec::new();
    for scenario_name in &scenarios {
        if let Some(scenario) = get_scenario(scenario_name) {
            results.extend(logic_tester.run_scenario(&scenario, &dates, &seeds, args.iterations));
        } else {
            eprintln!("⚠️  Unknown scenario: {}", scenario_name.yellow());
        }
    }

    write_reports(args, &results, start_time)?;
    Ok(results)
}

fn parse_play_date(raw: Option<&str>) -> Result<DateKey> {
    match raw {
        None => Ok(DateKey::today()),
        Some(raw) if raw.eq_ignore_ascii_case("today") => Ok(DateKey::today()),
        Some(raw) => raw
            .parse()
            .with_context(|| format!("invalid --date (expected YYYY-MM-DD): {raw}")),
    }
}

fn parse_play_seed(raw: Option<&str>) -> Result<u64> {
    let tokens: Vec<String> = raw.map(|s| vec![s.to_string()]).unwrap_or_default();
    if tokens.is_empty() {
        return Ok(reelguess_game::generate_session_seed());
    }
    let seeds = resolve_seed_inputs(&tokens)?;
    seeds
        .first()
        .copied()
        .context("--seed did not resolve to a value")
}

fn build_play_request(args: &Args) -> Result<PlayRequest> {
    let mode = match args.mode {
        RunMode::Random => GameMode::Random,
        RunMode::Daily | RunMode::Scenarios => GameMode::Daily,
    };
    Ok(PlayRequest {
        mode,
        date: parse_play_date(args.date.as_deref())?,
        seed: parse_play_seed(args.seed.as_deref())?,
        guesses: split_csv(&args.guesses),
    })
}

fn run_play(args: &Args, assets: &TesterAssets) -> Result<()> {
    let request = build_play_request(args)?;
    let mut output_target = OutputTarget::new(args.output.clone())?;
    let catalog = assets.catalog.clone();

    let status = if let Some(dir) = &args.state_dir {
        let storage = FileStorage::new(dir.clone())
            .with_context(|| format!("could not use state dir {}", dir.display()))?;
        play_session(&mut output_target, catalog, storage, &request)?
    } else {
        play_session(&mut output_target, catalog, MemoryStorage::new(), &request)?
    };
    log::debug!("play session finished as {status}");

    if request.mode == GameMode::Random {
        writeln!(
            &mut output_target,
            "   Replay this session with --mode random --seed {}",
            request.seed
        )?;
    }
    output_target.flush_inner()?;
    Ok(())
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => {
            logic::reports::generate_json_report(&mut output_target, results)?;
        }
        "markdown" => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Reelguess Logic Test Results\n\n_No scenarios executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(&mut output_target, results)?;
            }
        }
        _ => {
            if results.is_empty() {
                writeln!(&mut output_target, "No logic scenarios executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    results,
                    start_time.elapsed(),
                )?;
            }
            let duration = start_time.elapsed();
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
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
