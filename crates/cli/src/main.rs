use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use pokerun_autoplay::{run_autoplay, write_json, write_text, AutoplayConfig, AutoplayResult};
use pokerun_core::{
    calculate_score, Card, Enhancement, HandLevels, PokerHandType, ScoreBreakdown, ScoreContext,
    Seal,
};
use pokerun_data::{builtin_assets, load_assets, Assets, ContentSummary};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "pokerun")]
#[command(about = "Seeded poker-hand scoring runs", long_about = None)]
struct Cli {
    /// Log filter, e.g. `debug` or `pokerun_core=trace`. Falls back to RUST_LOG, then `info`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Play whole runs with the greedy policy.
    Simulate(SimulateArgs),
    /// Score a single played hand.
    Score(ScoreArgs),
}

#[derive(Debug, Args)]
struct SimulateArgs {
    #[arg(long, default_value_t = 0xC0FFEE)]
    seed: u64,

    /// Consecutive seeds starting at `--seed`.
    #[arg(long, default_value_t = 1)]
    runs: u32,

    #[arg(long, default_value_t = 500)]
    max_steps: u32,

    /// Asset directory with config.json, jokers.json and bosses.json.
    #[arg(long, env = "POKERUN_ASSETS")]
    assets: Option<PathBuf>,

    /// Joker ids owned for the whole run.
    #[arg(long, value_delimiter = ',')]
    jokers: Vec<String>,

    #[arg(long, default_value_t = 4)]
    starting_money: i64,

    /// Stop after clearing this ante instead of the configured max.
    #[arg(long)]
    target_ante: Option<u32>,

    /// Write the JSON trace here; with several runs the seed is appended to the stem.
    #[arg(long)]
    trace: Option<PathBuf>,

    /// Write a plain-text report next to the JSON trace.
    #[arg(long)]
    report: bool,
}

#[derive(Debug, Args)]
struct ScoreArgs {
    /// Cards such as `KH`, `10S`, or `AS:glass:red` for an enhancement and seal.
    #[arg(required = true)]
    cards: Vec<String>,

    /// Level applied to every hand category.
    #[arg(long, default_value_t = 1)]
    hand_level: u32,

    #[arg(long, value_delimiter = ',')]
    jokers: Vec<String>,

    /// Boss blind id from the catalog.
    #[arg(long)]
    boss: Option<String>,

    /// Cards held in hand, for jokers that look at them.
    #[arg(long, value_delimiter = ',')]
    held: Vec<String>,

    #[arg(long)]
    assets: Option<PathBuf>,

    /// Print the breakdown as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());
    match cli.command {
        Command::Simulate(args) => simulate(args),
        Command::Score(args) => score(args),
    }
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn assets_from(dir: Option<&Path>) -> Result<Assets> {
    let assets = match dir {
        Some(dir) => load_assets(dir)?,
        None => builtin_assets()?,
    };
    let summary = ContentSummary::of(&assets.content);
    info!(
        jokers = summary.jokers,
        scaling_jokers = summary.scaling_jokers,
        bosses = summary.bosses,
        source = %dir.map(|dir| dir.display().to_string()).unwrap_or_else(|| "builtin".to_string()),
        "assets loaded"
    );
    Ok(assets)
}

fn simulate(args: SimulateArgs) -> Result<()> {
    if args.runs == 0 {
        bail!("--runs must be at least 1");
    }
    let assets = assets_from(args.assets.as_deref())?;
    let mut cleared = 0u32;
    for offset in 0..args.runs {
        let seed = args.seed.wrapping_add(offset as u64);
        let config = AutoplayConfig {
            seed,
            max_steps: args.max_steps,
            starting_money: args.starting_money,
            jokers: args.jokers.clone(),
            target_ante: args.target_ante,
        };
        let result = run_autoplay(config, assets.config.clone(), assets.content.clone())
            .with_context(|| format!("run with seed {seed} failed"))?;
        println!("{}", summary_line(&result));
        cleared += result.summary.blinds_cleared;
        if let Some(path) = args.trace.as_deref() {
            let path = trace_path(path, seed, args.runs > 1);
            write_json(&path, &result)
                .with_context(|| format!("failed to write {}", path.display()))?;
            if args.report {
                let report = path.with_extension("txt");
                write_text(&report, &result)
                    .with_context(|| format!("failed to write {}", report.display()))?;
            }
        }
    }
    if args.runs > 1 {
        println!(
            "runs={} blinds_cleared={} avg={:.2}",
            args.runs,
            cleared,
            cleared as f64 / args.runs as f64
        );
    }
    Ok(())
}

fn summary_line(result: &AutoplayResult) -> String {
    format!(
        "seed={} status={:?} ante={} money={} blinds_cleared={} steps={} best_hand={}",
        result.seed,
        result.status,
        result.final_ante,
        result.final_money,
        result.summary.blinds_cleared,
        result.summary.steps,
        result.summary.best_hand_score
    )
}

fn trace_path(path: &Path, seed: u64, per_seed: bool) -> PathBuf {
    if !per_seed {
        return path.to_path_buf();
    }
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "trace".to_string());
    path.with_file_name(format!("{stem}-{seed}.json"))
}

fn score(args: ScoreArgs) -> Result<()> {
    let assets = assets_from(args.assets.as_deref())?;
    let played = parse_cards(&args.cards)?;
    let held = parse_cards(&args.held)?;
    let jokers = assets.content.jokers_by_ids(args.jokers.as_slice())?;
    let boss = match args.boss.as_deref() {
        Some(id) => Some(
            assets
                .content
                .boss_by_id(id)
                .with_context(|| format!("unknown boss id {id:?}"))?,
        ),
        None => None,
    };
    let levels: HandLevels = PokerHandType::ALL
        .iter()
        .map(|hand| (*hand, args.hand_level.max(1)))
        .collect();
    let ctx = ScoreContext {
        jokers: &jokers,
        boss,
        hand_levels: Some(&levels),
        discards_remaining: Some(assets.config.discards_per_round),
        held_cards: Some(&held),
        ..ScoreContext::default()
    };
    let breakdown = calculate_score(&played, &ctx);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
    } else {
        print_score_breakdown(&breakdown, &played);
    }
    Ok(())
}

fn parse_cards(notation: &[String]) -> Result<Vec<Card>> {
    notation.iter().map(|text| parse_card(text)).collect()
}

/// `RANK SUIT[:modifier...]`, modifiers being an enhancement or a seal.
fn parse_card(text: &str) -> Result<Card> {
    let mut parts = text.split(':');
    let base = parts.next().unwrap_or_default();
    let mut card = Card::parse(base).with_context(|| format!("invalid card {text:?}"))?;
    for modifier in parts {
        card = match modifier.to_ascii_lowercase().as_str() {
            "foil" => card.with_enhancement(Enhancement::Foil),
            "holo" | "holographic" => card.with_enhancement(Enhancement::Holographic),
            "poly" | "polychrome" => card.with_enhancement(Enhancement::Polychrome),
            "glass" => card.with_enhancement(Enhancement::Glass),
            "gold" => card.with_seal(Seal::Gold),
            "red" => card.with_seal(Seal::Red),
            "blue" => card.with_seal(Seal::Blue),
            "purple" => card.with_seal(Seal::Purple),
            other => bail!("unknown card modifier {other:?} in {text:?}"),
        };
    }
    Ok(card)
}

fn format_card(card: &Card) -> String {
    let mut out = card.to_string();
    let mut tags = Vec::new();
    if let Some(enhancement) = card.enhancement {
        tags.push(format!("{enhancement:?}"));
    }
    if let Some(seal) = card.seal {
        tags.push(format!("{seal:?} Seal"));
    }
    if !tags.is_empty() {
        out.push_str(" [");
        out.push_str(&tags.join(","));
        out.push(']');
    }
    out
}

fn print_score_breakdown(breakdown: &ScoreBreakdown, played: &[Card]) {
    let evaluated = &breakdown.evaluated;
    println!("hand: {}", evaluated.name());
    println!("played:");
    for (idx, card) in played.iter().enumerate() {
        println!("  {:>2}: {}", idx, format_card(card));
    }
    let scoring: Vec<String> = evaluated.scoring_cards.iter().map(format_card).collect();
    println!("scoring: [{}]", scoring.join(", "));
    println!(
        "base: chips={} mult={:.2}",
        breakdown.base.chips, breakdown.base.mult
    );
    if breakdown.trace.is_empty() {
        println!("effect steps: none");
    } else {
        println!("effect steps:");
        for (idx, step) in breakdown.trace.iter().enumerate() {
            println!(
                "  {:>2}. {} | {:?} | {}×{:.2} -> {}×{:.2}",
                idx + 1,
                step.source,
                step.op,
                step.before.chips,
                step.before.mult,
                step.after.chips,
                step.after.mult
            );
        }
    }
    if breakdown.zeroed {
        println!("boss: hand does not score");
    }
    println!(
        "final: chips={} mult={:.2} score={}",
        breakdown.total.chips, breakdown.total.mult, breakdown.final_score
    );
}
