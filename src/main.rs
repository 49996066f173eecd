// ABOUTME: Main entry point for the stepdeck program.
// ABOUTME: Provides CLI interface and executes commands from the library.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};

use stepdeck::{Config, Deck};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Present a deck in the terminal
    Show(ShowArgs),

    /// Export a deck as a standalone HTML file
    Export(ExportArgs),

    /// Print the chapter outline of a deck
    Outline(OutlineArgs),

    /// Load and validate a deck
    Check(CheckArgs),
}

#[derive(Args)]
struct ShowArgs {
    /// Deck file (.md or .json); the built-in deck when omitted
    deck: Option<PathBuf>,

    /// Reload the deck when the file changes
    #[arg(short, long)]
    watch: bool,

    /// Do not show the startup hint banner
    #[arg(long)]
    no_hints: bool,

    /// Fraction of the screen width where clicks go back instead of forward
    #[arg(long)]
    click_split: Option<f32>,
}

#[derive(Args)]
struct ExportArgs {
    /// Deck file (.md or .json); the built-in deck when omitted
    deck: Option<PathBuf>,

    /// Path to output HTML file
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args)]
struct OutlineArgs {
    /// Deck file (.md or .json); the built-in deck when omitted
    deck: Option<PathBuf>,
}

#[derive(Args)]
struct CheckArgs {
    /// Deck file (.md or .json)
    deck: PathBuf,
}

fn load_deck(path: Option<&Path>) -> anyhow::Result<Deck> {
    match path {
        Some(path) => Deck::load(path).with_context(|| format!("Failed to load deck {:?}", path)),
        None => Deck::builtin().context("Failed to load the built-in deck"),
    }
}

fn show(args: &ShowArgs) -> anyhow::Result<()> {
    if args.watch && args.deck.is_none() {
        anyhow::bail!("--watch needs a deck file");
    }

    let config = Config::from_env().with_overrides(args.click_split, args.no_hints)?;
    let deck = load_deck(args.deck.as_deref())?;
    let watch_path = if args.watch { args.deck.as_deref() } else { None };

    stepdeck::run(deck, config, watch_path)?;
    Ok(())
}

fn export(args: &ExportArgs) -> anyhow::Result<()> {
    let deck = load_deck(args.deck.as_deref())?;
    let html_content = stepdeck::generate_html(&deck);
    stepdeck::write_html_to_file(&html_content, &args.output)
        .with_context(|| format!("Failed to write output file {:?}", args.output))?;

    println!("HTML generated successfully: {:?}", args.output);
    Ok(())
}

fn outline(args: &OutlineArgs) -> anyhow::Result<()> {
    let deck = load_deck(args.deck.as_deref())?;
    print!("{}", stepdeck::format_outline(&deck));
    Ok(())
}

fn check(args: &CheckArgs) -> anyhow::Result<()> {
    let deck = load_deck(Some(&args.deck))?;
    let with_reveal = deck
        .slides
        .iter()
        .filter(|slide| stepdeck::steps_required(slide) > 1)
        .count();

    println!("{} slides, {} with reveal steps", deck.len(), with_reveal);
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match &cli.command {
        Some(Commands::Show(args)) => show(args),
        Some(Commands::Export(args)) => export(args),
        Some(Commands::Outline(args)) => outline(args),
        Some(Commands::Check(args)) => check(args),
        None => {
            println!("No command specified. Use --help for usage information.");
            Ok(())
        }
    };

    match result {
        Ok(()) => info!("Done"),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
