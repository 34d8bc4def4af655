//! Detective Quest
//!
//! Walk the mansion, gather clues and name the culprit.

use anyhow::Context;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use detective_quest::game::{GameConfig, Session};
use detective_quest::tui::App;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::fs::File;
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "detective-quest", version, about = "A mansion investigation game")]
struct Args {
    /// Seed for the culprit and the clue wiring; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Clues against one suspect needed before an accusation is offered
    #[arg(long, default_value_t = GameConfig::default().evidence_threshold)]
    threshold: usize,

    /// Buckets in the suspect ledger
    #[arg(long, default_value_t = GameConfig::default().bucket_count)]
    buckets: usize,

    /// Write diagnostics to this file (filtered by RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let config = GameConfig {
        bucket_count: args.buckets,
        evidence_threshold: args.threshold,
        ..GameConfig::default()
    };
    let session = match args.seed {
        Some(seed) => Session::from_seed(config, seed),
        None => Session::from_entropy(config),
    }
    .context("cannot open the case")?;
    let mut app = App::new(session)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = (|| -> anyhow::Result<()> {
        while app.running {
            terminal.draw(|frame| app.render(frame))?;
            if !app.handle_input()? {
                break;
            }
        }
        Ok(())
    })();

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result?;

    if let Some(summary) = &app.summary {
        println!("\n{}", summary);
    }
    println!("╔════════════════════════════════════════════════════════╗");
    println!("║  Thanks for playing Detective Quest!                   ║");
    println!("║  Cases solved: {:<40}║", app.session.stats.games_won);
    println!("╚════════════════════════════════════════════════════════╝\n");

    Ok(())
}
