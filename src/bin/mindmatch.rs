//! Command-line driver: generate a deck, play it in the terminal, export it.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use mindmatch::core::SETTINGS_FILE;
use mindmatch::{
    DifficultyLevel, DirectoryExporter, GameConfiguration, GeminiProvider, SelectOutcome,
    SessionController, SessionSnapshot, SessionState, Settings,
};

/// Lets the session timer land before the board is redrawn.
const TIMER_SLACK: Duration = Duration::from_millis(50);

#[derive(Parser, Debug)]
#[command(name = "mindmatch", about = "Memory matching with generated card images")]
struct Cli {
    /// Settings file; missing files fall back to defaults.
    #[arg(long, default_value = SETTINGS_FILE)]
    settings: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a deck and play it in the terminal.
    Play {
        #[command(flatten)]
        game: GameArgs,
        /// Where `export` writes images from the play loop.
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Generate a deck and export its images without playing.
    Generate {
        #[command(flatten)]
        game: GameArgs,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

#[derive(Args, Debug)]
struct GameArgs {
    #[arg(long, default_value = "Watercolor Illustration")]
    style: String,
    #[arg(long, default_value = "Earthy Tones")]
    palette: String,
    #[arg(long, default_value = "B1")]
    level: String,
    #[arg(long, default_value_t = 6)]
    pairs: u32,
}

impl GameArgs {
    fn config(&self) -> Result<GameConfiguration> {
        let level: DifficultyLevel = self.level.parse()?;
        Ok(GameConfiguration::new(self.pairs)
            .with_style(self.style.clone())
            .with_palette(self.palette.clone())
            .with_level(level))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = Cli::parse();

    let settings = Settings::load(&cli.settings)?;
    let provider = Arc::new(GeminiProvider::from_settings(&settings));
    let controller = SessionController::from_settings(provider, &settings);

    match cli.command {
        Command::Generate { game, out } => {
            generate(&controller, game.config()?).await?;
            let report = controller.export(&DirectoryExporter::new(out)).await?;
            println!(
                "wrote {} images to {}",
                report.written.len(),
                report.location.display()
            );
        }
        Command::Play { game, out } => {
            generate(&controller, game.config()?).await?;
            play(&controller, &DirectoryExporter::new(out)).await?;
        }
    }

    Ok(())
}

async fn generate(controller: &SessionController, config: GameConfiguration) -> Result<()> {
    let mut progress = controller.subscribe_progress();
    let watcher = tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            let current = *progress.borrow_and_update();
            if current.total > 0 {
                println!("generating... {}%", current.percent());
            }
        }
    });

    let state = controller.start(config).await;
    watcher.abort();
    if state? != SessionState::Playing {
        bail!("game did not start");
    }
    Ok(())
}

fn render(snapshot: &SessionSnapshot) {
    let Some(deck) = &snapshot.deck else {
        return;
    };
    for (position, card) in deck.cards().enumerate() {
        let face = if card.matched {
            format!("({})", card.label())
        } else if card.face_up {
            card.label().to_string()
        } else {
            "????".to_string()
        };
        println!("{:>3}  {face}", position + 1);
    }
    println!("matched {}", snapshot.progress);
}

async fn play(controller: &SessionController, exporter: &DirectoryExporter) -> Result<()> {
    let delays = controller.delays();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    render(&controller.snapshot().await);
    println!("enter a card number, 'export', 'reset' or 'quit'");

    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "quit" | "q" => break,
            "reset" => {
                controller.reset().await;
                println!("session reset");
                break;
            }
            "export" => match controller.export(exporter).await {
                Ok(report) => println!("exported to {}", report.location.display()),
                Err(err) => println!("{err}"),
            },
            "replay" => match controller.replay().await {
                Ok(SessionState::Playing) => render(&controller.snapshot().await),
                Ok(state) => println!("nothing to replay ({state})"),
                Err(err) => {
                    println!("{err}");
                    println!("back to setup; 'quit' to exit");
                }
            },
            input => {
                let snapshot = controller.snapshot().await;
                let card = input
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|position| snapshot.deck.as_ref()?.at(position).map(|card| card.id));
                let Some(id) = card else {
                    println!("no such card: {input}");
                    continue;
                };

                match controller.select(id).await {
                    SelectOutcome::Rejected(reason) => println!("ignored: {reason:?}"),
                    SelectOutcome::Mismatched { .. } => {
                        render(&controller.snapshot().await);
                        tokio::time::sleep(delays.reveal_hold + TIMER_SLACK).await;
                    }
                    SelectOutcome::Matched { progress, .. } if progress.is_complete() => {
                        tokio::time::sleep(delays.win_delay + TIMER_SLACK).await;
                        render(&controller.snapshot().await);
                        if controller.state().await == SessionState::Finished {
                            println!("all pairs found! 'replay', 'export' or 'quit'");
                            continue;
                        }
                    }
                    _ => {}
                }
                render(&controller.snapshot().await);
            }
        }
    }

    Ok(())
}
