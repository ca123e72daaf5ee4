//! fitrack - Personal workout tracker

use anyhow::Result;
use clap::{Parser, Subcommand};

use fitrack::store::Store;
use fitrack::tui::App;
use fitrack::workouts;

const DB_PATH: &str = "fitrack.db";

#[derive(Parser)]
#[command(name = "fitrack")]
#[command(author, version, about = "Personal workout tracker with timed exercise sessions")]
struct Cli {
    /// Store file path
    #[arg(long, env = "FITRACK_DB", default_value = DB_PATH)]
    db: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the TUI
    Tui,

    /// List the workout catalog
    Workouts,

    /// Show completed-workout history
    History {
        /// Number of records to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Clear the stored session (token, credentials, history)
    Logout,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let store = Store::open(&cli.db)?;

    match cli.command {
        Some(Commands::Tui) | None => {
            let mut app = App::new(store);
            app.run()?;
        }

        Some(Commands::Workouts) => {
            println!("Workouts:");
            println!("{:-<60}", "");
            for w in workouts::all() {
                println!("{} | {:18} | {}", w.id, w.name, w.exercise_line());
            }
        }

        Some(Commands::History { limit }) => {
            let history = store.load_history();
            if history.is_empty() {
                println!("No workouts completed yet.");
            } else {
                println!("Completed workouts:");
                println!("{:-<60}", "");
                for entry in history.iter().rev().take(limit) {
                    println!("{} | {}", entry.date, entry.name);
                }
            }
        }

        Some(Commands::Logout) => {
            store.clear_session()?;
            println!("Session cleared.");
        }
    }

    Ok(())
}
