mod app;
mod config;
mod event;
mod geometry;
mod layout;
mod manager;
mod session;
mod tui;
mod ui;

use clap::{Parser, Subcommand};
use config::Config;

#[derive(Parser)]
#[command(name = "trellis", about = "A tiling terminal workspace multiplexer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List saved workspaces without starting the UI
    Ls,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load();

    match cli.command {
        None => {
            tui::install_panic_hook();
            app::App::run(config)
        }
        Some(Commands::Ls) => {
            if let Some(state) = session::store::load() {
                for ws in &state.workspaces {
                    println!(
                        "workspace {}: {} panes ({})",
                        ws.id,
                        ws.stacked_order.len(),
                        ui::mode_label(ws.mode),
                    );
                }
            } else {
                println!("no saved state");
            }
            Ok(())
        }
    }
}
