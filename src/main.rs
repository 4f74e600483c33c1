use clap::Parser;
use reshub::cli::commands::{Cli, Commands};
use reshub::cli::handlers;
use tracing::Level;

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    let hub_dir = cli.hub_dir.clone();

    match cli.command {
        None => {
            // No subcommand → launch TUI (no subscriber: stderr belongs to the terminal)
            if let Err(e) = reshub::tui::run(hub_dir.as_deref()) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Init(args)) => {
            init_logging(cli.verbose);
            // Init is handled before hub discovery
            if let Err(e) = handlers::cmd_init(args, hub_dir.as_deref()) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(_) => {
            init_logging(cli.verbose);
            if let Err(e) = handlers::dispatch(cli) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
