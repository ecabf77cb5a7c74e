use clap::Parser;
use kut::cli::commands::{cmd_config, cmd_demo};
use kut::cli::config::{Cli, Commands, load_config, resolve_config};

fn main() {
    let cli = Cli::parse();

    // Resolve settings: CLI > config file > defaults
    let config = match load_config(cli.config.as_deref()) {
        Ok(file) => resolve_config(&cli, file),
        Err(e) => {
            eprintln!("KUT: {}", e);
            std::process::exit(1);
        }
    };

    let status = match cli.command {
        Commands::Demo { broken } => match cmd_demo(&config, broken, cli.verbose) {
            Ok(status) => status,
            Err(e) => {
                eprintln!("KUT: {}", e);
                1
            }
        },
        Commands::Config => match cmd_config(&config) {
            Ok(yaml) => {
                print!("{}", yaml);
                0
            }
            Err(e) => {
                eprintln!("KUT: {}", e);
                1
            }
        },
    };

    std::process::exit(status);
}
