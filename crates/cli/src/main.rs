// FILE: crates/cli/src/main.rs

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;
use storyreel_config::ConfigManager;

mod commands;
mod player;

fn build_cli() -> Command {
    Command::new("storyreel")
        .version(env!("CARGO_PKG_VERSION"))
        .author("StoryReel Team")
        .about("Plays story collections in the terminal")
        .arg(
            Arg::new("config-dir")
                .long("config-dir")
                .value_name("DIR")
                .help("Directory holding config.toml")
                .global(true),
        )
        .arg(
            Arg::new("source")
                .short('s')
                .long("source")
                .value_name("FILE|URL")
                .help("Story JSON file or service base URL (defaults to network.base_url)")
                .global(true),
        )
        .subcommand(Command::new("list").about("List the available story collections"))
        .subcommand(
            Command::new("play")
                .about("Play a story collection")
                .arg(
                    Arg::new("collection")
                        .required(true)
                        .value_name("N")
                        .value_parser(clap::value_parser!(usize))
                        .help("Collection number as shown by 'list'"),
                )
                .arg(
                    Arg::new("start")
                        .long("start")
                        .value_name("INDEX")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("0")
                        .help("Story to start on (0-based)"),
                ),
        )
        .subcommand(
            Command::new("cache")
                .about("Manage the image cache")
                .subcommand_required(true)
                .subcommand(
                    Command::new("prefetch")
                        .about("Download the images of a collection")
                        .arg(
                            Arg::new("collection")
                                .required(true)
                                .value_name("N")
                                .value_parser(clap::value_parser!(usize))
                                .help("Collection number as shown by 'list'"),
                        ),
                )
                .subcommand(Command::new("clear").about("Delete every cached image")),
        )
        .subcommand(
            Command::new("config")
                .about("Manage the configuration file")
                .subcommand_required(true)
                .subcommand(Command::new("init").about("Write the default config if none exists"))
                .subcommand(Command::new("show").about("Print the effective configuration"))
                .subcommand(Command::new("reset").about("Overwrite the config with defaults")),
        )
}

fn config_manager(matches: &ArgMatches) -> Result<ConfigManager> {
    match matches.get_one::<String>("config-dir") {
        Some(dir) => Ok(ConfigManager::with_directory(PathBuf::from(dir))),
        None => ConfigManager::new().context("Failed to locate config directory"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = build_cli().get_matches();

    let manager = config_manager(&matches)?;
    let config = match manager.load_with_env_overrides() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: {}, using defaults", e);
            Default::default()
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.app.log_level.as_filter()),
    )
    .init();

    let source = matches.get_one::<String>("source").map(String::as_str);

    match matches.subcommand() {
        Some(("list", _)) => commands::list_collections(&config, source).await,
        Some(("play", sub_matches)) => {
            let number = *sub_matches
                .get_one::<usize>("collection")
                .ok_or_else(|| anyhow::anyhow!("Collection number is required"))?;
            let start = sub_matches.get_one::<usize>("start").copied().unwrap_or(0);
            commands::play_collection(&config, &manager, source, number, start).await
        }
        Some(("cache", sub_matches)) => match sub_matches.subcommand() {
            Some(("prefetch", prefetch_matches)) => {
                let number = *prefetch_matches
                    .get_one::<usize>("collection")
                    .ok_or_else(|| anyhow::anyhow!("Collection number is required"))?;
                commands::prefetch_images(&config, source, number).await
            }
            Some(("clear", _)) => commands::clear_cache(&config),
            _ => anyhow::bail!("Unknown cache command"),
        },
        Some(("config", sub_matches)) => match sub_matches.subcommand() {
            Some(("init", _)) => commands::config_init(&manager),
            Some(("show", _)) => commands::config_show(&manager, &config),
            Some(("reset", _)) => commands::config_reset(&manager),
            _ => anyhow::bail!("Unknown config command"),
        },
        _ => {
            build_cli().print_help()?;
            Ok(())
        }
    }
}
