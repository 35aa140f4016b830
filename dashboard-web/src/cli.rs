use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use dashboard_core::{Config, DisplayUnit, Fetcher, WeatherSource};
use std::{io::IsTerminal, net::SocketAddr, path::PathBuf, sync::Arc};

use crate::server::{self, AppState, WeatherResponse};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-dashboard", version, about = "Weather station dashboard")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the dashboard page and JSON API.
    Serve {
        #[arg(long, default_value = "127.0.0.1:5000")]
        bind: SocketAddr,
    },

    /// Fetch one station and print the API response.
    Show {
        /// Station id, e.g. "station1". Prompts when omitted on a terminal.
        station: Option<String>,

        /// "c" or "f".
        #[arg(long, default_value = "c")]
        units: String,
    },

    /// Write the built-in configuration to the config file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Serve { bind } => {
                let config = load_config(self.config.as_deref())?;
                let state = AppState {
                    source: Arc::new(Fetcher::from_config(&config)?),
                    default_station: config.default_station.clone(),
                };
                server::run_server(state, bind).await
            }
            Command::Show { station, units } => {
                let config = load_config(self.config.as_deref())?;
                let fetcher = Fetcher::from_config(&config)?;

                let station = match station {
                    Some(id) => id,
                    None if std::io::stdin().is_terminal() => pick_station(&fetcher)?,
                    None => config.default_station.clone(),
                };
                let units = DisplayUnit::parse(&units);

                let result = fetcher.fetch(&station, units).await?;
                let body = serde_json::to_string_pretty(&WeatherResponse::new(result, units))?;
                println!("{body}");
                Ok(())
            }
            Command::Init { force } => {
                let path = match self.config {
                    Some(path) => path,
                    None => Config::config_file_path()?,
                };
                if path.exists() && !force {
                    bail!(
                        "Config file already exists: {}\n\
                         Hint: pass --force to overwrite it.",
                        path.display()
                    );
                }

                Config::default().save_to(&path)?;
                println!("Wrote {}", path.display());
                Ok(())
            }
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn pick_station(fetcher: &Fetcher) -> anyhow::Result<String> {
    let options: Vec<String> =
        fetcher.stations().iter().map(|s| format!("{} ({})", s.id, s.name)).collect();

    let choice = inquire::Select::new("Station:", options)
        .raw_prompt()
        .context("No station selected")?;

    fetcher
        .stations()
        .iter()
        .nth(choice.index)
        .map(|s| s.id.clone())
        .context("Selected station is not in the table")
}
