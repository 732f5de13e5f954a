use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Select};
use std::sync::Arc;

use skycast_core::{
    App, Config, GeocodingService, TemperatureUnit, provider::openmeteo::OpenMeteoClient,
};

use crate::render;
use crate::search_prompt::{self, Pick};

/// Shown when a forecast fetch fails. The previous view stays on screen.
const FORECAST_FAILED: &str = "Failed to load weather data. Please try another city or later.";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "City weather lookup in your terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive city search with live suggestions (the default).
    Search,

    /// Show weather for a city name, using the first geocoding match.
    Show {
        /// City name to look up.
        city: String,

        /// Temperature unit, "celsius" or "fahrenheit"; defaults to the
        /// configured unit.
        #[arg(long, value_parser = parse_unit)]
        unit: Option<TemperatureUnit>,
    },

    /// Choose and persist the default temperature unit.
    Configure,
}

fn parse_unit(value: &str) -> Result<TemperatureUnit, anyhow::Error> {
    value.parse()
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load().context("Failed to load configuration")?;

        match self.command.unwrap_or(Command::Search) {
            Command::Search => interactive(&config).await,
            Command::Show { city, unit } => show(&config, &city, unit).await,
            Command::Configure => configure(config).await,
        }
    }
}

/// One-shot lookup: first geocoding match, fetch, render, exit.
async fn show(config: &Config, city: &str, unit: Option<TemperatureUnit>) -> anyhow::Result<()> {
    let client = Arc::new(OpenMeteoClient::new());

    let matches = match client.search(city, config.suggestion_limit).await {
        Ok(matches) => matches,
        Err(err) if err.is_empty() => Vec::new(),
        Err(err) => return Err(err).context("City lookup failed"),
    };
    let Some(selected) = matches.into_iter().next() else {
        bail!("No matching city found for '{city}'.");
    };

    let unit = unit.unwrap_or(config.unit);
    let app = App::new(client, unit);
    app.select_city(selected.clone());

    match app.refresh().await {
        Ok(Some(view)) => {
            println!("{}", render::view(&selected, unit, &view));
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(err) => {
            tracing::error!(%err, "forecast fetch failed");
            bail!("{FORECAST_FAILED}");
        }
    }
}

enum Action {
    ToggleUnit,
    NewSearch,
    Quit,
}

/// Interactive session: search, render, then loop on the action menu.
async fn interactive(config: &Config) -> anyhow::Result<()> {
    let client = Arc::new(OpenMeteoClient::new());
    let geocoder = Arc::clone(&client) as Arc<dyn GeocodingService>;
    let app = App::new(client, config.unit);

    loop {
        let city = match search_prompt::pick_city(Arc::clone(&geocoder), config).await? {
            Pick::City(city) => city,
            Pick::NoMatch => {
                println!("No matching cities found.");
                continue;
            }
            Pick::Cancelled => return Ok(()),
        };
        app.select_city(city.clone());

        loop {
            let unit = app.unit();
            match app.refresh().await {
                Ok(Some(view)) => println!("{}", render::view(&city, unit, &view)),
                Ok(None) => {}
                Err(err) => {
                    tracing::error!(%err, "forecast fetch failed");
                    eprintln!("{FORECAST_FAILED}");
                }
            }

            match next_action(unit).await? {
                Action::ToggleUnit => {
                    app.toggle_unit();
                }
                Action::NewSearch => break,
                Action::Quit => return Ok(()),
            }
        }
    }
}

async fn next_action(unit: TemperatureUnit) -> anyhow::Result<Action> {
    let toggle = format!("Switch to {}", unit.toggled().suffix());
    let options = vec![
        toggle.clone(),
        "Search another city".to_string(),
        "Quit".to_string(),
    ];

    let choice = tokio::task::spawn_blocking(move || Select::new("What next?", options).prompt())
        .await
        .context("Prompt task failed")?;

    match choice {
        Ok(choice) if choice == toggle => Ok(Action::ToggleUnit),
        Ok(choice) if choice == "Search another city" => Ok(Action::NewSearch),
        Ok(_) => Ok(Action::Quit),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
            Ok(Action::Quit)
        }
        Err(err) => Err(err).context("Action prompt failed"),
    }
}

/// Interactive configuration: pick the default unit and persist it.
async fn configure(mut config: Config) -> anyhow::Result<()> {
    let options = vec![TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit];
    let picked = tokio::task::spawn_blocking(move || {
        Select::new("Default temperature unit:", options).prompt()
    })
    .await
    .context("Prompt task failed")?;

    let unit = match picked {
        Ok(unit) => unit,
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
            return Ok(());
        }
        Err(err) => return Err(err).context("Unit prompt failed"),
    };

    config.unit = unit;
    config.save().context("Failed to save configuration")?;
    println!(
        "Default unit set to {unit} ({})",
        Config::config_file_path()?.display()
    );
    Ok(())
}
