use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Select, Text};
use tracing::debug;

use skycast_core::source::ipapi::IpLookupClient;
use skycast_core::{
    AppState, Config, Coordinates, FixedPosition, PrecipitationUnit, ResolvedLocation,
    SearchError, SuggestionCandidate, SuggestionService, TemperatureUnit, WeatherFetcher,
    WindUnit, resolve,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Weather dashboard CLI")]
pub struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show weather for a place, or for the automatically resolved location.
    Show {
        /// Place name; when absent, automatic location resolution runs.
        place: Option<String>,

        /// Render once and exit instead of entering the interactive menu.
        #[arg(long)]
        once: bool,
    },

    /// Search for a place and pick one of the suggested matches.
    Search {
        /// Partial or full place name.
        query: String,
    },

    /// Configure default units and search language.
    Configure,
}

/// The post-render action menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    ToggleTemperature,
    ToggleWind,
    TogglePrecipitation,
    Search,
    Refresh,
    Quit,
}

impl MenuAction {
    const fn all() -> &'static [MenuAction] {
        &[
            MenuAction::ToggleTemperature,
            MenuAction::ToggleWind,
            MenuAction::TogglePrecipitation,
            MenuAction::Search,
            MenuAction::Refresh,
            MenuAction::Quit,
        ]
    }
}

impl std::fmt::Display for MenuAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            MenuAction::ToggleTemperature => "Toggle temperature unit",
            MenuAction::ToggleWind => "Toggle wind unit",
            MenuAction::TogglePrecipitation => "Toggle precipitation unit",
            MenuAction::Search => "Search another city",
            MenuAction::Refresh => "Refresh",
            MenuAction::Quit => "Quit",
        };
        f.write_str(label)
    }
}

impl Cli {
    pub fn init_logging(&self) {
        let default_filter = if self.verbose { "debug" } else { "warn" };
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }

    pub async fn run(self) -> Result<()> {
        let config = Config::load().context("Failed to load configuration")?;
        debug!(language = %config.language, debounce_ms = config.debounce_ms, "configuration loaded");

        match self.command {
            Command::Show { place, once } => show(&config, place, once).await,
            Command::Search { query } => search(&config, query).await,
            Command::Configure => configure(config),
        }
    }
}

async fn show(config: &Config, place: Option<String>, once: bool) -> Result<()> {
    let fetcher = WeatherFetcher::new(config);
    let mut state = AppState::new(config.units);

    let location = match place {
        Some(name) => {
            let service = SuggestionService::new(config);
            match service.submit(&name).await {
                Ok(candidate) => ResolvedLocation::from_candidate(&candidate),
                Err(SearchError::NoResults(query)) => {
                    anyhow::bail!("No matching place found for '{query}'.")
                }
                Err(err) => return Err(err).context("Search failed"),
            }
        }
        None => {
            let position = FixedPosition::from_config(config);
            let ip = IpLookupClient::new();
            resolve(&position, &ip).await.context(
                "Could not determine a location automatically. Try `skycast show <PLACE>`.",
            )?
        }
    };

    let mut coords = location.coordinates;
    let (snapshot, name) = fetcher
        .fetch(coords, location.display_name)
        .await
        .context("Failed to fetch weather")?;
    state.apply_snapshot(snapshot, name);
    rerender(&state);

    if once {
        return Ok(());
    }

    interact(config, &fetcher, &mut state, &mut coords).await
}

async fn search(config: &Config, query: String) -> Result<()> {
    let service = SuggestionService::new(config);
    let fetcher = WeatherFetcher::new(config);
    let mut state = AppState::new(config.units);

    let Some(candidate) = pick_candidate(&service, &query).await? else {
        return Ok(());
    };

    let mut coords = candidate.coordinates();
    let (snapshot, name) = fetcher
        .fetch(coords, Some(candidate.label()))
        .await
        .context("Failed to fetch weather")?;
    state.apply_snapshot(snapshot, name);
    rerender(&state);

    interact(config, &fetcher, &mut state, &mut coords).await
}

/// The interactive loop: toggles re-render from the held snapshot without a
/// fetch; search and refresh go back to the network.
async fn interact(
    config: &Config,
    fetcher: &WeatherFetcher,
    state: &mut AppState,
    coords: &mut Coordinates,
) -> Result<()> {
    loop {
        let action = match Select::new("What next?", MenuAction::all().to_vec()).prompt() {
            Ok(action) => action,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        match action {
            MenuAction::ToggleTemperature => {
                let unit = state.units().temperature.toggled();
                state.set_temperature_unit(unit);
                rerender(state);
            }
            MenuAction::ToggleWind => {
                let unit = state.units().wind.toggled();
                state.set_wind_unit(unit);
                rerender(state);
            }
            MenuAction::TogglePrecipitation => {
                let unit = state.units().precipitation.toggled();
                state.set_precipitation_unit(unit);
                rerender(state);
            }
            MenuAction::Search => {
                let query = match Text::new("City:").prompt() {
                    Ok(query) => query,
                    Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                        continue;
                    }
                    Err(err) => return Err(err.into()),
                };

                let service = SuggestionService::new(config);
                if let Some(candidate) = pick_candidate(&service, &query).await? {
                    *coords = candidate.coordinates();
                    refresh(fetcher, state, *coords, Some(candidate.label())).await;
                }
            }
            MenuAction::Refresh => {
                let name = state.place().map(str::to_string);
                refresh(fetcher, state, *coords, name).await;
            }
            MenuAction::Quit => return Ok(()),
        }
    }
}

/// Query suggestions for `query` and let the user pick one.
///
/// Falls back to direct submission when no candidate list is available.
/// Returns `None` when nothing was selected; "not found" and "search
/// failed" get distinct notices.
async fn pick_candidate(
    service: &SuggestionService,
    query: &str,
) -> Result<Option<SuggestionCandidate>> {
    let candidates = match service.suggest(query).await {
        Ok(Some(candidates)) => candidates,
        Ok(None) => Vec::new(),
        Err(err) => {
            eprintln!("Search failed: {err}");
            return Ok(None);
        }
    };

    if candidates.is_empty() {
        // Either the query was below the minimum length or nothing matched;
        // a direct submission still resolves a single best match.
        return match service.submit(query).await {
            Ok(candidate) => Ok(Some(candidate)),
            Err(SearchError::NoResults(query)) => {
                println!("No matching place found for '{query}'.");
                Ok(None)
            }
            Err(err) => {
                eprintln!("Search failed: {err}");
                Ok(None)
            }
        };
    }

    let labels: Vec<String> = candidates.iter().map(SuggestionCandidate::label).collect();
    match Select::new("Matches:", labels).raw_prompt() {
        Ok(choice) => Ok(Some(candidates[choice.index].clone())),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Re-fetch for the current coordinates. On failure the previously shown
/// snapshot stays visible; only an error notice is added.
async fn refresh(
    fetcher: &WeatherFetcher,
    state: &mut AppState,
    coords: Coordinates,
    display_name: Option<String>,
) {
    match fetcher.fetch(coords, display_name).await {
        Ok((snapshot, place)) => {
            state.apply_snapshot(snapshot, place);
            rerender(state);
        }
        Err(err) => {
            eprintln!("Weather fetch failed: {err}");
            rerender(state);
        }
    }
}

fn rerender(state: &AppState) {
    if let Some(frame) = state.frame() {
        render::print_frame(&frame);
    }
}

fn configure(mut config: Config) -> Result<()> {
    let temperature = Select::new("Temperature unit:", TemperatureUnit::all().to_vec()).prompt()?;
    let wind = Select::new("Wind unit:", WindUnit::all().to_vec()).prompt()?;
    let precipitation =
        Select::new("Precipitation unit:", PrecipitationUnit::all().to_vec()).prompt()?;
    let language = Text::new("Search language:")
        .with_default(&config.language)
        .prompt()?;

    config.units.temperature = temperature;
    config.units.wind = wind;
    config.units.precipitation = precipitation;
    config.language = language;
    config.save()?;

    println!(
        "Saved configuration to {}",
        Config::config_file_path()?.display()
    );

    Ok(())
}
