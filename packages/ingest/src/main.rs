#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the city data import tool.

use std::{path::PathBuf, time::Instant};

use clap::{Parser, Subcommand};
use city_data_counter::{config::TelraamConfig, eco_counter};
use city_data_mobility::{content_types::all_content_types, gas_station};
use city_data_mobility_models::Language;

#[derive(Parser)]
#[command(name = "city_data_ingest", about = "City data import tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import hourly Telraam reports into per-day CSV files
    TelraamToCsv {
        /// Re-import and overwrite every day from this date (YYYY-MM-DD)
        /// instead of resuming from the saved cursor
        #[arg(long)]
        from_date: Option<String>,
    },
    /// Import eco-counter station locations from `ECO_COUNTER_STATIONS_URL`
    EcoCounterStations,
    /// Import gas filling stations in Southwest Finland
    GasFillingStations {
        /// Read the feature set from a local JSON file instead of the URL
        #[arg(long)]
        file: Option<PathBuf>,
        /// Keep previously imported stations instead of replacing them
        #[arg(long)]
        keep_existing: bool,
    },
    /// Load street name translations from a CSV file
    Streets {
        /// CSV with the header `name_fi,name_sv,name_en,municipality`
        #[arg(long)]
        file: PathBuf,
    },
    /// Load maintenance unit GPS works from a JSON file
    MaintenanceWorks {
        /// JSON array of `{unit_id, timestamp, longitude, latitude, events}`
        #[arg(long)]
        file: PathBuf,
    },
    /// List the content type registry
    ContentTypes,
    /// Create the database schema
    Migrate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::TelraamToCsv { from_date } => {
            let from_date = match from_date.as_deref() {
                None => None,
                Some(value) => match city_data_ingest::parse_from_date(value) {
                    Some(day) => Some(day),
                    None => return Ok(()),
                },
            };

            let config = TelraamConfig::from_env()?;
            let conn = city_data_database::open_default()?;

            let start = Instant::now();
            let summary = city_data_ingest::telraam_to_csv(&conn, config, from_date).await?;
            log::info!(
                "Telraam import complete: {} files written, {} skipped in {:.1}s",
                summary.files_written,
                summary.files_skipped,
                start.elapsed().as_secs_f64()
            );
        }
        Commands::EcoCounterStations => {
            let url = std::env::var(eco_counter::STATIONS_URL_ENV)
                .map_err(|_| format!("{} is not set", eco_counter::STATIONS_URL_ENV))?;
            let conn = city_data_database::open_default()?;
            city_data_ingest::import_eco_counter_stations(&conn, &url).await?;
        }
        Commands::GasFillingStations {
            file,
            keep_existing,
        } => {
            let url = std::env::var(gas_station::URL_ENV)
                .unwrap_or_else(|_| gas_station::DEFAULT_URL.to_string());
            let conn = city_data_database::open_default()?;
            city_data_ingest::import_gas_filling_stations(
                &conn,
                file.as_deref(),
                &url,
                keep_existing,
            )
            .await?;
        }
        Commands::Streets { file } => {
            let conn = city_data_database::open_default()?;
            city_data_ingest::import_streets(&conn, &file)?;
        }
        Commands::MaintenanceWorks { file } => {
            let conn = city_data_database::open_default()?;
            city_data_ingest::import_maintenance_works(&conn, &file)?;
        }
        Commands::ContentTypes => {
            println!("{:<24} NAME", "TYPE");
            println!("{}", "-".repeat(50));
            for ct in all_content_types() {
                println!(
                    "{:<24} {}",
                    ct.type_name,
                    ct.name.get(Language::En).unwrap_or_default()
                );
            }
        }
        Commands::Migrate => {
            log::info!("Creating database schema...");
            city_data_database::open_default()?;
            log::info!("Schema ready.");
        }
    }

    Ok(())
}
