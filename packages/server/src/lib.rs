#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the city data service.
//!
//! Serves street maintenance works, their geometry history, and mobility
//! content types and units from the shared `DuckDB` database.

mod handlers;
pub mod pagination;

use std::sync::{Arc, Mutex};

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};

/// Shared application state.
pub struct AppState {
    /// `duckdb::Connection` is `Send` but not `Sync`, so a `Mutex` is needed.
    pub db: Arc<Mutex<duckdb::Connection>>,
}

impl AppState {
    /// Wraps an open connection.
    #[must_use]
    pub fn new(conn: duckdb::Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }
}

/// Registers every API route under `/api`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .service(
                web::scope("/street_maintenance")
                    .route(
                        "/maintenance_works",
                        web::get().to(handlers::maintenance_works),
                    )
                    .route(
                        "/maintenance_works/get_geometry_history",
                        web::get().to(handlers::geometry_history),
                    )
                    .route(
                        "/maintenance_units",
                        web::get().to(handlers::maintenance_units),
                    )
                    .route("/active_events", web::get().to(handlers::active_events)),
            )
            .service(
                web::scope("/mobility")
                    .route("/content_types", web::get().to(handlers::content_types))
                    .route("/mobile_units", web::get().to(handlers::mobile_units)),
            ),
    );
}

/// Starts the city data API server.
///
/// Opens the database at `CITY_DATA_DB`, creating the schema if needed,
/// and serves on `BIND_ADDR`:`PORT` (default `127.0.0.1:8080`). This is a
/// regular async function; the caller provides the runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the database cannot be opened or
/// the HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let db_path = city_data_database::paths::db_path();
    log::info!("Opening database {}...", db_path.display());
    let conn = city_data_database::open(&db_path).map_err(std::io::Error::other)?;

    let state = web::Data::new(AppState::new(conn));

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
