//! HTTP handler functions for the city data API.

use actix_web::{HttpResponse, web};
use city_data_database::{maintenance, mobility};
use city_data_maintenance::{
    MaintenanceError,
    history::GeometryHistory,
    params::{parse_max_work_length, parse_start_date_time},
};
use city_data_maintenance_models::WorkFilter;
use city_data_server_models::{
    ApiActiveEvent, ApiContentType, ApiHealth, ApiMaintenanceUnit, ApiMaintenanceWork,
    ApiMobileUnit, MobileUnitQueryParams, PageParams, WorkQueryParams,
};
use serde_json::json;

use crate::{
    AppState,
    pagination::{InvalidPage, PageRequest},
};

fn internal_error(message: &str, e: &dyn std::fmt::Display) -> HttpResponse {
    log::error!("{message}: {e}");
    HttpResponse::InternalServerError().json(json!({ "error": message }))
}

fn bad_request(e: &MaintenanceError) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({ "error": e.to_string() }))
}

fn invalid_page(_: InvalidPage) -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "error": "Invalid page." }))
}

fn work_filter(params: &WorkQueryParams) -> Result<WorkFilter, MaintenanceError> {
    let start_date_time = params
        .start_date_time
        .as_deref()
        .map(parse_start_date_time)
        .transpose()?;

    Ok(WorkFilter {
        event: params.event.clone(),
        start_date_time,
    })
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/street_maintenance/maintenance_works`
///
/// Paginated works, filtered by `event` and `start_date_time`.
pub async fn maintenance_works(
    state: web::Data<AppState>,
    page: web::Query<PageParams>,
    params: web::Query<WorkQueryParams>,
) -> HttpResponse {
    let filter = match work_filter(&params) {
        Ok(f) => f,
        Err(e) => return bad_request(&e),
    };

    let Ok(conn) = state.db.lock() else {
        return internal_error("Failed to query maintenance works", &"database lock poisoned");
    };

    let count = match maintenance::count_works(&conn, &filter) {
        Ok(c) => c,
        Err(e) => return internal_error("Failed to query maintenance works", &e),
    };

    let request = match PageRequest::resolve(&page, count) {
        Ok(r) => r,
        Err(e) => return invalid_page(e),
    };

    match maintenance::list_works(&conn, &filter, Some(request.window)) {
        Ok(works) => {
            let results: Vec<ApiMaintenanceWork> =
                works.into_iter().map(ApiMaintenanceWork::from).collect();
            HttpResponse::Ok().json(request.into_page(count, results))
        }
        Err(e) => internal_error("Failed to query maintenance works", &e),
    }
}

/// `GET /api/street_maintenance/maintenance_works/get_geometry_history`
///
/// Segments the filtered works into line strings and points, splitting
/// runs at gaps longer than `max_work_length` seconds.
pub async fn geometry_history(
    state: web::Data<AppState>,
    params: web::Query<WorkQueryParams>,
) -> HttpResponse {
    let max_work_length = match parse_max_work_length(params.max_work_length.as_deref()) {
        Ok(v) => v,
        Err(e) => return bad_request(&e),
    };

    let filter = match work_filter(&params) {
        Ok(f) => f,
        Err(e) => return bad_request(&e),
    };

    let works = {
        let Ok(conn) = state.db.lock() else {
            return internal_error("Failed to query geometry history", &"database lock poisoned");
        };
        match maintenance::list_works(&conn, &filter, None) {
            Ok(w) => w,
            Err(e) => return internal_error("Failed to query geometry history", &e),
        }
    };

    let history = GeometryHistory::build(&works, max_work_length);
    log::debug!(
        "Geometry history: {} works -> {} linestrings, {} points",
        works.len(),
        history.linestrings.len(),
        history.points.len()
    );

    HttpResponse::Ok().json(history.to_geojson())
}

/// `GET /api/street_maintenance/maintenance_units`
pub async fn maintenance_units(
    state: web::Data<AppState>,
    page: web::Query<PageParams>,
) -> HttpResponse {
    let Ok(conn) = state.db.lock() else {
        return internal_error("Failed to query maintenance units", &"database lock poisoned");
    };

    let count = match maintenance::count_units(&conn) {
        Ok(c) => c,
        Err(e) => return internal_error("Failed to query maintenance units", &e),
    };

    let request = match PageRequest::resolve(&page, count) {
        Ok(r) => r,
        Err(e) => return invalid_page(e),
    };

    match maintenance::list_units(&conn, request.window) {
        Ok(units) => {
            let results: Vec<ApiMaintenanceUnit> =
                units.into_iter().map(ApiMaintenanceUnit::from).collect();
            HttpResponse::Ok().json(request.into_page(count, results))
        }
        Err(e) => internal_error("Failed to query maintenance units", &e),
    }
}

/// `GET /api/street_maintenance/active_events`
///
/// Distinct event names across all works.
pub async fn active_events(
    state: web::Data<AppState>,
    page: web::Query<PageParams>,
) -> HttpResponse {
    let events = {
        let Ok(conn) = state.db.lock() else {
            return internal_error("Failed to query active events", &"database lock poisoned");
        };
        match maintenance::active_events(&conn) {
            Ok(e) => e,
            Err(e) => return internal_error("Failed to query active events", &e),
        }
    };

    let count = events.len();
    let request = match PageRequest::resolve(&page, count) {
        Ok(r) => r,
        Err(e) => return invalid_page(e),
    };

    let results: Vec<ApiActiveEvent> = events
        .into_iter()
        .skip(request.window.offset)
        .take(request.window.limit)
        .map(|event| ApiActiveEvent { event })
        .collect();

    HttpResponse::Ok().json(request.into_page(count, results))
}

/// `GET /api/mobility/content_types`
pub async fn content_types(state: web::Data<AppState>) -> HttpResponse {
    let Ok(conn) = state.db.lock() else {
        return internal_error("Failed to query content types", &"database lock poisoned");
    };

    match mobility::list_content_types(&conn) {
        Ok(types) => {
            let results: Vec<ApiContentType> =
                types.into_iter().map(ApiContentType::from).collect();
            HttpResponse::Ok().json(results)
        }
        Err(e) => internal_error("Failed to query content types", &e),
    }
}

/// `GET /api/mobility/mobile_units`
///
/// Paginated mobile units, optionally filtered by `type_name`.
pub async fn mobile_units(
    state: web::Data<AppState>,
    page: web::Query<PageParams>,
    params: web::Query<MobileUnitQueryParams>,
) -> HttpResponse {
    let type_name = params.type_name.as_deref();

    let Ok(conn) = state.db.lock() else {
        return internal_error("Failed to query mobile units", &"database lock poisoned");
    };

    let count = match mobility::count_mobile_units(&conn, type_name) {
        Ok(c) => c,
        Err(e) => return internal_error("Failed to query mobile units", &e),
    };

    let request = match PageRequest::resolve(&page, count) {
        Ok(r) => r,
        Err(e) => return invalid_page(e),
    };

    match mobility::list_mobile_units(&conn, type_name, request.window) {
        Ok(units) => {
            let results: Vec<ApiMobileUnit> = units.into_iter().map(ApiMobileUnit::from).collect();
            HttpResponse::Ok().json(request.into_page(count, results))
        }
        Err(e) => internal_error("Failed to query mobile units", &e),
    }
}
