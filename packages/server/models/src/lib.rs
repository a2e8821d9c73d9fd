#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the city data server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the storage types so the API contract can evolve on its own.

use chrono::{DateTime, Utc};
use city_data_maintenance_models::{MaintenanceUnit, MaintenanceWork};
use city_data_mobility_models::{ContentType, MobileUnit};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// A page of results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of matching results.
    pub count: usize,
    /// Next page number, if any.
    pub next: Option<usize>,
    /// Previous page number, if any.
    pub previous: Option<usize>,
    /// Results on this page.
    pub results: Vec<T>,
}

/// Pagination query parameters.
///
/// Kept as strings so that malformed values can be reported (for `page`)
/// or ignored (for `page_size`) instead of failing extraction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    /// 1-based page number.
    pub page: Option<String>,
    /// Results per page.
    pub page_size: Option<String>,
}

/// Query parameters of the maintenance work endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkQueryParams {
    /// Only works containing this event.
    pub event: Option<String>,
    /// Only works at or after this time, `YYYY-MM-DD HH:MM[:SS]`.
    pub start_date_time: Option<String>,
    /// Largest gap in seconds within one work (geometry history only).
    pub max_work_length: Option<String>,
}

/// Query parameters of the mobile unit endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MobileUnitQueryParams {
    /// Only units of this content type.
    pub type_name: Option<String>,
}

/// A maintenance work as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMaintenanceWork {
    /// Work ID.
    pub id: i64,
    /// ID of the reporting unit.
    pub maintenance_unit: i64,
    /// Report time.
    pub timestamp: DateTime<Utc>,
    /// `GeoJSON` point.
    pub point: Value,
    /// Events active at this point.
    pub events: Vec<String>,
}

impl From<MaintenanceWork> for ApiMaintenanceWork {
    fn from(work: MaintenanceWork) -> Self {
        Self {
            id: work.id,
            maintenance_unit: work.maintenance_unit_id,
            timestamp: work.timestamp,
            point: json!({
                "type": "Point",
                "coordinates": [work.longitude, work.latitude],
            }),
            events: work.events,
        }
    }
}

/// A maintenance unit as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMaintenanceUnit {
    /// Unit ID.
    pub id: i64,
    /// Source system identifier.
    pub unit_id: String,
}

impl From<MaintenanceUnit> for ApiMaintenanceUnit {
    fn from(unit: MaintenanceUnit) -> Self {
        Self {
            id: unit.id,
            unit_id: unit.unit_id,
        }
    }
}

/// One distinct maintenance event name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiActiveEvent {
    /// Event name.
    pub event: String,
}

/// A content type as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiContentType {
    /// Type name.
    pub type_name: String,
    /// Finnish name.
    pub name_fi: Option<String>,
    /// Swedish name.
    pub name_sv: Option<String>,
    /// English name.
    pub name_en: Option<String>,
    /// Finnish description.
    pub description_fi: Option<String>,
    /// Swedish description.
    pub description_sv: Option<String>,
    /// English description.
    pub description_en: Option<String>,
}

impl From<ContentType> for ApiContentType {
    fn from(ct: ContentType) -> Self {
        Self {
            type_name: ct.type_name,
            name_fi: ct.name.fi,
            name_sv: ct.name.sv,
            name_en: ct.name.en,
            description_fi: ct.description.fi,
            description_sv: ct.description.sv,
            description_en: ct.description.en,
        }
    }
}

/// A mobile unit as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMobileUnit {
    /// Unit ID.
    pub id: Option<i64>,
    /// Content type name.
    pub content_type: String,
    /// Unit name.
    pub name: String,
    /// Whether the unit is in service.
    pub is_active: bool,
    /// `GeoJSON` point.
    pub geometry: Value,
    /// Finnish address.
    pub address_fi: Option<String>,
    /// Swedish address.
    pub address_sv: Option<String>,
    /// English address.
    pub address_en: Option<String>,
    /// Type-specific attributes.
    pub extra: Value,
}

impl From<MobileUnit> for ApiMobileUnit {
    fn from(unit: MobileUnit) -> Self {
        Self {
            id: unit.id,
            content_type: unit.type_name,
            name: unit.name,
            is_active: unit.is_active,
            geometry: json!({
                "type": "Point",
                "coordinates": [unit.longitude, unit.latitude],
            }),
            address_fi: unit.address.fi,
            address_sv: unit.address.sv,
            address_en: unit.address.en,
            extra: unit.extra,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}
