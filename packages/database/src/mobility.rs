//! Content types, mobile units and the street name table.

use city_data_mobility::{MobilityError, address::StreetNameLookup};
use city_data_mobility_models::{ContentType, MobileUnit, Translated};
use duckdb::{Connection, Row};

use crate::{DbError, maintenance::Window, to_usize};

/// Creates or updates a content type.
///
/// # Errors
///
/// Returns [`DbError`] if the upsert fails.
pub fn upsert_content_type(conn: &Connection, content_type: &ContentType) -> Result<(), DbError> {
    let name = &content_type.name;
    let description = &content_type.description;
    conn.execute(
        "INSERT INTO content_types
            (type_name, name_fi, name_sv, name_en, description_fi, description_sv, description_en)
         VALUES (?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT (type_name) DO UPDATE SET
             name_fi = EXCLUDED.name_fi,
             name_sv = EXCLUDED.name_sv,
             name_en = EXCLUDED.name_en,
             description_fi = EXCLUDED.description_fi,
             description_sv = EXCLUDED.description_sv,
             description_en = EXCLUDED.description_en",
        duckdb::params![
            content_type.type_name,
            name.fi,
            name.sv,
            name.en,
            description.fi,
            description.sv,
            description.en,
        ],
    )?;
    Ok(())
}

/// Returns every stored content type, ordered by type name.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn list_content_types(conn: &Connection) -> Result<Vec<ContentType>, DbError> {
    let mut stmt = conn.prepare(
        "SELECT type_name, name_fi, name_sv, name_en, description_fi, description_sv, description_en
         FROM content_types ORDER BY type_name",
    )?;
    let types = stmt
        .query_map([], |row| {
            Ok(ContentType {
                type_name: row.get(0)?,
                name: translated(row, 1)?,
                description: translated(row, 4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(types)
}

fn translated(row: &Row<'_>, first: usize) -> duckdb::Result<Translated> {
    Ok(Translated {
        fi: row.get(first)?,
        sv: row.get(first + 1)?,
        en: row.get(first + 2)?,
    })
}

/// Deletes every mobile unit of `type_name`. Returns the number removed.
///
/// # Errors
///
/// Returns [`DbError`] if the delete fails.
pub fn delete_mobile_units(conn: &Connection, type_name: &str) -> Result<usize, DbError> {
    let deleted = conn.execute("DELETE FROM mobile_units WHERE type_name = ?", [type_name])?;
    log::info!("Deleted {deleted} mobile units of type {type_name}");
    Ok(deleted)
}

/// Stores a mobile unit. Returns the new ID.
///
/// # Errors
///
/// Returns [`DbError`] if the insert fails.
pub fn insert_mobile_unit(conn: &Connection, unit: &MobileUnit) -> Result<i64, DbError> {
    let mut stmt = conn.prepare(
        "INSERT INTO mobile_units
            (type_name, name, is_active, longitude, latitude,
             address_fi, address_sv, address_en, extra)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING id",
    )?;
    let extra = unit.extra.to_string();
    let id = stmt.query_row(
        duckdb::params![
            unit.type_name,
            unit.name,
            unit.is_active,
            unit.longitude,
            unit.latitude,
            unit.address.fi,
            unit.address.sv,
            unit.address.en,
            extra,
        ],
        |row| row.get(0),
    )?;
    Ok(id)
}

fn type_filter(type_name: Option<&str>) -> &'static str {
    if type_name.is_some() {
        "WHERE type_name = ?"
    } else {
        ""
    }
}

/// Counts mobile units, optionally of one type.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn count_mobile_units(conn: &Connection, type_name: Option<&str>) -> Result<usize, DbError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT COUNT(*) FROM mobile_units {}",
        type_filter(type_name)
    ))?;
    if let Some(t) = type_name {
        stmt.raw_bind_parameter(1, t)?;
    }
    stmt.raw_execute()?;

    let mut rows = stmt.raw_query();
    let count: i64 = match rows.next()? {
        Some(row) => row.get(0)?,
        None => 0,
    };
    to_usize(count)
}

/// Returns one page of mobile units ordered by ID, optionally of one type.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a stored `extra` is not JSON.
pub fn list_mobile_units(
    conn: &Connection,
    type_name: Option<&str>,
    window: Window,
) -> Result<Vec<MobileUnit>, DbError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, type_name, name, is_active, longitude, latitude,
                address_fi, address_sv, address_en, extra
         FROM mobile_units {}
         ORDER BY id
         LIMIT {} OFFSET {}",
        type_filter(type_name),
        window.limit,
        window.offset
    ))?;
    if let Some(t) = type_name {
        stmt.raw_bind_parameter(1, t)?;
    }
    stmt.raw_execute()?;

    let mut units = Vec::new();
    let mut rows = stmt.raw_query();
    while let Some(row) = rows.next()? {
        let extra: String = row.get(9)?;
        units.push(MobileUnit {
            id: row.get(0)?,
            type_name: row.get(1)?,
            name: row.get(2)?,
            is_active: row.get(3)?,
            longitude: row.get(4)?,
            latitude: row.get(5)?,
            address: translated(row, 6)?,
            extra: serde_json::from_str(&extra).map_err(|e| DbError::Conversion {
                message: format!("invalid extra JSON {extra:?}: {e}"),
            })?,
        });
    }

    Ok(units)
}

/// Stores a street's translated names. `municipality` is stored lowercase.
///
/// # Errors
///
/// Returns [`DbError`] if the upsert fails.
pub fn upsert_street(conn: &Connection, names: &Translated, municipality: &str) -> Result<(), DbError> {
    let name_fi = names.fi.as_deref().ok_or_else(|| DbError::Conversion {
        message: "street without a Finnish name".to_string(),
    })?;
    conn.execute(
        "INSERT INTO streets (name_fi, name_sv, name_en, municipality) VALUES (?, ?, ?, ?)
         ON CONFLICT (name_fi, municipality) DO UPDATE SET
             name_sv = EXCLUDED.name_sv,
             name_en = EXCLUDED.name_en",
        duckdb::params![name_fi, names.sv, names.en, municipality.to_lowercase()],
    )?;
    Ok(())
}

/// Looks up street name translations from the `streets` table.
pub struct DuckDbStreetLookup<'a> {
    conn: &'a Connection,
}

impl<'a> DuckDbStreetLookup<'a> {
    /// Wraps an open connection.
    #[must_use]
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn find(&self, name: &str, municipality: &str) -> Result<Option<Translated>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT name_fi, name_sv, name_en FROM streets
             WHERE name_fi = ? AND municipality = ?",
        )?;
        match stmt.query_row([name, municipality], |row| translated(row, 0)) {
            Ok(t) => Ok(Some(t)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DbError::DuckDb(e)),
        }
    }
}

impl StreetNameLookup for DuckDbStreetLookup<'_> {
    fn street_names(
        &self,
        name: &str,
        municipality: &str,
    ) -> Result<Option<Translated>, MobilityError> {
        self.find(name, municipality)
            .map_err(|e| MobilityError::Lookup(Box::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use city_data_mobility::address::translate_street_name;
    use city_data_mobility_models::Language;
    use serde_json::json;

    use super::*;

    fn unit(type_name: &str, name: &str) -> MobileUnit {
        MobileUnit {
            id: None,
            type_name: type_name.to_string(),
            name: name.to_string(),
            is_active: true,
            longitude: 22.27,
            latitude: 60.45,
            address: Translated::uniform("Linnankatu 10, 20100 Turku"),
            extra: json!({"operator": "Gasum", "lng_cng": "CNG"}),
        }
    }

    const ALL: Window = Window {
        limit: 100,
        offset: 0,
    };

    #[test]
    fn content_type_upsert_replaces_names() {
        let conn = crate::open_in_memory().unwrap();
        let mut ct = ContentType {
            type_name: "GasFillingStation".to_string(),
            name: Translated::uniform("Gas"),
            description: Translated::default(),
        };
        upsert_content_type(&conn, &ct).unwrap();
        ct.name.fi = Some("Kaasu".to_string());
        upsert_content_type(&conn, &ct).unwrap();

        let types = list_content_types(&conn).unwrap();
        assert_eq!(types, vec![ct]);
    }

    #[test]
    fn mobile_units_round_trip_and_delete_by_type() {
        let conn = crate::open_in_memory().unwrap();
        insert_mobile_unit(&conn, &unit("GasFillingStation", "A")).unwrap();
        insert_mobile_unit(&conn, &unit("GasFillingStation", "B")).unwrap();
        insert_mobile_unit(&conn, &unit("ChargingStation", "C")).unwrap();

        assert_eq!(count_mobile_units(&conn, None).unwrap(), 3);
        assert_eq!(
            count_mobile_units(&conn, Some("GasFillingStation")).unwrap(),
            2
        );

        let units = list_mobile_units(&conn, Some("GasFillingStation"), ALL).unwrap();
        assert_eq!(units[0].name, "A");
        assert_eq!(units[0].extra["lng_cng"], "CNG");
        assert!(units[0].id.is_some());

        assert_eq!(delete_mobile_units(&conn, "GasFillingStation").unwrap(), 2);
        assert_eq!(count_mobile_units(&conn, None).unwrap(), 1);
    }

    #[test]
    fn street_lookup_matches_lowercase_municipality() {
        let conn = crate::open_in_memory().unwrap();
        upsert_street(
            &conn,
            &Translated {
                fi: Some("Linnankatu".to_string()),
                sv: Some("Slottsgatan".to_string()),
                en: None,
            },
            "Turku",
        )
        .unwrap();

        let lookup = DuckDbStreetLookup::new(&conn);
        let names = translate_street_name(&lookup, "Linnankatu", "TURKU").unwrap();
        assert_eq!(names.get(Language::Sv), Some("Slottsgatan"));
        assert_eq!(names.get(Language::En), Some("Linnankatu"));

        assert_eq!(lookup.street_names("Linnankatu", "naantali").unwrap(), None);
    }
}
