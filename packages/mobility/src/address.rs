//! Street address parsing and street name translation.

use std::sync::LazyLock;

use city_data_mobility_models::{Language, Translated};
use regex::Regex;

use crate::MobilityError;

static STREET_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\d]+").unwrap_or_else(|_| unreachable!()));

/// Splits an address like `"Ratapihankatu 3 B"` into the street name
/// (`"Ratapihankatu"`) and the remainder starting at the first digit
/// (`"3 B"`).
///
/// The number is empty when the address has no digits. An address that
/// starts with a digit is returned whole as the street name.
#[must_use]
pub fn split_street_address(address: &str) -> (String, String) {
    STREET_NAME_RE.find(address).map_or_else(
        || (address.trim().to_string(), String::new()),
        |m| {
            (
                m.as_str().trim_end().to_string(),
                address[m.end()..].to_string(),
            )
        },
    )
}

/// Translated names of a known street.
pub trait StreetNameLookup {
    /// Looks up `name` in `municipality` (lowercase). Returns `None` if the
    /// street is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`MobilityError::Lookup`] if the backing store fails.
    fn street_names(
        &self,
        name: &str,
        municipality: &str,
    ) -> Result<Option<Translated>, MobilityError>;
}

/// Street name in each language.
///
/// Known streets use their translation, falling back to the Finnish name
/// where a language is missing. Unknown streets use `name` for every
/// language.
///
/// # Errors
///
/// Propagates lookup failures.
pub fn translate_street_name(
    lookup: &dyn StreetNameLookup,
    name: &str,
    municipality: &str,
) -> Result<Translated, MobilityError> {
    let Some(known) = lookup.street_names(name, &municipality.to_lowercase())? else {
        return Ok(Translated::uniform(name));
    };

    let fallback = known.fi.clone().unwrap_or_else(|| name.to_string());
    Ok(Translated::from_fn(|lang| {
        known
            .get(lang)
            .filter(|s| !s.is_empty())
            .map_or_else(|| fallback.clone(), str::to_string)
    }))
}

/// Formats `"{street} {number}, {zip} {city}"`, dropping the number when
/// it is empty.
#[must_use]
pub fn format_address(street: &str, number: &str, zip_code: &str, city: &str) -> String {
    if number.is_empty() {
        format!("{street}, {zip_code} {city}")
    } else {
        format!("{street} {number}, {zip_code} {city}")
    }
}

/// Full address in each language.
///
/// # Errors
///
/// Propagates lookup failures.
pub fn translated_address(
    lookup: &dyn StreetNameLookup,
    address: &str,
    zip_code: &str,
    city: &str,
) -> Result<Translated, MobilityError> {
    let (street, number) = split_street_address(address);
    let streets = translate_street_name(lookup, &street, city)?;

    Ok(Translated::from_fn(|lang: Language| {
        format_address(streets.get(lang).unwrap_or(&street), &number, zip_code, city)
    }))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Lookup knowing only Linnankatu in Turku.
    pub struct FakeStreets;

    impl StreetNameLookup for FakeStreets {
        fn street_names(
            &self,
            name: &str,
            municipality: &str,
        ) -> Result<Option<Translated>, MobilityError> {
            if name == "Linnankatu" && municipality == "turku" {
                Ok(Some(Translated {
                    fi: Some("Linnankatu".to_string()),
                    sv: Some("Slottsgatan".to_string()),
                    en: None,
                }))
            } else {
                Ok(None)
            }
        }
    }

    #[test]
    fn splits_name_and_number() {
        assert_eq!(
            split_street_address("Ratapihankatu 3 B"),
            ("Ratapihankatu".to_string(), "3 B".to_string())
        );
        assert_eq!(
            split_street_address("Satamatie"),
            ("Satamatie".to_string(), String::new())
        );
        assert_eq!(
            split_street_address("Vt 1 Paimio"),
            ("Vt".to_string(), "1 Paimio".to_string())
        );
    }

    #[test]
    fn leading_digit_keeps_whole_address() {
        assert_eq!(
            split_street_address("12 Main"),
            ("12 Main".to_string(), String::new())
        );
    }

    #[test]
    fn known_street_falls_back_to_finnish() {
        let names = translate_street_name(&FakeStreets, "Linnankatu", "Turku").unwrap();
        assert_eq!(names.get(Language::Fi), Some("Linnankatu"));
        assert_eq!(names.get(Language::Sv), Some("Slottsgatan"));
        assert_eq!(names.get(Language::En), Some("Linnankatu"));
    }

    #[test]
    fn unknown_street_uses_input_name() {
        let names = translate_street_name(&FakeStreets, "Satamatie", "Naantali").unwrap();
        assert_eq!(names, Translated::uniform("Satamatie"));
    }

    #[test]
    fn formats_with_and_without_number() {
        let address = translated_address(&FakeStreets, "Linnankatu 10", "20100", "Turku").unwrap();
        assert_eq!(address.get(Language::Fi), Some("Linnankatu 10, 20100 Turku"));
        assert_eq!(address.get(Language::Sv), Some("Slottsgatan 10, 20100 Turku"));

        let address = translated_address(&FakeStreets, "Satamatie", "21100", "Naantali").unwrap();
        assert_eq!(address.get(Language::En), Some("Satamatie, 21100 Naantali"));
    }
}
