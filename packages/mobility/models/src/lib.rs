#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Mobility points of interest.
//!
//! Every point belongs to a [`ContentType`] (gas filling station, charging
//! station, ...). Names, descriptions and addresses are carried in the
//! three service languages as [`Translated`] values.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Service language.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    /// Finnish
    Fi,
    /// Swedish
    Sv,
    /// English
    En,
}

impl Language {
    /// Returns every language in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Fi, Self::Sv, Self::En]
    }
}

/// A text in each service language. Missing translations are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translated {
    /// Finnish text.
    #[serde(default)]
    pub fi: Option<String>,
    /// Swedish text.
    #[serde(default)]
    pub sv: Option<String>,
    /// English text.
    #[serde(default)]
    pub en: Option<String>,
}

impl Translated {
    /// The same text in every language.
    #[must_use]
    pub fn uniform(text: &str) -> Self {
        Self {
            fi: Some(text.to_string()),
            sv: Some(text.to_string()),
            en: Some(text.to_string()),
        }
    }

    /// Text for `language`, if present.
    #[must_use]
    pub fn get(&self, language: Language) -> Option<&str> {
        match language {
            Language::Fi => self.fi.as_deref(),
            Language::Sv => self.sv.as_deref(),
            Language::En => self.en.as_deref(),
        }
    }

    /// Sets the text for `language`.
    pub fn set(&mut self, language: Language, text: String) {
        match language {
            Language::Fi => self.fi = Some(text),
            Language::Sv => self.sv = Some(text),
            Language::En => self.en = Some(text),
        }
    }

    /// Builds a value by computing the text for each language.
    pub fn from_fn(mut f: impl FnMut(Language) -> String) -> Self {
        let mut translated = Self::default();
        for lang in Language::all() {
            translated.set(*lang, f(*lang));
        }
        translated
    }
}

/// A category of mobile units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentType {
    /// Stable identifier, e.g. `GasFillingStation`.
    pub type_name: String,
    /// Display name.
    pub name: Translated,
    /// Longer description.
    #[serde(default)]
    pub description: Translated,
}

/// A point of interest shown on the mobility map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MobileUnit {
    /// Database ID, `None` until stored.
    pub id: Option<i64>,
    /// [`ContentType::type_name`] of the unit.
    pub type_name: String,
    /// Unit name.
    pub name: String,
    /// Whether the unit is in service.
    pub is_active: bool,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Full address per language.
    pub address: Translated,
    /// Type-specific attributes.
    pub extra: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_fn_fills_every_language() {
        let t = Translated::from_fn(|lang| format!("x-{lang}"));
        assert_eq!(t.get(Language::Fi), Some("x-fi"));
        assert_eq!(t.get(Language::Sv), Some("x-sv"));
        assert_eq!(t.get(Language::En), Some("x-en"));
    }

    #[test]
    fn missing_languages_deserialize_as_none() {
        let t: Translated = serde_json::from_str(r#"{"fi": "Kaasuasema"}"#).unwrap();
        assert_eq!(t.fi.as_deref(), Some("Kaasuasema"));
        assert!(t.sv.is_none());
        assert!(t.en.is_none());
    }

    #[test]
    fn language_parses_from_code() {
        assert_eq!("sv".parse::<Language>().unwrap(), Language::Sv);
        assert_eq!(Language::En.as_ref(), "en");
    }
}
