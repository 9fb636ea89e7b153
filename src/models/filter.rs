use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::filters::catalog::FilterDefinition;
use crate::utils::error::AppError;

/// Which traffic side a definition was derived for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterCategory {
    Source,
    Destination,
    /// Either side; compiled with a source/destination split
    Common,
    /// Not tied to a side at all (e.g. protocol)
    None,
}

/// Input widget the console should render for a definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    FreeText,
    Autocomplete,
}

/// One chosen value of an active filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterValue {
    /// Canonical value sent to the backend
    pub v: String,

    /// Human label, UI only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl FilterValue {
    pub fn new(v: impl Into<String>) -> Self {
        Self {
            v: v.into(),
            display: None,
        }
    }

    pub fn with_display(v: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            v: v.into(),
            display: Some(display.into()),
        }
    }
}

/// Autocomplete suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub name: String,
    pub value: String,
}

impl FilterOption {
    /// Option whose label is its own value
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            value: name.clone(),
            name,
        }
    }
}

/// An active, user-added filter
#[derive(Debug, Clone, Serialize)]
pub struct Filter {
    #[serde(rename = "id", serialize_with = "serialize_definition_id")]
    pub definition: Arc<FilterDefinition>,

    /// Flips the comparison at the backend-field level
    pub negated: bool,

    /// Values are OR'd against the definition's fields
    pub values: Vec<FilterValue>,
}

impl Filter {
    pub fn new(definition: Arc<FilterDefinition>, negated: bool, values: Vec<FilterValue>) -> Self {
        Self {
            definition,
            negated,
            values,
        }
    }

    pub fn id(&self) -> &str {
        &self.definition.id
    }

    /// Raw backend values, in order
    pub fn raw_values(&self) -> Vec<&str> {
        self.values.iter().map(|value| value.v.as_str()).collect()
    }
}

impl PartialEq for Filter {
    fn eq(&self, other: &Self) -> bool {
        self.definition.id == other.definition.id
            && self.negated == other.negated
            && self.values == other.values
    }
}

fn serialize_definition_id<S: Serializer>(
    definition: &Arc<FilterDefinition>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&definition.id)
}

/// How active filters combine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Match {
    /// Every filter must hold (on the same side when split)
    #[default]
    All,
    /// Any filter may hold
    Any,
}

impl FromStr for Match {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Match::All),
            "any" => Ok(Match::Any),
            _ => Err(AppError::GenericError(format!("Invalid match mode: {}", s))),
        }
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Match::All => f.write_str("all"),
            Match::Any => f.write_str("any"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_from_str() {
        assert_eq!("all".parse::<Match>().unwrap(), Match::All);
        assert_eq!("ANY".parse::<Match>().unwrap(), Match::Any);
        assert!("some".parse::<Match>().is_err());
        assert_eq!(Match::default(), Match::All);
    }

    #[test]
    fn test_filter_value_display_is_skipped_when_absent() {
        let json = serde_json::to_string(&FilterValue::new("80")).unwrap();
        assert_eq!(json, r#"{"v":"80"}"#);
        let json = serde_json::to_string(&FilterValue::with_display("80", "http")).unwrap();
        assert_eq!(json, r#"{"v":"80","display":"http"}"#);
    }
}
