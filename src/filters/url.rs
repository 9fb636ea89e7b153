//! Page URL encoding of the active filter list.
//!
//! Grammar of the `filters` parameter: `id=v1,v2;id2!=v3`, percent-encoded.
//! This is independent from the backend query grammar.

use futures::future::join_all;
use log::{debug, warn};

use crate::filters::catalog::Catalog;
use crate::filters::options::{create_filter_value, OptionResolver};
use crate::models::filter::{Filter, Match};

/// Page URL parameter holding the filter list
pub const FILTERS_PARAM: &str = "filters";
/// Page URL parameter holding the match mode
pub const MATCH_PARAM: &str = "match";

const FILTERS_SEPARATOR: &str = ";";
const KEY_VALUE_SEPARATOR: &str = "=";
const NEGATED_KEY_VALUE_SEPARATOR: &str = "!=";
const VALUES_SEPARATOR: &str = ",";

/// Render filters as a percent-encoded `filters` value, using raw values only
pub fn serialize(filters: &[Filter]) -> String {
    let raw = filters
        .iter()
        .map(|filter| {
            let separator = if filter.negated {
                NEGATED_KEY_VALUE_SEPARATOR
            } else {
                KEY_VALUE_SEPARATOR
            };
            format!(
                "{}{}{}",
                filter.id(),
                separator,
                filter.raw_values().join(VALUES_SEPARATOR)
            )
        })
        .collect::<Vec<_>>()
        .join(FILTERS_SEPARATOR);
    urlencoding::encode(&raw).into_owned()
}

/// One `id=values` entry before its values are resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlEntry {
    pub id: String,
    pub negated: bool,
    pub values: Vec<String>,
}

/// Split a percent-encoded `filters` value into entries.
///
/// Entries without a single key/value separator, or without any non-empty
/// value, are skipped.
pub fn parse_entries(url_value: &str) -> Vec<UrlEntry> {
    let raw = match urlencoding::decode(url_value) {
        Ok(raw) => raw.into_owned(),
        Err(e) => {
            warn!("Ignoring undecodable filters parameter: {}", e);
            return Vec::new();
        }
    };
    raw.split(FILTERS_SEPARATOR)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let (key, values) = entry.split_once(KEY_VALUE_SEPARATOR)?;
            if values.contains(KEY_VALUE_SEPARATOR) {
                debug!("Skipping ambiguous filter entry: {}", entry);
                return None;
            }
            let (id, negated) = match key.strip_suffix('!') {
                Some(id) => (id, true),
                None => (key, false),
            };
            let values: Vec<String> = values
                .split(VALUES_SEPARATOR)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
                .collect();
            if values.is_empty() {
                return None;
            }
            Some(UrlEntry {
                id: id.to_string(),
                negated,
                values,
            })
        })
        .collect()
}

/// Restore filters from a percent-encoded `filters` value.
///
/// Ids missing from the catalog are dropped. Each value goes through the
/// definition's option lookup to recover its display label.
pub async fn deserialize(
    url_value: &str,
    catalog: &Catalog,
    resolver: &dyn OptionResolver,
) -> Vec<Filter> {
    let mut pending = Vec::new();
    for entry in parse_entries(url_value) {
        let Some(definition) = catalog.find(&entry.id) else {
            warn!("Dropping unknown filter id from URL: {}", entry.id);
            continue;
        };
        pending.push(async move {
            let values = join_all(
                entry
                    .values
                    .iter()
                    .map(|raw| create_filter_value(&definition, raw, resolver)),
            )
            .await;
            Filter::new(definition, entry.negated, values)
        });
    }
    join_all(pending).await
}

/// Parameters of the page URL owned by the filter model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageParams {
    /// Still percent-encoded; pass to [`deserialize`]
    pub filters: Option<String>,
    pub match_mode: Match,
}

/// Build the page query string for `filters` and `match_mode`
pub fn page_query(filters: &[Filter], match_mode: Match) -> String {
    format!(
        "{}={}&{}={}",
        FILTERS_PARAM,
        serialize(filters),
        MATCH_PARAM,
        match_mode
    )
}

/// Read `filters` and `match` from a page query string (leading `?` allowed).
///
/// A missing or unknown match mode falls back to the default.
pub fn parse_page_query(query: &str) -> PageParams {
    let mut params = PageParams {
        filters: None,
        match_mode: Match::default(),
    };
    for pair in query.trim_start_matches('?').split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        match key {
            FILTERS_PARAM => params.filters = Some(value.to_string()),
            MATCH_PARAM => match value.parse() {
                Ok(match_mode) => params.match_mode = match_mode,
                Err(e) => debug!("Keeping default match mode: {}", e),
            },
            _ => {}
        }
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::cache::AutocompleteCache;
    use crate::models::filter::FilterValue;
    use pretty_assertions::assert_eq;

    fn catalog() -> Catalog {
        Catalog::builtin(&|key: &str| key.to_string()).unwrap()
    }

    fn filter(catalog: &Catalog, id: &str, negated: bool, values: &[&str]) -> Filter {
        Filter::new(
            catalog.find(id).unwrap(),
            negated,
            values.iter().map(|v| FilterValue::new(*v)).collect(),
        )
    }

    #[test]
    fn test_serialize_uses_raw_values_and_negation() {
        let catalog = catalog();
        let filters = vec![
            Filter::new(
                catalog.find("src_port").unwrap(),
                false,
                vec![FilterValue::with_display("80", "http"), FilterValue::new("8080")],
            ),
            filter(&catalog, "dst_name", true, &["test"]),
        ];
        assert_eq!(serialize(&filters), "src_port%3D80%2C8080%3Bdst_name%21%3Dtest");
        assert_eq!(serialize(&[]), "");
    }

    #[test]
    fn test_parse_entries_skips_malformed() {
        let entries = parse_entries("a%3D1%3Bb%3D%3Bc%3Bd%3Dx%3Dy%3Be%21%3D2%2C3");
        assert_eq!(
            entries,
            vec![
                UrlEntry {
                    id: "a".into(),
                    negated: false,
                    values: vec!["1".into()]
                },
                UrlEntry {
                    id: "e".into(),
                    negated: true,
                    values: vec!["2".into(), "3".into()]
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_deserialize_drops_unknown_ids() {
        let catalog = catalog();
        let cache = AutocompleteCache::new();
        let filters = deserialize("gone%3Dx%3Bsrc_port%3D443", &catalog, &cache).await;
        assert_eq!(filters.len(), 1);
        assert_eq!(filters[0].id(), "src_port");
        assert_eq!(filters[0].values, vec![FilterValue::with_display("443", "https")]);
    }

    #[tokio::test]
    async fn test_deserialize_resolves_labels_from_cache() {
        let catalog = catalog();
        let cache = AutocompleteCache::new();
        cache.set_namespaces(vec!["netobserv".into()]);
        let filters = deserialize("namespace%3Dnetobserv%2Cother", &catalog, &cache).await;
        assert_eq!(
            filters[0].values,
            vec![
                FilterValue::with_display("netobserv", "netobserv"),
                FilterValue::new("other")
            ]
        );
    }

    #[test]
    fn test_page_query() {
        let catalog = catalog();
        let filters = vec![filter(&catalog, "protocol", false, &["TCP"])];
        let query = page_query(&filters, Match::Any);
        assert_eq!(query, "filters=protocol%3DTCP&match=any");

        let params = parse_page_query(&format!("?{}", query));
        assert_eq!(params.filters.as_deref(), Some("protocol%3DTCP"));
        assert_eq!(params.match_mode, Match::Any);

        let params = parse_page_query("?match=bogus");
        assert_eq!(params.filters, None);
        assert_eq!(params.match_mode, Match::All);
    }
}
