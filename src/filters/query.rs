//! Compilation of active filters into the flow store's query grammar.
//!
//! The grammar is `field=v1,v2&field2=v3|field3=v4`, percent-encoded:
//! `|` separates alternative groups, `&` separates fields of a group and `,`
//! separates values of a field (OR'd by the backend). A negated field is
//! written `field!=v`.
//!
//! "Match all" keeps constraints of a common (either side) filter on the same
//! side: `Namespace=foo` with `Port=80` becomes
//! `SrcK8S_Namespace=foo&SrcPort=80|DstK8S_Namespace=foo&DstPort=80`.

use indexmap::IndexMap;
use log::debug;

use crate::filters::catalog::{FieldMapping, FieldMatching};
use crate::models::filter::{Filter, Match};

const GROUP_SEPARATOR: &str = "|";
const FIELD_SEPARATOR: &str = "&";
const VALUE_SEPARATOR: &str = ",";
const NEGATION_MARK: char = '!';

/// Backend field, with the comparison flipped when negated
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldKey {
    pub field: String,
    pub negated: bool,
}

impl FieldKey {
    pub fn new(field: impl Into<String>, negated: bool) -> Self {
        Self {
            field: field.into(),
            negated,
        }
    }
}

/// Field constraints that must all hold; keys keep first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AndGroup {
    fields: IndexMap<FieldKey, Vec<String>>,
}

impl AndGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `values` under `key`, after any values already there
    pub fn add(&mut self, key: FieldKey, values: &[String]) {
        self.fields.entry(key).or_default().extend_from_slice(values);
    }

    pub fn get(&self, field: &str, negated: bool) -> Option<&[String]> {
        self.fields
            .get(&FieldKey::new(field, negated))
            .map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &Vec<String>)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn merge_mapping(&mut self, mapping: &FieldMapping, filter: &Filter) {
        for constraint in mapping.apply(&filter.values) {
            self.add(FieldKey::new(constraint.field, filter.negated), &constraint.values);
        }
    }

    fn from_mapping(mapping: &FieldMapping, filter: &Filter) -> Self {
        let mut group = Self::new();
        group.merge_mapping(mapping, filter);
        group
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<String>)> for AndGroup {
    fn from_iter<I: IntoIterator<Item = (K, Vec<String>)>>(iter: I) -> Self {
        let mut group = Self::new();
        for (field, values) in iter {
            group.add(FieldKey::new(field, false), &values);
        }
        group
    }
}

/// Alternative groups, any of which is enough
pub type OrGroup = Vec<AndGroup>;

/// Group for "match all": one group, or src-side OR dst-side when any
/// filter is common to both sides
pub fn group_match_all(filters: &[Filter]) -> OrGroup {
    let mut src_group = AndGroup::new();
    let mut dst_group = AndGroup::new();
    for filter in filters {
        match &filter.definition.matching {
            FieldMatching::Always(mapping) => {
                src_group.merge_mapping(mapping, filter);
                dst_group.merge_mapping(mapping, filter);
            }
            FieldMatching::Split {
                if_source,
                if_destination,
            } => {
                src_group.merge_mapping(if_source, filter);
                dst_group.merge_mapping(if_destination, filter);
            }
        }
    }
    if filters
        .iter()
        .any(|filter| filter.definition.matching.requires_split())
    {
        vec![src_group, dst_group]
    } else {
        vec![src_group]
    }
}

/// Group for "match any": one group per filter, two for a common filter
pub fn group_match_any(filters: &[Filter]) -> OrGroup {
    let mut groups = OrGroup::new();
    for filter in filters {
        match &filter.definition.matching {
            FieldMatching::Always(mapping) => {
                groups.push(AndGroup::from_mapping(mapping, filter));
            }
            FieldMatching::Split {
                if_source,
                if_destination,
            } => {
                groups.push(AndGroup::from_mapping(if_source, filter));
                groups.push(AndGroup::from_mapping(if_destination, filter));
            }
        }
    }
    groups
}

pub fn compile_match_all(filters: &[Filter]) -> String {
    encode_filters(&group_match_all(filters))
}

pub fn compile_match_any(filters: &[Filter]) -> String {
    encode_filters(&group_match_any(filters))
}

pub fn compile(filters: &[Filter], match_mode: Match) -> String {
    let query = match match_mode {
        Match::All => compile_match_all(filters),
        Match::Any => compile_match_any(filters),
    };
    debug!("Compiled {} filters (match {}): {}", filters.len(), match_mode, query);
    query
}

/// Render groups to the percent-encoded query grammar
pub fn encode_filters(groups: &[AndGroup]) -> String {
    let raw = groups
        .iter()
        .map(|group| {
            group
                .iter()
                .map(|(key, values)| {
                    let op = if key.negated { "!=" } else { "=" };
                    format!("{}{}{}", key.field, op, values.join(VALUE_SEPARATOR))
                })
                .collect::<Vec<_>>()
                .join(FIELD_SEPARATOR)
        })
        .collect::<Vec<_>>()
        .join(GROUP_SEPARATOR);
    urlencoding::encode(&raw).into_owned()
}

/// Parse a percent-encoded query back into groups.
///
/// Pieces without a `field=values` shape are skipped.
pub fn decode_filters(encoded: &str) -> OrGroup {
    let raw = match urlencoding::decode(encoded) {
        Ok(raw) => raw.into_owned(),
        Err(e) => {
            debug!("Query is not valid UTF-8 once decoded: {}", e);
            return Vec::new();
        }
    };
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(GROUP_SEPARATOR)
        .map(|group| {
            let mut and_group = AndGroup::new();
            for pair in group.split(FIELD_SEPARATOR) {
                let Some((key, values)) = pair.split_once('=') else {
                    continue;
                };
                let (field, negated) = match key.strip_suffix(NEGATION_MARK) {
                    Some(field) => (field, true),
                    None => (key, false),
                };
                if field.is_empty() {
                    continue;
                }
                let values: Vec<String> =
                    values.split(VALUE_SEPARATOR).map(str::to_string).collect();
                and_group.add(FieldKey::new(field, negated), &values);
            }
            and_group
        })
        .collect()
}
