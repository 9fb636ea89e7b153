use log::debug;
use std::sync::Arc;

use crate::filters::catalog::FilterDefinition;
use crate::models::filter::{Filter, FilterValue};
use crate::utils::error::{AppError, AppResult};

/// Active filter with this definition id and negation
pub fn find_filter<'a>(filters: &'a [Filter], id: &str, negated: bool) -> Option<&'a Filter> {
    filters
        .iter()
        .find(|filter| filter.id() == id && filter.negated == negated)
}

/// Add a value under `definition` and `negated`.
///
/// Joins an existing filter with the same definition and negation, or
/// appends a new one. A value already present is rejected and the list is
/// left as is.
pub fn add_filter_value(
    filters: &mut Vec<Filter>,
    definition: &Arc<FilterDefinition>,
    negated: bool,
    value: FilterValue,
) -> AppResult<()> {
    let existing = filters
        .iter_mut()
        .find(|filter| filter.id() == definition.id && filter.negated == negated);
    match existing {
        Some(filter) => {
            if filter.values.iter().any(|current| current.v == value.v) {
                return Err(AppError::DuplicateFilter);
            }
            debug!("Adding {} to filter {}", value.v, definition.id);
            filter.values.push(value);
        }
        None => {
            debug!("New filter {} (negated: {})", definition.id, negated);
            filters.push(Filter::new(Arc::clone(definition), negated, vec![value]));
        }
    }
    Ok(())
}

/// Remove a value; a filter left without values is removed too.
///
/// Returns whether anything was removed.
pub fn remove_filter_value(filters: &mut Vec<Filter>, id: &str, negated: bool, v: &str) -> bool {
    let Some(index) = filters
        .iter()
        .position(|filter| filter.id() == id && filter.negated == negated)
    else {
        return false;
    };
    let filter = &mut filters[index];
    let before = filter.values.len();
    filter.values.retain(|value| value.v != v);
    let removed = filter.values.len() != before;
    if filter.values.is_empty() {
        filters.remove(index);
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::catalog::Catalog;

    fn catalog() -> Catalog {
        Catalog::builtin(&|key: &str| key.to_string()).unwrap()
    }

    #[test]
    fn test_add_groups_by_definition_and_negation() {
        let catalog = catalog();
        let port = catalog.find("port").unwrap();
        let mut filters = Vec::new();

        add_filter_value(&mut filters, &port, false, FilterValue::new("80")).unwrap();
        add_filter_value(&mut filters, &port, false, FilterValue::new("443")).unwrap();
        add_filter_value(&mut filters, &port, true, FilterValue::new("80")).unwrap();

        assert_eq!(filters.len(), 2);
        assert_eq!(find_filter(&filters, "port", false).unwrap().raw_values(), vec!["80", "443"]);
        assert_eq!(find_filter(&filters, "port", true).unwrap().raw_values(), vec!["80"]);
    }

    #[test]
    fn test_duplicate_value_is_rejected_without_change() {
        let catalog = catalog();
        let namespace = catalog.find("src_namespace").unwrap();
        let mut filters = Vec::new();
        add_filter_value(&mut filters, &namespace, false, FilterValue::new("foo")).unwrap();

        let err = add_filter_value(
            &mut filters,
            &namespace,
            false,
            FilterValue::with_display("foo", "Foo"),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::DuplicateFilter));
        assert_eq!(err.to_string(), "Filter already exists");
        assert_eq!(filters[0].values, vec![FilterValue::new("foo")]);
    }

    #[test]
    fn test_remove_drops_empty_filter() {
        let catalog = catalog();
        let kind = catalog.find("kind").unwrap();
        let mut filters = Vec::new();
        add_filter_value(&mut filters, &kind, false, FilterValue::new("Pod")).unwrap();
        add_filter_value(&mut filters, &kind, false, FilterValue::new("Service")).unwrap();

        assert!(remove_filter_value(&mut filters, "kind", false, "Pod"));
        assert_eq!(filters[0].raw_values(), vec!["Service"]);
        assert!(!remove_filter_value(&mut filters, "kind", true, "Service"));
        assert!(remove_filter_value(&mut filters, "kind", false, "Service"));
        assert!(filters.is_empty());
    }
}
