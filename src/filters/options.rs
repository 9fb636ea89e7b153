use futures::future::{self, BoxFuture, FutureExt};
use log::debug;

use crate::filters::cache::AutocompleteCache;
use crate::filters::catalog::FilterDefinition;
use crate::filters::registry::{self, PROTOCOLS, SERVICES};
use crate::filters::resource::{ResourcePath, ResourceStage};
use crate::models::filter::{FilterOption, FilterValue};

/// Default cap on suggestions shown to the user
pub const MAX_OPTIONS: usize = 10;

/// Where a definition's suggestions come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionSource {
    NoOption,
    Namespaces,
    Kinds,
    Resources,
    Ports,
    Protocols,
}

impl OptionSource {
    /// All suggestions for `text`, uncapped
    pub fn lookup(self, text: &str, cache: &AutocompleteCache) -> Vec<FilterOption> {
        match self {
            OptionSource::NoOption => Vec::new(),
            OptionSource::Namespaces => by_prefix(cache.namespaces(), text),
            OptionSource::Kinds => by_prefix(cache.kinds(), text),
            OptionSource::Resources => resource_options(text, cache),
            OptionSource::Ports => port_options(text),
            OptionSource::Protocols => protocol_options(text),
        }
    }
}

/// Keep at most `max` options
pub fn cap_options(mut options: Vec<FilterOption>, max: usize) -> Vec<FilterOption> {
    options.truncate(max);
    options
}

fn by_prefix(candidates: Vec<String>, text: &str) -> Vec<FilterOption> {
    let prefix = text.to_lowercase();
    candidates
        .into_iter()
        .filter(|candidate| candidate.to_lowercase().starts_with(&prefix))
        .map(FilterOption::named)
        .collect()
}

fn resource_options(text: &str, cache: &AutocompleteCache) -> Vec<FilterOption> {
    let path = ResourcePath::split(text);
    match path.stage {
        ResourceStage::PartialKind => by_prefix(cache.kinds(), &path.kind),
        ResourceStage::PartialNamespace => by_prefix(cache.namespaces(), &path.namespace),
        ResourceStage::Completed => by_prefix(
            cache.names(&path.kind, &path.namespace).unwrap_or_default(),
            &path.name,
        ),
    }
}

fn port_options(text: &str) -> Vec<FilterOption> {
    if text.is_empty() {
        return Vec::new();
    }
    if let Ok(port) = text.parse::<u16>() {
        return registry::service_by_port(port)
            .map(|service| FilterOption {
                name: service.name.to_string(),
                value: text.to_string(),
            })
            .into_iter()
            .collect();
    }
    let prefix = text.to_lowercase();
    SERVICES
        .iter()
        .filter(|service| service.name.starts_with(&prefix))
        .map(|service| FilterOption {
            name: service.name.to_string(),
            value: service.port.to_string(),
        })
        .collect()
}

fn protocol_options(text: &str) -> Vec<FilterOption> {
    let prefix = text.to_lowercase();
    PROTOCOLS
        .iter()
        .filter(|proto| {
            proto.number.to_string().starts_with(text)
                || proto.name.to_lowercase().starts_with(&prefix)
        })
        .map(|proto| FilterOption {
            name: proto.name.to_string(),
            value: proto.number.to_string(),
        })
        .collect()
}

/// Source of suggestions used to put display labels on raw values.
///
/// Resolution may suspend (e.g. a discovery call); dropping the future
/// cancels it.
pub trait OptionResolver: Send + Sync {
    fn options<'a>(
        &'a self,
        definition: &'a FilterDefinition,
        text: &'a str,
    ) -> BoxFuture<'a, Vec<FilterOption>>;
}

impl OptionResolver for AutocompleteCache {
    fn options<'a>(
        &'a self,
        definition: &'a FilterDefinition,
        text: &'a str,
    ) -> BoxFuture<'a, Vec<FilterOption>> {
        future::ready(definition.options.lookup(text, self)).boxed()
    }
}

/// Resolve a display label for a raw value; `v` is kept as given
pub async fn create_filter_value(
    definition: &FilterDefinition,
    raw: &str,
    resolver: &dyn OptionResolver,
) -> FilterValue {
    let options = resolver.options(definition, raw).await;
    match options
        .into_iter()
        .find(|opt| opt.name == raw || opt.value == raw)
    {
        Some(option) => FilterValue {
            v: raw.to_string(),
            display: Some(option.name),
        },
        None => {
            debug!("No option found for {}={}", definition.id, raw);
            FilterValue::new(raw)
        }
    }
}
