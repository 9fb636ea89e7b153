use log::debug;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

use crate::filters::cache::AutocompleteCache;
use crate::filters::options::{cap_options, OptionSource};
use crate::filters::resource::{self, Completion, ResourcePath};
use crate::filters::validation::{ValidationMessages, ValueRule};
use crate::models::filter::{FilterCategory, FilterOption, FilterValue, WidgetKind};
use crate::utils::error::{AppError, AppResult, ValidationError};

/// Backend field names known to the flow store
pub mod fields {
    pub const SRC_NAMESPACE: &str = "SrcK8S_Namespace";
    pub const DST_NAMESPACE: &str = "DstK8S_Namespace";
    pub const SRC_NAME: &str = "SrcK8S_Name";
    pub const DST_NAME: &str = "DstK8S_Name";
    pub const SRC_TYPE: &str = "SrcK8S_Type";
    pub const DST_TYPE: &str = "DstK8S_Type";
    pub const SRC_ADDR: &str = "SrcAddr";
    pub const DST_ADDR: &str = "DstAddr";
    pub const SRC_PORT: &str = "SrcPort";
    pub const DST_PORT: &str = "DstPort";
    pub const PROTO: &str = "Proto";
}

/// Values constrained on one backend field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldConstraint {
    pub field: String,
    pub values: Vec<String>,
}

/// Expansion of chosen values into backend field constraints
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldMapping {
    /// Every value on one field
    Single(String),
    /// `kind.namespace.name` values spread over three fields
    Resource {
        kind: String,
        namespace: String,
        name: String,
    },
}

impl FieldMapping {
    pub fn single(field: &str) -> Self {
        FieldMapping::Single(field.to_string())
    }

    pub fn resource(kind: &str, namespace: &str, name: &str) -> Self {
        FieldMapping::Resource {
            kind: kind.to_string(),
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }

    pub fn apply(&self, values: &[FilterValue]) -> Vec<FieldConstraint> {
        match self {
            FieldMapping::Single(field) => vec![FieldConstraint {
                field: field.clone(),
                values: values.iter().map(|value| value.v.clone()).collect(),
            }],
            FieldMapping::Resource {
                kind,
                namespace,
                name,
            } => {
                let paths: Vec<ResourcePath> =
                    values.iter().map(|value| ResourcePath::split(&value.v)).collect();
                vec![
                    FieldConstraint {
                        field: kind.clone(),
                        values: paths.iter().map(|p| p.kind.clone()).collect(),
                    },
                    FieldConstraint {
                        field: namespace.clone(),
                        values: paths.iter().map(|p| p.namespace.clone()).collect(),
                    },
                    FieldConstraint {
                        field: name.clone(),
                        values: paths.iter().map(|p| p.name.clone()).collect(),
                    },
                ]
            }
        }
    }
}

/// Either one mapping for both sides, or one per side
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldMatching {
    Always(FieldMapping),
    Split {
        if_source: FieldMapping,
        if_destination: FieldMapping,
    },
}

impl FieldMatching {
    pub fn requires_split(&self) -> bool {
        matches!(self, FieldMatching::Split { .. })
    }
}

/// Static description of one filterable attribute
#[derive(Debug, Clone, Serialize)]
pub struct FilterDefinition {
    pub id: String,
    pub name: String,
    pub widget: WidgetKind,
    pub category: FilterCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<String>,
    #[serde(skip)]
    pub matching: FieldMatching,
    #[serde(skip)]
    pub rule: ValueRule,
    #[serde(skip)]
    pub options: OptionSource,
    #[serde(skip)]
    pub messages: Arc<ValidationMessages>,
}

impl FilterDefinition {
    pub fn validate(&self, raw: &str) -> Result<String, ValidationError> {
        self.rule.validate(raw, &self.messages)
    }

    /// Suggestions for `text`, capped to `max`
    pub fn suggestions(&self, text: &str, cache: &AutocompleteCache, max: usize) -> Vec<FilterOption> {
        cap_options(self.options.lookup(text, cache), max)
    }

    /// Apply a selected suggestion to the current text.
    ///
    /// Only resource paths are typed in stages; any other selection is final.
    pub fn check_completion(&self, text: &str, selected: &str) -> Completion {
        match self.rule {
            ValueRule::Resource => resource::check_completion(text, selected),
            _ => Completion {
                completed: true,
                option: FilterOption::named(selected),
            },
        }
    }
}

/// Everything a definition needs except its side
#[derive(Debug, Clone)]
pub struct DefinitionBase {
    pub id: String,
    pub name: String,
    pub widget: WidgetKind,
    pub rule: ValueRule,
    pub options: OptionSource,
    pub hint: Option<String>,
    pub examples: Option<String>,
    pub messages: Arc<ValidationMessages>,
}

impl DefinitionBase {
    pub fn new(
        id: &str,
        name: String,
        widget: WidgetKind,
        rule: ValueRule,
        options: OptionSource,
        messages: &Arc<ValidationMessages>,
    ) -> Self {
        Self {
            id: id.to_string(),
            name,
            widget,
            rule,
            options,
            hint: None,
            examples: None,
            messages: Arc::clone(messages),
        }
    }

    pub fn with_help(mut self, hint: String, examples: String) -> Self {
        self.hint = Some(hint);
        self.examples = Some(examples);
        self
    }

    pub fn define(self, id: String, category: FilterCategory, matching: FieldMatching) -> FilterDefinition {
        FilterDefinition {
            id,
            name: self.name,
            widget: self.widget,
            category,
            hint: self.hint,
            examples: self.examples,
            matching,
            rule: self.rule,
            options: self.options,
            messages: self.messages,
        }
    }
}

/// Source-only, destination-only and either-side definitions from one base
pub fn peers(base: DefinitionBase, src: FieldMapping, dst: FieldMapping) -> [FilterDefinition; 3] {
    let id = base.id.clone();
    [
        base.clone().define(
            format!("src_{}", id),
            FilterCategory::Source,
            FieldMatching::Always(src.clone()),
        ),
        base.clone().define(
            format!("dst_{}", id),
            FilterCategory::Destination,
            FieldMatching::Always(dst.clone()),
        ),
        base.define(
            id,
            FilterCategory::Common,
            FieldMatching::Split {
                if_source: src,
                if_destination: dst,
            },
        ),
    ]
}

/// Immutable registry of filter definitions, looked up by id
#[derive(Debug, Clone)]
pub struct Catalog {
    definitions: Vec<Arc<FilterDefinition>>,
}

impl Catalog {
    /// Build from explicit definitions; ids must be non-empty and unique
    pub fn from_definitions(definitions: Vec<FilterDefinition>) -> AppResult<Self> {
        let mut seen = HashSet::new();
        for def in &definitions {
            if def.id.is_empty() {
                return Err(AppError::Catalog("definition with empty id".to_string()));
            }
            if !seen.insert(def.id.clone()) {
                return Err(AppError::Catalog(format!("duplicate definition id: {}", def.id)));
            }
        }
        debug!("Built filter catalog with {} definitions", definitions.len());
        Ok(Self {
            definitions: definitions.into_iter().map(Arc::new).collect(),
        })
    }

    /// The flow console's catalog, with display strings passed through `t`
    pub fn builtin(t: &dyn Fn(&str) -> String) -> AppResult<Self> {
        use fields::*;

        let messages = Arc::new(ValidationMessages::translated(t));
        let k8s_hint = t("Specify a single kubernetes name.");
        let k8s_examples = format!(
            "{}\n- {}\n- {}\n- {}\n- {}\n- {}\n- {}\n- {}",
            t("Specify a single kubernetes name following these rules:"),
            t("Containing any alphanumeric, hyphen, underscrore or dot character"),
            t("Partial text like cluster, cluster-image, image-registry"),
            t("Exact match using quotes like \"cluster-image-registry\""),
            t("Case sensitive match using quotes like \"Deployment\""),
            t("Starting text like cluster, \"cluster-*\""),
            t("Ending text like \"*-registry\""),
            t("Pattern like \"cluster-*-registry\", \"c*-*-r*y\", -i*e-"),
        );

        let mut definitions = Vec::new();
        definitions.extend(peers(
            DefinitionBase::new(
                "namespace",
                t("Namespace"),
                WidgetKind::Autocomplete,
                ValueRule::K8sName,
                OptionSource::Namespaces,
                &messages,
            )
            .with_help(k8s_hint.clone(), k8s_examples.clone()),
            FieldMapping::single(SRC_NAMESPACE),
            FieldMapping::single(DST_NAMESPACE),
        ));
        definitions.extend(peers(
            DefinitionBase::new(
                "name",
                t("Name"),
                WidgetKind::FreeText,
                ValueRule::K8sName,
                OptionSource::NoOption,
                &messages,
            )
            .with_help(k8s_hint, k8s_examples),
            FieldMapping::single(SRC_NAME),
            FieldMapping::single(DST_NAME),
        ));
        definitions.extend(peers(
            DefinitionBase::new(
                "kind",
                t("Kind"),
                WidgetKind::Autocomplete,
                ValueRule::NonEmpty,
                OptionSource::Kinds,
                &messages,
            ),
            FieldMapping::single(SRC_TYPE),
            FieldMapping::single(DST_TYPE),
        ));
        definitions.extend(peers(
            DefinitionBase::new(
                "resource",
                t("Resource"),
                WidgetKind::Autocomplete,
                ValueRule::Resource,
                OptionSource::Resources,
                &messages,
            )
            .with_help(
                t("Specify an existing resource from its kind, namespace and name."),
                format!(
                    "{}\n- {}\n- {}\n- {}\n{}",
                    t("Specify a kind, namespace and name from existing:"),
                    t("Select kind first from suggestions"),
                    t("Then Select namespace from suggestions"),
                    t("Finally select name from suggestions"),
                    t("You can also directly specify a kind, namespace and name like pod.openshift.apiserver"),
                ),
            ),
            FieldMapping::resource(SRC_TYPE, SRC_NAMESPACE, SRC_NAME),
            FieldMapping::resource(DST_TYPE, DST_NAMESPACE, DST_NAME),
        ));
        definitions.extend(peers(
            DefinitionBase::new(
                "address",
                t("Address"),
                WidgetKind::FreeText,
                ValueRule::Address,
                OptionSource::NoOption,
                &messages,
            )
            .with_help(
                t("Specify a single address or range."),
                format!(
                    "{}\n- {}\n- {}\n- {}",
                    t("Specify addresses following one of these rules:"),
                    t("A single IPv4 or IPv6 address like 192.0.2.0, ::1"),
                    t("A range within the IP address like 192.168.0.1-192.189.10.12, 2001:db8::1-2001:db8::8"),
                    t("A CIDR specification like 192.51.100.0/24, 2001:db8::/32"),
                ),
            ),
            FieldMapping::single(SRC_ADDR),
            FieldMapping::single(DST_ADDR),
        ));
        definitions.extend(peers(
            DefinitionBase::new(
                "port",
                t("Port"),
                WidgetKind::Autocomplete,
                ValueRule::Port,
                OptionSource::Ports,
                &messages,
            )
            .with_help(
                t("Specify a single port number or name."),
                format!(
                    "{}\n- {}\n- {}",
                    t("Specify a single port following one of these rules:"),
                    t("A port number like 80, 21"),
                    t("A IANA name like HTTP, FTP"),
                ),
            ),
            FieldMapping::single(SRC_PORT),
            FieldMapping::single(DST_PORT),
        ));
        definitions.push(
            DefinitionBase::new(
                "protocol",
                t("Protocol"),
                WidgetKind::Autocomplete,
                ValueRule::Protocol,
                OptionSource::Protocols,
                &messages,
            )
            .with_help(
                t("Specify a single protocol number or name."),
                format!(
                    "{}\n- {}\n- {}",
                    t("Specify a single protocol following one of these rules:"),
                    t("A protocol number like 6, 17"),
                    t("A IANA name like TCP, UDP"),
                ),
            )
            .define(
                "protocol".to_string(),
                FilterCategory::None,
                FieldMatching::Always(FieldMapping::single(PROTO)),
            ),
        );

        Self::from_definitions(definitions)
    }

    pub fn find(&self, id: &str) -> Option<Arc<FilterDefinition>> {
        self.definitions.iter().find(|def| def.id == id).cloned()
    }

    pub fn definitions(&self) -> &[Arc<FilterDefinition>] {
        &self.definitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(key: &str) -> String {
        key.to_string()
    }

    #[test]
    fn test_builtin_catalog_has_peers() {
        let catalog = Catalog::builtin(&identity).unwrap();
        assert_eq!(catalog.definitions().len(), 19);

        for base in ["namespace", "name", "kind", "resource", "address", "port"] {
            let src = catalog.find(&format!("src_{}", base)).unwrap();
            let dst = catalog.find(&format!("dst_{}", base)).unwrap();
            let common = catalog.find(base).unwrap();
            assert_eq!(src.category, FilterCategory::Source);
            assert_eq!(dst.category, FilterCategory::Destination);
            assert_eq!(common.category, FilterCategory::Common);
            assert!(!src.matching.requires_split());
            assert!(!dst.matching.requires_split());
            assert!(common.matching.requires_split());
        }

        let protocol = catalog.find("protocol").unwrap();
        assert_eq!(protocol.category, FilterCategory::None);
        assert_eq!(
            protocol.matching,
            FieldMatching::Always(FieldMapping::single(fields::PROTO))
        );
        assert!(catalog.find("src_protocol").is_none());
    }

    #[test]
    fn test_peer_mappings_match_sides() {
        let catalog = Catalog::builtin(&identity).unwrap();
        let port = catalog.find("port").unwrap();
        assert_eq!(
            port.matching,
            FieldMatching::Split {
                if_source: FieldMapping::single("SrcPort"),
                if_destination: FieldMapping::single("DstPort"),
            }
        );
        let dst_port = catalog.find("dst_port").unwrap();
        assert_eq!(dst_port.matching, FieldMatching::Always(FieldMapping::single("DstPort")));
    }

    #[test]
    fn test_display_names_are_translated() {
        let catalog = Catalog::builtin(&|key: &str| key.to_uppercase()).unwrap();
        assert_eq!(catalog.find("src_namespace").unwrap().name, "NAMESPACE");
        let reason = catalog.find("port").unwrap().validate("nope").unwrap_err().reason;
        assert_eq!(reason, "UNKNOWN PORT");
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let messages = Arc::new(ValidationMessages::default());
        let base = DefinitionBase::new(
            "port",
            "Port".into(),
            WidgetKind::FreeText,
            ValueRule::Port,
            OptionSource::NoOption,
            &messages,
        );
        let mut definitions: Vec<FilterDefinition> = peers(
            base.clone(),
            FieldMapping::single("SrcPort"),
            FieldMapping::single("DstPort"),
        )
        .into();
        definitions.push(base.define(
            "port".into(),
            FilterCategory::None,
            FieldMatching::Always(FieldMapping::single("Port")),
        ));
        let err = Catalog::from_definitions(definitions).unwrap_err();
        assert!(matches!(err, AppError::Catalog(msg) if msg.contains("port")));
    }

    #[test]
    fn test_check_completion_depends_on_rule() {
        let catalog = Catalog::builtin(&identity).unwrap();
        let step = catalog.find("resource").unwrap().check_completion("P", "Pod");
        assert!(!step.completed);
        assert_eq!(step.option.value, "Pod.");

        let step = catalog.find("namespace").unwrap().check_completion("net", "netobserv");
        assert!(step.completed);
        assert_eq!(step.option.value, "netobserv");
    }

    #[test]
    fn test_resource_mapping_spreads_values() {
        let mapping = FieldMapping::resource("SrcK8S_Type", "SrcK8S_Namespace", "SrcK8S_Name");
        let constraints = mapping.apply(&[
            FilterValue::new("Pod.default.nginx"),
            FilterValue::new("Service.infra.db"),
        ]);
        assert_eq!(
            constraints,
            vec![
                FieldConstraint {
                    field: "SrcK8S_Type".into(),
                    values: vec!["Pod".into(), "Service".into()]
                },
                FieldConstraint {
                    field: "SrcK8S_Namespace".into(),
                    values: vec!["default".into(), "infra".into()]
                },
                FieldConstraint {
                    field: "SrcK8S_Name".into(),
                    values: vec!["nginx".into(), "db".into()]
                },
            ]
        );
    }
}
