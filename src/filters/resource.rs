//! `kind.namespace.name` resource paths, typed in three stages.

use serde::Serialize;

use crate::models::filter::FilterOption;

/// How far a resource path has been typed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceStage {
    /// No dot yet: `Pod`
    PartialKind,
    /// Kind entered: `Pod.def`
    PartialNamespace,
    /// Kind and namespace entered: `Pod.default.ngi`
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePath {
    pub stage: ResourceStage,
    pub kind: String,
    pub namespace: String,
    pub name: String,
}

impl ResourcePath {
    pub fn split(text: &str) -> Self {
        let mut parts = text.splitn(3, '.');
        let kind = parts.next().unwrap_or_default().to_string();
        let namespace = parts.next();
        let name = parts.next();
        let stage = match (namespace, name) {
            (None, _) => ResourceStage::PartialKind,
            (Some(_), None) => ResourceStage::PartialNamespace,
            (Some(_), Some(_)) => ResourceStage::Completed,
        };
        Self {
            stage,
            kind,
            namespace: namespace.unwrap_or_default().to_string(),
            name: name.unwrap_or_default().to_string(),
        }
    }

    /// Render back; partial stages keep a trailing dot so input moves on
    pub fn join(&self) -> String {
        match self.stage {
            ResourceStage::PartialKind => format!("{}.", self.kind),
            ResourceStage::PartialNamespace => format!("{}.{}.", self.kind, self.namespace),
            ResourceStage::Completed => format!("{}.{}.{}", self.kind, self.namespace, self.name),
        }
    }
}

/// Result of picking a suggestion while typing a resource path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub completed: bool,
    pub option: FilterOption,
}

/// Apply a selected suggestion to the segment currently being typed.
///
/// Kind and namespace selections advance to the next segment; a name
/// selection completes the path.
pub fn check_completion(text: &str, selected: &str) -> Completion {
    let mut path = ResourcePath::split(text);
    let completed = match path.stage {
        ResourceStage::PartialKind => {
            path.kind = selected.to_string();
            false
        }
        ResourceStage::PartialNamespace => {
            path.namespace = selected.to_string();
            false
        }
        ResourceStage::Completed => {
            path.name = selected.to_string();
            true
        }
    };
    let joined = path.join();
    Completion {
        completed,
        option: FilterOption::named(joined),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_stages() {
        let path = ResourcePath::split("Pod");
        assert_eq!(path.stage, ResourceStage::PartialKind);
        assert_eq!(path.kind, "Pod");

        let path = ResourcePath::split("Pod.def");
        assert_eq!(path.stage, ResourceStage::PartialNamespace);
        assert_eq!(path.namespace, "def");

        let path = ResourcePath::split("Pod.default.my.app");
        assert_eq!(path.stage, ResourceStage::Completed);
        assert_eq!(path.namespace, "default");
        assert_eq!(path.name, "my.app");
    }

    #[test]
    fn test_completion_walks_kind_namespace_name() {
        let step = check_completion("Po", "Pod");
        assert!(!step.completed);
        assert_eq!(step.option.value, "Pod.");

        let step = check_completion(&step.option.value, "default");
        assert!(!step.completed);
        assert_eq!(step.option.value, "Pod.default.");

        let step = check_completion(&step.option.value, "nginx");
        assert!(step.completed);
        assert_eq!(step.option.value, "Pod.default.nginx");
        assert_eq!(step.option.name, "Pod.default.nginx");
    }

    #[test]
    fn test_completion_replaces_partial_segment() {
        let step = check_completion("Pod.defa", "default");
        assert_eq!(step.option.value, "Pod.default.");
    }
}
