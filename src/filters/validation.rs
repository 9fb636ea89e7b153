use lazy_static::lazy_static;
use regex::Regex;
use std::net::IpAddr;

use crate::filters::registry;
use crate::filters::resource::{ResourcePath, ResourceStage};
use crate::utils::error::ValidationError;

/// Literal token meaning "exact match on empty value"
pub const EMPTY_EXACT: &str = "\"\"";

lazy_static! {
    static ref K8S_NAME: Regex = Regex::new(r"^[A-Za-z0-9_.*\-]+$").unwrap();
    static ref K8S_QUOTED_NAME: Regex = Regex::new(r#"^"[A-Za-z0-9_.*\-]*"$"#).unwrap();
}

/// Per-definition normalization rule for raw text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueRule {
    /// Kubernetes name, partial or quoted for exact match
    K8sName,
    /// Only rejects empty input
    NonEmpty,
    /// IP, CIDR or hyphenated IP range
    Address,
    /// Port number or known service name
    Port,
    /// Protocol number or IANA keyword
    Protocol,
    /// Complete `kind.namespace.name`
    Resource,
}

/// Translated rejection reasons, resolved once when the catalog is built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationMessages {
    pub empty: String,
    pub not_k8s_name: String,
    pub not_address: String,
    pub unknown_port: String,
    pub unknown_protocol: String,
    pub incomplete_resource: String,
    pub empty_kind: String,
    pub invalid_kind: String,
    pub invalid_namespace: String,
    pub invalid_name: String,
}

impl ValidationMessages {
    pub fn translated(t: &dyn Fn(&str) -> String) -> Self {
        Self {
            empty: t("Value is empty"),
            not_k8s_name: t("Not a valid Kubernetes name"),
            not_address: t(
                "Not a valid IPv4 or IPv6, nor a CIDR, nor an IP range separated by hyphen",
            ),
            unknown_port: t("Unknown port"),
            unknown_protocol: t("Unknown protocol"),
            incomplete_resource: t(
                "Incomplete resource name, either kind, namespace or name is missing.",
            ),
            empty_kind: t("Kind is empty"),
            invalid_kind: t("Kind: not a valid Kubernetes name"),
            invalid_namespace: t("Namespace: not a valid Kubernetes name"),
            invalid_name: t("Name: not a valid Kubernetes name"),
        }
    }
}

impl Default for ValidationMessages {
    fn default() -> Self {
        Self::translated(&|key: &str| key.to_string())
    }
}

impl ValueRule {
    /// Normalize `raw` to its canonical value, or explain why it is rejected
    pub fn validate(
        self,
        raw: &str,
        messages: &ValidationMessages,
    ) -> Result<String, ValidationError> {
        let reject = |reason: &String| Err(ValidationError::new(reason.clone()));
        match self {
            ValueRule::K8sName => {
                if raw.is_empty() {
                    Ok(EMPTY_EXACT.to_string())
                } else if is_k8s_name(raw) || K8S_QUOTED_NAME.is_match(raw) {
                    Ok(raw.to_string())
                } else {
                    reject(&messages.not_k8s_name)
                }
            }
            ValueRule::NonEmpty => {
                if raw.is_empty() {
                    reject(&messages.empty)
                } else {
                    Ok(raw.to_string())
                }
            }
            ValueRule::Address => {
                if raw.is_empty() {
                    reject(&messages.empty)
                } else if is_ip_filter(raw) {
                    Ok(raw.to_string())
                } else {
                    reject(&messages.not_address)
                }
            }
            ValueRule::Port => {
                if raw.is_empty() {
                    return reject(&messages.empty);
                }
                if is_numeric(raw) {
                    return Ok(raw.to_string());
                }
                match registry::service_by_name(raw) {
                    Some(service) => Ok(service.port.to_string()),
                    None => reject(&messages.unknown_port),
                }
            }
            ValueRule::Protocol => {
                if raw.is_empty() {
                    return reject(&messages.empty);
                }
                if is_numeric(raw) {
                    return Ok(raw.to_string());
                }
                match registry::find_protocol(raw) {
                    Some(proto) => Ok(proto.name.to_string()),
                    None => reject(&messages.unknown_protocol),
                }
            }
            ValueRule::Resource => validate_resource(raw, messages),
        }
    }
}

fn validate_resource(raw: &str, messages: &ValidationMessages) -> Result<String, ValidationError> {
    let mut path = ResourcePath::split(raw);
    if path.stage != ResourceStage::Completed {
        return Err(ValidationError::new(messages.incomplete_resource.clone()));
    }
    if path.kind.is_empty() {
        return Err(ValidationError::new(messages.empty_kind.clone()));
    }
    if !is_k8s_name(&path.kind) {
        return Err(ValidationError::new(messages.invalid_kind.clone()));
    }
    // cluster-scoped resources have no namespace
    if !path.namespace.is_empty() && !is_k8s_name(&path.namespace) {
        return Err(ValidationError::new(messages.invalid_namespace.clone()));
    }
    if !is_k8s_name(&path.name) {
        return Err(ValidationError::new(messages.invalid_name.clone()));
    }
    path.kind = capitalize(&path.kind);
    Ok(path.join())
}

fn capitalize(kind: &str) -> String {
    let mut chars = kind.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Any finite number, range unchecked
fn is_numeric(value: &str) -> bool {
    value
        .parse::<f64>()
        .map(f64::is_finite)
        .unwrap_or(false)
}

pub fn is_k8s_name(value: &str) -> bool {
    K8S_NAME.is_match(value)
}

/// Single IPv4/IPv6 address, CIDR, or `start-end` range of one family
pub fn is_ip_filter(value: &str) -> bool {
    if let Some((start, end)) = value.split_once('-') {
        return match (start.trim().parse::<IpAddr>(), end.trim().parse::<IpAddr>()) {
            (Ok(start), Ok(end)) => start.is_ipv4() == end.is_ipv4(),
            _ => false,
        };
    }
    if let Some((addr, prefix)) = value.split_once('/') {
        let Ok(addr) = addr.parse::<IpAddr>() else {
            return false;
        };
        let max = if addr.is_ipv4() { 32 } else { 128 };
        return prefix.parse::<u8>().map(|len| len <= max).unwrap_or(false);
    }
    value.parse::<IpAddr>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(rule: ValueRule, raw: &str) -> Result<String, String> {
        rule.validate(raw, &ValidationMessages::default())
            .map_err(|e| e.reason)
    }

    #[test]
    fn test_k8s_name() {
        assert_eq!(validate(ValueRule::K8sName, ""), Ok("\"\"".to_string()));
        assert_eq!(validate(ValueRule::K8sName, "\"\""), Ok("\"\"".to_string()));
        assert_eq!(validate(ValueRule::K8sName, "image-registry"), Ok("image-registry".into()));
        assert_eq!(validate(ValueRule::K8sName, "\"Deployment\""), Ok("\"Deployment\"".into()));
        assert_eq!(validate(ValueRule::K8sName, "\"cluster-*\""), Ok("\"cluster-*\"".into()));
        assert_eq!(
            validate(ValueRule::K8sName, "a=b"),
            Err("Not a valid Kubernetes name".into())
        );
        assert_eq!(
            validate(ValueRule::K8sName, "x,y"),
            Err("Not a valid Kubernetes name".into())
        );
    }

    #[test]
    fn test_address() {
        assert!(validate(ValueRule::Address, "10.0.0.1").is_ok());
        assert!(validate(ValueRule::Address, "::1").is_ok());
        assert!(validate(ValueRule::Address, "192.51.100.0/24").is_ok());
        assert!(validate(ValueRule::Address, "2001:db8::/32").is_ok());
        assert!(validate(ValueRule::Address, "192.168.0.1-192.189.10.12").is_ok());
        assert!(validate(ValueRule::Address, "2001:db8::1-2001:db8::8").is_ok());

        assert_eq!(validate(ValueRule::Address, ""), Err("Value is empty".into()));
        assert!(validate(ValueRule::Address, "10.0.0.1/33").is_err());
        assert!(validate(ValueRule::Address, "10.0.0.1-::1").is_err());
        assert!(validate(ValueRule::Address, "not-an-ip").is_err());
    }

    #[test]
    fn test_port() {
        assert_eq!(validate(ValueRule::Port, "8080"), Ok("8080".into()));
        assert_eq!(validate(ValueRule::Port, "https"), Ok("443".into()));
        assert_eq!(validate(ValueRule::Port, "nosuchservice"), Err("Unknown port".into()));
        assert_eq!(validate(ValueRule::Port, "70000"), Ok("70000".into()));
        assert_eq!(validate(ValueRule::Port, "inf"), Err("Unknown port".into()));
        assert_eq!(validate(ValueRule::Port, "80,443"), Err("Unknown port".into()));
        assert_eq!(validate(ValueRule::Port, ""), Err("Value is empty".into()));
    }

    #[test]
    fn test_protocol() {
        assert_eq!(validate(ValueRule::Protocol, "17"), Ok("17".into()));
        assert_eq!(validate(ValueRule::Protocol, "300"), Ok("300".into()));
        assert_eq!(validate(ValueRule::Protocol, "tcp"), Ok("TCP".into()));
        assert_eq!(validate(ValueRule::Protocol, "ipv6-icmp"), Ok("IPv6-ICMP".into()));
        assert_eq!(validate(ValueRule::Protocol, "foo"), Err("Unknown protocol".into()));
    }

    #[test]
    fn test_kind_rejects_only_empty() {
        assert_eq!(validate(ValueRule::NonEmpty, "Pod"), Ok("Pod".into()));
        assert_eq!(validate(ValueRule::NonEmpty, ""), Err("Value is empty".into()));
    }

    #[test]
    fn test_resource() {
        assert_eq!(
            validate(ValueRule::Resource, "pOD.default.nginx"),
            Ok("Pod.default.nginx".into())
        );
        assert_eq!(validate(ValueRule::Resource, "node..worker-1"), Ok("Node..worker-1".into()));
        assert_eq!(
            validate(ValueRule::Resource, "Pod.default"),
            Err("Incomplete resource name, either kind, namespace or name is missing.".into())
        );
        assert_eq!(validate(ValueRule::Resource, ".default.x"), Err("Kind is empty".into()));
        for kind in ["pod;src_port=1", "a,b|x", "pod&x"] {
            assert_eq!(
                validate(ValueRule::Resource, &format!("{}.default.nginx", kind)),
                Err("Kind: not a valid Kubernetes name".into())
            );
        }
        assert_eq!(
            validate(ValueRule::Resource, "Pod.a=b.x"),
            Err("Namespace: not a valid Kubernetes name".into())
        );
        assert_eq!(
            validate(ValueRule::Resource, "Pod.default."),
            Err("Name: not a valid Kubernetes name".into())
        );
    }

    #[test]
    fn test_messages_are_translated() {
        let messages = ValidationMessages::translated(&|key: &str| format!("[fr] {}", key));
        assert_eq!(
            ValueRule::Port.validate("bogus", &messages).unwrap_err().reason,
            "[fr] Unknown port"
        );
    }
}
