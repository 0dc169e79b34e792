//! Core domain types exchanged between readers, parsers, processors and sinks.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// LocationSpec
// ---------------------------------------------------------------------------

/// An addressable external source: a type tag plus a target (usually a URL).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationSpec {
    /// Location type; processors claim locations by this tag.
    #[serde(rename = "type")]
    pub location_type: String,
    /// Where the content lives.
    pub target: String,
}

impl LocationSpec {
    pub fn new(location_type: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            location_type: location_type.into(),
            target: target.into(),
        }
    }

    /// Key used for refresh tracking: `"{type}:{target}"`.
    pub fn refresh_key(&self) -> String {
        format!("{}:{}", self.location_type, self.target)
    }
}

impl std::fmt::Display for LocationSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.location_type, self.target)
    }
}

// ---------------------------------------------------------------------------
// RawContent
// ---------------------------------------------------------------------------

/// Bytes fetched from a single URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawContent {
    /// The URL the bytes were read from.
    pub url: String,
    /// Response body, uninterpreted.
    pub data: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// `metadata` block of a catalog entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Labels, annotations, description, and anything else the source sends.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A catalog entity descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub api_version: String,
    pub kind: String,
    pub metadata: EntityMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<Value>,
}

impl Entity {
    /// Minimal entity with just the required fields set.
    pub fn new(
        api_version: impl Into<String>,
        kind: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
            metadata: EntityMeta {
                name: name.into(),
                namespace: None,
                extra: Map::new(),
            },
            spec: None,
        }
    }
}

// ---------------------------------------------------------------------------
// ProcessingResult
// ---------------------------------------------------------------------------

/// A single emission from a processor to a result sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ProcessingResult {
    /// A parsed entity and the location it was read from.
    Entity {
        location: LocationSpec,
        entity: Entity,
    },
    /// Ask the orchestrator to reconsider the keyed location later.
    Refresh { key: String },
    /// The location's content does not exist.
    NotFoundError {
        location: LocationSpec,
        message: String,
    },
    /// Any other failure to read or parse a location.
    GeneralError {
        location: LocationSpec,
        message: String,
    },
}

impl ProcessingResult {
    pub fn entity(location: LocationSpec, entity: Entity) -> Self {
        Self::Entity { location, entity }
    }

    pub fn refresh(key: impl Into<String>) -> Self {
        Self::Refresh { key: key.into() }
    }

    pub fn not_found_error(location: LocationSpec, message: impl Into<String>) -> Self {
        Self::NotFoundError {
            location,
            message: message.into(),
        }
    }

    pub fn general_error(location: LocationSpec, message: impl Into<String>) -> Self {
        Self::GeneralError {
            location,
            message: message.into(),
        }
    }

    /// Whether this result reports a failure.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::NotFoundError { .. } | Self::GeneralError { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_key_joins_type_and_target() {
        let location = LocationSpec::new("x", "http://example/data");
        assert_eq!(location.refresh_key(), "x:http://example/data");
        assert_eq!(location.to_string(), location.refresh_key());
    }

    #[test]
    fn location_serializes_type_field() {
        let location = LocationSpec::new("catalog-bridge", "http://bridge/api");
        let json = serde_json::to_value(&location).expect("serialize");
        assert_eq!(json["type"], "catalog-bridge");
        assert_eq!(json["target"], "http://bridge/api");
    }

    #[test]
    fn entity_keeps_unknown_metadata() {
        let json = r#"{
            "apiVersion": "backstage.io/v1alpha1",
            "kind": "Component",
            "metadata": {
                "name": "svc-a",
                "description": "first service",
                "labels": { "tier": "gold" }
            },
            "spec": { "owner": "team-a" }
        }"#;
        let entity: Entity = serde_json::from_str(json).expect("deserialize");
        assert_eq!(entity.metadata.name, "svc-a");
        assert_eq!(entity.metadata.namespace, None);
        assert_eq!(entity.metadata.extra["description"], "first service");

        let back = serde_json::to_value(&entity).expect("serialize");
        assert_eq!(back["metadata"]["labels"]["tier"], "gold");
        assert_eq!(back["spec"]["owner"], "team-a");
    }

    #[test]
    fn processing_result_is_tagged() {
        let location = LocationSpec::new("x", "http://example/data");

        let refresh = serde_json::to_value(ProcessingResult::refresh(location.refresh_key()))
            .expect("serialize");
        assert_eq!(refresh["type"], "refresh");
        assert_eq!(refresh["key"], "x:http://example/data");

        let missing = ProcessingResult::not_found_error(location.clone(), "gone");
        assert!(missing.is_error());
        let json = serde_json::to_value(&missing).expect("serialize");
        assert_eq!(json["type"], "notFoundError");

        let general = ProcessingResult::general_error(location, "boom");
        assert_eq!(serde_json::to_value(&general).expect("serialize")["type"], "generalError");
    }
}
