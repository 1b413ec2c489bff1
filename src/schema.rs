use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use jsonschema::{Draft, Retrieve, Uri, Validator};
use serde_json::Value;

use crate::error::{SchemaRole, ValidateError};

/// Synthetic base URI of the topic schema.
pub const TOPIC_SCHEMA_URI: &str = "https://example.com/schema_topic";
/// Synthetic base URI of the shared schema.
pub const SHARED_SCHEMA_URI: &str = "https://example.com/schema_shared";

/// Base the engine resolves relative `$ref`s against when the root schema
/// has no `$id`.
const DEFAULT_BASE: &str = "json-schema:///";

/// URI -> document map installed as the engine's retriever, so references
/// never leave the process.
#[derive(Debug, Clone)]
struct Resources {
    by_uri: Arc<HashMap<String, Value>>,
}

impl Resources {
    /// Exact match first, ignoring the fragment. Otherwise a relative `$ref`
    /// such as `schema_shared#/$defs/lat` matches by its last segment, but
    /// only when it was resolved against the engine's default base or against
    /// the directory of a registered URI.
    fn lookup(&self, uri: &str) -> Option<&Value> {
        let uri = uri.split('#').next().unwrap_or(uri);

        if let Some(doc) = self.by_uri.get(uri) {
            return Some(doc);
        }

        let (dir, segment) = split_last(uri)?;
        let known_base = dir == DEFAULT_BASE
            || self
                .by_uri
                .keys()
                .any(|known| split_last(known).map(|(d, _)| d) == Some(dir));
        if !known_base {
            return None;
        }

        self.by_uri
            .iter()
            .find(|(known, _)| split_last(known).map(|(_, s)| s) == Some(segment))
            .map(|(_, doc)| doc)
    }
}

impl Retrieve for Resources {
    fn retrieve(
        &self,
        uri: &Uri<String>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        match self.lookup(uri.as_str()) {
            Some(doc) => Ok(doc.clone()),
            None => Err(format!("\"{uri}\" is not a registered schema").into()),
        }
    }
}

/// Split `https://host/dir/name` into (`https://host/dir/`, `name`).
fn split_last(uri: &str) -> Option<(&str, &str)> {
    let idx = uri.rfind('/')?;
    let (dir, segment) = uri.split_at(idx + 1);
    (!segment.is_empty()).then_some((dir, segment))
}

/// The topic and shared schemas linked so `$ref`s resolve between them,
/// together with the topic validator compiled against them.
#[derive(Clone)]
pub struct SchemaRegistry {
    resources: Resources,
    topic: Arc<Value>,
    validator: Arc<Validator>,
}

impl SchemaRegistry {
    /// Look up a registered document by URI.
    pub fn lookup(&self, uri: &str) -> Option<&Value> {
        self.resources.lookup(uri)
    }

    /// Registered URIs, sorted.
    pub fn uris(&self) -> Vec<&str> {
        let mut uris: Vec<&str> = self.resources.by_uri.keys().map(String::as_str).collect();
        uris.sort_unstable();
        uris
    }

    /// The topic schema, the only document used as a validation root.
    pub fn topic(&self) -> &Value {
        &self.topic
    }

    /// Validator for the topic schema, with the shared schema in scope.
    pub fn validator(&self) -> &Validator {
        &self.validator
    }
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("uris", &self.uris())
            .finish_non_exhaustive()
    }
}

/// Bind the topic and shared schemas to their synthetic URIs.
///
/// Each document is also registered under its own `$id`, when present.
/// Both documents are compiled against the finished map, shared first, so
/// that a structurally invalid schema or an unresolvable `$ref` is reported
/// as [`ValidateError::SchemaInvalid`] naming the offending document.
pub fn build_registry(topic: Value, shared: Value) -> Result<SchemaRegistry, ValidateError> {
    for (role, doc) in [(SchemaRole::Topic, &topic), (SchemaRole::Shared, &shared)] {
        if !(doc.is_object() || doc.is_boolean()) {
            return Err(ValidateError::schema_invalid(
                role,
                "a schema must be a JSON object or boolean",
            ));
        }
    }

    let mut by_uri = HashMap::new();
    for (uri, doc) in [(SHARED_SCHEMA_URI, &shared), (TOPIC_SCHEMA_URI, &topic)] {
        if let Some(id) = doc.get("$id").and_then(Value::as_str) {
            let id = id.split('#').next().unwrap_or(id);
            if !id.is_empty() {
                by_uri.insert(id.to_string(), doc.clone());
            }
        }
        by_uri.insert(uri.to_string(), doc.clone());
    }
    let resources = Resources {
        by_uri: Arc::new(by_uri),
    };

    compile(&shared, &resources)
        .map_err(|reason| ValidateError::schema_invalid(SchemaRole::Shared, reason))?;
    let validator = compile(&topic, &resources)
        .map_err(|reason| ValidateError::schema_invalid(SchemaRole::Topic, reason))?;

    let registry = SchemaRegistry {
        resources,
        topic: Arc::new(topic),
        validator: Arc::new(validator),
    };

    tracing::debug!(uris = ?registry.uris(), "schema registry built");
    Ok(registry)
}

fn compile(schema: &Value, resources: &Resources) -> Result<Validator, String> {
    jsonschema::options()
        .with_draft(Draft::Draft202012)
        .with_retriever(resources.clone())
        .build(schema)
        .map_err(|e| e.to_string())
}
