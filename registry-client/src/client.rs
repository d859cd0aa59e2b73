//! Caching schema registry client.

use std::collections::HashMap;
use std::fmt;

use registry_config::EffectiveConfig;
use registry_transport::{HyperClient, RestService};
use serde::{Deserialize, Serialize};

use crate::{ClientError, ClientResult, Credentials};

/// Schema formats understood by the registry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchemaType {
    /// Apache Avro.
    #[default]
    Avro,
    /// JSON Schema.
    Json,
    /// Protocol Buffers.
    Protobuf,
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Avro => "AVRO",
            Self::Json => "JSON",
            Self::Protobuf => "PROTOBUF",
        })
    }
}

/// A schema registered under a subject.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredSchema {
    id: u32,
    subject: String,
    #[serde(default)]
    version: i32,
    #[serde(default)]
    schema_type: SchemaType,
    #[serde(rename = "schema")]
    definition: String,
}

impl RegisteredSchema {
    /// Creates an Avro schema entry at version 1.
    #[must_use]
    pub fn new(id: u32, subject: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            id,
            subject: subject.into(),
            version: 1,
            schema_type: SchemaType::Avro,
            definition: definition.into(),
        }
    }

    /// Sets the subject version.
    #[must_use]
    pub fn with_version(mut self, version: i32) -> Self {
        self.version = version;
        self
    }

    /// Sets the schema format.
    #[must_use]
    pub fn with_schema_type(mut self, schema_type: SchemaType) -> Self {
        self.schema_type = schema_type;
        self
    }

    /// Returns the registry-wide schema identifier.
    #[must_use]
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Returns the subject the schema is registered under.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the subject version.
    #[must_use]
    pub const fn version(&self) -> i32 {
        self.version
    }

    /// Returns the schema format.
    #[must_use]
    pub const fn schema_type(&self) -> SchemaType {
        self.schema_type
    }

    /// Returns the schema text.
    #[must_use]
    pub fn definition(&self) -> &str {
        &self.definition
    }
}

/// Schema registry client with a bounded identity cache.
///
/// Each subject may cache at most `capacity` distinct schemas; lookups by
/// identifier are served from the same cache.
pub struct CachedSchemaRegistryClient {
    rest_service: RestService,
    capacity: usize,
    credentials: Option<Credentials>,
    config: EffectiveConfig,
    ids_by_subject: HashMap<String, HashMap<String, u32>>,
    schemas_by_id: HashMap<u32, RegisteredSchema>,
}

impl CachedSchemaRegistryClient {
    /// Creates a client over `rest_service`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidConfig`] when `capacity` is zero and
    /// [`ClientError::Credentials`] when authentication settings are invalid.
    pub fn new(
        rest_service: RestService,
        capacity: usize,
        config: &EffectiveConfig,
    ) -> ClientResult<Self> {
        if capacity == 0 {
            return Err(ClientError::invalid_config(
                "identity cache capacity must be greater than zero",
            ));
        }
        let credentials = Credentials::resolve(config, rest_service.user_info())?;

        Ok(Self {
            rest_service,
            capacity,
            credentials,
            config: config.clone(),
            ids_by_subject: HashMap::new(),
            schemas_by_id: HashMap::new(),
        })
    }

    /// Returns the transport handle.
    #[must_use]
    pub fn rest_service(&self) -> &RestService {
        &self.rest_service
    }

    /// Returns the per-subject cache capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the resolved credentials, if any.
    #[must_use]
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Returns the configuration the client was built with.
    #[must_use]
    pub fn config(&self) -> &EffectiveConfig {
        &self.config
    }

    /// Builds an HTTP client for the configured transport.
    #[must_use]
    pub fn http_client(&self) -> HyperClient {
        self.rest_service.http_client()
    }

    /// Caches a schema fetched from or registered with the registry.
    ///
    /// Re-caching a known definition for a subject replaces its entry.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::CapacityExceeded`] when the subject already
    /// holds `capacity` distinct schemas.
    pub fn cache_schema(&mut self, schema: RegisteredSchema) -> ClientResult<()> {
        let ids = self
            .ids_by_subject
            .entry(schema.subject.clone())
            .or_default();

        if !ids.contains_key(&schema.definition) && ids.len() >= self.capacity {
            return Err(ClientError::CapacityExceeded {
                subject: schema.subject,
                capacity: self.capacity,
            });
        }

        let replaced = ids
            .insert(schema.definition.clone(), schema.id)
            .filter(|previous| *previous != schema.id);
        self.schemas_by_id.insert(schema.id, schema);

        if let Some(previous) = replaced {
            if !self.is_referenced(previous) {
                self.schemas_by_id.remove(&previous);
            }
        }
        Ok(())
    }

    /// Identifiers are registry-wide, so one may be cached under several subjects.
    fn is_referenced(&self, id: u32) -> bool {
        self.ids_by_subject
            .values()
            .any(|ids| ids.values().any(|cached| *cached == id))
    }

    /// Looks up a cached schema by identifier.
    #[must_use]
    pub fn schema_by_id(&self, id: u32) -> Option<&RegisteredSchema> {
        self.schemas_by_id.get(&id)
    }

    /// Looks up the identifier of a cached definition under `subject`.
    #[must_use]
    pub fn id_for(&self, subject: &str, definition: &str) -> Option<u32> {
        self.ids_by_subject.get(subject)?.get(definition).copied()
    }

    /// Returns the number of cached schemas.
    #[must_use]
    pub fn cached_schemas(&self) -> usize {
        self.schemas_by_id.len()
    }
}

impl fmt::Debug for CachedSchemaRegistryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedSchemaRegistryClient")
            .field("rest_service", &self.rest_service)
            .field("capacity", &self.capacity)
            .field("credentials", &self.credentials)
            .field("cached_schemas", &self.schemas_by_id.len())
            .finish_non_exhaustive()
    }
}
