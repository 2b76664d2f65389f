//! Domain types for service discovery: identifiers, descriptors, and
//! announcements.
//!
//! Mirrors the wire shapes in the specification's data model: a `Service` is
//! the thing a query returns, a `DynamicAnnouncement` is what an announcer
//! sends on refresh, and `Services` is the composed query response.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque, announcer-generated identifier for a node, stable across refreshes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(String);

impl NodeId {
    /// Wraps a raw identifier string as a `NodeId`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the canonical string form used as the backing-store row key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Opaque identifier for a single declared service instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ServiceId(String);

impl ServiceId {
    /// Wraps a raw identifier string as a `ServiceId`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the canonical string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ServiceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A single discoverable service instance, as returned by queries.
///
/// `properties` is a `BTreeMap` rather than a `HashMap` so the codec's
/// encoded output is byte-stable across runs for the same logical content --
/// useful for round-trip tests and content-addressed caching upstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: ServiceId,
    pub node_id: NodeId,
    #[serde(rename = "type")]
    pub service_type: String,
    pub pool: String,
    pub location: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

/// A single service announced within a `DynamicAnnouncement`, before it has
/// been stamped with the announcer's `nodeId`, `pool`, and `location`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAnnouncementInput {
    pub id: ServiceId,
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

/// A node's declaration of the services it currently offers, valid for the
/// registry's configured TTL until refreshed again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicAnnouncement {
    pub environment: String,
    pub location: String,
    pub pool: String,
    pub service_announcements: Vec<ServiceAnnouncementInput>,
}

impl DynamicAnnouncement {
    /// Materializes the full `Service` descriptors this announcement carries,
    /// stamping each with `node_id` and this announcement's `pool`/`location`.
    #[must_use]
    pub fn materialize(&self, node_id: &NodeId) -> Vec<Service> {
        self.service_announcements
            .iter()
            .map(|input| Service {
                id: input.id.clone(),
                node_id: node_id.clone(),
                service_type: input.service_type.clone(),
                pool: self.pool.clone(),
                location: self.location.clone(),
                properties: input.properties.clone(),
            })
            .collect()
    }
}

/// Composed response from the query resource: the registry's environment
/// label plus the union of live dynamic and static services matching a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Services {
    pub environment: String,
    pub services: std::collections::HashSet<Service>,
}
