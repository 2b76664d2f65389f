//! Encodes and decodes the list of `Service` descriptors stored as a single
//! column value in the backing store.
//!
//! The wire format is JSON rather than a binary format because the
//! specification requires the stored column value to be a UTF-8 encoded
//! service list (inspectable with the backing store's native tooling), and
//! forward-tolerant: unknown fields on read must be ignored rather than
//! rejected. `serde_json` already ignores fields it doesn't recognize when
//! deserializing into a concrete struct, and every optional field on
//! [`Service`](crate::types::Service) carries `#[serde(default)]`, so old
//! readers tolerate new writers and vice versa without extra bookkeeping.

use crate::error::CodecError;
use crate::types::Service;

/// Encodes an ordered list of services into a single text blob.
#[must_use]
pub fn encode(services: &[Service]) -> String {
    // `Service` and its fields are all directly serializable; a failure here
    // would mean a logic bug in this crate, not bad input, so it is not
    // surfaced as a `Result`.
    serde_json::to_string(services).expect("service list is always serializable")
}

/// Decodes a text blob back into the list of services it encodes.
///
/// Returns `Err` for genuinely malformed input (truncated JSON, wrong
/// top-level shape). Unknown object fields within a well-formed list are
/// silently ignored, not an error.
pub fn decode(blob: &str) -> Result<Vec<Service>, CodecError> {
    serde_json::from_str(blob).map_err(CodecError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NodeId, ServiceId};
    use std::collections::BTreeMap;

    fn sample() -> Vec<Service> {
        vec![Service {
            id: ServiceId::new("svc-1"),
            node_id: NodeId::new("node-1"),
            service_type: "storage".to_string(),
            pool: "alpha".to_string(),
            location: "/a/b/c".to_string(),
            properties: BTreeMap::from([("url".to_string(), "http://localhost:1".to_string())]),
        }]
    }

    #[test]
    fn round_trips_a_service_list() {
        let services = sample();
        let encoded = encode(&services);
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded, services);
    }

    #[test]
    fn empty_list_round_trips() {
        let encoded = encode(&[]);
        let decoded = decode(&encoded).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn decode_ignores_unknown_fields() {
        let blob = r#"[{"id":"svc-1","nodeId":"node-1","type":"storage","pool":"alpha","location":"/a/b/c","properties":{},"futureField":"ignored"}]"#;
        let decoded = decode(blob).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].service_type, "storage");
    }

    #[test]
    fn decode_tolerates_missing_properties() {
        let blob = r#"[{"id":"svc-1","nodeId":"node-1","type":"storage","pool":"alpha","location":"/a/b/c"}]"#;
        let decoded = decode(blob).unwrap();
        assert!(decoded[0].properties.is_empty());
    }

    #[test]
    fn decode_rejects_truncated_input() {
        let err = decode("[{\"id\":\"svc-1\"").unwrap_err();
        assert!(matches!(err, CodecError::Malformed(_)));
    }

    #[test]
    fn encoded_output_is_stable_for_equal_content() {
        let services = sample();
        assert_eq!(encode(&services), encode(&services));
    }
}
