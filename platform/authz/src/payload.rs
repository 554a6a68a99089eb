use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const OWNER_KEY: &str = "owner";

/// Mutable payload of one inbound operation.
///
/// The policy layer only interprets the `metadata` map (to tag records with
/// their owner); every other field round-trips untouched so the storage
/// layer receives the payload exactly as submitted, plus the stamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionPayload {
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl ActionPayload {
    /// Tag the record with its owning identity. Stamping twice with the same
    /// id leaves the metadata unchanged.
    pub fn stamp_owner(&mut self, owner: &str) {
        self.metadata
            .insert(OWNER_KEY.to_string(), Value::String(owner.to_string()));
    }

    /// The owner tag, when present and a string.
    pub fn owner(&self) -> Option<&str> {
        self.metadata.get(OWNER_KEY).and_then(Value::as_str)
    }
}
