//! `Duration` as integer milliseconds on the wire.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serializer};

#[allow(clippy::cast_possible_truncation)]
pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    u64::deserialize(deserializer).map(Duration::from_millis)
}
