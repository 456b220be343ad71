use serde_json::Value;

/// A single durable session row.
///
/// The payload is opaque to the store; `expiry_s` is seconds since the Unix
/// epoch, with the fractional part carrying milliseconds. That is the unit
/// the table's `to_timestamp(..)` conversion expects.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub id: String,
    pub expiry_s: f64,
    pub payload: Value,
}

impl SessionRecord {
    /// Returns true once the row is at or past its expiry.
    pub fn is_expired(&self, now_s: f64) -> bool {
        self.expiry_s <= now_s
    }
}
