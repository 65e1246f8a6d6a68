// Queue Domain Model - approximate queue depth

use super::error::{DomainError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const ATTR_VISIBLE: &str = "ApproximateNumberOfMessages";
pub const ATTR_DELAYED: &str = "ApproximateNumberOfMessagesDelayed";
pub const ATTR_NOT_VISIBLE: &str = "ApproximateNumberOfMessagesNotVisible";

/// Attribute names to request from the queue service, in report order
pub const DEPTH_ATTRIBUTES: [&str; 3] = [ATTR_VISIBLE, ATTR_DELAYED, ATTR_NOT_VISIBLE];

/// Approximate number of messages held by a queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueDepth {
    pub visible: u64,
    pub delayed: u64,
    pub not_visible: u64,
}

impl QueueDepth {
    /// Build from the string attribute map returned by get-queue-attributes
    pub fn from_attributes(attributes: &HashMap<String, String>) -> Result<Self> {
        Ok(Self {
            visible: read_count(attributes, ATTR_VISIBLE)?,
            delayed: read_count(attributes, ATTR_DELAYED)?,
            not_visible: read_count(attributes, ATTR_NOT_VISIBLE)?,
        })
    }

    /// Messages waiting, delayed and in flight
    pub fn total(&self) -> u64 {
        self.visible + self.delayed + self.not_visible
    }
}

fn read_count(attributes: &HashMap<String, String>, name: &str) -> Result<u64> {
    let raw = attributes
        .get(name)
        .ok_or_else(|| DomainError::Attribute(format!("missing attribute {}", name)))?;

    raw.trim()
        .parse::<u64>()
        .map_err(|_| DomainError::Attribute(format!("{} is not a count: '{}'", name, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attributes(visible: &str, delayed: &str, not_visible: &str) -> HashMap<String, String> {
        HashMap::from([
            (ATTR_VISIBLE.to_string(), visible.to_string()),
            (ATTR_DELAYED.to_string(), delayed.to_string()),
            (ATTR_NOT_VISIBLE.to_string(), not_visible.to_string()),
        ])
    }

    #[test]
    fn test_total_sums_all_three() {
        let depth = QueueDepth::from_attributes(&attributes("10", "10", "10")).unwrap();
        assert_eq!(depth.total(), 30);
    }

    #[test]
    fn test_missing_attribute() {
        let mut attrs = attributes("1", "2", "3");
        attrs.remove(ATTR_DELAYED);

        let err = QueueDepth::from_attributes(&attrs).unwrap_err();
        assert!(err.to_string().contains(ATTR_DELAYED));
    }

    #[test]
    fn test_non_numeric_attribute() {
        let err = QueueDepth::from_attributes(&attributes("80", "lots", "20")).unwrap_err();
        assert!(matches!(err, DomainError::Attribute(_)));
    }
}
