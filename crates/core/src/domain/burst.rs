// Burst Domain Model - validated invocation parameters

use super::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Longest queue name the queue service accepts
pub const MAX_QUEUE_NAME_LEN: usize = 80;

/// Suffix allowed on FIFO queue names
const FIFO_SUFFIX: &str = ".fifo";

/// Longest decimal representation of a TCP port
const MAX_PORT_DIGITS: usize = 5;

/// Queue name, used verbatim as the last segment of the queue URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueName(String);

impl QueueName {
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(DomainError::Parameter("queue name is empty".to_string()));
        }

        if raw.len() > MAX_QUEUE_NAME_LEN {
            return Err(DomainError::Parameter(format!(
                "queue name too long ({} > {} characters)",
                raw.len(),
                MAX_QUEUE_NAME_LEN
            )));
        }

        let stem = raw.strip_suffix(FIFO_SUFFIX).unwrap_or(raw);
        let valid = !stem.is_empty()
            && stem
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(DomainError::Parameter(format!(
                "queue name '{}' must be alphanumeric, '-' or '_' (optionally ending in {})",
                raw, FIFO_SUFFIX
            )));
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QueueName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Endpoint port. Keeps the exact text supplied so the endpoint URL
/// carries it unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointPort {
    raw: String,
    number: u16,
}

impl EndpointPort {
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty()
            || raw.len() > MAX_PORT_DIGITS
            || !raw.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(DomainError::Parameter(format!(
                "port '{}' is not a number",
                raw
            )));
        }

        match raw.parse::<u16>() {
            Ok(number) if number > 0 => Ok(Self {
                raw: raw.to_string(),
                number,
            }),
            _ => Err(DomainError::Parameter(format!(
                "port '{}' out of range (1-65535)",
                raw
            ))),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn number(&self) -> u16 {
        self.number
    }
}

impl std::fmt::Display for EndpointPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Number of messages to send
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageCount(u64);

impl MessageCount {
    pub fn new(count: u64) -> Self {
        Self(count)
    }

    /// Parse a decimal, non-negative count. Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Result<Self> {
        raw.trim().parse::<u64>().map(Self).map_err(|_| {
            DomainError::Parameter(format!(
                "amount '{}' is not a non-negative integer",
                raw
            ))
        })
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

/// A fully validated burst request: where to send and how many times
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurstPlan {
    pub queue_name: QueueName,
    pub port: EndpointPort,
    pub amount: MessageCount,
}

impl BurstPlan {
    pub fn new(queue_name: QueueName, port: EndpointPort, amount: MessageCount) -> Self {
        Self {
            queue_name,
            port,
            amount,
        }
    }

    /// Validate the three positional inputs (queue name, port, amount).
    ///
    /// # Errors
    /// - DomainError::Parameter when any input is malformed. Nothing has been
    ///   dispatched at that point.
    pub fn parse(queue_name: &str, port: &str, amount: &str) -> Result<Self> {
        let amount = MessageCount::parse(amount)?;
        let port = EndpointPort::parse(port)?;
        let queue_name = QueueName::parse(queue_name)?;
        Ok(Self::new(queue_name, port, amount))
    }
}
