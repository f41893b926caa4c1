//! Ledger service configuration.

use serde::{Deserialize, Serialize};

/// What an outbound movement may do to the on-hand quantity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutboundPolicy {
    /// Quantities may go below zero (over-issuing is recorded, not prevented).
    #[default]
    AllowNegative,
    /// Reject outbound movements that would leave a negative quantity.
    RejectNegative,
}

impl OutboundPolicy {
    pub fn allows_negative(self) -> bool {
        matches!(self, Self::AllowNegative)
    }
}

/// How a lookup resolves a key shared by several records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupPolicy {
    /// Return the earliest-registered match.
    #[default]
    FirstMatch,
    /// Fail with `AmbiguousMatch` when more than one record matches.
    RejectAmbiguous,
}

/// Configuration for the Ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub outbound: OutboundPolicy,
    pub lookup: LookupPolicy,
}

impl LedgerConfig {
    pub fn with_outbound(mut self, outbound: OutboundPolicy) -> Self {
        self.outbound = outbound;
        self
    }

    pub fn with_lookup(mut self, lookup: LookupPolicy) -> Self {
        self.lookup = lookup;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_source_behaviour() {
        let config = LedgerConfig::default();
        assert!(config.outbound.allows_negative());
        assert_eq!(config.lookup, LookupPolicy::FirstMatch);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: LedgerConfig =
            serde_json::from_str(r#"{"outbound": "reject_negative"}"#).unwrap();
        assert_eq!(config.outbound, OutboundPolicy::RejectNegative);
        assert_eq!(config.lookup, LookupPolicy::FirstMatch);
    }
}
