//! Meta connector configuration.
//!
//! Constructed per sync invocation from the owning ad account's stored
//! credentials; no process-wide client holds a tenant's token.

use orvio_connector::{ConnectorError, ConnectorResult};

/// Graph API version all requests are pinned to.
pub const API_VERSION: &str = "v21.0";

/// Production Graph API endpoint.
pub const GRAPH_URL: &str = "https://graph.facebook.com";

/// Configuration for one ad account connection.
#[derive(Debug, Clone)]
pub struct MetaConfig {
    /// User or system-user access token.
    pub access_token: String,
    /// Numeric ad account id, without the `act_` prefix.
    pub ad_account_id: String,
}

impl MetaConfig {
    pub fn new(access_token: impl Into<String>, ad_account_id: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            ad_account_id: ad_account_id.into(),
        }
    }

    /// Validate the configuration before any request is made.
    pub fn validate(&self) -> ConnectorResult<()> {
        if self.access_token.is_empty() {
            return Err(ConnectorError::invalid_configuration("empty access token"));
        }
        if self.ad_account_id.is_empty() {
            return Err(ConnectorError::invalid_configuration("empty ad account id"));
        }
        Ok(())
    }

    /// The `act_<id>` path segment of account-scoped endpoints.
    pub fn account_path(&self) -> String {
        format!("act_{}", self.ad_account_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_path() {
        let config = MetaConfig::new("token", "1234567890");
        assert!(config.validate().is_ok());
        assert_eq!(config.account_path(), "act_1234567890");
    }

    #[test]
    fn test_rejects_missing_credentials() {
        assert!(MetaConfig::new("", "123").validate().is_err());
        assert!(MetaConfig::new("token", "").validate().is_err());
    }
}
