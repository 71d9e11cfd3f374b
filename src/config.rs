//! Connection target selection.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use std::env;

/// Region reported by the local emulator.
pub const LOCAL_REGION: &str = "localhost";

/// Endpoint of the local emulator.
pub const LOCAL_ENDPOINT: &str = "http://localhost:8000";

/// Where the client connects.
///
/// ```rust,no_run
/// use dynamodb_facade::{config, storage};
///
/// # async fn example() {
/// let config = config::ConnectionConfig::from_env("eu-west-1");
/// let client = storage::connection(&config).await;
/// # }
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ConnectionConfig {
    /// Endpoint override, `None` for the regional service endpoint.
    pub endpoint: Option<String>,
    /// Region of the table.
    pub region: String,
}

impl ConnectionConfig {
    /// Target `region`, unless the process runs offline.
    ///
    /// `IS_OFFLINE=true` selects the local emulator; `FORCE_ONLINE=true` overrides it.
    pub fn from_env(region: impl Into<String>) -> Self {
        Self::from_lookup(region, |name| env::var(name).ok())
    }

    fn from_lookup(region: impl Into<String>, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let enabled = |name: &str| lookup(name).is_some_and(|value| value == "true");
        if enabled("IS_OFFLINE") && !enabled("FORCE_ONLINE") {
            Self::local()
        } else {
            Self {
                endpoint: None,
                region: region.into(),
            }
        }
    }

    /// The local emulator.
    pub fn local() -> Self {
        Self {
            endpoint: Some(LOCAL_ENDPOINT.to_string()),
            region: LOCAL_REGION.to_string(),
        }
    }

    /// Resolve credentials and build the SDK configuration.
    pub async fn load(&self) -> SdkConfig {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(self.region.clone()));
        if let Some(endpoint) = &self.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(region = %self.region, endpoint = ?self.endpoint, "loading sdk config");
        loader.load().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::online(None, None, ConnectionConfig { endpoint: None, region: "eu-west-1".to_string() })]
    #[case::offline(Some("true"), None, ConnectionConfig::local())]
    #[case::forced_online(Some("true"), Some("true"), ConnectionConfig { endpoint: None, region: "eu-west-1".to_string() })]
    #[case::offline_not_true(Some("1"), None, ConnectionConfig { endpoint: None, region: "eu-west-1".to_string() })]
    #[case::force_online_not_true(Some("true"), Some("yes"), ConnectionConfig::local())]
    fn test_from_lookup(
        #[case] is_offline: Option<&str>,
        #[case] force_online: Option<&str>,
        #[case] expected: ConnectionConfig,
    ) {
        let actual = ConnectionConfig::from_lookup("eu-west-1", |name| match name {
            "IS_OFFLINE" => is_offline.map(str::to_string),
            "FORCE_ONLINE" => force_online.map(str::to_string),
            _ => None,
        });
        assert_eq!(actual, expected);
    }

    #[tokio::test]
    async fn test_load_local() {
        let sdk_config = ConnectionConfig::local().load().await;
        assert_eq!(sdk_config.region(), Some(&Region::new(LOCAL_REGION)));
        assert_eq!(sdk_config.endpoint_url(), Some(LOCAL_ENDPOINT));
    }
}
