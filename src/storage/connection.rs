use crate::config::ConnectionConfig;

use aws_sdk_dynamodb::Client;
use tokio::sync::OnceCell;

static CLIENT: OnceCell<Client> = OnceCell::const_new();

/// The process-wide client.
///
/// The first call builds it from `config`; concurrent first callers wait for that
/// single initialisation and every later call returns the same client, whatever
/// config it passes.
pub async fn connection(config: &ConnectionConfig) -> &'static Client {
    CLIENT
        .get_or_init(|| async {
            #[cfg(feature = "tracing")]
            tracing::info!(region = %config.region, endpoint = ?config.endpoint, "connecting to dynamodb");
            let sdk_config = config.load().await;
            Client::new(&sdk_config)
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connection_is_initialised_once() {
        let local = ConnectionConfig::local();
        let regional = ConnectionConfig {
            endpoint: None,
            region: "eu-west-1".to_string(),
        };
        let (first, second) = tokio::join!(connection(&local), connection(&regional));
        assert!(std::ptr::eq(first, second));
        assert!(std::ptr::eq(first, connection(&local).await));
    }
}
