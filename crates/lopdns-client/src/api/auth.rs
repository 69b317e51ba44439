//! Token endpoints.

use crate::LopDnsClient;
use lopdns_core::{AuthToken, Result, DEFAULT_EXPIRY_SKEW_SECS};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Header carrying the client id on `/auth/token`
const CLIENT_ID_HEADER: &str = "x-clientid";

/// Token endpoints
pub struct AuthApi<'a> {
    client: &'a LopDnsClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) const fn new(client: &'a LopDnsClient) -> Self {
        Self { client }
    }

    /// Exchange a client id for a token valid for `duration`.
    ///
    /// On success the token is stored in the client and used by every
    /// authenticated call. On failure the stored token is left as it was.
    pub async fn authenticate(&self, client_id: &str, duration: Duration) -> Result<AuthToken> {
        let duration = duration.as_secs().to_string();
        let token: AuthToken = self
            .client
            .get_unauthenticated(
                "/auth/token",
                &[(CLIENT_ID_HEADER, client_id)],
                &[("duration", &duration)],
            )
            .await?;

        info!(expires = %token.expires, timezone = %token.timezone, "authenticated");
        self.client.set_token(Some(token.clone()));
        Ok(token)
    }

    /// Returns true if there is no token or it expires within `skew_secs`
    #[must_use]
    pub fn is_token_expired(&self, skew_secs: i64) -> bool {
        self.client.is_token_expired(skew_secs)
    }

    /// Ask the API whether the current token is still good.
    ///
    /// A token that is about to expire locally is reported invalid without a
    /// request.
    pub async fn validate(&self) -> bool {
        if self.is_token_expired(DEFAULT_EXPIRY_SKEW_SECS) {
            debug!("token expired locally, skipping validation");
            return false;
        }

        match self.client.get_text("/auth/validate").await {
            Ok(body) => {
                // A body of {"valid": false} still counts as a rejection
                let valid = serde_json::from_str::<serde_json::Value>(&body)
                    .ok()
                    .and_then(|v| v.get("valid").and_then(serde_json::Value::as_bool))
                    .unwrap_or(true);
                debug!(valid, "token validated");
                valid
            }
            Err(e) => {
                warn!(error = %e, "token validation failed");
                false
            }
        }
    }

    /// Give the token back to the API. Best effort: an already expired token
    /// counts as invalidated.
    pub async fn invalidate(&self) -> bool {
        if self.is_token_expired(0) {
            return true;
        }

        match self.client.get_text("/auth/invalidate").await {
            Ok(_) => {
                debug!("token invalidated");
                self.client.set_token(None);
                true
            }
            Err(e) => {
                warn!(error = %e, "token invalidation failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::LopDnsClient;
    use lopdns_core::LopDnsError;
    use serde_json::json;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};
    use tokio_test::{assert_err, assert_ok};
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs().try_into().unwrap_or(i64::MAX))
    }

    async fn mount_token(server: &MockServer, epoch_expires: i64) {
        Mock::given(method("GET"))
            .and(path("/v2/auth/token"))
            .and(header("x-clientid", "client-1"))
            .and(query_param("duration", "600"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "tok-abc",
                "expires": "2026-10-17 12:00:00",
                "epochExpires": epoch_expires,
                "tz": "Europe/Stockholm"
            })))
            .expect(1)
            .mount(server)
            .await;
    }

    fn client_for(server: &MockServer) -> LopDnsClient {
        LopDnsClient::builder().base_url(server.uri()).build().unwrap()
    }

    #[tokio::test]
    async fn test_authenticate_stores_token() {
        let server = MockServer::start().await;
        mount_token(&server, now() + 600).await;

        let client = client_for(&server);
        assert!(client.auth().is_token_expired(30));

        let token = assert_ok!(
            client
                .auth()
                .authenticate("client-1", Duration::from_secs(600))
                .await
        );
        assert_eq!(token.token, "tok-abc");
        assert_eq!(token.timezone, "Europe/Stockholm");
        assert!(!client.auth().is_token_expired(30));
        assert_eq!(client.token(), Some(token));
    }

    #[tokio::test]
    async fn test_authenticate_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/auth/token"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unknown client"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = assert_err!(
            client
                .auth()
                .authenticate("client-1", Duration::from_secs(600))
                .await
        );
        assert!(err.is_auth_error());
        assert!(client.token().is_none());
    }

    #[tokio::test]
    async fn test_authenticate_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/auth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "x"})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .auth()
            .authenticate("client-1", Duration::from_secs(600))
            .await
            .unwrap_err();
        assert!(matches!(err, LopDnsError::Json(_)));
        assert!(client.token().is_none());
    }

    #[tokio::test]
    async fn test_validate_sends_token() {
        let server = MockServer::start().await;
        mount_token(&server, now() + 600).await;
        Mock::given(method("GET"))
            .and(path("/v2/auth/validate"))
            .and(header("x-token", "tok-abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"valid": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        client
            .auth()
            .authenticate("client-1", Duration::from_secs(600))
            .await
            .unwrap();
        assert!(client.auth().validate().await);
    }

    #[tokio::test]
    async fn test_validate_short_circuits_near_expiry() {
        let server = MockServer::start().await;
        // Inside the 30 second skew
        mount_token(&server, now() + 10).await;
        Mock::given(method("GET"))
            .and(path("/v2/auth/validate"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        client
            .auth()
            .authenticate("client-1", Duration::from_secs(600))
            .await
            .unwrap();
        assert!(!client.auth().validate().await);
    }

    #[tokio::test]
    async fn test_invalidate() {
        let server = MockServer::start().await;
        mount_token(&server, now() + 600).await;
        Mock::given(method("GET"))
            .and(path("/v2/auth/invalidate"))
            .and(header("x-token", "tok-abc"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        client
            .auth()
            .authenticate("client-1", Duration::from_secs(600))
            .await
            .unwrap();
        assert!(client.auth().invalidate().await);
        assert!(client.auth().is_token_expired(0));
        // Nothing left to invalidate, so no second request
        assert!(client.auth().invalidate().await);
    }

    #[tokio::test]
    async fn test_invalidate_without_token_is_noop() {
        let server = MockServer::start().await;
        let client = client_for(&server);
        assert!(client.auth().invalidate().await);
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
