//! reqwest transport for the Catalyst Center intent API
//!
//! Authenticates with `X-Auth-Token`. With a username/password the token is
//! fetched from `/dna/system/api/v1/auth/token` on first use, cached, and
//! fetched again once if the controller answers 401.

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{CredentialBackend, Exchange, RawResponse, TransportError, TransportResult};
use crate::config::{AuthConfig, ClientConfig};
use crate::logging::file_logger as log;
use crate::types::{CredentialSubTypePayload, GlobalCredentialsPayload, GlobalCredentialsQuery};

const AUTH_PATH: &str = "/dna/system/api/v1/auth/token";
const GLOBAL_CREDENTIALS_PATH: &str = "/dna/intent/api/v2/global-credential";
const CREDENTIAL_SUB_TYPE_PATH: &str = "/dna/intent/api/v1/global-credential";
const TOKEN_HEADER: &str = "X-Auth-Token";
const LOG_MODULE: &str = "backend::http";

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(rename = "Token")]
    token: String,
}

/// HTTP transport against a live controller
pub struct HttpBackend {
    client: Client,
    base_url: String,
    auth: AuthConfig,
    token: RwLock<Option<String>>,
}

impl HttpBackend {
    /// Build a transport from validated settings
    pub fn new(config: &ClientConfig) -> TransportResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()?;

        let token = match &config.auth {
            AuthConfig::Token(token) => Some(token.clone()),
            AuthConfig::Login { .. } => None,
        };

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth: config.auth.clone(),
            token: RwLock::new(token),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn endpoint(&self, path: &str) -> TransportResult<Url> {
        Url::parse(&self.url(path))
            .map_err(|e| TransportError::Config(format!("invalid base URL {}: {}", self.base_url, e)))
    }

    /// Lookup URL with `id` appended as a single, escaped path segment
    fn sub_type_url(&self, id: &str) -> TransportResult<Url> {
        let mut url = self.endpoint(CREDENTIAL_SUB_TYPE_PATH)?;
        url.path_segments_mut()
            .map_err(|_| TransportError::Config(format!("base URL {} cannot carry a path", self.base_url)))?
            .push(id);
        Ok(url)
    }

    async fn login(&self, username: &str, password: &str) -> TransportResult<String> {
        log::debug(LOG_MODULE, &format!("Requesting token for {}", username));

        let response = self
            .client
            .post(self.url(AUTH_PATH))
            .basic_auth(username, Some(password))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            log::error(LOG_MODULE, &format!("Token request failed: {}", status));
            return Err(TransportError::Auth(format!(
                "token request returned {}: {}",
                status.as_u16(),
                body
            )));
        }

        let parsed: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| TransportError::Auth(format!("malformed token response: {}", e)))?;
        Ok(parsed.token)
    }

    /// Cached token, logging in when there is none
    async fn token(&self) -> TransportResult<String> {
        if let Some(token) = self.token.read().clone() {
            return Ok(token);
        }

        match &self.auth {
            AuthConfig::Token(token) => Ok(token.clone()),
            AuthConfig::Login { username, password } => {
                let token = self.login(username, password).await?;
                *self.token.write() = Some(token.clone());
                Ok(token)
            }
        }
    }

    fn can_refresh(&self) -> bool {
        matches!(self.auth, AuthConfig::Login { .. })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&'static str, String)],
    ) -> TransportResult<Exchange<T>> {
        let mut refreshed = false;

        loop {
            let token = self.token().await?;
            log::debug(LOG_MODULE, &format!("GET {} params={:?}", url, query));

            let response = self
                .client
                .get(url.clone())
                .header(TOKEN_HEADER, token)
                .query(query)
                .send()
                .await?;

            let status = response.status();
            let body = response.text().await?;
            let raw = RawResponse::new(status.as_u16(), body);

            if status == StatusCode::UNAUTHORIZED && self.can_refresh() && !refreshed {
                log::warn(LOG_MODULE, "Token rejected, logging in again");
                *self.token.write() = None;
                refreshed = true;
                continue;
            }

            if !status.is_success() {
                log::error(LOG_MODULE, &format!("GET {} returned {}", url, status));
                return Err(TransportError::Status { raw });
            }

            if raw.body.trim().is_empty() {
                return Ok(Exchange::empty(Some(raw)));
            }

            return match serde_json::from_str::<Option<T>>(&raw.body) {
                Ok(payload) => Ok(Exchange::new(payload, Some(raw))),
                Err(source) => Err(TransportError::Decode { source, raw }),
            };
        }
    }
}

impl std::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackend")
            .field("base_url", &self.base_url)
            .field("auth", &self.auth)
            .finish()
    }
}

#[async_trait]
impl CredentialBackend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn get_global_credentials(
        &self,
        query: &GlobalCredentialsQuery,
    ) -> TransportResult<Exchange<GlobalCredentialsPayload>> {
        let url = self.endpoint(GLOBAL_CREDENTIALS_PATH)?;
        self.get_json(url, &query.to_pairs()).await
    }

    async fn get_credential_sub_type_by_id(
        &self,
        id: &str,
    ) -> TransportResult<Exchange<CredentialSubTypePayload>> {
        if id.is_empty() {
            return Err(TransportError::Other("credential id must not be empty".to_string()));
        }
        let url = self.sub_type_url(id)?;
        self.get_json(url, &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::Mutex;

    /// Serve canned `(status, body)` replies, one connection each, recording
    /// the request heads.
    async fn serve(replies: Vec<(u16, &'static str)>) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&seen);

        tokio::spawn(async move {
            for (status, body) in replies {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = socket.read(&mut buf).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    head.extend_from_slice(&buf[..n]);
                }
                recorded.lock().await.push(String::from_utf8_lossy(&head).to_string());

                let response = format!(
                    "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.ok();
            }
        });

        (format!("http://{}", addr), seen)
    }

    fn config(base_url: &str, auth: AuthConfig) -> ClientConfig {
        let mut config = ClientConfig::new(base_url, auth);
        config.timeout = Duration::from_secs(5);
        config
    }

    #[test]
    fn test_sub_type_url_escapes_id() {
        let backend = HttpBackend::new(&config(
            "https://dnac.example.com/",
            AuthConfig::Token("tok".into()),
        ))
        .unwrap();

        let plain = backend.sub_type_url("abc-123_x.y~z").unwrap();
        assert_eq!(
            plain.as_str(),
            "https://dnac.example.com/dna/intent/api/v1/global-credential/abc-123_x.y~z"
        );

        let escaped = backend.sub_type_url("a/b c?d").unwrap();
        assert_eq!(
            escaped.path(),
            "/dna/intent/api/v1/global-credential/a%2Fb%20c%3Fd"
        );
        assert_eq!(escaped.query(), None);
    }

    #[test]
    fn test_unparseable_base_url_is_config_error() {
        let backend =
            HttpBackend::new(&config("http://[::1", AuthConfig::Token("tok".into()))).unwrap();
        assert!(matches!(backend.sub_type_url("x"), Err(TransportError::Config(_))));
    }

    #[tokio::test]
    async fn test_list_sends_only_present_filters() {
        let (base, seen) = serve(vec![(
            200,
            r#"{"response":[{"id":"c1","credentialType":"CLI","username":"u"}],"version":"1.0"}"#,
        )])
        .await;
        let backend = HttpBackend::new(&config(&base, AuthConfig::Token("tok".into()))).unwrap();

        let query = GlobalCredentialsQuery {
            credential_sub_type: Some("CLI".to_string()),
            sort_by: None,
            order: None,
        };
        let exchange = backend.get_global_credentials(&query).await.unwrap();
        let payload = exchange.payload.unwrap();
        assert_eq!(payload.version, "1.0");
        assert_eq!(payload.response.unwrap()[0].username, "u");

        let requests = seen.lock().await;
        let head = &requests[0];
        assert!(head.starts_with(
            "GET /dna/intent/api/v2/global-credential?credentialSubType=CLI HTTP/1.1"
        ));
        assert!(!head.contains("sortBy"));
        assert!(head.to_lowercase().contains("x-auth-token: tok"));
    }

    #[tokio::test]
    async fn test_sub_type_lookup_path() {
        let (base, seen) = serve(vec![(200, r#"{"response":"CLICredential","version":"1.0"}"#)]).await;
        let backend = HttpBackend::new(&config(&base, AuthConfig::Token("tok".into()))).unwrap();

        let exchange = backend.get_credential_sub_type_by_id("abc-1").await.unwrap();
        assert_eq!(exchange.payload.unwrap().response, "CLICredential");
        assert!(seen.lock().await[0].starts_with("GET /dna/intent/api/v1/global-credential/abc-1 "));
    }

    #[tokio::test]
    async fn test_login_then_request() {
        let (base, seen) = serve(vec![
            (200, r#"{"Token":"fresh"}"#),
            (200, r#"{"response":[],"version":"1.0"}"#),
        ])
        .await;
        let backend = HttpBackend::new(&config(
            &base,
            AuthConfig::Login {
                username: "admin".into(),
                password: "secret".into(),
            },
        ))
        .unwrap();

        let exchange = backend
            .get_global_credentials(&GlobalCredentialsQuery::new())
            .await
            .unwrap();
        assert_eq!(exchange.payload.unwrap().response, Some(vec![]));

        let requests = seen.lock().await;
        assert!(requests[0].starts_with("POST /dna/system/api/v1/auth/token"));
        assert!(requests[0].to_lowercase().contains("authorization: basic"));
        assert!(requests[1].to_lowercase().contains("x-auth-token: fresh"));
    }

    #[tokio::test]
    async fn test_error_status_keeps_body() {
        let (base, _) = serve(vec![(404, r#"{"response":{"message":"not found"}}"#)]).await;
        let backend = HttpBackend::new(&config(&base, AuthConfig::Token("tok".into()))).unwrap();

        let err = backend.get_credential_sub_type_by_id("missing").await.unwrap_err();
        let raw = err.raw().unwrap();
        assert_eq!(raw.status, 404);
        assert!(raw.body.contains("not found"));
    }

    #[tokio::test]
    async fn test_null_body_is_empty_exchange() {
        let (base, _) = serve(vec![(200, "null")]).await;
        let backend = HttpBackend::new(&config(&base, AuthConfig::Token("tok".into()))).unwrap();

        let exchange = backend.get_credential_sub_type_by_id("x").await.unwrap();
        assert!(exchange.payload.is_none());
        assert_eq!(exchange.raw.unwrap().body, "null");
    }

    #[tokio::test]
    async fn test_garbage_body_is_decode_error() {
        let (base, _) = serve(vec![(200, "<html>oops</html>")]).await;
        let backend = HttpBackend::new(&config(&base, AuthConfig::Token("tok".into()))).unwrap();

        let err = backend
            .get_global_credentials(&GlobalCredentialsQuery::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Decode { .. }));
        assert!(err.raw().unwrap().body.contains("oops"));
    }

    #[tokio::test]
    async fn test_empty_id_rejected_locally() {
        let backend =
            HttpBackend::new(&config("http://127.0.0.1:9", AuthConfig::Token("tok".into()))).unwrap();
        assert!(matches!(
            backend.get_credential_sub_type_by_id("").await,
            Err(TransportError::Other(_))
        ));
    }
}
