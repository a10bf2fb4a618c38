//! The HTTP request pipeline.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use pharmadesk_auth::SessionStore;
use pharmadesk_core::{ClientConfig, ClientError, ClientResult, Query, endpoints};

#[derive(Debug, Serialize)]
struct RefreshRequest {
    refresh: String,
}

#[derive(Debug, serde::Deserialize)]
struct RefreshResponse {
    access: String,
}

/// The only component that performs network I/O for the SDK.
///
/// Per call: the current access token is read from the session store and
/// attached as a bearer credential, the call is issued, and the JSON body is
/// decoded on success (204 resolves to an empty value). On a 401 with a
/// refresh token present, a single silent refresh runs; on refresh success
/// the stored access token is updated but the failing call is **not**
/// retried here: the caller still sees its error and the corrected token is
/// used on its next call. On refresh failure the session is cleared and the
/// [`HttpClient::session_expired`] signal flips; navigation is the host's
/// decision.
///
/// Concurrent 401s collapse onto one in-flight refresh, so a late refresh
/// can never overwrite a newer access token with a staler one.
pub struct HttpClient {
    base_url: String,
    http: reqwest::Client,
    session: Arc<SessionStore>,
    refresh_gate: tokio::sync::Mutex<()>,
    expired_tx: watch::Sender<bool>,
}

impl HttpClient {
    pub fn new(config: ClientConfig, session: Arc<SessionStore>) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let (expired_tx, _) = watch::channel(false);

        Ok(Self {
            base_url: config.base_url,
            http,
            session,
            refresh_gate: tokio::sync::Mutex::new(()),
            expired_tx,
        })
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Flips to `true` when a failed refresh forced a logout. The host
    /// shell watches this to route the user back to the login boundary.
    pub fn session_expired(&self) -> watch::Receiver<bool> {
        self.expired_tx.subscribe()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Verbs
    // ─────────────────────────────────────────────────────────────────────

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<T> {
        let (mut req, access) = self.request(Method::GET, path);
        let entries = query.entries();
        if !entries.is_empty() {
            req = req.query(&entries);
        }
        self.execute(req, access, cancel).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: Option<&B>,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<T> {
        self.send_body(Method::POST, path, body, cancel).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: Option<&B>,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<T> {
        self.send_body(Method::PUT, path, body, cancel).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: Option<&B>,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<T> {
        self.send_body(Method::PATCH, path, body, cancel).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<T> {
        let (req, access) = self.request(Method::DELETE, path);
        self.execute(req, access, cancel).await
    }

    /// GET with an explicit bearer token instead of the stored one.
    ///
    /// Used during sign-in, when the freshly issued tokens have not been
    /// written to the session yet.
    pub(crate) async fn get_with_token<T: DeserializeOwned>(
        &self,
        path: &str,
        access: &str,
    ) -> ClientResult<T> {
        let req = self.http.get(self.url(path)).bearer_auth(access);
        self.execute(req, Some(access.to_string()), None).await
    }

    // ─────────────────────────────────────────────────────────────────────
    // Pipeline internals
    // ─────────────────────────────────────────────────────────────────────

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build a request with the current access token attached. The token is
    /// also returned so the 401 path can tell whether the credential that
    /// failed has already been replaced by someone else's refresh.
    fn request(&self, method: Method, path: &str) -> (RequestBuilder, Option<String>) {
        let access = self.session.access_token();
        let mut req = self.http.request(method, self.url(path));
        if let Some(access) = &access {
            req = req.bearer_auth(access);
        }
        (req, access)
    }

    async fn send_body<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<T> {
        let (mut req, access) = self.request(method, path);
        if let Some(body) = body {
            req = req.json(body);
        }
        self.execute(req, access, cancel).await
    }

    /// Issue the call, racing it against the caller's cancellation signal.
    ///
    /// A fired signal drops the in-flight call before any of the failure
    /// handling below runs, so a cancelled call can never trigger a refresh
    /// or a forced logout.
    async fn execute<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        used_access: Option<String>,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<T> {
        let call = async {
            let resp = req
                .send()
                .await
                .map_err(|e| ClientError::Network(e.to_string()))?;
            self.handle_response(resp, used_access).await
        };

        match cancel {
            Some(token) => tokio::select! {
                _ = token.cancelled() => Err(ClientError::Cancelled),
                result = call => result,
            },
            None => call.await,
        }
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
        used_access: Option<String>,
    ) -> ClientResult<T> {
        let status = resp.status();

        if status.is_success() {
            if status == StatusCode::NO_CONTENT {
                return decode_empty();
            }
            let bytes = resp
                .bytes()
                .await
                .map_err(|e| ClientError::Network(e.to_string()))?;
            if bytes.is_empty() {
                return decode_empty();
            }
            return serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()));
        }

        // Tolerate empty or non-JSON error bodies.
        let body: Value = match resp.bytes().await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::Object(Map::new())),
            Err(_) => Value::Object(Map::new()),
        };

        if status == StatusCode::UNAUTHORIZED && self.session.refresh_token().is_some() {
            if !self.refresh_access_token(used_access).await {
                self.session.logout();
                let _ = self.expired_tx.send(true);
            }
        }

        Err(ClientError::api(status.as_u16(), body))
    }

    /// One-shot silent refresh.
    ///
    /// Reads the refresh token from the session, posts it to the refresh
    /// endpoint, and writes the new access token back on success. Reports
    /// failure without touching the session otherwise.
    ///
    /// The call goes directly through the transport, never through the verb
    /// methods, so it cannot re-enter the 401 handling and loop. The gate
    /// single-flights concurrent attempts: a caller whose failing request
    /// went out with an access token that has since been replaced skips its
    /// own refresh, so one refresh happens per stale token, not per 401.
    async fn refresh_access_token(&self, used_access: Option<String>) -> bool {
        let _guard = self.refresh_gate.lock().await;

        if self.session.access_token() != used_access {
            return self.session.tokens().is_some();
        }

        let Some(refresh) = self.session.refresh_token() else {
            return false;
        };

        let resp = match self
            .http
            .post(self.url(endpoints::AUTH_REFRESH))
            .json(&RefreshRequest { refresh })
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!("token refresh transport failure: {e}");
                return false;
            }
        };

        if !resp.status().is_success() {
            tracing::warn!("token refresh rejected: {}", resp.status());
            return false;
        }

        match resp.json::<RefreshResponse>().await {
            Ok(body) => {
                self.session.update_access_token(body.access);
                true
            }
            Err(e) => {
                tracing::warn!("token refresh returned malformed body: {e}");
                false
            }
        }
    }
}

/// Resolve a 204/empty body to the caller's expected shape.
///
/// Unit and all-optional shapes decode from null or an empty object; asking
/// for a concrete payload out of an empty response is a decode error.
fn decode_empty<T: DeserializeOwned>() -> ClientResult<T> {
    serde_json::from_value(Value::Null)
        .or_else(|_| serde_json::from_value(Value::Object(Map::new())))
        .map_err(|e| ClientError::Decode(format!("empty response body: {e}")))
}
