//! Authenticated JSON requests against the Big Tables API

use crate::error::{BigTableError, Result};
use crate::http::{HttpClient, HttpResponse};
use glide_bigtable_config::redact_secret;
use serde::Serialize;

/// Where and as whom requests are sent.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct ApiEndpoint {
    api_host: String,
    api_path_root: String,
    api_key: String,
}

impl ApiEndpoint {
    pub(crate) fn new(
        api_host: impl Into<String>,
        api_key: impl Into<String>,
        api_path_root: impl Into<String>,
    ) -> Self {
        Self {
            api_host: api_host.into(),
            api_path_root: api_path_root.into(),
            api_key: api_key.into(),
        }
    }

    /// `{host}/{path_root/}{path}`; the root segment is omitted when empty.
    pub(crate) fn url(&self, path: &str) -> String {
        let host = self.api_host.trim_end_matches('/');
        let root = self.api_path_root.trim_matches('/');
        if root.is_empty() {
            format!("{}/{}", host, path)
        } else {
            format!("{}/{}/{}", host, root, path)
        }
    }

    pub(crate) fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            (
                "Authorization".to_string(),
                format!("Bearer {}", self.api_key),
            ),
        ]
    }
}

impl std::fmt::Debug for ApiEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiEndpoint")
            .field("api_host", &self.api_host)
            .field("api_path_root", &self.api_path_root)
            .field("api_key", &redact_secret(&self.api_key))
            .finish()
    }
}

/// Issues requests for one endpoint through an [`HttpClient`].
///
/// Only transport failures are errors here; callers decide what a
/// non-success status means.
pub(crate) struct RestGateway<'a, T: HttpClient> {
    http: &'a T,
    endpoint: &'a ApiEndpoint,
}

impl<'a, T: HttpClient> RestGateway<'a, T> {
    pub(crate) fn new(http: &'a T, endpoint: &'a ApiEndpoint) -> Self {
        Self { http, endpoint }
    }

    pub(crate) async fn get(&self, path: &str) -> Result<HttpResponse> {
        let url = self.endpoint.url(path);
        self.http
            .get(&url, self.endpoint.headers())
            .await
            .map_err(|source| BigTableError::Transport { url, source })
    }

    pub(crate) async fn put_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<HttpResponse> {
        let url = self.endpoint.url(path);
        let body = serde_json::to_vec(body)?;
        self.http
            .put(&url, self.endpoint.headers(), body)
            .await
            .map_err(|source| BigTableError::Transport { url, source })
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<HttpResponse> {
        let url = self.endpoint.url(path);
        let body = serde_json::to_vec(body)?;
        self.http
            .post(&url, self.endpoint.headers(), body)
            .await
            .map_err(|source| BigTableError::Transport { url, source })
    }
}
