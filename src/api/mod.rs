use crate::config::EngineConfig;
use crate::lookup::{CandidateSource, LookupError};
use crate::models::{Note, Tag};
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiErrorKind {
    Unauthorized,
    Network,
    Http,
    Parse,
}

#[derive(Clone, Debug, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
        }
    }

    fn unauthorized() -> Self {
        Self {
            kind: ApiErrorKind::Unauthorized,
            message: "Unauthorized".to_string(),
        }
    }

    fn http(status: reqwest::StatusCode, body: String, ctx: &str) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            message: format!("{ctx} ({status}): {body}"),
        }
    }
}

impl From<ApiError> for LookupError {
    fn from(e: ApiError) -> Self {
        match e.kind {
            ApiErrorKind::Network => LookupError::Unavailable,
            _ => LookupError::Search(e.message),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SearchRequest {
    pub query: String,
}

/// HTTP client for the host's note and tag search endpoints.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.api_url.clone())
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    fn get_auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {t}"))
    }

    fn with_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.get_auth_header() {
            Some(h) => req.header("Authorization", h),
            None => req,
        }
    }

    fn notes_url(&self, folder: Option<&str>) -> String {
        match folder {
            Some(f) => format!("{}/notes?folder={}", self.base_url, urlencoding::encode(f)),
            None => format!("{}/notes", self.base_url),
        }
    }

    async fn read_json<T: serde::de::DeserializeOwned>(res: reqwest::Response) -> ApiResult<T> {
        if res.status().is_success() {
            let body = res.text().await.map_err(ApiError::network)?;
            serde_json::from_str(&body).map_err(ApiError::parse)
        } else if res.status().as_u16() == 401 {
            Err(ApiError::unauthorized())
        } else {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::http(status, body, "Request failed"))
        }
    }

    async fn post_search<T: serde::de::DeserializeOwned>(&self, path: &str, query: &str) -> ApiResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let body = SearchRequest {
            query: query.to_string(),
        };
        let req = self.with_auth(reqwest::Client::new().post(url)).json(&body);
        let res = req.send().await.map_err(ApiError::network)?;
        Self::read_json(res).await
    }

    pub async fn search_notes(&self, query: &str) -> ApiResult<Vec<Note>> {
        self.post_search("/notes/search", query).await
    }

    pub async fn search_tags(&self, query: &str) -> ApiResult<Vec<Tag>> {
        self.post_search("/tags/search", query).await
    }

    /// Full note list (optionally one folder), for link-graph refreshes.
    pub async fn list_notes(&self, folder: Option<&str>) -> ApiResult<Vec<Note>> {
        let req = self.with_auth(reqwest::Client::new().get(self.notes_url(folder)));
        let res = req.send().await.map_err(ApiError::network)?;
        Self::read_json(res).await
    }
}

impl CandidateSource for ApiClient {
    fn search_notes(&self, query: &str) -> LocalBoxFuture<'_, Result<Vec<Note>, LookupError>> {
        let query = query.to_string();
        async move { ApiClient::search_notes(self, &query).await.map_err(LookupError::from) }.boxed_local()
    }

    fn search_tags(&self, query: &str) -> LocalBoxFuture<'_, Result<Vec<Tag>, LookupError>> {
        let query = query.to_string();
        async move { ApiClient::search_tags(self, &query).await.map_err(LookupError::from) }.boxed_local()
    }
}
