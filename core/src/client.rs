//! Stateless HTTP request builder for the iTwins API.
//!
//! # Design
//! `ITwinsClient` holds only its configuration and carries no mutable state
//! between calls. Each operation has a `build_*` method producing an
//! `HttpRequest`; executing it and normalizing the response is left to the
//! caller (see [`ITwinsAccessClient`](crate::ITwinsAccessClient) for the
//! composed version). Builders that serialize a payload return `Result`.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::http::{merge_headers, HttpMethod, HttpRequest};
use crate::query::{
    with_query, BaseQueryArg, ITwinsQueryArg, QueryArg, RepositoryQueryArg, ResultMode,
};
use crate::types::{
    ExportRequest, ITwinUpdate, ImageContentType, NewITwin, NewRepository,
    NewRepositoryResource, RepositoryUpdate,
};

const JSON: &str = "application/json";

const NO_QUERY: Option<ResultMode> = None;

/// Unreserved characters (RFC 3986) stay as-is inside a path segment.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

#[derive(Debug, Clone)]
pub struct ITwinsClient {
    config: ClientConfig,
}

impl Default for ITwinsClient {
    fn default() -> Self {
        Self::with_config(ClientConfig::default())
    }
}

impl ITwinsClient {
    /// Client against `base_url`, e.g. `https://api.bentley.com/itwins`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self::with_config(
            ClientConfig::default().with_base_url(base_url)?,
        ))
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // --- iTwins ---

    pub fn build_query_itwins(&self, token: &str, arg: &ITwinsQueryArg) -> HttpRequest {
        self.request(token, HttpMethod::Get, "", arg, None)
    }

    pub fn build_get_itwin(&self, token: &str, id: Uuid, mode: Option<ResultMode>) -> HttpRequest {
        self.request(token, HttpMethod::Get, &format!("/{id}"), &mode, None)
    }

    pub fn build_get_itwin_account(
        &self,
        token: &str,
        id: Uuid,
        mode: Option<ResultMode>,
    ) -> HttpRequest {
        self.request(token, HttpMethod::Get, &format!("/{id}/account"), &mode, None)
    }

    pub fn build_get_primary_account(&self, token: &str) -> HttpRequest {
        self.request(token, HttpMethod::Get, "/myprimaryaccount", &NO_QUERY, None)
    }

    pub fn build_create_itwin(&self, token: &str, input: &NewITwin) -> Result<HttpRequest, ClientError> {
        let body = json_body(input)?;
        Ok(self.request(token, HttpMethod::Post, "", &NO_QUERY, Some(body)))
    }

    pub fn build_update_itwin(
        &self,
        token: &str,
        id: Uuid,
        input: &ITwinUpdate,
    ) -> Result<HttpRequest, ClientError> {
        let body = json_body(input)?;
        Ok(self.request(token, HttpMethod::Patch, &format!("/{id}"), &NO_QUERY, Some(body)))
    }

    pub fn build_delete_itwin(&self, token: &str, id: Uuid) -> HttpRequest {
        self.request(token, HttpMethod::Delete, &format!("/{id}"), &NO_QUERY, None)
    }

    // --- favorites and recents ---

    pub fn build_query_favorites(&self, token: &str, arg: &BaseQueryArg) -> HttpRequest {
        self.request(token, HttpMethod::Get, "/favorites", arg, None)
    }

    pub fn build_add_favorite(&self, token: &str, id: Uuid) -> HttpRequest {
        self.request(token, HttpMethod::Post, &format!("/favorites/{id}"), &NO_QUERY, None)
    }

    pub fn build_remove_favorite(&self, token: &str, id: Uuid) -> HttpRequest {
        self.request(token, HttpMethod::Delete, &format!("/favorites/{id}"), &NO_QUERY, None)
    }

    pub fn build_query_recents(&self, token: &str, arg: &BaseQueryArg) -> HttpRequest {
        self.request(token, HttpMethod::Get, "/recents", arg, None)
    }

    pub fn build_add_recent(&self, token: &str, id: Uuid) -> HttpRequest {
        self.request(token, HttpMethod::Post, &format!("/recents/{id}"), &NO_QUERY, None)
    }

    // --- repositories ---

    pub fn build_query_repositories(
        &self,
        token: &str,
        itwin_id: Uuid,
        arg: &RepositoryQueryArg,
    ) -> HttpRequest {
        let path = repositories_path(itwin_id);
        self.request(token, HttpMethod::Get, &path, arg, None)
    }

    pub fn build_get_repository(&self, token: &str, itwin_id: Uuid, repository_id: &str) -> HttpRequest {
        let path = repository_path(itwin_id, repository_id);
        self.request(token, HttpMethod::Get, &path, &NO_QUERY, None)
    }

    pub fn build_create_repository(
        &self,
        token: &str,
        itwin_id: Uuid,
        input: &NewRepository,
    ) -> Result<HttpRequest, ClientError> {
        let body = json_body(input)?;
        let path = repositories_path(itwin_id);
        Ok(self.request(token, HttpMethod::Post, &path, &NO_QUERY, Some(body)))
    }

    pub fn build_update_repository(
        &self,
        token: &str,
        itwin_id: Uuid,
        repository_id: &str,
        input: &RepositoryUpdate,
    ) -> Result<HttpRequest, ClientError> {
        let body = json_body(input)?;
        let path = repository_path(itwin_id, repository_id);
        Ok(self.request(token, HttpMethod::Patch, &path, &NO_QUERY, Some(body)))
    }

    pub fn build_delete_repository(&self, token: &str, itwin_id: Uuid, repository_id: &str) -> HttpRequest {
        let path = repository_path(itwin_id, repository_id);
        self.request(token, HttpMethod::Delete, &path, &NO_QUERY, None)
    }

    // --- repository resources ---

    pub fn build_query_repository_resources(
        &self,
        token: &str,
        itwin_id: Uuid,
        repository_id: &str,
        arg: &BaseQueryArg,
    ) -> HttpRequest {
        let path = resources_path(itwin_id, repository_id);
        self.request(token, HttpMethod::Get, &path, arg, None)
    }

    pub fn build_get_repository_resource(
        &self,
        token: &str,
        itwin_id: Uuid,
        repository_id: &str,
        resource_id: &str,
        mode: Option<ResultMode>,
    ) -> HttpRequest {
        let path = resource_path(itwin_id, repository_id, resource_id);
        self.request(token, HttpMethod::Get, &path, &mode, None)
    }

    pub fn build_create_repository_resource(
        &self,
        token: &str,
        itwin_id: Uuid,
        repository_id: &str,
        input: &NewRepositoryResource,
    ) -> Result<HttpRequest, ClientError> {
        let body = json_body(input)?;
        let path = resources_path(itwin_id, repository_id);
        Ok(self.request(token, HttpMethod::Post, &path, &NO_QUERY, Some(body)))
    }

    pub fn build_delete_repository_resource(
        &self,
        token: &str,
        itwin_id: Uuid,
        repository_id: &str,
        resource_id: &str,
    ) -> HttpRequest {
        let path = resource_path(itwin_id, repository_id, resource_id);
        self.request(token, HttpMethod::Delete, &path, &NO_QUERY, None)
    }

    // --- exports ---

    pub fn build_create_export(&self, token: &str, input: &ExportRequest) -> Result<HttpRequest, ClientError> {
        let body = json_body(input)?;
        Ok(self.request(token, HttpMethod::Post, "/exports", &NO_QUERY, Some(body)))
    }

    pub fn build_query_exports(&self, token: &str) -> HttpRequest {
        self.request(token, HttpMethod::Get, "/exports", &NO_QUERY, None)
    }

    pub fn build_get_export(&self, token: &str, id: Uuid) -> HttpRequest {
        self.request(token, HttpMethod::Get, &format!("/exports/{id}"), &NO_QUERY, None)
    }

    // --- images ---

    pub fn build_get_itwin_image(&self, token: &str, id: Uuid) -> HttpRequest {
        self.request(token, HttpMethod::Get, &format!("/{id}/image"), &NO_QUERY, None)
    }

    /// The body is the raw image, so `content-type` carries its MIME type
    /// instead of JSON.
    pub fn build_upload_itwin_image(
        &self,
        token: &str,
        id: Uuid,
        image: Vec<u8>,
        content_type: ImageContentType,
    ) -> HttpRequest {
        let fixed = vec![
            ("authorization".to_string(), token.to_string()),
            ("content-type".to_string(), content_type.mime().to_string()),
        ];
        HttpRequest {
            method: HttpMethod::Put,
            url: format!("{}/{id}/image", self.config.base_url()),
            headers: merge_headers(fixed, self.config.extra_headers()),
            body: Some(image),
        }
    }

    pub fn build_delete_itwin_image(&self, token: &str, id: Uuid) -> HttpRequest {
        self.request(token, HttpMethod::Delete, &format!("/{id}/image"), &NO_QUERY, None)
    }

    fn request(
        &self,
        token: &str,
        method: HttpMethod,
        path: &str,
        query: &dyn QueryArg,
        body: Option<Vec<u8>>,
    ) -> HttpRequest {
        let fixed = vec![
            ("authorization".to_string(), token.to_string()),
            ("content-type".to_string(), JSON.to_string()),
        ];
        let url = format!("{}{path}", self.config.base_url());
        HttpRequest {
            method,
            url: with_query(url, &query.to_query()),
            headers: merge_headers(fixed, self.config.extra_headers()),
            body,
        }
    }
}

fn json_body<T: Serialize>(input: &T) -> Result<Vec<u8>, ClientError> {
    serde_json::to_vec(input).map_err(|e| ClientError::Serialization(e.to_string()))
}

fn segment(raw: &str) -> String {
    utf8_percent_encode(raw, SEGMENT).to_string()
}

fn repositories_path(itwin_id: Uuid) -> String {
    format!("/{itwin_id}/repositories")
}

fn repository_path(itwin_id: Uuid, repository_id: &str) -> String {
    format!("/{itwin_id}/repositories/{}", segment(repository_id))
}

fn resources_path(itwin_id: Uuid, repository_id: &str) -> String {
    format!("{}/resources", repository_path(itwin_id, repository_id))
}

fn resource_path(itwin_id: Uuid, repository_id: &str, resource_id: &str) -> String {
    format!(
        "{}/resources/{}",
        repository_path(itwin_id, repository_id),
        segment(resource_id)
    )
}
