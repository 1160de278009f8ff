//! One-call-per-operation facade over the builder, a transport and the
//! normalizer.
//!
//! # Design
//! Each method is build → execute → normalize, nothing more: no retries, no
//! pagination traversal, no caching. Every method returns an `ApiResponse`;
//! failures on our side of the wire become the internal-error envelope.

use serde::de::DeserializeOwned;
use tracing::{instrument, Span};
use uuid::Uuid;

use crate::client::ITwinsClient;
use crate::config::ClientConfig;
use crate::envelope::{normalize, normalize_empty, ApiResponse};
use crate::error::ClientError;
use crate::http::{HttpRequest, HttpResponse};
use crate::query::{BaseQueryArg, ITwinsQueryArg, RepositoryQueryArg, ResultMode};
use crate::transport::{Transport, UreqTransport};
use crate::types::{
    Export, ExportRequest, ITwin, ITwinImage, ITwinUpdate, ImageContentType, NewITwin,
    NewRepository, NewRepositoryResource, Repository, RepositoryResource, RepositoryUpdate,
};

/// Access client for the iTwins service.
///
/// ```rust,ignore
/// use itwins_client::{ITwinsAccessClient, ITwinsQueryArg};
///
/// let client = ITwinsAccessClient::from_env()?;
/// let page = client.query_itwins(&token, &ITwinsQueryArg { top: Some(50), ..Default::default() });
/// if let Some(next) = page.next_link() {
///     println!("more at {next}");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ITwinsAccessClient<T = UreqTransport> {
    client: ITwinsClient,
    transport: T,
}

impl ITwinsAccessClient<UreqTransport> {
    /// Production endpoint, honoring `IMJS_URL_PREFIX`.
    pub fn from_env() -> Result<Self, ClientError> {
        Ok(Self::new(
            ITwinsClient::with_config(ClientConfig::from_env()?),
            UreqTransport::default(),
        ))
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self::new(ITwinsClient::new(base_url)?, UreqTransport::default()))
    }
}

impl<T: Transport> ITwinsAccessClient<T> {
    pub fn new(client: ITwinsClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &ITwinsClient {
        &self.client
    }

    // --- iTwins ---

    pub fn query_itwins(&self, token: &str, arg: &ITwinsQueryArg) -> ApiResponse<Vec<ITwin>> {
        self.call(Ok(self.client.build_query_itwins(token, arg)), Some("iTwins"))
    }

    pub fn get_itwin(&self, token: &str, id: Uuid, mode: Option<ResultMode>) -> ApiResponse<ITwin> {
        self.call(Ok(self.client.build_get_itwin(token, id, mode)), Some("iTwin"))
    }

    /// The account iTwin that owns `id`.
    pub fn get_itwin_account(
        &self,
        token: &str,
        id: Uuid,
        mode: Option<ResultMode>,
    ) -> ApiResponse<ITwin> {
        self.call(Ok(self.client.build_get_itwin_account(token, id, mode)), Some("iTwin"))
    }

    pub fn get_primary_account(&self, token: &str) -> ApiResponse<ITwin> {
        self.call(Ok(self.client.build_get_primary_account(token)), Some("iTwin"))
    }

    pub fn create_itwin(&self, token: &str, input: &NewITwin) -> ApiResponse<ITwin> {
        self.call(self.client.build_create_itwin(token, input), Some("iTwin"))
    }

    pub fn update_itwin(&self, token: &str, id: Uuid, input: &ITwinUpdate) -> ApiResponse<ITwin> {
        self.call(self.client.build_update_itwin(token, id, input), Some("iTwin"))
    }

    pub fn delete_itwin(&self, token: &str, id: Uuid) -> ApiResponse<()> {
        self.call_empty(Ok(self.client.build_delete_itwin(token, id)))
    }

    // --- favorites and recents ---

    pub fn query_favorites(&self, token: &str, arg: &BaseQueryArg) -> ApiResponse<Vec<ITwin>> {
        self.call(Ok(self.client.build_query_favorites(token, arg)), Some("iTwins"))
    }

    pub fn add_favorite(&self, token: &str, id: Uuid) -> ApiResponse<()> {
        self.call_empty(Ok(self.client.build_add_favorite(token, id)))
    }

    pub fn remove_favorite(&self, token: &str, id: Uuid) -> ApiResponse<()> {
        self.call_empty(Ok(self.client.build_remove_favorite(token, id)))
    }

    pub fn query_recents(&self, token: &str, arg: &BaseQueryArg) -> ApiResponse<Vec<ITwin>> {
        self.call(Ok(self.client.build_query_recents(token, arg)), Some("iTwins"))
    }

    pub fn add_recent(&self, token: &str, id: Uuid) -> ApiResponse<()> {
        self.call_empty(Ok(self.client.build_add_recent(token, id)))
    }

    // --- repositories ---

    pub fn query_repositories(
        &self,
        token: &str,
        itwin_id: Uuid,
        arg: &RepositoryQueryArg,
    ) -> ApiResponse<Vec<Repository>> {
        let request = self.client.build_query_repositories(token, itwin_id, arg);
        self.call(Ok(request), Some("repositories"))
    }

    pub fn get_repository(&self, token: &str, itwin_id: Uuid, repository_id: &str) -> ApiResponse<Repository> {
        let request = self.client.build_get_repository(token, itwin_id, repository_id);
        self.call(Ok(request), Some("repository"))
    }

    pub fn create_repository(
        &self,
        token: &str,
        itwin_id: Uuid,
        input: &NewRepository,
    ) -> ApiResponse<Repository> {
        let request = self.client.build_create_repository(token, itwin_id, input);
        self.call(request, Some("repository"))
    }

    pub fn update_repository(
        &self,
        token: &str,
        itwin_id: Uuid,
        repository_id: &str,
        input: &RepositoryUpdate,
    ) -> ApiResponse<Repository> {
        let request = self
            .client
            .build_update_repository(token, itwin_id, repository_id, input);
        self.call(request, Some("repository"))
    }

    pub fn delete_repository(&self, token: &str, itwin_id: Uuid, repository_id: &str) -> ApiResponse<()> {
        let request = self.client.build_delete_repository(token, itwin_id, repository_id);
        self.call_empty(Ok(request))
    }

    // --- repository resources ---

    pub fn query_repository_resources(
        &self,
        token: &str,
        itwin_id: Uuid,
        repository_id: &str,
        arg: &BaseQueryArg,
    ) -> ApiResponse<Vec<RepositoryResource>> {
        let request = self
            .client
            .build_query_repository_resources(token, itwin_id, repository_id, arg);
        self.call(Ok(request), Some("resources"))
    }

    pub fn get_repository_resource(
        &self,
        token: &str,
        itwin_id: Uuid,
        repository_id: &str,
        resource_id: &str,
        mode: Option<ResultMode>,
    ) -> ApiResponse<RepositoryResource> {
        let request = self.client.build_get_repository_resource(
            token,
            itwin_id,
            repository_id,
            resource_id,
            mode,
        );
        self.call(Ok(request), Some("resource"))
    }

    pub fn create_repository_resource(
        &self,
        token: &str,
        itwin_id: Uuid,
        repository_id: &str,
        input: &NewRepositoryResource,
    ) -> ApiResponse<RepositoryResource> {
        let request = self
            .client
            .build_create_repository_resource(token, itwin_id, repository_id, input);
        self.call(request, Some("resource"))
    }

    pub fn delete_repository_resource(
        &self,
        token: &str,
        itwin_id: Uuid,
        repository_id: &str,
        resource_id: &str,
    ) -> ApiResponse<()> {
        let request = self.client.build_delete_repository_resource(
            token,
            itwin_id,
            repository_id,
            resource_id,
        );
        self.call_empty(Ok(request))
    }

    // --- exports ---

    pub fn create_export(&self, token: &str, input: &ExportRequest) -> ApiResponse<Export> {
        self.call(self.client.build_create_export(token, input), Some("export"))
    }

    pub fn query_exports(&self, token: &str) -> ApiResponse<Vec<Export>> {
        self.call(Ok(self.client.build_query_exports(token)), Some("exports"))
    }

    pub fn get_export(&self, token: &str, id: Uuid) -> ApiResponse<Export> {
        self.call(Ok(self.client.build_get_export(token, id)), Some("export"))
    }

    // --- images ---

    pub fn get_itwin_image(&self, token: &str, id: Uuid) -> ApiResponse<ITwinImage> {
        self.call(Ok(self.client.build_get_itwin_image(token, id)), Some("image"))
    }

    pub fn upload_itwin_image(
        &self,
        token: &str,
        id: Uuid,
        image: Vec<u8>,
        content_type: ImageContentType,
    ) -> ApiResponse<ITwinImage> {
        let request = self
            .client
            .build_upload_itwin_image(token, id, image, content_type);
        self.call(Ok(request), Some("image"))
    }

    pub fn delete_itwin_image(&self, token: &str, id: Uuid) -> ApiResponse<()> {
        self.call_empty(Ok(self.client.build_delete_itwin_image(token, id)))
    }

    /// Execute a request taken from [`ITwinsClient`] and adjusted by the
    /// caller, e.g. with [`HttpRequest::with_headers`] for one-off headers.
    pub fn send<D: DeserializeOwned>(
        &self,
        request: &HttpRequest,
        property: Option<&str>,
    ) -> ApiResponse<D> {
        match self.execute(request) {
            Ok(response) => normalize(response, property),
            Err(e) => ApiResponse::from_client_error(&e),
        }
    }

    /// [`send`](Self::send) for operations without a payload.
    pub fn send_empty(&self, request: &HttpRequest) -> ApiResponse<()> {
        match self.execute(request) {
            Ok(response) => normalize_empty(response),
            Err(e) => ApiResponse::from_client_error(&e),
        }
    }

    fn call<D: DeserializeOwned>(
        &self,
        request: Result<HttpRequest, ClientError>,
        property: Option<&str>,
    ) -> ApiResponse<D> {
        match request {
            Ok(request) => self.send(&request, property),
            Err(e) => ApiResponse::from_client_error(&e),
        }
    }

    fn call_empty(&self, request: Result<HttpRequest, ClientError>) -> ApiResponse<()> {
        match request {
            Ok(request) => self.send_empty(&request),
            Err(e) => ApiResponse::from_client_error(&e),
        }
    }

    #[instrument(
        name = "itwins_request",
        skip_all,
        fields(
            http.method = %request.method,
            http.url = %request.url,
            http.status_code = tracing::field::Empty,
        )
    )]
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ClientError> {
        let response = self.transport.execute(request)?;
        Span::current().record("http.status_code", response.status);
        tracing::debug!(status = response.status, "iTwins service responded");
        Ok(response)
    }
}
