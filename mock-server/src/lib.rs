//! In-memory stand-in for the iTwins service.
//!
//! Covers iTwins, favorites, repositories and repository resources, answering
//! with the same property names, status codes and error codes as the real
//! service. Every route requires an `authorization` header; its value is
//! not checked.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ITwin {
    pub id: Uuid,
    pub class: String,
    pub sub_class: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    pub display_name: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateITwin {
    pub display_name: String,
    pub class: String,
    pub sub_class: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub number: Option<String>,
    pub status: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateITwin {
    pub display_name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub number: Option<String>,
    pub status: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub id: String,
    pub class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRepository {
    pub class: String,
    pub sub_class: Option<String>,
    pub display_name: Option<String>,
    pub uri: String,
    pub authentication: Option<Value>,
    pub options: Option<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRepository {
    pub display_name: Option<String>,
    pub uri: Option<String>,
    pub authentication: Option<Value>,
    pub options: Option<Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub display_name: String,
    pub class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_class: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResource {
    pub id: String,
    pub display_name: String,
}

#[derive(Default)]
pub struct Store {
    itwins: Vec<ITwin>,
    favorites: Vec<Uuid>,
    repositories: HashMap<Uuid, Vec<Repository>>,
    resources: HashMap<(Uuid, String), Vec<Resource>>,
}

pub type Db = Arc<RwLock<Store>>;

/// Error body in the service's `{ "error": { ... } }` shape.
#[derive(Debug)]
pub struct ServiceError {
    status: StatusCode,
    code: &'static str,
    message: String,
    details: Vec<Value>,
}

impl ServiceError {
    fn new(status: StatusCode, code: &'static str, message: &str) -> Self {
        Self {
            status,
            code,
            message: message.to_string(),
            details: Vec::new(),
        }
    }

    fn itwin_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "iTwinNotFound", "Requested iTwin is not available.")
    }

    fn repository_not_found() -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "iTwinRepositoryNotFound",
            "Requested iTwin repository is not available.",
        )
    }

    fn resource_not_found() -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "iTwinRepositoryResourceNotFound",
            "Requested iTwin repository resource is not available.",
        )
    }

    /// 422 with one detail per rejected payload, the way the service reports
    /// validation failures.
    fn invalid_request(message: &str, cause: &serde_json::Error) -> Self {
        Self {
            details: vec![json!({
                "code": "InvalidRequestBody",
                "message": cause.to_string(),
            })],
            ..Self::new(StatusCode::UNPROCESSABLE_ENTITY, "InvalidiTwinsRequest", message)
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let mut error = json!({ "code": self.code, "message": self.message });
        if !self.details.is_empty() {
            error["details"] = Value::Array(self.details);
        }
        (self.status, Json(json!({ "error": error }))).into_response()
    }
}

type Reply = Result<(StatusCode, Json<Value>), ServiceError>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/itwins", get(list_itwins).post(create_itwin))
        .route("/itwins/favorites", get(list_favorites))
        .route("/itwins/favorites/{id}", post(add_favorite).delete(remove_favorite))
        .route(
            "/itwins/{id}",
            get(get_itwin).patch(update_itwin).delete(delete_itwin),
        )
        .route(
            "/itwins/{id}/repositories",
            get(list_repositories).post(create_repository),
        )
        .route(
            "/itwins/{id}/repositories/{repository_id}",
            get(get_repository)
                .patch(update_repository)
                .delete(delete_repository),
        )
        .route(
            "/itwins/{id}/repositories/{repository_id}/resources",
            get(list_resources).post(create_resource),
        )
        .route(
            "/itwins/{id}/repositories/{repository_id}/resources/{resource_id}",
            get(get_resource).delete(delete_resource),
        )
        .layer(middleware::from_fn(require_authorization))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_authorization(request: Request, next: Next) -> Response {
    if request.headers().contains_key(AUTHORIZATION) {
        debug!(method = %request.method(), uri = %request.uri(), "handling request");
        return next.run(request).await;
    }
    ServiceError::new(
        StatusCode::UNAUTHORIZED,
        "HeaderNotFound",
        "Header Authorization was not found in the request. Access denied.",
    )
    .into_response()
}

fn parse<T: serde::de::DeserializeOwned>(body: Value, message: &str) -> Result<T, ServiceError> {
    serde_json::from_value(body).map_err(|e| ServiceError::invalid_request(message, &e))
}

fn page<T: Serialize>(
    items: Vec<T>,
    params: &HashMap<String, String>,
    path: &str,
    property: &str,
) -> Json<Value> {
    let skip: usize = params.get("$skip").and_then(|v| v.parse().ok()).unwrap_or(0);
    let top: usize = params.get("$top").and_then(|v| v.parse().ok()).unwrap_or(100);
    let total = items.len();
    let items: Vec<T> = items.into_iter().skip(skip).take(top).collect();

    let mut links = json!({ "self": { "href": format!("{path}?$skip={skip}&$top={top}") } });
    let end = skip.saturating_add(top);
    if end < total {
        links["next"] = json!({ "href": format!("{path}?$skip={end}&$top={top}") });
    }
    if skip > 0 {
        links["prev"] = json!({ "href": format!("{path}?$skip={}&$top={top}", skip.saturating_sub(top)) });
    }
    let mut body = serde_json::Map::new();
    body.insert(property.to_string(), json!(items));
    body.insert("_links".to_string(), links);
    Json(Value::Object(body))
}

fn itwin_matches(itwin: &ITwin, params: &HashMap<String, String>) -> bool {
    let check = |key: &str, value: &str| params.get(key).is_none_or(|wanted| wanted == value);
    let search = params.get("$search").is_none_or(|needle| {
        itwin
            .display_name
            .to_lowercase()
            .contains(&needle.to_lowercase())
    });
    check("subClass", &itwin.sub_class)
        && check("displayName", &itwin.display_name)
        && check("status", &itwin.status)
        && check("number", itwin.number.as_deref().unwrap_or_default())
        && search
}

// --- iTwins ---

async fn list_itwins(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let store = db.read().await;
    let include_inactive = params.get("includeInactive").is_some_and(|v| v == "true");
    let items: Vec<ITwin> = store
        .itwins
        .iter()
        .filter(|t| include_inactive || t.status != "Inactive")
        .filter(|t| itwin_matches(t, &params))
        .cloned()
        .collect();
    page(items, &params, "/itwins", "iTwins")
}

async fn create_itwin(State(db): State<Db>, Json(body): Json<Value>) -> Reply {
    let input: CreateITwin = parse(body, "Cannot create iTwin.")?;
    let itwin = ITwin {
        id: Uuid::new_v4(),
        class: input.class,
        sub_class: input.sub_class,
        kind: input.kind,
        number: input.number,
        display_name: input.display_name,
        status: input.status.unwrap_or_else(|| "Active".to_string()),
    };
    db.write().await.itwins.push(itwin.clone());
    Ok((StatusCode::CREATED, Json(json!({ "iTwin": itwin }))))
}

async fn get_itwin(State(db): State<Db>, Path(id): Path<Uuid>) -> Reply {
    let store = db.read().await;
    let itwin = store
        .itwins
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(ServiceError::itwin_not_found)?;
    Ok((StatusCode::OK, Json(json!({ "iTwin": itwin }))))
}

async fn update_itwin(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Reply {
    let input: UpdateITwin = parse(body, "Cannot update iTwin.")?;
    let mut store = db.write().await;
    let itwin = store
        .itwins
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(ServiceError::itwin_not_found)?;
    if let Some(display_name) = input.display_name {
        itwin.display_name = display_name;
    }
    if let Some(kind) = input.kind {
        itwin.kind = Some(kind);
    }
    if let Some(number) = input.number {
        itwin.number = Some(number);
    }
    if let Some(status) = input.status {
        itwin.status = status;
    }
    Ok((StatusCode::OK, Json(json!({ "iTwin": itwin }))))
}

async fn delete_itwin(State(db): State<Db>, Path(id): Path<Uuid>) -> Result<StatusCode, ServiceError> {
    let mut store = db.write().await;
    let before = store.itwins.len();
    store.itwins.retain(|t| t.id != id);
    if store.itwins.len() == before {
        return Err(ServiceError::itwin_not_found());
    }
    store.favorites.retain(|f| *f != id);
    store.repositories.remove(&id);
    store.resources.retain(|(itwin_id, _), _| *itwin_id != id);
    Ok(StatusCode::NO_CONTENT)
}

// --- favorites ---

async fn list_favorites(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let store = db.read().await;
    let items: Vec<ITwin> = store
        .favorites
        .iter()
        .filter_map(|id| store.itwins.iter().find(|t| t.id == *id))
        .filter(|t| itwin_matches(t, &params))
        .cloned()
        .collect();
    page(items, &params, "/itwins/favorites", "iTwins")
}

async fn add_favorite(State(db): State<Db>, Path(id): Path<Uuid>) -> Result<StatusCode, ServiceError> {
    let mut store = db.write().await;
    if !store.itwins.iter().any(|t| t.id == id) {
        return Err(ServiceError::itwin_not_found());
    }
    if !store.favorites.contains(&id) {
        store.favorites.push(id);
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn remove_favorite(State(db): State<Db>, Path(id): Path<Uuid>) -> Result<StatusCode, ServiceError> {
    let mut store = db.write().await;
    let before = store.favorites.len();
    store.favorites.retain(|f| *f != id);
    if store.favorites.len() == before {
        return Err(ServiceError::itwin_not_found());
    }
    Ok(StatusCode::NO_CONTENT)
}

// --- repositories ---

fn ensure_itwin(store: &Store, id: Uuid) -> Result<(), ServiceError> {
    if store.itwins.iter().any(|t| t.id == id) {
        Ok(())
    } else {
        Err(ServiceError::itwin_not_found())
    }
}

async fn list_repositories(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    let store = db.read().await;
    ensure_itwin(&store, id)?;
    let repositories: Vec<&Repository> = store
        .repositories
        .get(&id)
        .into_iter()
        .flatten()
        .filter(|r| params.get("class").is_none_or(|c| *c == r.class))
        .filter(|r| {
            params
                .get("subClass")
                .is_none_or(|s| r.sub_class.as_deref() == Some(s.as_str()))
        })
        .collect();
    let self_href = format!("/itwins/{id}/repositories");
    Ok((
        StatusCode::OK,
        Json(json!({
            "repositories": repositories,
            "_links": { "self": { "href": self_href } },
        })),
    ))
}

async fn create_repository(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Reply {
    let input: CreateRepository = parse(body, "Cannot create repository.")?;
    let mut store = db.write().await;
    ensure_itwin(&store, id)?;
    let repositories = store.repositories.entry(id).or_default();
    if repositories.iter().any(|r| r.uri == input.uri) {
        return Err(ServiceError::new(
            StatusCode::CONFLICT,
            "iTwinRepositoryExists",
            "A repository with the same uri already exists.",
        ));
    }
    let repository = Repository {
        id: Uuid::new_v4().to_string(),
        class: input.class,
        sub_class: input.sub_class,
        display_name: input.display_name,
        uri: input.uri,
        authentication: input.authentication,
        options: input.options,
    };
    repositories.push(repository.clone());
    Ok((StatusCode::CREATED, Json(json!({ "repository": repository }))))
}

async fn get_repository(
    State(db): State<Db>,
    Path((id, repository_id)): Path<(Uuid, String)>,
) -> Reply {
    let store = db.read().await;
    ensure_itwin(&store, id)?;
    let repository = store
        .repositories
        .get(&id)
        .and_then(|repos| repos.iter().find(|r| r.id == repository_id))
        .ok_or_else(ServiceError::repository_not_found)?;
    Ok((StatusCode::OK, Json(json!({ "repository": repository }))))
}

async fn update_repository(
    State(db): State<Db>,
    Path((id, repository_id)): Path<(Uuid, String)>,
    Json(body): Json<Value>,
) -> Reply {
    let input: UpdateRepository = parse(body, "Cannot update repository.")?;
    let mut store = db.write().await;
    ensure_itwin(&store, id)?;
    let repository = store
        .repositories
        .get_mut(&id)
        .and_then(|repos| repos.iter_mut().find(|r| r.id == repository_id))
        .ok_or_else(ServiceError::repository_not_found)?;
    if let Some(display_name) = input.display_name {
        repository.display_name = Some(display_name);
    }
    if let Some(uri) = input.uri {
        repository.uri = uri;
    }
    if let Some(authentication) = input.authentication {
        repository.authentication = Some(authentication);
    }
    if let Some(options) = input.options {
        repository.options = Some(options);
    }
    Ok((StatusCode::OK, Json(json!({ "repository": repository }))))
}

async fn delete_repository(
    State(db): State<Db>,
    Path((id, repository_id)): Path<(Uuid, String)>,
) -> Result<StatusCode, ServiceError> {
    let mut store = db.write().await;
    ensure_itwin(&store, id)?;
    let repositories = store
        .repositories
        .get_mut(&id)
        .ok_or_else(ServiceError::repository_not_found)?;
    let before = repositories.len();
    repositories.retain(|r| r.id != repository_id);
    if repositories.len() == before {
        return Err(ServiceError::repository_not_found());
    }
    store.resources.remove(&(id, repository_id));
    Ok(StatusCode::NO_CONTENT)
}

// --- repository resources ---

fn find_repository(store: &Store, id: Uuid, repository_id: &str) -> Result<Repository, ServiceError> {
    ensure_itwin(store, id)?;
    store
        .repositories
        .get(&id)
        .and_then(|repos| repos.iter().find(|r| r.id == repository_id))
        .cloned()
        .ok_or_else(ServiceError::repository_not_found)
}

async fn list_resources(
    State(db): State<Db>,
    Path((id, repository_id)): Path<(Uuid, String)>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ServiceError> {
    let store = db.read().await;
    find_repository(&store, id, &repository_id)?;
    let items: Vec<Resource> = store
        .resources
        .get(&(id, repository_id.clone()))
        .into_iter()
        .flatten()
        .filter(|r| {
            params.get("$search").is_none_or(|needle| {
                r.display_name.to_lowercase().contains(&needle.to_lowercase())
            })
        })
        .cloned()
        .collect();
    let path = format!("/itwins/{id}/repositories/{repository_id}/resources");
    Ok(page(items, &params, &path, "resources"))
}

async fn create_resource(
    State(db): State<Db>,
    Path((id, repository_id)): Path<(Uuid, String)>,
    Json(body): Json<Value>,
) -> Reply {
    let input: CreateResource = parse(body, "Cannot create repository resource.")?;
    let mut store = db.write().await;
    let repository = find_repository(&store, id, &repository_id)?;
    let resources = store.resources.entry((id, repository_id)).or_default();
    if resources.iter().any(|r| r.id == input.id) {
        return Err(ServiceError::new(
            StatusCode::CONFLICT,
            "iTwinRepositoryResourceExists",
            "The repository resource already exists.",
        ));
    }
    let resource = Resource {
        id: input.id,
        display_name: input.display_name,
        class: repository.class,
        sub_class: repository.sub_class,
    };
    resources.push(resource.clone());
    Ok((StatusCode::CREATED, Json(json!({ "resource": resource }))))
}

async fn get_resource(
    State(db): State<Db>,
    Path((id, repository_id, resource_id)): Path<(Uuid, String, String)>,
) -> Reply {
    let store = db.read().await;
    find_repository(&store, id, &repository_id)?;
    let resource = store
        .resources
        .get(&(id, repository_id))
        .and_then(|list| list.iter().find(|r| r.id == resource_id))
        .ok_or_else(ServiceError::resource_not_found)?;
    Ok((StatusCode::OK, Json(json!({ "resource": resource }))))
}

async fn delete_resource(
    State(db): State<Db>,
    Path((id, repository_id, resource_id)): Path<(Uuid, String, String)>,
) -> Result<StatusCode, ServiceError> {
    let mut store = db.write().await;
    find_repository(&store, id, &repository_id)?;
    let resources = store
        .resources
        .get_mut(&(id, repository_id))
        .ok_or_else(ServiceError::resource_not_found)?;
    let before = resources.len();
    resources.retain(|r| r.id != resource_id);
    if resources.len() == before {
        return Err(ServiceError::resource_not_found());
    }
    Ok(StatusCode::NO_CONTENT)
}
