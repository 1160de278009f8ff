//! End-to-end scenarios against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the access client
//! over real HTTP with the default ureq transport. Validates that request
//! building, transport and response normalization agree with the server.

use itwins_client::{
    ApiResponse, BaseQueryArg, ITwinClass, ITwinSubClass, ITwinUpdate, ITwinsAccessClient,
    ITwinsQueryArg, NewITwin, NewRepository, NewRepositoryResource, RepositoryClass,
    RepositoryQueryArg, RepositorySubClass, RepositoryUpdate,
};

const TOKEN: &str = "Bearer integration-token";

/// Start the mock server on a random port and return its iTwins base URL.
fn start_mock_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}/itwins")
}

#[test]
fn create_repository_then_clean_up() {
    let client = ITwinsAccessClient::with_base_url(&start_mock_server()).unwrap();

    // Step 1: create the iTwin.
    let created = client.create_itwin(
        TOKEN,
        &NewITwin::new("Test A", ITwinClass::Thing, ITwinSubClass::Asset),
    );
    assert_eq!(created.status, 201);
    let itwin = created.data.expect("created iTwin");
    assert_eq!(itwin.display_name, "Test A");
    assert_eq!(itwin.class, ITwinClass::Thing);

    // Step 2: register a repository on it.
    let input = NewRepository::new(
        RepositoryClass::GeographicInformationSystem,
        Some(RepositorySubClass::WebMapService),
        "https://example.com/wms",
    );
    let created = client.create_repository(TOKEN, itwin.id, &input);
    assert_eq!(created.status, 201);
    let repository = created.data.expect("created repository");
    assert_eq!(repository.uri, input.uri);

    // Step 3: delete the repository.
    let deleted = client.delete_repository(TOKEN, itwin.id, &repository.id);
    assert_eq!(deleted.status, 204);
    assert!(deleted.data.is_none());
    assert!(deleted.error.is_none());

    // Step 4: delete the iTwin.
    let deleted = client.delete_itwin(TOKEN, itwin.id);
    assert_eq!(deleted.status, 204);
}

#[test]
fn full_lifecycle_with_error_codes() {
    let client = ITwinsAccessClient::with_base_url(&start_mock_server()).unwrap();

    // Empty listing.
    let listed = client.query_itwins(TOKEN, &ITwinsQueryArg::default());
    assert_eq!(listed.status, 200);
    assert!(listed.data.unwrap().is_empty());

    let a = client
        .create_itwin(TOKEN, &NewITwin::new("Bridge 1", ITwinClass::Thing, ITwinSubClass::Asset))
        .data
        .unwrap();
    let b = client
        .create_itwin(TOKEN, &NewITwin::new("Road 7", ITwinClass::Endeavor, ITwinSubClass::Project))
        .data
        .unwrap();

    // Filtered and paged listing.
    let arg = ITwinsQueryArg {
        sub_class: Some(ITwinSubClass::Project),
        ..Default::default()
    };
    let listed = client.query_itwins(TOKEN, &arg);
    let itwins = listed.data.unwrap();
    assert_eq!(itwins.len(), 1);
    assert_eq!(itwins[0].id, b.id);

    let arg = ITwinsQueryArg {
        top: Some(1),
        ..Default::default()
    };
    let listed = client.query_itwins(TOKEN, &arg);
    assert_eq!(listed.data.as_ref().unwrap().len(), 1);
    assert!(listed.next_link().is_some());

    let arg = ITwinsQueryArg {
        search: Some("bridge".to_string()),
        ..Default::default()
    };
    let listed = client.query_itwins(TOKEN, &arg);
    assert_eq!(listed.data.unwrap()[0].id, a.id);

    // Update.
    let update = ITwinUpdate {
        display_name: Some("Bridge 1b".to_string()),
        ..Default::default()
    };
    let updated = client.update_itwin(TOKEN, a.id, &update);
    assert_eq!(updated.status, 200);
    assert_eq!(updated.data.unwrap().display_name, "Bridge 1b");

    // Favorites.
    assert_eq!(client.add_favorite(TOKEN, a.id).status, 204);
    let favorites = client.query_favorites(TOKEN, &BaseQueryArg::default());
    assert_eq!(favorites.data.unwrap()[0].id, a.id);
    assert_eq!(client.remove_favorite(TOKEN, a.id).status, 204);

    // Repository with a duplicate uri is a business error, passed through.
    let input = NewRepository::new(
        RepositoryClass::GeographicInformationSystem,
        Some(RepositorySubClass::WebMapTileService),
        "https://example.com/wmts",
    );
    let repository = client.create_repository(TOKEN, a.id, &input).data.unwrap();
    let duplicate = client.create_repository(TOKEN, a.id, &input);
    assert_eq!(duplicate.status, 409);
    assert!(duplicate.data.is_none());
    assert_eq!(duplicate.error.unwrap().code, "iTwinRepositoryExists");

    let arg = RepositoryQueryArg {
        class: Some(RepositoryClass::GeographicInformationSystem),
        sub_class: Some(RepositorySubClass::WebMapTileService),
    };
    let repositories = client.query_repositories(TOKEN, a.id, &arg);
    assert_eq!(repositories.data.unwrap().len(), 1);

    let update = RepositoryUpdate {
        display_name: Some("Tiles".to_string()),
        ..Default::default()
    };
    let updated = client.update_repository(TOKEN, a.id, &repository.id, &update);
    assert_eq!(updated.data.unwrap().display_name.as_deref(), Some("Tiles"));

    // Resources.
    let input = NewRepositoryResource {
        id: "roads".to_string(),
        display_name: "Roads".to_string(),
    };
    let created = client.create_repository_resource(TOKEN, a.id, &repository.id, &input);
    assert_eq!(created.status, 201);
    assert_eq!(created.data.unwrap().display_name, "Roads");

    let fetched = client.get_repository_resource(TOKEN, a.id, &repository.id, "roads", None);
    assert_eq!(fetched.data.unwrap().id, "roads");

    let listed = client.query_repository_resources(TOKEN, a.id, &repository.id, &BaseQueryArg::default());
    assert_eq!(listed.data.unwrap().len(), 1);

    let deleted = client.delete_repository_resource(TOKEN, a.id, &repository.id, "roads");
    assert_eq!(deleted.status, 204);
    let missing = client.get_repository_resource(TOKEN, a.id, &repository.id, "roads", None);
    assert_eq!(missing.status, 404);
    assert_eq!(missing.error.unwrap().code, "iTwinRepositoryResourceNotFound");

    // Delete and confirm the not-found code.
    assert_eq!(client.delete_repository(TOKEN, a.id, &repository.id).status, 204);
    let missing = client.get_repository(TOKEN, a.id, &repository.id);
    assert_eq!(missing.error.unwrap().code, "iTwinRepositoryNotFound");

    assert_eq!(client.delete_itwin(TOKEN, a.id).status, 204);
    let missing = client.get_itwin(TOKEN, a.id, None);
    assert_eq!(missing.status, 404);
    assert!(missing.data.is_none());
    assert_eq!(missing.error.unwrap().code, "iTwinNotFound");
}

#[test]
fn repository_ids_are_path_encoded() {
    let client = ITwinsAccessClient::with_base_url(&start_mock_server()).unwrap();
    let itwin = client
        .create_itwin(TOKEN, &NewITwin::new("Test C", ITwinClass::Thing, ITwinSubClass::Asset))
        .data
        .unwrap();

    let missing = client.get_repository(TOKEN, itwin.id, "no such/repo");
    assert_eq!(missing.status, 404);
    assert_eq!(missing.error.unwrap().code, "iTwinRepositoryNotFound");
}

#[test]
fn unreachable_service_yields_internal_error() {
    // Bind then drop to get a port nobody is listening on.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = ITwinsAccessClient::with_base_url(&format!("http://127.0.0.1:{port}/itwins")).unwrap();

    let env = client.query_exports(TOKEN);
    assert_eq!(env, ApiResponse::internal_error());
    let json = serde_json::to_value(&env).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "status": 500,
            "error": {
                "code": "InternalServerError",
                "message": "An internal exception happened while calling iTwins Service"
            }
        })
    );
}
