//! Verify query construction and response normalization against the JSON
//! test vectors stored in `test-vectors/`.
//!
//! Each query vector names an operation, its filter argument and the URL
//! suffix expected after the base URL. Each normalization vector pairs a
//! simulated response with the serialized envelope it must produce;
//! comparing parsed JSON avoids false negatives from field ordering.

use itwins_client::{
    normalize, BaseQueryArg, HttpMethod, HttpResponse, ITwinsClient, ITwinsQueryArg, QueryScope,
    RepositoryQueryArg, ResultMode,
};
use serde_json::Value;
use uuid::Uuid;

const REPOSITORY_ITWIN: &str = "00000000-0000-0000-0000-000000000001";

fn text(arg: &Value, key: &str) -> Option<String> {
    arg.get(key).and_then(Value::as_str).map(str::to_string)
}

fn count(arg: &Value, key: &str) -> Option<u32> {
    arg.get(key).and_then(Value::as_u64).map(|n| n as u32)
}

fn parsed<T: serde::de::DeserializeOwned>(arg: &Value, key: &str) -> Option<T> {
    arg.get(key).map(|v| serde_json::from_value(v.clone()).unwrap())
}

fn result_mode(arg: &Value) -> Option<ResultMode> {
    match arg.get("resultMode").and_then(Value::as_str) {
        Some("minimal") => Some(ResultMode::Minimal),
        Some("representation") => Some(ResultMode::Representation),
        Some(other) => panic!("unknown result mode: {other}"),
        None => None,
    }
}

fn query_scope(arg: &Value) -> Option<QueryScope> {
    match arg.get("queryScope").and_then(Value::as_str) {
        Some("memberOfItwin") => Some(QueryScope::MemberOfITwin),
        Some("all") => Some(QueryScope::All),
        Some("OrganizationAdmin") => Some(QueryScope::OrganizationAdmin),
        Some(other) => panic!("unknown query scope: {other}"),
        None => None,
    }
}

fn itwins_arg(arg: &Value) -> ITwinsQueryArg {
    ITwinsQueryArg {
        sub_class: parsed(arg, "subClass"),
        include_inactive: arg.get("includeInactive").and_then(Value::as_bool).unwrap_or(false),
        top: count(arg, "top"),
        skip: count(arg, "skip"),
        status: parsed(arg, "status"),
        kind: text(arg, "type"),
        search: text(arg, "search"),
        display_name: text(arg, "displayName"),
        number: text(arg, "number"),
        parent_id: parsed(arg, "parentId"),
        itwin_account_id: parsed(arg, "iTwinAccountId"),
        query_scope: query_scope(arg),
        result_mode: result_mode(arg),
    }
}

fn base_arg(arg: &Value) -> BaseQueryArg {
    BaseQueryArg {
        sub_class: parsed(arg, "subClass"),
        top: count(arg, "top"),
        skip: count(arg, "skip"),
        search: text(arg, "search"),
        result_mode: result_mode(arg),
    }
}

fn repository_arg(arg: &Value) -> RepositoryQueryArg {
    RepositoryQueryArg {
        class: parsed(arg, "class"),
        sub_class: parsed(arg, "subClass"),
    }
}

// ---------------------------------------------------------------------------
// Query strings
// ---------------------------------------------------------------------------

#[test]
fn query_test_vectors() {
    let raw = include_str!("../../test-vectors/query.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let base_url = vectors["base_url"].as_str().unwrap();
    let client = ITwinsClient::new(base_url).unwrap();
    let itwin_id: Uuid = REPOSITORY_ITWIN.parse().unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let arg = &case["arg"];
        let req = match case["operation"].as_str().unwrap() {
            "query_itwins" => client.build_query_itwins("token", &itwins_arg(arg)),
            "query_favorites" => client.build_query_favorites("token", &base_arg(arg)),
            "query_recents" => client.build_query_recents("token", &base_arg(arg)),
            "query_repositories" => {
                client.build_query_repositories("token", itwin_id, &repository_arg(arg))
            }
            other => panic!("unknown operation: {other}"),
        };

        assert_eq!(req.method, HttpMethod::Get, "{name}: method");
        let expected = format!("{base_url}{}", case["expected_url"].as_str().unwrap());
        assert_eq!(req.url, expected, "{name}: url");
        assert!(!req.url.contains("?&"), "{name}: stray separator");
        assert!(req.body.is_none(), "{name}: body should be None");
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

#[test]
fn normalize_test_vectors() {
    let raw = include_str!("../../test-vectors/normalize.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let sim = &case["response"];
        let response = HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: sim["body"].as_str().unwrap().to_string(),
        };
        let envelope = normalize::<Value>(response, case["property"].as_str());
        let actual = serde_json::to_value(&envelope).unwrap();
        assert_eq!(actual, case["expected"], "{name}: envelope");
    }
}
