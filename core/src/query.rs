//! Query-string construction from optional filter arguments.
//!
//! Every argument type emits one `key=value` fragment per field that is set
//! and truthy (`None`, `0`, `false` and empty strings are skipped), always in
//! the same order. Values are form-url-encoded; keys are emitted verbatim so
//! the service's `$top`/`$skip`/`$search` names survive untouched.

use url::form_urlencoded;
use uuid::Uuid;

use crate::types::{ITwinStatus, ITwinSubClass, RepositoryClass, RepositorySubClass};

/// Shape of the returned entities. Passed through to the service only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultMode {
    Minimal,
    Representation,
}

impl ResultMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultMode::Minimal => "minimal",
            ResultMode::Representation => "representation",
        }
    }
}

/// Which iTwins a query may see. Passed through to the service only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryScope {
    MemberOfITwin,
    All,
    OrganizationAdmin,
}

impl QueryScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryScope::MemberOfITwin => "memberOfItwin",
            QueryScope::All => "all",
            QueryScope::OrganizationAdmin => "OrganizationAdmin",
        }
    }
}

/// Anything that renders into a query string (without the leading `?`).
pub trait QueryArg {
    fn to_query(&self) -> String;
}

/// Filters for listing iTwins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ITwinsQueryArg {
    pub sub_class: Option<ITwinSubClass>,
    pub include_inactive: bool,
    pub top: Option<u32>,
    pub skip: Option<u32>,
    pub status: Option<ITwinStatus>,
    pub kind: Option<String>,
    pub search: Option<String>,
    pub display_name: Option<String>,
    pub number: Option<String>,
    pub parent_id: Option<Uuid>,
    pub itwin_account_id: Option<Uuid>,
    pub query_scope: Option<QueryScope>,
    pub result_mode: Option<ResultMode>,
}

impl QueryArg for ITwinsQueryArg {
    fn to_query(&self) -> String {
        let parent_id = self.parent_id.map(|id| id.to_string());
        let account_id = self.itwin_account_id.map(|id| id.to_string());
        Fragments::default()
            .text("subClass", self.sub_class.as_ref().map(ITwinSubClass::as_str))
            .flag("includeInactive", self.include_inactive)
            .count("$top", self.top)
            .count("$skip", self.skip)
            .text("status", self.status.as_ref().map(ITwinStatus::as_str))
            .text("type", self.kind.as_deref())
            .text("$search", self.search.as_deref())
            .text("displayName", self.display_name.as_deref())
            .text("number", self.number.as_deref())
            .text("parentId", parent_id.as_deref())
            .text("iTwinAccountId", account_id.as_deref())
            .text("queryScope", self.query_scope.as_ref().map(QueryScope::as_str))
            .text("resultMode", self.result_mode.as_ref().map(ResultMode::as_str))
            .finish()
    }
}

/// Paging and search shared by favorites, recents and repository resources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseQueryArg {
    pub sub_class: Option<ITwinSubClass>,
    pub top: Option<u32>,
    pub skip: Option<u32>,
    pub search: Option<String>,
    pub result_mode: Option<ResultMode>,
}

impl QueryArg for BaseQueryArg {
    fn to_query(&self) -> String {
        Fragments::default()
            .text("subClass", self.sub_class.as_ref().map(ITwinSubClass::as_str))
            .count("$top", self.top)
            .count("$skip", self.skip)
            .text("$search", self.search.as_deref())
            .text("resultMode", self.result_mode.as_ref().map(ResultMode::as_str))
            .finish()
    }
}

/// Filters for listing the repositories of an iTwin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryQueryArg {
    pub class: Option<RepositoryClass>,
    pub sub_class: Option<RepositorySubClass>,
}

impl QueryArg for RepositoryQueryArg {
    fn to_query(&self) -> String {
        Fragments::default()
            .text("class", self.class.as_ref().map(RepositoryClass::as_str))
            .text("subClass", self.sub_class.as_ref().map(RepositorySubClass::as_str))
            .finish()
    }
}

impl QueryArg for Option<ResultMode> {
    fn to_query(&self) -> String {
        Fragments::default()
            .text("resultMode", self.as_ref().map(ResultMode::as_str))
            .finish()
    }
}

/// Append a rendered query to `url`, choosing `?` or `&` as separator.
pub fn with_query(url: String, query: &str) -> String {
    if query.is_empty() {
        return url;
    }
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{query}")
}

#[derive(Default)]
struct Fragments {
    parts: Vec<String>,
}

impl Fragments {
    fn text(mut self, key: &str, value: Option<&str>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            let encoded: String = form_urlencoded::byte_serialize(value.as_bytes()).collect();
            self.parts.push(format!("{key}={encoded}"));
        }
        self
    }

    fn count(mut self, key: &str, value: Option<u32>) -> Self {
        if let Some(value) = value.filter(|v| *v != 0) {
            self.parts.push(format!("{key}={value}"));
        }
        self
    }

    fn flag(mut self, key: &str, value: bool) -> Self {
        if value {
            self.parts.push(format!("{key}=true"));
        }
        self
    }

    fn finish(self) -> String {
        self.parts.join("&")
    }
}
