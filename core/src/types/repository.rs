//! Repositories: external data sources registered on an iTwin.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepositoryClass {
    #[serde(rename = "iModels")]
    IModels,
    Storage,
    Forms,
    Issues,
    RealityData,
    GeographicInformationSystem,
    Construction,
    Subsurface,
    #[serde(other)]
    Unknown,
}

impl RepositoryClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepositoryClass::IModels => "iModels",
            RepositoryClass::Storage => "Storage",
            RepositoryClass::Forms => "Forms",
            RepositoryClass::Issues => "Issues",
            RepositoryClass::RealityData => "RealityData",
            RepositoryClass::GeographicInformationSystem => "GeographicInformationSystem",
            RepositoryClass::Construction => "Construction",
            RepositoryClass::Subsurface => "Subsurface",
            RepositoryClass::Unknown => "",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepositorySubClass {
    WebMapService,
    WebMapTileService,
    #[serde(rename = "ArcGIS")]
    ArcGis,
    UrlTemplate,
    Performance,
    EvoWorkspace,
    #[serde(other)]
    Unknown,
}

impl RepositorySubClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepositorySubClass::WebMapService => "WebMapService",
            RepositorySubClass::WebMapTileService => "WebMapTileService",
            RepositorySubClass::ArcGis => "ArcGIS",
            RepositorySubClass::UrlTemplate => "UrlTemplate",
            RepositorySubClass::Performance => "Performance",
            RepositorySubClass::EvoWorkspace => "EvoWorkspace",
            RepositorySubClass::Unknown => "",
        }
    }
}

/// How the service authenticates against the repository's own endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RepositoryAuthentication {
    Header { key: String, value: String },
    QueryParameter { key: String, value: String },
    Basic { username: String, password: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityEndpoint {
    pub uri: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryCapabilities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<CapabilityEndpoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graphics: Option<CapabilityEndpoint>,
}

/// A repository as returned by the service. Built-in repositories use their
/// class name as `id`, so the id is not a UUID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub id: String,
    pub class: RepositoryClass,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_class: Option<RepositorySubClass>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<RepositoryAuthentication>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<RepositoryCapabilities>,
}

/// Request payload for registering a repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRepository {
    pub class: RepositoryClass,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_class: Option<RepositorySubClass>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<RepositoryAuthentication>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Map<String, Value>>,
}

impl NewRepository {
    pub fn new(class: RepositoryClass, sub_class: Option<RepositorySubClass>, uri: &str) -> Self {
        Self {
            class,
            sub_class,
            display_name: None,
            uri: uri.to_string(),
            authentication: None,
            options: None,
        }
    }
}

/// Request payload for updating a repository; omitted fields are unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<RepositoryAuthentication>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Map<String, Value>>,
}
