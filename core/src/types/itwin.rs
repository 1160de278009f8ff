//! iTwin resource and its create/update payloads.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ITwinClass {
    Account,
    Thing,
    Endeavor,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ITwinSubClass {
    Account,
    Asset,
    Project,
    Portfolio,
    Program,
    WorkPackage,
    #[serde(other)]
    Unknown,
}

impl ITwinSubClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ITwinSubClass::Account => "Account",
            ITwinSubClass::Asset => "Asset",
            ITwinSubClass::Project => "Project",
            ITwinSubClass::Portfolio => "Portfolio",
            ITwinSubClass::Program => "Program",
            ITwinSubClass::WorkPackage => "WorkPackage",
            ITwinSubClass::Unknown => "",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ITwinStatus {
    Active,
    Inactive,
    Trial,
    #[serde(other)]
    Unknown,
}

impl ITwinStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ITwinStatus::Active => "Active",
            ITwinStatus::Inactive => "Inactive",
            ITwinStatus::Trial => "Trial",
            ITwinStatus::Unknown => "",
        }
    }
}

/// An iTwin as returned by the service.
///
/// Fields after `status` are only filled in when the request asked for the
/// `representation` result mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ITwin {
    pub id: Uuid,
    pub class: ITwinClass,
    pub sub_class: ITwinSubClass,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ITwinStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
    #[serde(rename = "iTwinAccountId", default, skip_serializing_if = "Option::is_none")]
    pub itwin_account_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geographic_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iana_time_zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_center_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<String>,
}

/// Request payload for creating an iTwin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewITwin {
    pub display_name: String,
    pub class: ITwinClass,
    pub sub_class: ITwinSubClass,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ITwinStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geographic_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iana_time_zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_center_location: Option<String>,
}

impl NewITwin {
    pub fn new(display_name: &str, class: ITwinClass, sub_class: ITwinSubClass) -> Self {
        Self {
            display_name: display_name.to_string(),
            class,
            sub_class,
            kind: None,
            number: None,
            status: None,
            parent_id: None,
            geographic_location: None,
            iana_time_zone: None,
            data_center_location: None,
        }
    }
}

/// Request payload for updating an iTwin. Only the fields present in the
/// JSON are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ITwinUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ITwinStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geographic_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iana_time_zone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn itwin_uses_service_property_names() {
        let json = r#"{
            "id": "00000000-0000-0000-0000-000000000001",
            "class": "Thing",
            "subClass": "Asset",
            "type": "Bridge",
            "number": "B-12",
            "displayName": "Test A",
            "status": "Active",
            "iTwinAccountId": "00000000-0000-0000-0000-000000000002",
            "createdDateTime": "2024-01-01T00:00:00Z"
        }"#;
        let itwin: ITwin = serde_json::from_str(json).unwrap();
        assert_eq!(itwin.class, ITwinClass::Thing);
        assert_eq!(itwin.sub_class, ITwinSubClass::Asset);
        assert_eq!(itwin.kind.as_deref(), Some("Bridge"));
        assert_eq!(itwin.status, Some(ITwinStatus::Active));
        assert!(itwin.itwin_account_id.is_some());
        assert!(itwin.parent_id.is_none());
    }

    #[test]
    fn unknown_enum_values_do_not_fail() {
        let json = r#"{
            "id": "00000000-0000-0000-0000-000000000001",
            "class": "Galaxy",
            "subClass": "Nebula",
            "displayName": "Odd",
            "status": "Archived"
        }"#;
        let itwin: ITwin = serde_json::from_str(json).unwrap();
        assert_eq!(itwin.class, ITwinClass::Unknown);
        assert_eq!(itwin.sub_class, ITwinSubClass::Unknown);
        assert_eq!(itwin.status, Some(ITwinStatus::Unknown));
    }

    #[test]
    fn new_itwin_omits_unset_fields() {
        let body = serde_json::to_value(NewITwin::new(
            "Test A",
            ITwinClass::Thing,
            ITwinSubClass::Asset,
        ))
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "displayName": "Test A",
                "class": "Thing",
                "subClass": "Asset"
            })
        );
    }

    #[test]
    fn empty_update_serializes_to_empty_object() {
        let body = serde_json::to_string(&ITwinUpdate::default()).unwrap();
        assert_eq!(body, "{}");
    }
}
