//! iTwin thumbnail images.

use serde::{Deserialize, Serialize};

/// Image formats accepted by the upload endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageContentType {
    Png,
    Jpeg,
}

impl ImageContentType {
    pub fn mime(&self) -> &'static str {
        match self {
            ImageContentType::Png => "image/png",
            ImageContentType::Jpeg => "image/jpeg",
        }
    }
}

/// The stored image, resized by the service into two variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ITwinImage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub small_image_name: String,
    pub small_image_url: String,
    pub large_image_name: String,
    pub large_image_url: String,
}
