//! Domain DTOs for the iTwins API.
//!
//! # Design
//! One schema per resource. Property names follow the service exactly
//! (camelCase, `iTwin` prefixes preserved). Enum values the client does not
//! know yet deserialize into an `Unknown` variant instead of failing the
//! whole response. Fields that only appear in the `representation` result
//! mode are optional.

pub mod export;
pub mod image;
pub mod itwin;
pub mod repository;
pub mod resource;

pub use export::{Export, ExportOutputFormat, ExportRequest, ExportStatus};
pub use image::{ITwinImage, ImageContentType};
pub use itwin::{ITwin, ITwinClass, ITwinStatus, ITwinSubClass, ITwinUpdate, NewITwin};
pub use repository::{
    CapabilityEndpoint, NewRepository, Repository, RepositoryAuthentication,
    RepositoryCapabilities, RepositoryClass, RepositorySubClass, RepositoryUpdate,
};
pub use resource::{NewRepositoryResource, RepositoryResource};
