//! Person document store: model, storage bootstrap, repository and
//! walkthrough services.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, StoreConfig, StoreTarget};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::person::{NewPerson, Person, PersonId, PersonValidationError};
pub use repo::person_repo::{PersonRepository, RepoError, RepoResult, SqlitePersonRepository};
pub use repo::query::{
    DeleteResult, PersonField, PersonFilter, PersonQuery, PersonUpdate, SortField, SortOrder,
};
pub use service::person_service::{
    sample_people, sample_person, PersonService, ServiceError, ServiceResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
