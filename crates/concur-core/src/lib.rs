//! # concur-core - Foundational Types for the Concur Registry
//!
//! Defines the typed records that flow between the HTTP layer, the document
//! store and the YAML manifest. Every other crate in the workspace depends on
//! `concur-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Typed records per entity.** Developers, organisations, applications,
//!    collection points and consent records are explicit structs. The store
//!    boundary converts them to documents; handlers never build untyped maps.
//!
//! 2. **Closed enumerations.** Application type, stage and audience are enums
//!    whose serialized spelling matches the public API (`"web app"`,
//!    `"saudi arabia"`, ...). Anything else is rejected at decode time.
//!
//! 3. **Opaque store identifiers.** [`DocumentId`] is a 24-character hex
//!    identifier assigned by the store. Parsing validates the format so a
//!    malformed path parameter is a client error, not a store error.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `concur-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod application;
pub mod collection_point;
pub mod consent;
pub mod credentials;
pub mod developer;
pub mod error;
pub mod generate;
pub mod identity;
pub mod notice;

pub use application::{AppStage, AppType, ApplicationRecord, ApplicationUser};
pub use collection_point::{CollectionPointRecord, DataElement, Purpose, DEFAULT_CP_STATUS};
pub use consent::{ConsentRecord, ConsentScopeEntry};
pub use credentials::OrgCredentials;
pub use developer::{DeveloperRecord, OrganisationRecord};
pub use error::ValidationError;
pub use identity::DocumentId;
