//! # Route Modules
//!
//! Each module owns its request/response types, its router and its
//! handlers. Handlers follow one shape: decode, authorize, store calls,
//! optional manifest call, JSON response. There is no compensation when a
//! later step fails after an earlier mutation committed.

pub mod collection_points;
pub mod consent;
pub mod manifests;
pub mod notice;
pub mod registration;
