//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Centralizes registration, login (with the failed-attempt lockout) and
//! profile updates under the service crate.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::AuthService;
