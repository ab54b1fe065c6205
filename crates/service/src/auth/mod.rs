//! Auth module: three-layer architecture (domain, repository, service).
//!
//! This module centralizes registration, login and session-token handling
//! under the service crate.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod session;
pub mod repo;

pub use service::AuthService;
