//! Posts Module
//!
//! Post CRUD behind the authorization pipeline. Every operation asks the
//! injected `AuthZResolverClient` for a decision before touching storage.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod config;
pub mod domain;
pub mod infra;
pub mod module;

pub use module::build_router;
