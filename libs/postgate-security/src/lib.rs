#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
pub mod principal;
pub mod scopes;

pub use principal::{Principal, PrincipalBuilder, PrincipalKind};
