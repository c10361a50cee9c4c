#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Posts SDK
//!
//! Transport-agnostic models and errors of the `posts` module.

pub mod errors;
pub mod models;

pub use errors::PostsError;
pub use models::{NewPost, Post, PostPatch};
