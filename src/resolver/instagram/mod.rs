//! Instagram strategies.

mod json_api;

pub use json_api::JsonApiStrategy;
