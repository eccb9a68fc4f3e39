//! HTTP handlers for the preview runtime.

pub mod api;
pub mod module;
pub mod page;
