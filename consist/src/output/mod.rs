//! Reporting resolved consists.

pub mod text;
pub mod json;
