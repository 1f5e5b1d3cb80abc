//! # lens-core
//!
//! Core types, transport seam, and error types for uxlens.
//!
//! This crate provides the foundational types shared across all uxlens crates:
//! - Entity structs for the analysis payload (insights, metrics, messages)
//! - Severity and role enums
//! - Wire response types for the analysis and chat endpoints
//! - The normalized [`TransportError`] every transport failure collapses into
//! - The [`InsightsApi`] trait the session controllers are driven through

pub mod api;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod responses;

pub use api::InsightsApi;
pub use errors::{FailureKind, TransportError};
