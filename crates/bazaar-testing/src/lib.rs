//! Test utilities for Bazaar services.
//!
//! Provides `MockAuth` session cookies and JSON body helpers.
//! Import from tests only, never from production code.

pub mod auth;
pub mod body;
