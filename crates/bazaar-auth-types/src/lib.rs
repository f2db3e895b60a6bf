//! Session auth types for the Bazaar storefront.
//!
//! Provides session token issue/validation, cookie builders, and the
//! `Identity` extractor.

pub mod cookie;
pub mod identity;
pub mod token;
