//! FreshCart Core - Shared types library.
//!
//! This crate provides the primitive types used by the FreshCart storefront:
//! - string-backed object IDs issued by the commerce REST API
//! - validated email addresses for the auth forms
//! - EGP prices as decimals
//! - order payment and delivery statuses
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. The remote
//! API is the source of truth for every value; these types only describe the
//! shapes the storefront reads back.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
