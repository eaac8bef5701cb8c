//! Vitrina: storefront catalog admin and cart.
//!
//! `domain` holds the I/O-free rules, `application` the admin panels and
//! session, `infra` the HTTP and filesystem adapters.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
