//! Domain layer: pure types and rules with no I/O.

pub mod cart;
pub mod error;
pub mod slug;
pub mod storefront;
