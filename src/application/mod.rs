//! Application services layer.

pub mod admin;
pub mod error;
#[cfg(test)]
pub(crate) mod testing;
pub mod transport;
pub mod ui;
