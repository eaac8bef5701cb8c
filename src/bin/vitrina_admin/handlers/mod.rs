#![deny(clippy::all, clippy::pedantic)]

pub mod catalog;
pub mod contacts;
pub mod notify;
pub mod records;
pub mod session;
pub mod upload;
