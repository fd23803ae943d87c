//! API client module

pub mod client;
pub mod error;
pub mod pagination;
pub mod response;

pub use client::AttioClient;
