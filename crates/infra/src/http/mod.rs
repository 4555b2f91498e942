//! HTTP transport for the LINE API clients.

pub mod client;
pub mod response;

pub use client::{HttpClient, HttpClientBuilder};
