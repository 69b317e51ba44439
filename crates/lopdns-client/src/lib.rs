//! HTTP client for the LopDNS v2 API.
//!
//! This crate provides the main [`LopDnsClient`] for interacting with the
//! API, grouped by endpoint: [`AuthApi`](api::AuthApi),
//! [`ZonesApi`](api::ZonesApi) and [`RecordsApi`](api::RecordsApi).
//! [`RecordStore`] abstracts the record endpoints for code that mutates
//! records.

#![doc(html_root_url = "https://docs.rs/lopdns-client/1.0.0")]

mod client;
mod config;
mod store;
pub mod api;

pub use client::{LopDnsClient, LopDnsClientBuilder};
pub use config::*;
pub use lopdns_core::{LopDnsError, Result};
pub use store::RecordStore;
