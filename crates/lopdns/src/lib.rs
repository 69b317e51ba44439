//! Rust client for the LopDNS v2 API.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use lopdns::{LopDnsClient, Matcher, SelectionCriteria};
//!
//! #[tokio::main]
//! async fn main() -> lopdns::Result<()> {
//!     let client = LopDnsClient::new()?;
//!     client
//!         .auth()
//!         .authenticate("my-client-id", Duration::from_secs(600))
//!         .await?;
//!
//!     for zone in client.zones().list().await? {
//!         let records = client.records().list(&zone).await?;
//!         let criteria = SelectionCriteria::new(&zone, "www", "A").match_all(true);
//!         for record in Matcher::new(&criteria)?.select(&records) {
//!             println!("{zone}: {record}");
//!         }
//!     }
//!
//!     client.auth().invalidate().await;
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `default` - Uses rustls for TLS
//! - `rustls` - Use rustls for TLS (recommended)
//! - `native-tls` - Use system native TLS

#![doc(html_root_url = "https://docs.rs/lopdns/1.0.0")]

// Re-export core types
pub use lopdns_core::*;

// Re-export client
pub use lopdns_client::{
    api, api_root, default_user_agent, LopDnsClient, LopDnsClientBuilder, RecordStore,
    API_VERSION, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, DEFAULT_TOKEN_DURATION,
};

// Re-export runtime for convenience
pub use tokio;
pub use serde;
pub use serde_json;
