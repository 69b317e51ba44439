//! lopdns - LopDNS API command-line client
//!
//! Lists zones and records, and creates, updates or deletes records.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    lopdns_cli::run().await
}
