//! API endpoint modules.

mod auth;
mod records;
mod zones;

pub use auth::AuthApi;
pub use records::RecordsApi;
pub use zones::ZonesApi;
