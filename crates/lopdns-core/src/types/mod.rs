mod auth;
mod record;

pub use auth::*;
pub use record::*;
