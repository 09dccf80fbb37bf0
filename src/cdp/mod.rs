mod api;
mod config;
mod constants;
pub mod error;
mod transport;

pub use api::RudderStack;
pub use config::RudderConfig;
pub use constants::USER_ID_KEY;
