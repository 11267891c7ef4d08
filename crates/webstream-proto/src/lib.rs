pub mod config;
pub mod error;
pub mod history;
pub mod platform;
pub mod protocol;
pub mod provider;
pub mod state;

pub use error::HistoryError;
