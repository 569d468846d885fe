pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod metrics;
pub mod output;
pub mod session;
pub mod stderr_buffer;
pub mod store;
pub mod tui;

pub use error::ScoreError;
