pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod freshness;
pub mod models;
pub mod notices;
pub mod optimistic;
pub mod position;
pub mod realtime;
pub mod runtime;
pub mod store;

// Re-export the types an embedding app needs at crate root for convenience
pub use config::{CoreConfig, FreshnessConfig};
pub use error::CoreError;
pub use notices::{Notice, NoticeLevel, NoticeSender};
pub use runtime::{CoreRuntime, Session};
