pub mod clearer;
pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod gate;
pub mod session;
pub mod store;

// Re-exports for convenience
pub use clearer::{AuctionDataClearer, DataClearer, PurgeRequest};
pub use config::DevSessionConfig;
pub use controller::{SessionController, TransitionResult};
pub use data::AuctionDataStore;
pub use error::{AccessError, DevSessionError};
pub use gate::{AccessGate, DevContext};
pub use session::{DevSession, SessionPhase};
pub use store::{session_store, SessionStore, SessionStoreExt};
