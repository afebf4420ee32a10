pub mod auth;
pub mod board;
pub mod config;
pub mod factory;
pub mod migrate;
pub mod model;
pub mod mutate;
pub mod odds;
pub mod storage;
pub mod store;
pub mod validate;
pub mod view;

pub use board::Board;
pub use model::{Bet, BetInput, CombinedCoupon, LivePrediction, Record, RecordKind, Status};
pub use storage::{KeyValueStorage, MemoryStorage};

/// Core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
