pub mod api;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod ledger;
pub mod models;
pub mod seed;

pub use config::SwapConfig;
pub use error::SwapError;
pub use models::{Item, ItemView, NewItem};
