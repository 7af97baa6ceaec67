//! Network-facing collaborators: reference data clients and their configuration.

pub mod config;
pub mod hs_codes;
pub mod reference;

pub use config::ReferenceConfig;
pub use hs_codes::{builtin_hs_codes, HsCodeLoad, HsCodeSource};
pub use reference::{CacheStatus, CachedPayload, ExchangeRates, ReferenceClient, ReferenceError};
