//! WASM-specific primitives that mirror the Tokio API surface.
//!
//! Everything here is single-threaded: no `Send` or `Sync` requirements.

pub mod cancellation_token;

pub use cancellation_token::CancellationToken;
