//! Workspace umbrella crate.
//!
//! Re-exports the WasmFetch bridge facade so hosts can depend on a single
//! crate. Enable the `wasm` feature for the browser adapters and the
//! JavaScript `WasmFetch` class.

pub use core_service::*;
