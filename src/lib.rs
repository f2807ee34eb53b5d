//! Library crate backing the `schedgen` binary.
//!
//! Split out from `main.rs` so the HTTP surface (`web::create_router`) and
//! the scheduling core are reachable from black-box tests under `tests/`,
//! not just from the binary's own `mod` tree.

pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod logging;
pub mod state;
pub mod utils;
pub mod web;
