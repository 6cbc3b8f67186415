//! HTTP API for the renderer and local diagnostics

pub mod handlers;
pub mod server;
pub mod sse;

pub use server::{bind, build_router, run, AppContext};
