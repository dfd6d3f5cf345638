//! Omnicore - chat client core for a hosted streaming model
//!
//! Keeps conversation threads in memory, persists them as one JSON blob in
//! local key-value storage, streams replies from Gemini into the active
//! thread, and renders the reply markup to HTML.
//!
//! Hosts drive everything through [`controller::ChatController`] and render
//! from its snapshots.

pub mod adapters;
pub mod config;
pub mod controller;
pub mod error;
pub mod markup;
pub mod models;
pub mod persistence;
pub mod prelude;
pub mod sse;
pub mod store;
pub mod telemetry;
pub mod traits;
