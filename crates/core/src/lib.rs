//! runhub_core - Core types, ports and pure logic for runhub.
//!
//! Everything in this crate is free of I/O. Network adapters live in
//! `runhub_client`, and the caches that sit in front of them live in `runhub`.

pub mod api;
pub mod cache;
pub mod event;
pub mod geo;
pub mod metrics;
pub mod post;
pub mod registration;
pub mod retry;
pub mod serde;
pub mod storage;
