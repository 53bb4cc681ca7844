//! runhub - Client-side caching and write paths for the runhub marketplace.
//!
//! The caches in [`cache`] sit in front of the backend and geocoder ports
//! from `runhub_core`. Writes go through [`services`], which publish a single
//! invalidation on the [`cache::InvalidationBus`] after every success.

pub mod backend;
pub mod cache;
pub mod cli;
pub mod config;
pub mod output;
pub mod retry;
pub mod services;
pub mod state;
