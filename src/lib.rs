//! Friend Circle - a blog roster aggregator
//!
//! This crate discovers the feed of every blog on a roster, fetches and parses
//! them concurrently, and merges the posts into one time-ordered article list
//! with per-source health status, served over HTTP.

pub mod aggregator;
pub mod cache;
pub mod config;
pub mod error;
pub mod feed;
pub mod locator;
pub mod models;
pub mod refresh;
pub mod roster;
pub mod routes;
pub mod source;
pub mod time;
pub mod transport;
