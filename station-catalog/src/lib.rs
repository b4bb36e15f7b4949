//! Station catalog acquisition and caching.
//!
//! Fetches the country → region → settlement → station catalog from the
//! Yandex Rasp API, validates it into domain types, keeps only rail
//! stations, and caches the result on disk for a day, falling back to a
//! stale copy when the provider is unavailable.

pub mod cache;
pub mod config;
pub mod domain;
pub mod filter;
pub mod rasp;
pub mod repository;
