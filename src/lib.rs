//! Gerbang Kampus: university finder and career assessment portal.
//!
//! The library exposes the scoring engine, the university catalog and the
//! translation layer so they can be exercised without the HTTP server.

pub mod assessment;
pub mod catalog;
pub mod config;
pub mod error;
pub mod i18n;
pub mod pages;
pub mod security;
pub mod server;
pub mod session;
pub mod translation;
