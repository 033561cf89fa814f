//! CRM server library.
//!
//! This crate provides the CRM data service as a library, allowing it to be
//! tested and reused by the CLI (migrations and seeding go through the same
//! repositories the server uses).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod query;
pub mod routes;
pub mod services;
pub mod state;
