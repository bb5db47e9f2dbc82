//! Kraken module - REST client for the Kraken spot exchange API

pub mod auth;
pub mod messages;
pub mod rest;

pub use rest::KrakenRestClient;
