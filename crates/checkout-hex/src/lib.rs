//! checkout-hex: checkout session and totals services (core + inbound HTTP)

pub mod config;
pub mod errors;

pub mod application;

pub use checkout_types::{domain, ports};

pub mod inbound; // HTTP adapter (server + handlers)
