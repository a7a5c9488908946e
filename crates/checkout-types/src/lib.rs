//! checkout-types: checkout domain records and the ports the checkout services depend on

pub mod domain;
pub mod ports;
