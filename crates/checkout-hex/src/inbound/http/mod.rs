mod server;

pub use server::{HttpServer, HttpServerConfig, TotalsApi};
