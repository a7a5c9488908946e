use anyhow::Context;
use checkout_types::domain::store::{Store, StoreId, WebsiteId};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: String,
    pub store_id: StoreId,
    pub website_id: WebsiteId,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let server_port = env::var("SERVER_PORT").unwrap_or_else(|_| "3000".into());
        let store_id = parse_id("STORE_ID")?;
        let website_id = parse_id("WEBSITE_ID")?;
        Ok(Self {
            server_port,
            store_id,
            website_id,
        })
    }

    pub fn store(&self) -> Store {
        Store::new(self.store_id, self.website_id)
    }
}

fn parse_id(key: &str) -> anyhow::Result<u32> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a non-negative integer, got {raw:?}")),
        Err(_) => Ok(1),
    }
}
