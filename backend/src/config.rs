//! Runtime configuration read from the environment.

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use std::net::SocketAddr;

pub const DATABASE_URL_VAR: &str = "PAYMENT_DATABASE_URL";
pub const BIND_ADDR_VAR: &str = "PAYMENT_BIND_ADDR";
pub const CORS_ORIGIN_VAR: &str = "PAYMENT_CORS_ORIGIN";

const DEFAULT_DATABASE_URL: &str = "sqlite:payments.db";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:8080";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub cors_origin: HeaderValue,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source; unset variables fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup(DATABASE_URL_VAR).unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let bind_addr = lookup(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("{} is not a socket address: {}", BIND_ADDR_VAR, bind_addr))?;

        let cors_origin = lookup(CORS_ORIGIN_VAR).unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string());
        let cors_origin = HeaderValue::from_str(&cors_origin)
            .with_context(|| format!("{} is not a valid origin: {}", CORS_ORIGIN_VAR, cors_origin))?;

        Ok(Self {
            database_url,
            bind_addr,
            cors_origin,
        })
    }
}
