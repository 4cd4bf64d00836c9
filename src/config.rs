// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is read from the environment once at startup (a `.env`
//! file is loaded first if present). Invalid values abort startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `DATA_DIR` | Root directory for the database and uploads | `./data` |
//! | `STORAGE_BACKEND` | `redb` or `memory` | `redb` |
//! | `JWT_SECRET` | Session token signing secret | Required |
//! | `JWT_ALGORITHM` | `HS256`, `HS384`, or `HS512` | `HS256` |
//! | `ACCESS_TOKEN_EXPIRE_MINUTES` | Session lifetime (at most one year) | `30` |
//! | `LINK_ENCRYPTION_KEY` | Key material for verification and download links | Required |
//! | `BCRYPT_COST` | bcrypt work factor (4..=31) | `12` |
//! | `MAX_UPLOAD_BYTES` | Upload request body limit | `52428800` |
//! | `TLS_CERT_PATH` | PEM certificate chain; enables HTTPS with `TLS_KEY_PATH` | unset |
//! | `TLS_KEY_PATH` | PEM private key | unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::path::PathBuf;

use jsonwebtoken::Algorithm;

use crate::auth::DEFAULT_TTL_MINUTES;
use crate::storage::paths::DATA_ROOT;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const DATA_DIR_ENV: &str = "DATA_DIR";
pub const STORAGE_BACKEND_ENV: &str = "STORAGE_BACKEND";
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const JWT_ALGORITHM_ENV: &str = "JWT_ALGORITHM";
pub const TOKEN_TTL_ENV: &str = "ACCESS_TOKEN_EXPIRE_MINUTES";
pub const LINK_KEY_ENV: &str = "LINK_ENCRYPTION_KEY";
pub const BCRYPT_COST_ENV: &str = "BCRYPT_COST";
pub const MAX_UPLOAD_BYTES_ENV: &str = "MAX_UPLOAD_BYTES";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BCRYPT_COST: u32 = 12;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";
/// Upper bound on session lifetime: one year.
pub const MAX_TOKEN_TTL_MINUTES: i64 = 365 * 24 * 60;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Where metadata lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Redb,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub storage_backend: StorageBackend,
    pub jwt_secret: String,
    pub jwt_algorithm: Algorithm,
    pub token_ttl_minutes: i64,
    pub link_key: String,
    pub bcrypt_cost: u32,
    pub max_upload_bytes: usize,
    pub tls: Option<TlsPaths>,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let host = var(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or(var(PORT_ENV), PORT_ENV, DEFAULT_PORT)?;
        let bind_addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .map_err(|e| invalid(HOST_ENV, &host, e))?;

        let storage_backend = match var(STORAGE_BACKEND_ENV).as_deref() {
            None => StorageBackend::Redb,
            Some(v) if v.eq_ignore_ascii_case("redb") => StorageBackend::Redb,
            Some(v) if v.eq_ignore_ascii_case("memory") => StorageBackend::Memory,
            Some(v) => return Err(invalid(STORAGE_BACKEND_ENV, v, "expected redb or memory")),
        };

        let jwt_secret = var(JWT_SECRET_ENV).ok_or(ConfigError::Missing(JWT_SECRET_ENV))?;
        let jwt_algorithm = match var(JWT_ALGORITHM_ENV) {
            None => Algorithm::HS256,
            Some(v) => parse_hmac_algorithm(&v)?,
        };

        let token_ttl_minutes = parse_or(var(TOKEN_TTL_ENV), TOKEN_TTL_ENV, DEFAULT_TTL_MINUTES)?;
        if !(1..=MAX_TOKEN_TTL_MINUTES).contains(&token_ttl_minutes) {
            return Err(invalid(
                TOKEN_TTL_ENV,
                &token_ttl_minutes.to_string(),
                format!("must be within 1..={MAX_TOKEN_TTL_MINUTES}"),
            ));
        }

        let link_key = var(LINK_KEY_ENV).ok_or(ConfigError::Missing(LINK_KEY_ENV))?;

        let bcrypt_cost = parse_or(var(BCRYPT_COST_ENV), BCRYPT_COST_ENV, DEFAULT_BCRYPT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(invalid(BCRYPT_COST_ENV, &bcrypt_cost.to_string(), "must be within 4..=31"));
        }

        let max_upload_bytes = parse_or(
            var(MAX_UPLOAD_BYTES_ENV),
            MAX_UPLOAD_BYTES_ENV,
            DEFAULT_MAX_UPLOAD_BYTES,
        )?;

        let tls = match (var(TLS_CERT_PATH_ENV), var(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: cert.into(),
                key: key.into(),
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing(TLS_KEY_PATH_ENV)),
            (None, Some(_)) => return Err(ConfigError::Missing(TLS_CERT_PATH_ENV)),
        };

        let log_format = match var(LOG_FORMAT_ENV).as_deref() {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            bind_addr,
            data_dir: var(DATA_DIR_ENV).unwrap_or_else(|| DATA_ROOT.to_string()).into(),
            storage_backend,
            jwt_secret,
            jwt_algorithm,
            token_ttl_minutes,
            link_key,
            bcrypt_cost,
            max_upload_bytes,
            tls,
            log_format,
        })
    }
}

/// Session tokens are symmetric; only the HMAC family is accepted.
fn parse_hmac_algorithm(value: &str) -> Result<Algorithm, ConfigError> {
    match value.trim().to_ascii_uppercase().as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        _ => Err(invalid(JWT_ALGORITHM_ENV, value, "expected HS256, HS384, or HS512")),
    }
}

fn parse_or<T>(value: Option<String>, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|e| invalid(name, &v, e)),
    }
}

fn invalid(name: &'static str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        name,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
