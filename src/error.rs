// -*- mode: rust; -*-
//
// This file is part of ndn-throughput-server.
// See LICENSE for licensing information.

use thiserror::Error;

/// An error produced by the signing pipeline or its surrounding lifecycle.
#[derive(Debug, Error)]
pub enum AppError {
    /// Key generation, certificate issuance, or private-key load failed at startup.
    #[error("initialisation failed: {0}")]
    Init(String),

    /// Prefix registration with the Face failed.
    #[error("prefix registration failed: {0}")]
    Registration(String),

    /// A per-packet signing or encoding failure. Never propagated past the worker
    /// that observed it; recorded here only so tests can assert on the cause.
    #[error("signing failed: {0}")]
    Signing(String),

    /// CLI argument or configuration validation failed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<openssl::error::ErrorStack> for AppError {
    fn from(e: openssl::error::ErrorStack) -> Self {
        AppError::Signing(e.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppError>;
