// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

use crate::types::{Handle, PointId};

#[derive(Error, Debug)]
pub enum PyorityError {
    #[error("Invalid handle: {0} is not part of this scheduler")]
    InvalidHandle(Handle),

    #[error("Graph is frozen: cannot {0} once scheduling has begun")]
    GraphFrozen(&'static str),

    #[error("Cyclic dependency: edge {from} -> {to} lies on a cycle")]
    CyclicDependency { from: PointId, to: PointId },

    #[error("Invalid pyority for {point}: {value} (must be >= 0)")]
    InvalidPyority { point: PointId, value: String },

    #[error("Pyority overflow: total pyority of {point} does not fit the weight type")]
    PyorityOverflow { point: PointId },

    #[error("Internal invariant violated: {0}")]
    Invariant(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, PyorityError>;
