//! Error types for kernel evaluation

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KernelError {
    #[error("Unknown kernel '{name}', valid names are: {valid}")]
    UnknownKernel { name: String, valid: &'static str },

    #[error(
        "Hyperparameter mismatch for {family} kernel: expected {expected} \
         (or {expected} + 1 with a trailing noise entry), got {actual}"
    )]
    HyperparameterMismatch {
        family: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Cutoff mismatch for {family} kernel: expected {expected} radii, got {actual}")]
    CutoffMismatch {
        family: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid force component {component}: must be 1 (x), 2 (y) or 3 (z)")]
    InvalidForceComponent { component: usize },
}

pub type Result<T> = std::result::Result<T, KernelError>;
