//! Error types for chain operations.

use std::collections::TryReserveError;

use thiserror::Error;

/// Main error type for training and generation.
///
/// A lookup miss is only an error where the caller asked for a node that must
/// exist (`Chain::lookup`); ordinary misses are returned as `None`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChainError {
	#[error("Allocation failure: {0}")]
	AllocationFailure(String),

	#[error("Invalid argument: {0}")]
	InvalidArgument(String),

	#[error("State not found: {0}")]
	NotFound(String),
}

impl From<TryReserveError> for ChainError {
	fn from(e: TryReserveError) -> Self {
		ChainError::AllocationFailure(e.to_string())
	}
}

/// Result type for chain operations.
pub type Result<T> = std::result::Result<T, ChainError>;
