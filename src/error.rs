//! Error types for plotting, font decoding, motion execution and configuration.

use thiserror::Error;

/// Errors surfaced by [`TurtlePlot`](crate::TurtlePlot) operations.
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("No turtle-graphics mode '{0}' (expected 'standard' or 'logo')")]
    InvalidMode(String),

    #[error("Scale must be a positive finite number, got {0}")]
    InvalidScale(f64),

    #[error("Full circle must be a positive finite number of units, got {0}")]
    InvalidFullCircle(f64),

    #[error("Font error: {0}")]
    Font(#[from] FontError),

    #[error("Motion executor failed: {0}")]
    Executor(#[from] ExecutorError),
}

/// Errors raised while loading or decoding a vector font.
#[derive(Debug, Error)]
pub enum FontError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Font data truncated at offset {offset}")]
    Truncated { offset: usize },
}

/// Errors reported by a [`MotionExecutor`](crate::MotionExecutor).
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Hardware fault: {0}")]
    Fault(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, PlotError>;
