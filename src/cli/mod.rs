pub mod calendar_view;
pub mod commands;
pub mod output;
pub mod shell;

pub use shell::run_cli;

use thiserror::Error;

use crate::{core::services::ServiceError, errors::KaraError};

/// User-facing CLI error wrapper.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] KaraError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
}
