//! Error type for the server binary

use thiserror::Error;
use vidshelf::ShelfError;

#[derive(Error, Debug)]
pub enum ServerError {
    /// Library error
    #[error(transparent)]
    Shelf(#[from] ShelfError),

    /// Socket bind or accept failure
    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unusable listen address
    #[error("Invalid listen address {addr}: {reason}")]
    InvalidAddress { addr: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ServerError>;
