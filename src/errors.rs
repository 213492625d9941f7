/*!
 * Error types for the docxlate application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when opening or writing a document container
#[derive(Error, Debug)]
pub enum ContainerError {
    /// The input is not a well-formed archive
    #[error("Corrupt container: {0}")]
    CorruptContainer(String),

    /// The archive declares a part that cannot actually be read
    #[error("Container declares part '{0}' but its data cannot be read")]
    MissingPart(String),

    /// The rebuilt package could not be encoded
    #[error("Failed to write package: {0}")]
    WriteFailed(String),
}

/// Errors that can occur when parsing or serializing an XML part
#[derive(Error, Debug)]
pub enum XmlError {
    /// The part's bytes are not well-formed XML
    #[error("Malformed XML: {0}")]
    MalformedXml(String),

    /// A node reference did not point at a text node
    #[error("Node {0} is not a text node")]
    NotATextNode(usize),
}

/// Errors that can occur when calling the translation provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// The request did not complete within the configured timeout
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),
}

/// Errors that can occur when writing the output file
#[derive(Error, Debug)]
pub enum OutputError {
    /// The destination path cannot be written
    #[error("Output path is not writable: {0}")]
    Unwritable(String),

    /// The destination already exists and overwrite was not requested
    #[error("Output file already exists: {0} (use -f to force overwrite)")]
    AlreadyExists(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from the document container
    #[error("Container error: {0}")]
    Container(#[from] ContainerError),

    /// Error from XML processing
    #[error("XML error: {0}")]
    Xml(#[from] XmlError),

    /// Error from the translation provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error writing the output
    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::Output(OutputError::Unwritable(error.to_string()))
    }
}
