/*!
 * Error types for the savetube application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur while converting timed-text XML captions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptionError {
    /// The document is not well-formed XML
    #[error("Failed to parse caption XML: {0}")]
    Parse(String),

    /// The root element has no body container
    #[error("Caption XML has no <body> container")]
    MissingBody,

    /// A caption node lacks a required attribute
    #[error("Caption node {node_index} is missing required attribute '{attribute}'")]
    MissingAttribute {
        /// Attribute name as it appears in the XML
        attribute: &'static str,
        /// Position of the node among the body's element children
        node_index: usize,
    },

    /// A required attribute is present but not a non-negative integer
    #[error("Caption node {node_index} has invalid '{attribute}' value: {value}")]
    InvalidAttribute {
        /// Attribute name as it appears in the XML
        attribute: &'static str,
        /// Raw attribute value
        value: String,
        /// Position of the node among the body's element children
        node_index: usize,
    },
}

/// Errors that can occur when selecting or fetching a caption track
#[derive(Error, Debug)]
pub enum TrackError {
    /// None of the preferred caption codes is offered
    #[error("No acceptable caption track (wanted {requested:?}, available {available:?})")]
    Unavailable {
        /// Preference list that was tried, in order
        requested: Vec<String>,
        /// Codes the source actually offers
        available: Vec<String>,
    },

    /// The source does not hold the requested track
    #[error("Caption track not found: {0}")]
    NotFound(String),

    /// Reading from the caption source failed
    #[error("Caption source I/O error: {0}")]
    Io(#[from] std::io::Error),
}
