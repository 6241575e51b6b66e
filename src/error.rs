//! Defines the custom error types for the mailforge application.

use std::io;
use thiserror::Error;

/// A template that appears more than once in a generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DuplicateTemplate {
    /// The offending template text (after trimming).
    pub template: String,
    /// How many times it appears in the request.
    pub count: usize,
}

/// The primary error type for the account generation process.
///
/// All generation errors are validation failures detected before any
/// candidate is produced; the generator never returns a partial result
/// alongside an error.
#[derive(Error, Debug)]
pub(crate) enum AppError {
    /// The domain was empty after trimming.
    #[error("domain is required")]
    MissingDomain,

    /// Templates must be pairwise distinct; each offender is listed once
    /// with the number of times it appears.
    #[error("duplicate templates: {}", render_duplicates(.0))]
    DuplicateTemplates(Vec<DuplicateTemplate>),

    /// Templates starting with a decimal digit, which would be
    /// indistinguishable from numeric-suffix variants.
    #[error("templates must not start with a digit: {}", .0.join(", "))]
    InvalidTemplates(Vec<String>),

    /// Multi-user mode was requested with no usable persons.
    #[error("no usable persons in input")]
    NoValidPersons,

    /// Single-user mode was requested with no templates.
    #[error("at least one template is required")]
    EmptyTemplateList,

    /// Error related to file input/output operations.
    #[error("IO Error: {0}")]
    Io(#[from] io::Error),

    /// Error during JSON serialization or deserialization.
    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),
}

fn render_duplicates(duplicates: &[DuplicateTemplate]) -> String {
    duplicates
        .iter()
        .map(|d| format!("'{}' ({}x)", d.template, d.count))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) type Result<T> = std::result::Result<T, AppError>;
