#![allow(unused_assignments)]

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum PagebindError {
    #[error("Glob pattern error: {pattern}")]
    #[diagnostic(help("Check the wildcard syntax of the pages pattern"))]
    GlobPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Failed to compile base template {path}")]
    #[diagnostic(help("Check that the base file exists and is valid Tera syntax"))]
    BaseCompile {
        path: PathBuf,
        #[source]
        source: tera::Error,
    },

    #[error("Failed to compile page template {path}")]
    #[diagnostic(help("Check your Tera template syntax"))]
    PageCompile {
        path: PathBuf,
        #[source]
        source: tera::Error,
    },

    #[error("Unable to find expected template \"{expected}\"")]
    #[diagnostic(help("Add a page file named '{expected}.<ext>' matched by the pages pattern"))]
    MissingTemplate { expected: String },

    #[error("Template rendering failed: {name}")]
    RenderError {
        name: String,
        #[source]
        source: tera::Error,
    },

    #[error("Template slot was never bound")]
    #[diagnostic(help("Load the template set before executing its templates"))]
    Unbound,

    #[error("Loader config not found at {path}")]
    #[diagnostic(help("Ensure the directory contains a pagebind.toml file"))]
    ConfigNotFound { path: PathBuf },

    #[error("Failed to parse pagebind.toml")]
    #[diagnostic(help("Check the TOML syntax in your pagebind.toml file"))]
    ConfigParse {
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid loader config: {reason}")]
    ConfigInvalid { reason: String },

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, PagebindError>;
