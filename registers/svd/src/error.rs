// Licensed under the Apache-2.0 license

use thiserror::Error;

/// Fatal errors raised while loading a peripheral description.
///
/// Everything past a successful load is degraded-continue: the builder logs
/// and substitutes defaults instead of failing.
#[derive(Error, Debug)]
pub enum SvdError {
    /// The input file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    /// The input is not well-formed XML.
    #[error("malformed XML: {0}")]
    Xml(xmltree::ParseError),
    /// The root element is not `<device>`.
    #[error("root element is <{0}>, expected <device>")]
    MissingDevice(String),
}

impl From<xmltree::ParseError> for SvdError {
    fn from(err: xmltree::ParseError) -> Self {
        SvdError::Xml(err)
    }
}

/// Result type for document loading.
pub type SvdResult<T> = std::result::Result<T, SvdError>;
