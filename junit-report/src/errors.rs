// Copyright (c) The junit-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::Utf8PathBuf;
use quick_xml::events::attributes::AttrError;
use std::{io, num::ParseIntError, str::Utf8Error};
use thiserror::Error;

/// An error that occurs while serializing a [`Report`](crate::Report).
///
/// Returned by [`Report::serialize`](crate::Report::serialize),
/// [`Report::to_string`](crate::Report::to_string) and
/// [`Report::to_bytes`](crate::Report::to_bytes).
#[derive(Debug, Error)]
#[error("error serializing JUnit report")]
pub struct SerializeError {
    #[from]
    inner: quick_xml::Error,
}

/// An error that occurs while writing a [`Report`](crate::Report) to a file.
///
/// Returned by [`Report::write_to_path`](crate::Report::write_to_path).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WriteReportError {
    /// The report could not be serialized.
    #[error(transparent)]
    Serialize(#[from] SerializeError),

    /// The destination could not be written.
    #[error("error writing JUnit report to `{path}`")]
    Io {
        /// The destination path.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: io::Error,
    },
}

/// An error that occurs while reading a [`Report`](crate::Report) back from XML.
///
/// Returned by [`Report::deserialize`](crate::Report::deserialize) and
/// [`Report::deserialize_from_str`](crate::Report::deserialize_from_str).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DeserializeError {
    /// The input could not be read.
    #[error("error reading JUnit report")]
    Io(#[source] io::Error),

    /// The input is not well-formed XML.
    #[error("malformed XML in JUnit report")]
    Xml(#[from] quick_xml::Error),

    /// An attribute could not be parsed.
    #[error("malformed attribute in JUnit report")]
    Attr(#[from] AttrError),

    /// Character data inside an element was not valid UTF-8.
    #[error("content of <{element}> is not valid UTF-8")]
    Utf8 {
        element: String,
        #[source]
        error: Utf8Error,
    },

    /// An integer attribute could not be parsed.
    #[error("attribute `{attribute}` of <{element}> has invalid integer value `{value}`")]
    InvalidInteger {
        element: String,
        attribute: &'static str,
        value: String,
        #[source]
        error: ParseIntError,
    },

    /// A timestamp attribute could not be parsed as RFC 3339.
    #[error("attribute `timestamp` of <{element}> has invalid value `{value}`")]
    InvalidTimestamp {
        element: String,
        value: String,
        #[source]
        error: chrono::ParseError,
    },

    /// An element appeared where it is not allowed.
    #[error("unexpected element <{found}> inside <{parent}>")]
    UnexpectedElement { parent: String, found: String },

    /// The input ended before an element was closed.
    #[error("unexpected end of input inside <{element}>")]
    UnexpectedEof { element: String },

    /// The input has no `testsuites` root element.
    #[error("no <testsuites> root element found")]
    MissingRoot,
}
