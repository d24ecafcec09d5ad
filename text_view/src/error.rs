// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

/// Failure to lay out text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The attributed text is malformed, for example a placeholder lies past the end of the
    /// text. This is a caller bug and is never recovered from.
    #[error("invalid layout input: {0}")]
    InvalidLayoutInput(#[from] attributed_text::Error),
}

/// Errors surfaced by the text view layer.
#[derive(Debug, Error)]
pub enum Error {
    /// Layout rejected its input.
    #[error(transparent)]
    Layout(#[from] LayoutError),
    /// A prop map could not be read.
    #[error("invalid props: {0}")]
    InvalidProps(#[source] serde_json::Error),
}

impl From<attributed_text::Error> for Error {
    fn from(err: attributed_text::Error) -> Self {
        Self::Layout(err.into())
    }
}
