// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attributed Text describes a piece of text as an ordered sequence of styled runs plus
//! inline placeholders (images, embedded views) positioned between characters.
//!
//! It is the input model for text measurement: it is immutable once built, cheap to share
//! (the text lives behind an [`Arc`](alloc::sync::Arc)), and hashable so callers can key
//! layout caches on its content.
//!
//! Runs can be pushed one after another with [`AttributedTextBuilder`], or produced from
//! overlapping attribute spans (nested text fragments) with [`AttributedText::from_spans`].
//!
//! ## Features
//!
//! - `std` (enabled by default): This is currently unused and is provided for forward
//!   compatibility.
// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

extern crate alloc;

mod attributed_text;
mod error;
mod placeholder;
mod segments;
mod text_range;

pub use crate::attributed_text::{AttributedText, AttributedTextBuilder, TextRun};
pub use crate::error::{BoundaryInfo, Endpoint, Error, ErrorKind};
pub use crate::placeholder::{InlinePlaceholder, SizeHint};
pub use crate::segments::SpanSegments;
pub use crate::text_range::TextRange;
