/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * 2025 Tendsin Mende
 */
use std::{error::Error, fmt::Debug, fmt::Display};

use ariadne::{Color, Label, Report, ReportKind, Source};
use smallvec::{smallvec, SmallVec};

use crate::Span;

///Common error type for the bzl crates. Wraps any `E: Error` and allows attaching a source location
/// and labels, that are printed when using [BzlError::report].
///
/// You are encouraged to derive `E` via [thiserror](https://docs.rs/thiserror), and use [BzlError] only to
/// embedd the location information.
pub struct BzlError<E: Error> {
    pub error: E,
    pub source_span: Option<Span>,
    ///File the error occured in, if known.
    pub file: Option<String>,
    pub labels: SmallVec<[(Span, String); 2]>,
}

impl<E: Error> BzlError<E> {
    pub fn new(error: E) -> Self {
        BzlError {
            error,
            source_span: None,
            file: None,
            labels: SmallVec::new(),
        }
    }

    ///Creates an error that reports `message` at the given `span`.
    pub fn error_here(error: E, span: Span, message: impl ToString) -> Self {
        BzlError {
            error,
            source_span: Some(span),
            file: None,
            labels: smallvec![(span, message.to_string())],
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    ///Reports the error to stderr. `source` must be the text the spans point into.
    pub fn report(&self, source: &str) {
        let id = self
            .file
            .clone()
            .unwrap_or_else(|| "<input>".to_owned());
        let offset = self.source_span.map(|s| s.char_start).unwrap_or(0);

        let mut builder = Report::build(ReportKind::Error, id.clone(), offset)
            .with_message(self.error.to_string());
        for (span, message) in &self.labels {
            builder = builder.with_label(
                Label::new((id.clone(), span.char_range()))
                    .with_message(message)
                    .with_color(Color::Red),
            );
        }

        if let Err(e) = builder.finish().eprint((id, Source::from(source.to_owned()))) {
            log::error!("Failed to print report: {e}");
        }
    }
}

impl<E: Error> Display for BzlError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.file, &self.source_span) {
            (Some(file), Some(span)) => write!(f, "{file}:{span}: {}", self.error),
            (None, Some(span)) => write!(f, "{span}: {}", self.error),
            (Some(file), None) => write!(f, "{file}: {}", self.error),
            (None, None) => write!(f, "{}", self.error),
        }
    }
}

impl<E: Error> Debug for BzlError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

impl<E: Error + 'static> Error for BzlError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.error)
    }
}
