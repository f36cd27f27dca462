/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * 2025 Tendsin Mende
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("Could not read file: {0}")]
    FSError(#[from] std::io::Error),
    #[error("File is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("Expected {expected}, found {found}")]
    Syntax { expected: String, found: String },
    #[error("Unsupported keyword `{0}`")]
    Keyword(String),
    #[error("Unclosed delimiter {delimiter}")]
    Unclosed { delimiter: char },
    #[error("{0}")]
    Custom(String),
}
