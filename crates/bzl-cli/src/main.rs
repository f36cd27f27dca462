/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * 2025 Tendsin Mende
 */
//! # Bzl-cli
//!
//! `bzlfmt`, formats BUILD / Starlark files.

use std::{path::PathBuf, process::ExitCode};

use bzl_ast::util::AstTransformer;
use bzl_common::BzlError;
use bzl_fmt::{FormatConfig, FormatError, Formater, Indentation};
use bzl_parser::ParserError;
use clap::Parser;
use thiserror::Error;

mod transform;

#[derive(Parser, Debug)]
#[command(name = "bzlfmt")]
#[command(version, about, long_about = "Formats BUILD / Starlark files.")]
struct Args {
    ///Removes all parentheses that are not needed because of operator precedence.
    #[arg(long, default_value_t = false)]
    strip_parens: bool,

    ///Writes the result back to `src_file` instead of printing it.
    #[arg(long, short, default_value_t = false)]
    write: bool,

    ///Only checks if `src_file` is formatted. Exits with 1 if it is not.
    #[arg(long, default_value_t = false)]
    check: bool,

    ///Prints the syntax tree as S-expression, instead of formatting.
    #[arg(long, default_value_t = false)]
    dump_ast: bool,

    ///Indents with tabs.
    #[arg(long, default_value_t = false, conflicts_with = "indent")]
    tabs: bool,

    ///Number of spaces per indentation level.
    #[arg(long, default_value_t = 4)]
    indent: usize,

    ///The file that gets formatted.
    #[arg()]
    src_file: PathBuf,
}

impl Args {
    fn format_config(&self) -> FormatConfig {
        FormatConfig {
            indentation: if self.tabs {
                Indentation::Tabs
            } else {
                Indentation::Spaces(self.indent)
            },
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error("Could not read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not write {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(#[from] BzlError<ParserError>),
    #[error("Could not format: {0}")]
    Format(#[from] FormatError),
    #[error("Could not serialize syntax tree: {0}")]
    Dump(#[from] serde_lexpr::Error),
    #[error("{0:?} is not formatted")]
    NotFormatted(PathBuf),
}

fn run(args: &Args) -> Result<(), CliError> {
    let source = std::fs::read_to_string(&args.src_file).map_err(|source| CliError::Read {
        path: args.src_file.clone(),
        source,
    })?;

    let file_name = args.src_file.to_string_lossy().into_owned();
    let mut file = match bzl_parser::parse_string(&source) {
        Ok(file) => file,
        Err(e) => {
            let e = e.with_file(file_name);
            e.report(&source);
            return Err(e.into());
        }
    };
    file.path = Some(file_name);

    if log::log_enabled!(log::Level::Debug) {
        transform::KindCounter::count(&file).log();
    }

    if args.strip_parens {
        let mut strip = transform::StripParens::default();
        file = file.edit(|expr, ancestors| strip.expr(expr, ancestors));
        log::info!("removed {} parentheses", strip.removed);
    }

    if args.dump_ast {
        println!("{}", serde_lexpr::to_string(&file)?);
        return Ok(());
    }

    let formated = Formater::format_file(&file)?
        .with_config(args.format_config())
        .to_string();

    if args.check {
        if formated != source {
            return Err(CliError::NotFormatted(args.src_file.clone()));
        }
        log::info!("{:?} is formatted", args.src_file);
        return Ok(());
    }

    if args.write {
        if formated != source {
            std::fs::write(&args.src_file, formated).map_err(|source| CliError::Write {
                path: args.src_file.clone(),
                source,
            })?;
        }
    } else {
        print!("{formated}");
    }

    Ok(())
}

fn main() -> ExitCode {
    pretty_env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        //already reported with source context
        Err(CliError::Parse(_)) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
