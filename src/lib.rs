//! Declarative command line parsing and dispatch.
//!
//! A [`Program`] collects commands, options, aliases and callbacks, then
//! `parse` runs the argument vector through four stages: tokenize, resolve,
//! validate, execute. Bound values end up in [`Matches`].
//!
//! ```no_run
//! use argot::{Flag, Program, Values};
//!
//! let matches = Program::new("git")
//!     .option("-v --verbose", "print more")
//!     .command("clone [repo]")
//!     .description("clone a repository")
//!     .alias("c")
//!     .action(|args: &Values| println!("cloning {}", args.get_str("repo").unwrap_or("")))
//!     .command("serve")
//!     .add_option(Flag::new("-p --port").default_value(8080))
//!     .parse()
//!     .unwrap();
//!
//! let _port = matches.get("port");
//! ```
use std::fmt;

mod action;
mod command;
mod exec;
mod flag;
mod help;
mod program;
mod resolve;
mod validate;
mod value;

pub mod report;
/// Argv tokenizer.
pub mod rt;

pub use crate::{
    action::{Action, IntoAction},
    command::{Argument, Command},
    flag::{Flag, FlagSpec},
    program::{Outcome, Program},
    resolve::{find_command, find_flag},
    validate::Rule,
    value::{Matches, Value, Values},
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every failure the parser can report.
///
/// The message part of each variant is fixed; the detail names the
/// offending token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Configuration(String),
    #[error("{m}: `{0}`", m = ErrorKind::InvalidRule.message())]
    InvalidRule(String),
    #[error("{m}: `{0}`", m = ErrorKind::OptionNotFound.message())]
    OptionNotFound(String),
    #[error("{m}: `{0}`", m = ErrorKind::CommandNotFound.message())]
    CommandNotFound(String),
    #[error("{m}: `{0}`", m = ErrorKind::RequiredOptionNotFound.message())]
    RequiredOptionNotFound(String),
    #[error("{m}: `{0}`", m = ErrorKind::RequiredValueNotFound.message())]
    RequiredValueNotFound(String),
    #[error("{m}: `{value}` for `{flag}`, expected one of: {allowed}", m = ErrorKind::OptionChoiceInvalid.message())]
    OptionChoiceInvalid { flag: String, value: String, allowed: String },
    #[error("{m}: `{command}` takes {params}", m = ErrorKind::TooManyParameters.message())]
    TooManyParameters { command: String, params: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    InvalidRule,
    OptionNotFound,
    CommandNotFound,
    RequiredOptionNotFound,
    RequiredValueNotFound,
    OptionChoiceInvalid,
    TooManyParameters,
}

impl ErrorKind {
    pub fn message(self) -> &'static str {
        match self {
            ErrorKind::Configuration => "invalid declaration",
            ErrorKind::InvalidRule => "invalid validation rule",
            ErrorKind::OptionNotFound => "option not found",
            ErrorKind::CommandNotFound => "command not found",
            ErrorKind::RequiredOptionNotFound => "required option not found",
            ErrorKind::RequiredValueNotFound => "required value not found",
            ErrorKind::OptionChoiceInvalid => "invalid option choice",
            ErrorKind::TooManyParameters => "too many parameters",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Configuration(_) => ErrorKind::Configuration,
            Error::InvalidRule(_) => ErrorKind::InvalidRule,
            Error::OptionNotFound(_) => ErrorKind::OptionNotFound,
            Error::CommandNotFound(_) => ErrorKind::CommandNotFound,
            Error::RequiredOptionNotFound(_) => ErrorKind::RequiredOptionNotFound,
            Error::RequiredValueNotFound(_) => ErrorKind::RequiredValueNotFound,
            Error::OptionChoiceInvalid { .. } => ErrorKind::OptionChoiceInvalid,
            Error::TooManyParameters { .. } => ErrorKind::TooManyParameters,
        }
    }

    /// The offending token, without the fixed message. Reads like the
    /// `Display` form minus the message prefix and backticks.
    pub fn detail(&self) -> String {
        match self {
            Error::Configuration(it)
            | Error::InvalidRule(it)
            | Error::OptionNotFound(it)
            | Error::CommandNotFound(it)
            | Error::RequiredOptionNotFound(it)
            | Error::RequiredValueNotFound(it) => it.clone(),
            Error::OptionChoiceInvalid { flag, value, allowed } => {
                format!("{value} for {flag}, expected one of: {allowed}")
            }
            Error::TooManyParameters { command, params } => format!("{command} takes {params}"),
        }
    }

    /// Prints the error report for `program` and terminates the process with
    /// status 1.
    pub fn exit(self, program: &str) -> ! {
        report::error(program, self.kind().message(), &self.detail());
        std::process::exit(1)
    }
}
