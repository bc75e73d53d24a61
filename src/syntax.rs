// This file is part of argsyn, a command-line argument syntax parser.
// Copyright (C) 2026 the argsyn developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Syntax scanning state machine
//!
//! This module classifies raw argument tokens into option occurrences and
//! operands. The classification strategy is pluggable through the [`Syntax`]
//! trait; [`PosixSyntax`] implements clustered short options and [`GnuSyntax`]
//! extends it with `--name[=value]` long options and abbreviation.
//!
//! Scanning threads a [`ScanState`] across the tokens: one token at a time is
//! fed to [`ScanState::step`], and [`ScanState::finalize`] freezes the
//! accumulated occurrences, operands, and errors into a [`SyntaxResult`].
//! Structural problems found along the way are never returned as `Err`; they
//! accumulate in the state so a single pass reports every detectable problem.
//!
//! ```
//! use argsyn::option::{ArgumentPolicy, OptionSpec, OptionTable};
//! use argsyn::syntax::{PosixSyntax, Syntax};
//!
//! let mut table = OptionTable::new();
//! table.register(OptionSpec::new("-a")).unwrap();
//! table.register(OptionSpec::new("-o").argument(ArgumentPolicy::Required)).unwrap();
//!
//! let result = PosixSyntax::new().parse(&table, ["-a", "-o", "file.txt", "x"]);
//! assert!(result.errors().is_empty());
//! assert_eq!(result.occurrences_of("-o").unwrap().arguments(), [Some("file.txt".to_string())]);
//! assert_eq!(result.operands(), ["x"]);
//! ```

use crate::option::{OptionSpec, OptionTable, RegisterError};
use std::collections::BTreeMap;
use thiserror::Error;

pub mod gnu;
pub mod posix;

pub use gnu::GnuSyntax;
pub use posix::PosixSyntax;

/// Structural error found while scanning
///
/// Scanning never aborts on these; they are collected into the
/// [`SyntaxResult`] so that one invocation reports every problem at once.
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
#[non_exhaustive]
pub enum SyntaxError {
    /// Option name not found in the table
    #[error("unknown option {0:?}")]
    UnknownOption(String),

    /// Abbreviated long option name matching more than one registered name
    #[error("ambiguous option name {name:?}")]
    AmbiguousOptionName {
        /// The name as typed
        name: String,
        /// All registered names the typed name is a prefix of
        candidates: Vec<String>,
    },

    /// Explicit argument given to an option that takes none
    #[error("option {0:?} does not accept an argument")]
    UnexpectedArgument(String),

    /// No argument supplied to an option that requires one
    #[error("option {0:?} requires an argument")]
    ArgumentRequired(String),

    /// Declared required option that never occurred
    #[error("missing required option {0:?}")]
    MissingOption(String),

    /// Non-repeatable option occurring more than once
    #[error("option {0:?} is specified more than once")]
    TooManyOccurrences(String),

    /// Option token appearing after an operand where the syntax forbids it
    #[error("option {0:?} appears after operands")]
    LateOption(String),
}

/// Occurrences of one option, as parallel name and argument lists
///
/// `names()[i]` is the name the option was typed under for its `i`-th
/// occurrence and `arguments()[i]` is the argument supplied there, or `None`
/// when the occurrence carried no argument. The two lists always have the
/// same length.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Occurrences {
    names: Vec<String>,
    arguments: Vec<Option<String>>,
}

impl Occurrences {
    /// Names the option occurred under, in order of appearance
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Arguments supplied to each occurrence, in order of appearance
    #[must_use]
    pub fn arguments(&self) -> &[Option<String>] {
        &self.arguments
    }

    /// Number of occurrences
    #[must_use]
    pub fn count(&self) -> usize {
        self.names.len()
    }

    /// Whether the option never occurred
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn push(&mut self, name: String, argument: Option<String>) {
        self.names.push(name);
        self.arguments.push(argument);
    }
}

/// Frozen outcome of one scanning pass
///
/// Occurrences are keyed by the canonical (primary) name of each option, but
/// the query methods accept any registered alias. Every declared option has
/// an entry, possibly empty, so [`occurrences_of`](Self::occurrences_of)
/// returns `None` only for names that were never declared.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SyntaxResult {
    occurrences: BTreeMap<String, Occurrences>,
    aliases: BTreeMap<String, String>,
    operands: Vec<String>,
    errors: Vec<SyntaxError>,
}

impl SyntaxResult {
    /// Returns the occurrences of the option registered under the given name.
    #[must_use]
    pub fn occurrences_of(&self, name: &str) -> Option<&Occurrences> {
        let canonical = self.aliases.get(name).map_or(name, String::as_str);
        self.occurrences.get(canonical)
    }

    /// Residual non-option tokens, in input order
    #[must_use]
    pub fn operands(&self) -> &[String] {
        &self.operands
    }

    /// Structural errors collected during scanning, in detection order
    #[must_use]
    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }
}

/// Mutable state threaded across the tokens of one scanning pass
///
/// A state is created per parse invocation, fed every token through
/// [`step`](Self::step), and consumed by [`finalize`](Self::finalize). The
/// state is an ordinary owned value, so the machine can also be driven and
/// inspected token by token.
#[derive(Clone, Debug)]
pub struct ScanState<'a> {
    table: &'a OptionTable,
    occurrences: BTreeMap<String, Occurrences>,
    operands: Vec<String>,
    errors: Vec<SyntaxError>,
    open_option: Option<(String, &'a OptionSpec)>,
    options_terminated: bool,
}

impl<'a> ScanState<'a> {
    /// Creates a fresh state over the given option table.
    #[must_use]
    pub fn new(table: &'a OptionTable) -> Self {
        ScanState {
            table,
            occurrences: BTreeMap::new(),
            operands: Vec::new(),
            errors: Vec::new(),
            open_option: None,
            options_terminated: false,
        }
    }

    /// The option table the state scans against
    #[must_use]
    pub fn table(&self) -> &'a OptionTable {
        self.table
    }

    /// Operands collected so far
    #[must_use]
    pub fn operands(&self) -> &[String] {
        &self.operands
    }

    /// Whether a previous token left an option awaiting its argument
    #[must_use]
    pub fn has_open_option(&self) -> bool {
        self.open_option.is_some()
    }

    /// Whether a `--` terminator has ended option recognition
    #[must_use]
    pub fn options_terminated(&self) -> bool {
        self.options_terminated
    }

    /// Records one occurrence of an option under the name it was typed as.
    ///
    /// The occurrence is filed under the canonical name of the owning option,
    /// or under the typed name itself if the table does not know it.
    pub fn record(&mut self, name: &str, argument: Option<String>) {
        let canonical = self.table.canonical_name(name).unwrap_or(name).to_owned();
        self.occurrences
            .entry(canonical)
            .or_default()
            .push(name.to_owned(), argument);
    }

    /// Appends a structural error.
    pub fn record_error(&mut self, error: SyntaxError) {
        self.errors.push(error);
    }

    /// Appends an operand.
    pub fn push_operand(&mut self, operand: String) {
        self.operands.push(operand);
    }

    /// Marks an option as awaiting an explicit argument in the next token.
    pub fn open(&mut self, name: String, spec: &'a OptionSpec) {
        self.open_option = Some((name, spec));
    }

    /// Feeds one raw token to the machine.
    ///
    /// The transition rules are evaluated in precedence order: a terminated
    /// state collects operands only; an open option consumes the token
    /// verbatim as its argument; a literal `--` terminates option
    /// recognition and is discarded; an option-shaped token is dispatched to
    /// the syntax; anything else is an operand. Operands do not end option
    /// recognition: a syntax that forbids late options flags a later option
    /// token with [`SyntaxError::LateOption`] but still processes it.
    pub fn step<S: Syntax + ?Sized>(&mut self, syntax: &S, token: &str) {
        if self.options_terminated {
            self.operands.push(token.to_owned());
            return;
        }
        if let Some((name, _spec)) = self.open_option.take() {
            self.record(&name, Some(token.to_owned()));
            return;
        }
        if token == "--" {
            self.options_terminated = true;
            return;
        }
        if syntax.looks_like_option(token) {
            syntax.scan_option(self, token);
        } else {
            self.operands.push(token.to_owned());
        }
    }

    /// Ends the scanning pass and freezes the state into a [`SyntaxResult`].
    ///
    /// An option still awaiting its argument is recorded with an absent
    /// argument and flagged with [`SyntaxError::ArgumentRequired`]. Every
    /// declared option is then checked against its occurrence contract:
    /// required options must occur, non-repeatable options at most once.
    #[must_use]
    pub fn finalize(mut self) -> SyntaxResult {
        if let Some((name, _spec)) = self.open_option.take() {
            self.record(&name, None);
            self.errors.push(SyntaxError::ArgumentRequired(name));
        }

        let mut aliases = BTreeMap::new();
        for spec in self.table.specs() {
            let primary = spec.primary_name();
            for name in spec.names() {
                aliases.insert(name.clone(), primary.to_owned());
            }

            let entry = self.occurrences.entry(primary.to_owned()).or_default();
            if spec.is_required() && entry.is_empty() {
                self.errors.push(SyntaxError::MissingOption(primary.to_owned()));
            }
            if !spec.is_repeatable() && entry.count() > 1 {
                self.errors
                    .push(SyntaxError::TooManyOccurrences(entry.names()[1].clone()));
            }
        }

        SyntaxResult {
            occurrences: self.occurrences,
            aliases,
            operands: self.operands,
            errors: self.errors,
        }
    }
}

/// Token-classification strategy
///
/// A syntax decides which tokens are option-shaped, how such a token is
/// decomposed into option names and arguments, and which option declarations
/// it accepts in the first place. The crate ships a closed set of
/// implementations: [`PosixSyntax`] and [`GnuSyntax`], the latter delegating
/// non-long tokens to the former.
pub trait Syntax {
    /// Checks a declaration against this syntax's naming and argument rules.
    ///
    /// Called at registration time, before any parsing.
    fn validate(&self, spec: &OptionSpec) -> Result<(), RegisterError>;

    /// Whether the token is option-shaped for this syntax
    fn looks_like_option(&self, token: &str) -> bool;

    /// Decomposes one option-shaped token, updating the state.
    ///
    /// Only called with tokens for which [`looks_like_option`] returned
    /// `true`, while option recognition is still active and no option is
    /// awaiting an argument.
    ///
    /// [`looks_like_option`]: Self::looks_like_option
    fn scan_option(&self, state: &mut ScanState<'_>, token: &str);

    /// Whether option tokens after the first operand are accepted without a
    /// [`SyntaxError::LateOption`] diagnostic
    fn late_options_allowed(&self) -> bool;

    /// Runs the machine over a whole token sequence.
    fn parse<I, T>(&self, table: &OptionTable, tokens: I) -> SyntaxResult
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut state = ScanState::new(table);
        for token in tokens {
            state.step(self, token.as_ref());
        }
        state.finalize()
    }
}
