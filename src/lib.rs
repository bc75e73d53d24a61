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

//! This crate parses command-line arguments against a declared set of options
//! and an operand pattern.
//!
//! Parsing happens in two stages. A [`Syntax`] strategy first scans the raw
//! tokens into option occurrences and residual operands: [`PosixSyntax`]
//! recognizes clustered short options (`-xvf`), and [`GnuSyntax`] adds
//! `--name[=value]` long options with unambiguous-prefix abbreviation. An
//! [`OperandPattern`] then distributes the operands over named slots.
//! Structural problems in the arguments do not abort the scan; they are
//! collected into the result so one invocation reports everything at once.
//! Mistakes in the parser's own setup, by contrast, fail synchronously at the
//! declaring call.
//!
//! # Example
//!
//! ```
//! use argsyn::{ArgumentPolicy, GnuSyntax, OptionSpec, Parser};
//!
//! let mut parser = Parser::new(GnuSyntax::new());
//! parser.declare(OptionSpec::new("-v").alias("--verbose").repeatable()).unwrap();
//! parser
//!     .declare(OptionSpec::new("-o").alias("--output").argument(ArgumentPolicy::Required))
//!     .unwrap();
//! parser.set_operand_pattern("SOURCE... DEST").unwrap();
//!
//! let result = parser.parse(&["--verbose", "--out=log.txt", "a.c", "b.c", "build"]);
//! assert!(result.is_ok());
//! assert_eq!(result.occurrences_of("-v").unwrap().count(), 1);
//! assert_eq!(
//!     result.occurrences_of("--output").unwrap().arguments(),
//!     [Some("log.txt".to_string())]
//! );
//! assert_eq!(result.operand_values("SOURCE").unwrap(), ["a.c", "b.c"]);
//! assert_eq!(result.operand_values("DEST").unwrap(), ["build"]);
//! ```

pub mod operand;
pub mod option;
pub mod syntax;

pub use operand::{OperandAssignment, OperandError, OperandPattern, PatternError};
pub use option::{ArgumentPolicy, OptionSpec, OptionTable, RegisterError};
pub use syntax::{GnuSyntax, Occurrences, PosixSyntax, Syntax, SyntaxError, SyntaxResult};

use thiserror::Error;

/// Error found in the parsed arguments
///
/// These are the errors [`ParseResult::errors`] collects: problems with the
/// command line being parsed, merged from both parsing stages. Setup-time
/// errors ([`RegisterError`], [`PatternError`], [`RangeError`]) are separate
/// and returned synchronously.
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
#[non_exhaustive]
pub enum ArgumentError {
    /// Structural error from the token scan
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// Operand count not matching the operand pattern
    #[error(transparent)]
    Operand(#[from] OperandError),
}

/// Error in selecting a sub-range of the argument list
///
/// Returned by [`Parser::parse_range`] before any scanning takes place.
#[derive(Clone, Copy, Debug, Eq, Error, Hash, PartialEq)]
#[error("argument range at offset {offset} of length {length} exceeds the {available} argument(s) given")]
pub struct RangeError {
    /// Requested start index
    pub offset: usize,
    /// Requested number of arguments
    pub length: usize,
    /// Number of arguments actually given
    pub available: usize,
}

/// Outcome of one parser invocation
///
/// Combines the frozen [`SyntaxResult`] of the token scan with the
/// [`OperandAssignment`] of the operand match, when a pattern was configured
/// and the operands fit it. Errors from both stages are merged into one list,
/// scan errors first.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseResult {
    syntax: SyntaxResult,
    assignment: Option<OperandAssignment>,
    errors: Vec<ArgumentError>,
}

impl ParseResult {
    /// Returns the occurrences of the option declared under the given name.
    ///
    /// Any registered alias reaches the same entry. `None` only for names
    /// that were never declared.
    #[must_use]
    pub fn occurrences_of(&self, name: &str) -> Option<&Occurrences> {
        self.syntax.occurrences_of(name)
    }

    /// Residual non-option tokens, in input order
    #[must_use]
    pub fn operands(&self) -> &[String] {
        self.syntax.operands()
    }

    /// The operand-to-slot assignment
    ///
    /// `None` if no operand pattern was configured or the operands did not
    /// match it.
    #[must_use]
    pub fn assignment(&self) -> Option<&OperandAssignment> {
        self.assignment.as_ref()
    }

    /// Returns the operands assigned to the named slot.
    #[must_use]
    pub fn operand_values(&self, slot: &str) -> Option<&[String]> {
        self.assignment.as_ref()?.values_of(slot)
    }

    /// All errors found in the arguments, scan errors first
    #[must_use]
    pub fn errors(&self) -> &[ArgumentError] {
        &self.errors
    }

    /// Whether no errors were found
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Configured argument parser
///
/// A parser is set up once, with [`declare`](Self::declare) and
/// [`set_operand_pattern`](Self::set_operand_pattern), and is read-only
/// afterwards, so one parser can serve any number of
/// [`parse`](Self::parse) calls, concurrently if shared between threads.
///
/// See the [crate documentation](crate) for a usage example.
#[derive(Clone, Debug)]
pub struct Parser<S: Syntax> {
    syntax: S,
    options: OptionTable,
    operand_pattern: Option<OperandPattern>,
}

impl<S: Syntax> Parser<S> {
    /// Creates a parser with no options and no operand pattern.
    pub fn new(syntax: S) -> Self {
        Parser {
            syntax,
            options: OptionTable::new(),
            operand_pattern: None,
        }
    }

    /// The syntax strategy the parser scans with
    pub fn syntax(&self) -> &S {
        &self.syntax
    }

    /// The options declared so far
    pub fn options(&self) -> &OptionTable {
        &self.options
    }

    /// Declares an option.
    ///
    /// The spec is validated against the syntax's naming and argument rules,
    /// then registered under all of its names. On error nothing is
    /// registered.
    pub fn declare(&mut self, spec: OptionSpec) -> Result<&mut Self, RegisterError> {
        self.syntax.validate(&spec)?;
        self.options.register(spec)?;
        Ok(self)
    }

    /// Compiles and installs the operand pattern.
    ///
    /// Replaces any previously installed pattern. Without a pattern, operands
    /// are collected but not assigned to slots.
    pub fn set_operand_pattern(&mut self, pattern: &str) -> Result<&mut Self, PatternError> {
        self.operand_pattern = Some(OperandPattern::compile(pattern)?);
        Ok(self)
    }

    /// Parses an argument list.
    ///
    /// The token scan always runs to completion; the operand match runs on
    /// the residual operands if a pattern is installed. Errors from both
    /// stages end up in [`ParseResult::errors`], never as a return-level
    /// failure.
    pub fn parse<T: AsRef<str>>(&self, arguments: &[T]) -> ParseResult {
        let syntax = self
            .syntax
            .parse(&self.options, arguments.iter().map(AsRef::as_ref));

        let mut errors: Vec<ArgumentError> =
            syntax.errors().iter().cloned().map(Into::into).collect();

        let assignment = self.operand_pattern.as_ref().and_then(|pattern| {
            pattern
                .match_operands(syntax.operands())
                .map_err(|error| errors.push(error.into()))
                .ok()
        });

        ParseResult {
            syntax,
            assignment,
            errors,
        }
    }

    /// Parses the sub-range of an argument list starting at `offset` and
    /// spanning `length` arguments.
    ///
    /// The range is checked before any scanning; an out-of-bounds range is a
    /// setup mistake of the caller, not an error in the arguments.
    pub fn parse_range<T: AsRef<str>>(
        &self,
        arguments: &[T],
        offset: usize,
        length: usize,
    ) -> Result<ParseResult, RangeError> {
        let end = offset
            .checked_add(length)
            .filter(|&end| end <= arguments.len())
            .ok_or(RangeError {
                offset,
                length,
                available: arguments.len(),
            })?;
        Ok(self.parse(&arguments[offset..end]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn copy_parser() -> Parser<GnuSyntax> {
        let mut parser = Parser::new(GnuSyntax::new());
        parser
            .declare(OptionSpec::new("-v").alias("--verbose").repeatable())
            .unwrap();
        parser
            .declare(OptionSpec::new("-o").alias("--output").argument(ArgumentPolicy::Required))
            .unwrap();
        parser.set_operand_pattern("SOURCE... DEST").unwrap();
        parser
    }

    #[test]
    fn successful_end_to_end_parse() {
        let parser = copy_parser();
        let result = parser.parse(&["-v", "-o", "log", "one", "two", "three"]);

        assert!(result.is_ok(), "{:?}", result.errors());
        assert_eq!(result.occurrences_of("--verbose").unwrap().count(), 1);
        assert_eq!(
            result.occurrences_of("-o").unwrap().arguments(),
            [Some("log".to_owned())]
        );
        assert_eq!(result.operands(), ["one", "two", "three"]);
        assert_eq!(result.operand_values("SOURCE").unwrap(), ["one", "two"]);
        assert_eq!(result.operand_values("DEST").unwrap(), ["three"]);
    }

    #[test]
    fn errors_from_both_stages_are_merged_in_order() {
        let parser = copy_parser();
        // One unknown option and too few operands for the pattern.
        let result = parser.parse(&["--bogus", "only"]);

        assert!(!result.is_ok());
        assert_matches!(
            result.errors(),
            [ArgumentError::Syntax(SyntaxError::UnknownOption(name)), ArgumentError::Operand(error)] => {
                assert_eq!(name, "--bogus");
                assert_eq!(error.count, 1);
            }
        );
        assert_eq!(result.assignment(), None);
        assert_eq!(result.operand_values("SOURCE"), None);
        // The scan result is still fully available.
        assert_eq!(result.operands(), ["only"]);
    }

    #[test]
    fn parsing_without_a_pattern_leaves_operands_unassigned() {
        let mut parser = Parser::new(PosixSyntax::new());
        parser.declare(OptionSpec::new("-a")).unwrap();
        let result = parser.parse(&["-a", "x", "y"]);

        assert!(result.is_ok());
        assert_eq!(result.operands(), ["x", "y"]);
        assert_eq!(result.assignment(), None);
    }

    #[test]
    fn empty_string_token_is_an_operand() {
        let parser = copy_parser();
        let result = parser.parse(&["", "dest"]);
        assert!(result.is_ok(), "{:?}", result.errors());
        assert_eq!(result.operand_values("SOURCE").unwrap(), [""]);
        assert_eq!(result.operand_values("DEST").unwrap(), ["dest"]);
    }

    #[test]
    fn declare_validates_against_the_syntax() {
        let mut parser = Parser::new(GnuSyntax::new());
        let error = parser.declare(OptionSpec::new("verbose")).unwrap_err();
        assert_matches!(error, RegisterError::InvalidName(name) => {
            assert_eq!(name, "verbose");
        });
        // Nothing was registered.
        assert_eq!(parser.options().specs().len(), 0);
    }

    #[test]
    fn ambiguous_pattern_is_rejected_at_setup() {
        let mut parser = Parser::new(GnuSyntax::new());
        let error = parser.set_operand_pattern("A... B...").unwrap_err();
        assert_matches!(error, PatternError::Ambiguous { length: 3, .. });
    }

    #[test]
    fn parse_range_selects_a_sub_list() {
        let parser = copy_parser();
        let arguments = ["prog", "-v", "src", "dst", "ignored"];
        let result = parser.parse_range(&arguments, 1, 3).unwrap();

        assert!(result.is_ok(), "{:?}", result.errors());
        assert_eq!(result.operand_values("SOURCE").unwrap(), ["src"]);
        assert_eq!(result.operand_values("DEST").unwrap(), ["dst"]);
    }

    #[test]
    fn parse_range_rejects_out_of_bounds_ranges() {
        let parser = copy_parser();
        let arguments = ["a", "b"];

        let error = parser.parse_range(&arguments, 1, 2).unwrap_err();
        assert_eq!(
            error,
            RangeError {
                offset: 1,
                length: 2,
                available: 2,
            }
        );

        // An overflowing range must not panic.
        let error = parser.parse_range(&arguments, usize::MAX, 1).unwrap_err();
        assert_eq!(error.offset, usize::MAX);
    }

    #[test]
    fn parse_range_accepts_the_whole_and_the_empty_range() {
        let mut parser = Parser::new(PosixSyntax::new());
        parser.declare(OptionSpec::new("-a")).unwrap();

        let arguments = ["-a", "x"];
        let result = parser.parse_range(&arguments, 0, 2).unwrap();
        assert_eq!(result.occurrences_of("-a").unwrap().count(), 1);

        let result = parser.parse_range(&arguments, 2, 0).unwrap();
        assert!(result.occurrences_of("-a").unwrap().is_empty());
        assert_eq!(result.operands(), [] as [&str; 0]);
    }

    #[test]
    fn parser_is_reusable_across_invocations() {
        let parser = copy_parser();
        let first = parser.parse(&["a", "b"]);
        let second = parser.parse(&["a", "b"]);
        assert_eq!(first, second);
    }
}
