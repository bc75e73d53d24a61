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

//! Syntax for GNU-style long options
//!
//! [`GnuSyntax`] follows the GNU [Program Argument Syntax Conventions]: a
//! token starting with `--` is a long option, possibly carrying its argument
//! after an `=` sign in the same token, and an unambiguous prefix of a long
//! name resolves to the full name. Tokens that are not long options are
//! handled by an inner [`PosixSyntax`].
//!
//! Where the Conventions leave room, this implementation resolves them the
//! same way as the GNU C library: an exact name match always beats a prefix
//! match, and `--` stops option recognition only when it is not consumed as
//! an option argument.
//!
//! [Program Argument Syntax Conventions]: https://www.gnu.org/software/libc/manual/html_node/Argument-Syntax.html

use super::posix::PosixSyntax;
use super::{ScanState, Syntax, SyntaxError};
use crate::option::{ArgumentPolicy, OptionSpec, RegisterError};

/// Syntax for GNU-style long options over POSIX short options
///
/// The inner [`PosixSyntax`] configuration applies to short options and, for
/// [optional arguments](PosixSyntax::allow_optional_arguments), to long
/// options as well. Unlike plain POSIX, options after operands pass without
/// a diagnostic by default, matching the GNU implementations.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct GnuSyntax {
    posix: PosixSyntax,
    abbreviation: bool,
}

impl GnuSyntax {
    /// Creates a syntax with default configuration.
    #[must_use]
    pub fn new() -> Self {
        let mut posix = PosixSyntax::new();
        posix.allow_late_options(true);
        GnuSyntax {
            posix,
            abbreviation: true,
        }
    }

    /// Whether an unambiguous prefix of a long name is accepted
    #[must_use]
    pub const fn abbreviation_allowed(&self) -> bool {
        self.abbreviation
    }

    /// Sets whether long option names may be abbreviated.
    pub fn allow_abbreviation(&mut self, allow: bool) -> &mut Self {
        self.abbreviation = allow;
        self
    }

    /// Sets whether options with an optional argument may be declared.
    pub fn allow_optional_arguments(&mut self, allow: bool) -> &mut Self {
        self.posix.allow_optional_arguments(allow);
        self
    }

    /// Sets whether short options may absorb joint arguments.
    pub fn allow_joint_arguments(&mut self, allow: bool) -> &mut Self {
        self.posix.allow_joint_arguments(allow);
        self
    }

    /// Sets whether option tokens after the first operand pass without a
    /// diagnostic.
    pub fn allow_late_options(&mut self, allow: bool) -> &mut Self {
        self.posix.allow_late_options(allow);
        self
    }

    fn is_valid_long_name(name: &str) -> bool {
        match name.strip_prefix("--") {
            Some(body) => {
                !body.is_empty()
                    && body.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
            }
            None => false,
        }
    }

    /// Scans one `--`-prefixed token.
    fn scan_long(&self, state: &mut ScanState<'_>, token: &str) {
        let (name, explicit) = match token.find('=') {
            None => (token, None),
            Some(index) => (&token[..index], Some(token[index + 1..].to_owned())),
        };
        if !state.operands().is_empty() && !self.late_options_allowed() {
            state.record_error(SyntaxError::LateOption(name.to_owned()));
        }

        let table = state.table();
        let (name, spec) = if let Some(spec) = table.lookup(name) {
            (name.to_owned(), spec)
        } else if !self.abbreviation {
            state.record_error(SyntaxError::UnknownOption(name.to_owned()));
            return;
        } else {
            let candidates = table.prefix_matches(name);
            match candidates.as_slice() {
                [] => {
                    state.record_error(SyntaxError::UnknownOption(name.to_owned()));
                    return;
                }
                [(full_name, spec)] => ((*full_name).to_owned(), *spec),
                _ => {
                    state.record_error(SyntaxError::AmbiguousOptionName {
                        name: name.to_owned(),
                        candidates: candidates
                            .iter()
                            .map(|&(candidate, _)| candidate.to_owned())
                            .collect(),
                    });
                    return;
                }
            }
        };

        match explicit {
            Some(argument) => {
                if !spec.argument_policy().accepts_argument() {
                    state.record_error(SyntaxError::UnexpectedArgument(name.clone()));
                }
                state.record(&name, Some(argument));
            }
            None => {
                if spec.argument_policy().requires_argument() {
                    state.open(name, spec);
                } else {
                    state.record(&name, None);
                }
            }
        }
    }
}

impl Default for GnuSyntax {
    fn default() -> Self {
        Self::new()
    }
}

impl Syntax for GnuSyntax {
    fn validate(&self, spec: &OptionSpec) -> Result<(), RegisterError> {
        for name in spec.names() {
            if !Self::is_valid_long_name(name) && !PosixSyntax::is_valid_name(name) {
                return Err(RegisterError::InvalidName(name.clone()));
            }
        }
        if spec.argument_policy() == ArgumentPolicy::Optional
            && !self.posix.optional_arguments_allowed()
        {
            return Err(RegisterError::UnsupportedOption(
                spec.primary_name().to_owned(),
            ));
        }
        Ok(())
    }

    fn looks_like_option(&self, token: &str) -> bool {
        self.posix.looks_like_option(token)
    }

    fn scan_option(&self, state: &mut ScanState<'_>, token: &str) {
        if token.starts_with("--") {
            self.scan_long(state, token);
        } else {
            self.posix.scan_option(state, token);
        }
    }

    fn late_options_allowed(&self) -> bool {
        self.posix.late_options_allowed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::{ArgumentPolicy, OptionTable};
    use assert_matches::assert_matches;

    fn declare(table: &mut OptionTable, syntax: &GnuSyntax, spec: OptionSpec) {
        syntax.validate(&spec).unwrap();
        table.register(spec).unwrap();
    }

    fn long_table(syntax: &GnuSyntax) -> OptionTable {
        let mut table = OptionTable::new();
        declare(&mut table, syntax, OptionSpec::new("--all").alias("-a"));
        declare(&mut table, syntax, OptionSpec::new("--verbose"));
        declare(
            &mut table,
            syntax,
            OptionSpec::new("--output")
                .alias("-o")
                .argument(ArgumentPolicy::Required),
        );
        table
    }

    #[test]
    fn long_option_without_argument() {
        let syntax = GnuSyntax::new();
        let result = syntax.parse(&long_table(&syntax), ["--all", "foo"]);
        assert!(result.errors().is_empty());
        let occurrences = result.occurrences_of("--all").unwrap();
        assert_eq!(occurrences.names(), ["--all"]);
        assert_eq!(occurrences.arguments(), [None]);
        assert_eq!(result.operands(), ["foo"]);
    }

    #[test]
    fn occurrences_shared_between_short_and_long_names() {
        let syntax = GnuSyntax::new();
        let result = syntax.parse(&long_table(&syntax), ["-a", "--all"]);
        assert_eq!(
            result.errors(),
            [SyntaxError::TooManyOccurrences("--all".to_owned())]
        );
        let occurrences = result.occurrences_of("--all").unwrap();
        assert_eq!(occurrences.names(), ["-a", "--all"]);
    }

    #[test]
    fn joint_argument_after_equal_sign() {
        let syntax = GnuSyntax::new();
        let result = syntax.parse(&long_table(&syntax), ["--output=x.txt"]);
        assert!(result.errors().is_empty());
        assert_eq!(
            result.occurrences_of("--output").unwrap().arguments(),
            [Some("x.txt".to_owned())]
        );
    }

    #[test]
    fn empty_joint_argument() {
        let syntax = GnuSyntax::new();
        let result = syntax.parse(&long_table(&syntax), ["--output="]);
        assert!(result.errors().is_empty());
        assert_eq!(
            result.occurrences_of("--output").unwrap().arguments(),
            [Some(String::new())]
        );
    }

    #[test]
    fn separate_argument_taken_verbatim() {
        let syntax = GnuSyntax::new();
        let result = syntax.parse(&long_table(&syntax), ["--output", "--all"]);
        assert!(result.errors().is_empty());
        assert_eq!(
            result.occurrences_of("--output").unwrap().arguments(),
            [Some("--all".to_owned())]
        );
        assert!(result.occurrences_of("--all").unwrap().is_empty());
    }

    #[test]
    fn missing_argument_at_end_of_input() {
        let syntax = GnuSyntax::new();
        let result = syntax.parse(&long_table(&syntax), ["--output"]);
        assert_eq!(
            result.errors(),
            [SyntaxError::ArgumentRequired("--output".to_owned())]
        );
        assert_eq!(result.occurrences_of("--output").unwrap().arguments(), [None]);
    }

    #[test]
    fn unexpected_argument_is_flagged_but_kept() {
        let syntax = GnuSyntax::new();
        let result = syntax.parse(&long_table(&syntax), ["--all=yes"]);
        assert_eq!(
            result.errors(),
            [SyntaxError::UnexpectedArgument("--all".to_owned())]
        );
        assert_eq!(
            result.occurrences_of("--all").unwrap().arguments(),
            [Some("yes".to_owned())]
        );
    }

    #[test]
    fn abbreviation_resolves_unique_prefix() {
        let syntax = GnuSyntax::new();
        let result = syntax.parse(&long_table(&syntax), ["--ver"]);
        assert!(result.errors().is_empty());
        // The occurrence is recorded under the resolved full name.
        assert_eq!(
            result.occurrences_of("--verbose").unwrap().names(),
            ["--verbose"]
        );
    }

    #[test]
    fn abbreviated_name_with_joint_argument() {
        let syntax = GnuSyntax::new();
        let result = syntax.parse(&long_table(&syntax), ["--out=x"]);
        assert!(result.errors().is_empty());
        assert_eq!(
            result.occurrences_of("--output").unwrap().arguments(),
            [Some("x".to_owned())]
        );
    }

    #[test]
    fn exact_match_beats_prefix_match() {
        let syntax = GnuSyntax::new();
        let mut table = OptionTable::new();
        declare(&mut table, &syntax, OptionSpec::new("--man"));
        declare(&mut table, &syntax, OptionSpec::new("--many"));
        declare(&mut table, &syntax, OptionSpec::new("--manual"));

        let result = syntax.parse(&table, ["--man"]);
        assert!(result.errors().is_empty());
        assert_eq!(result.occurrences_of("--man").unwrap().count(), 1);
        assert!(result.occurrences_of("--many").unwrap().is_empty());
        assert!(result.occurrences_of("--manual").unwrap().is_empty());
    }

    #[test]
    fn ambiguous_abbreviation_records_no_occurrence() {
        let syntax = GnuSyntax::new();
        let mut table = OptionTable::new();
        declare(&mut table, &syntax, OptionSpec::new("--all"));
        declare(&mut table, &syntax, OptionSpec::new("--archive"));

        let result = syntax.parse(&table, ["--a"]);
        assert_matches!(result.errors(), [SyntaxError::AmbiguousOptionName { name, candidates }] => {
            assert_eq!(name, "--a");
            assert_eq!(candidates, &["--all".to_owned(), "--archive".to_owned()]);
        });
        assert!(result.occurrences_of("--all").unwrap().is_empty());
        assert!(result.occurrences_of("--archive").unwrap().is_empty());
    }

    #[test]
    fn unambiguous_prefix_resolves_when_another_option_differs() {
        let syntax = GnuSyntax::new();
        let mut table = OptionTable::new();
        declare(&mut table, &syntax, OptionSpec::new("--all"));
        declare(&mut table, &syntax, OptionSpec::new("--verbose"));
        let result = syntax.parse(&table, ["--al"]);
        assert!(result.errors().is_empty());
        assert_eq!(result.occurrences_of("--all").unwrap().count(), 1);
    }

    #[test]
    fn abbreviation_disabled_requires_full_name() {
        let mut syntax = GnuSyntax::new();
        syntax.allow_abbreviation(false);
        let table = long_table(&syntax);
        let result = syntax.parse(&table, ["--ver"]);
        assert_eq!(
            result.errors(),
            [SyntaxError::UnknownOption("--ver".to_owned())]
        );
        assert!(result.occurrences_of("--verbose").unwrap().is_empty());
    }

    #[test]
    fn unknown_long_option() {
        let syntax = GnuSyntax::new();
        let result = syntax.parse(&long_table(&syntax), ["--nonsense=3", "x"]);
        assert_eq!(
            result.errors(),
            [SyntaxError::UnknownOption("--nonsense".to_owned())]
        );
        assert_eq!(result.operands(), ["x"]);
    }

    #[test]
    fn short_options_delegate_to_posix() {
        let syntax = GnuSyntax::new();
        let result = syntax.parse(&long_table(&syntax), ["-ao", "x.txt"]);
        assert!(result.errors().is_empty());
        assert_eq!(result.occurrences_of("--all").unwrap().names(), ["-a"]);
        assert_eq!(
            result.occurrences_of("-o").unwrap().arguments(),
            [Some("x.txt".to_owned())]
        );
    }

    #[test]
    fn late_options_recognized_by_default() {
        let syntax = GnuSyntax::new();
        let result = syntax.parse(&long_table(&syntax), ["operand", "--all"]);
        assert!(result.errors().is_empty());
        assert_eq!(result.occurrences_of("--all").unwrap().count(), 1);
        assert_eq!(result.operands(), ["operand"]);
    }

    #[test]
    fn late_long_option_flagged_but_still_processed() {
        let mut syntax = GnuSyntax::new();
        syntax.allow_late_options(false);
        let table = long_table(&syntax);
        let result = syntax.parse(&table, ["operand", "--all"]);
        assert_eq!(
            result.errors(),
            [SyntaxError::LateOption("--all".to_owned())]
        );
        assert_eq!(result.occurrences_of("--all").unwrap().count(), 1);
        assert_eq!(result.operands(), ["operand"]);
    }

    #[test]
    fn late_option_diagnostic_names_the_option_without_its_argument() {
        let mut syntax = GnuSyntax::new();
        syntax.allow_late_options(false);
        let table = long_table(&syntax);
        let result = syntax.parse(&table, ["operand", "--output=x"]);
        assert_eq!(
            result.errors(),
            [SyntaxError::LateOption("--output".to_owned())]
        );
        assert_eq!(
            result.occurrences_of("--output").unwrap().arguments(),
            [Some("x".to_owned())]
        );
    }

    #[test]
    fn optional_argument_on_long_option() {
        let mut syntax = GnuSyntax::new();
        syntax.allow_optional_arguments(true);
        let mut table = OptionTable::new();
        declare(
            &mut table,
            &syntax,
            OptionSpec::new("--color")
                .repeatable()
                .argument(ArgumentPolicy::Optional),
        );

        let result = syntax.parse(&table, ["--color", "--color=auto", "x"]);
        assert!(result.errors().is_empty());
        assert_eq!(
            result.occurrences_of("--color").unwrap().arguments(),
            [None, Some("auto".to_owned())]
        );
        assert_eq!(result.operands(), ["x"]);
    }

    #[test]
    fn validate_accepts_long_and_short_names() {
        let syntax = GnuSyntax::new();
        syntax.validate(&OptionSpec::new("--all")).unwrap();
        syntax.validate(&OptionSpec::new("-a")).unwrap();
        syntax
            .validate(&OptionSpec::new("--dry-run").alias("-n"))
            .unwrap();

        for name in ["--", "--=", "--a=b", "all", "-ab"] {
            let error = syntax.validate(&OptionSpec::new(name)).unwrap_err();
            assert_matches!(error, RegisterError::InvalidName(_));
        }
    }

    #[test]
    fn validate_rejects_optional_arguments_by_default() {
        let syntax = GnuSyntax::new();
        let spec = OptionSpec::new("--color").argument(ArgumentPolicy::Optional);
        let error = syntax.validate(&spec).unwrap_err();
        assert_matches!(error, RegisterError::UnsupportedOption(name) => {
            assert_eq!(name, "--color");
        });
    }
}
