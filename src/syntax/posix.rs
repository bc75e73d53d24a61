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

//! Syntax for POSIX-style clustered short options
//!
//! [`PosixSyntax`] follows the [POSIX Utility Syntax Guidelines]: an option is
//! a single alphanumeric character after a hyphen, several options may be
//! clustered in one token, and the last option of a cluster may absorb the
//! rest of the token as its argument.
//!
//! [POSIX Utility Syntax Guidelines]: https://pubs.opengroup.org/onlinepubs/9799919799/basedefs/V1_chap12.html#tag_12_02

use super::{ScanState, Syntax, SyntaxError};
use crate::option::{ArgumentPolicy, OptionSpec, RegisterError};

/// Syntax for POSIX-style clustered short options
///
/// Behavior is customized with the chained setters before any parsing
/// begins. The defaults are strict: optional arguments are rejected at
/// declaration time and options appearing after the first operand are
/// flagged with [`SyntaxError::LateOption`] (though still processed).
/// Joint arguments (`-oVALUE`) are allowed by default, as `getopt` accepts
/// them.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct PosixSyntax {
    optional_arguments: bool,
    joint_arguments: bool,
    late_options: bool,
}

impl PosixSyntax {
    /// Creates a syntax with default configuration.
    #[must_use]
    pub const fn new() -> Self {
        PosixSyntax {
            optional_arguments: false,
            joint_arguments: true,
            late_options: false,
        }
    }

    /// Whether options with an [`Optional`](ArgumentPolicy::Optional)
    /// argument policy may be declared
    #[must_use]
    pub const fn optional_arguments_allowed(&self) -> bool {
        self.optional_arguments
    }

    /// Sets whether options with an optional argument may be declared.
    pub fn allow_optional_arguments(&mut self, allow: bool) -> &mut Self {
        self.optional_arguments = allow;
        self
    }

    /// Whether the last option of a cluster may absorb the rest of the token
    /// as its argument
    #[must_use]
    pub const fn joint_arguments_allowed(&self) -> bool {
        self.joint_arguments
    }

    /// Sets whether joint arguments are recognized.
    pub fn allow_joint_arguments(&mut self, allow: bool) -> &mut Self {
        self.joint_arguments = allow;
        self
    }

    /// Sets whether option tokens after the first operand pass without a
    /// diagnostic.
    pub fn allow_late_options(&mut self, allow: bool) -> &mut Self {
        self.late_options = allow;
        self
    }

    pub(crate) fn is_valid_name(name: &str) -> bool {
        let mut chars = name.chars();
        chars.next() == Some('-')
            && matches!(chars.next(), Some(c) if c.is_ascii_alphanumeric())
            && chars.next().is_none()
    }

    /// Scans a cluster of short options in one token.
    ///
    /// Each character is looked up as the name `-c`. An unknown character is
    /// flagged and the scan continues with the next one. An option that
    /// accepts an argument may absorb the rest of the token when joint
    /// arguments are allowed; an option requiring an argument at the end of
    /// the token is left open for the next token to fill.
    fn scan_cluster(&self, state: &mut ScanState<'_>, token: &str) {
        let table = state.table();
        let body = &token[1..];
        for (index, c) in body.char_indices() {
            let name = format!("-{c}");
            let Some(spec) = table.lookup(&name) else {
                state.record_error(SyntaxError::UnknownOption(name));
                continue;
            };

            let remainder = &body[index + c.len_utf8()..];
            if !remainder.is_empty()
                && self.joint_arguments
                && spec.argument_policy().accepts_argument()
            {
                state.record(&name, Some(remainder.to_owned()));
                return;
            }
            if remainder.is_empty() && spec.argument_policy().requires_argument() {
                state.open(name, spec);
                return;
            }

            state.record(&name, None);
            if spec.argument_policy().requires_argument() {
                // Mid-cluster, with no joint argument available to it.
                state.record_error(SyntaxError::ArgumentRequired(name));
            }
        }
    }
}

impl Default for PosixSyntax {
    fn default() -> Self {
        Self::new()
    }
}

impl Syntax for PosixSyntax {
    fn validate(&self, spec: &OptionSpec) -> Result<(), RegisterError> {
        for name in spec.names() {
            if !Self::is_valid_name(name) {
                return Err(RegisterError::InvalidName(name.clone()));
            }
        }
        if spec.argument_policy() == ArgumentPolicy::Optional && !self.optional_arguments {
            return Err(RegisterError::UnsupportedOption(
                spec.primary_name().to_owned(),
            ));
        }
        Ok(())
    }

    fn looks_like_option(&self, token: &str) -> bool {
        let mut chars = token.chars();
        chars.next() == Some('-') && chars.next().is_some()
    }

    fn scan_option(&self, state: &mut ScanState<'_>, token: &str) {
        if !state.operands().is_empty() && !self.late_options {
            state.record_error(SyntaxError::LateOption(token.to_owned()));
        }
        self.scan_cluster(state, token);
    }

    fn late_options_allowed(&self) -> bool {
        self.late_options
    }
}
