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

//! Option declarations and the name dictionary
//!
//! An [`OptionSpec`] declares a single command-line option: its names, whether
//! it is required or repeatable, and its [`ArgumentPolicy`]. An [`OptionTable`]
//! collects the specs declared for a parser and maps every name, primary or
//! alias, to its owning spec. The table also answers the prefix queries that
//! back long-option abbreviation.
//!
//! Both types are set up once before parsing begins and are read-only
//! afterwards, so a populated table can be shared between concurrent parses.

use std::collections::BTreeMap;
use std::ops::Bound;
use thiserror::Error;

/// Whether and how an option takes an argument
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum ArgumentPolicy {
    /// The option does not take an argument. (default)
    #[default]
    None,
    /// The option may take an argument.
    Optional,
    /// The option requires an argument.
    Required,
}

impl ArgumentPolicy {
    /// Whether an argument may accompany the option
    #[must_use]
    pub const fn accepts_argument(self) -> bool {
        !matches!(self, ArgumentPolicy::None)
    }

    /// Whether an argument must accompany the option
    #[must_use]
    pub const fn requires_argument(self) -> bool {
        matches!(self, ArgumentPolicy::Required)
    }
}

/// Declaration of a single command-line option
///
/// A spec names the option, possibly under several aliases, and fixes its
/// contract: whether it must occur at least once, whether it may occur more
/// than once, and whether it takes an argument. Names are stored as they are
/// typed on the command line, including the leading hyphens (`"-a"`,
/// `"--all"`).
///
/// Specs are built in a chained style:
///
/// ```
/// use argsyn::{ArgumentPolicy, OptionSpec};
/// let spec = OptionSpec::new("-o")
///     .alias("--output")
///     .required()
///     .argument(ArgumentPolicy::Required);
/// assert_eq!(spec.primary_name(), "-o");
/// assert_eq!(spec.names(), ["-o", "--output"]);
/// ```
///
/// Which name shapes are acceptable is decided by the syntax the spec is
/// registered with, not by this type. See [`Syntax::validate`].
///
/// [`Syntax::validate`]: crate::syntax::Syntax::validate
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct OptionSpec {
    names: Vec<String>,
    required: bool,
    repeatable: bool,
    argument: ArgumentPolicy,
}

impl OptionSpec {
    /// Creates a spec with the given primary name.
    pub fn new<N: Into<String>>(primary_name: N) -> Self {
        OptionSpec {
            names: vec![primary_name.into()],
            required: false,
            repeatable: false,
            argument: ArgumentPolicy::None,
        }
    }

    /// Adds another name for the option.
    ///
    /// A name the spec already carries is ignored.
    #[must_use]
    pub fn alias<N: Into<String>>(mut self, name: N) -> Self {
        let name = name.into();
        if !self.names.contains(&name) {
            self.names.push(name);
        }
        self
    }

    /// Declares that the option must occur at least once.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Declares that the option may occur more than once.
    #[must_use]
    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    /// Specifies whether the option takes an argument.
    #[must_use]
    pub fn argument(mut self, argument: ArgumentPolicy) -> Self {
        self.argument = argument;
        self
    }

    /// The first declared name, used as the canonical name in results and
    /// diagnostics
    #[must_use]
    pub fn primary_name(&self) -> &str {
        &self.names[0]
    }

    /// All names in declaration order
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Whether the option must occur at least once
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Whether the option may occur more than once
    #[must_use]
    pub const fn is_repeatable(&self) -> bool {
        self.repeatable
    }

    /// The option's argument policy
    #[must_use]
    pub const fn argument_policy(&self) -> ArgumentPolicy {
        self.argument
    }
}

/// Shows all names of the option like `-o/--output`.
impl std::fmt::Display for OptionSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names = self.names.iter();
        if let Some(first) = names.next() {
            f.write_str(first)?;
        }
        for name in names {
            write!(f, "/{name}")?;
        }
        Ok(())
    }
}

/// Error in declaring an option
///
/// These are programmer mistakes detected while a parser is being set up.
/// They are raised synchronously at the declaring call, unlike the
/// [`SyntaxError`](crate::syntax::SyntaxError)s collected during parsing.
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
#[non_exhaustive]
pub enum RegisterError {
    /// A name is already taken by a previously registered option.
    #[error("duplicate option name {0:?}")]
    DuplicateName(String),

    /// A name does not fit the shape the syntax recognizes.
    #[error("invalid option name {0:?}")]
    InvalidName(String),

    /// The option declares an optional argument while the syntax
    /// configuration does not allow optional arguments.
    #[error("option {0:?} may not take an optional argument")]
    UnsupportedOption(String),
}

/// Dictionary of declared options
///
/// The table maps every name of every registered [`OptionSpec`] to the spec
/// that owns it, and rejects registrations that would make the mapping
/// non-injective. It answers exact lookups for scanning and ordered prefix
/// scans for long-option abbreviation, both against the same set of keys.
#[derive(Clone, Debug, Default)]
pub struct OptionTable {
    specs: Vec<OptionSpec>,
    names: BTreeMap<String, usize>,
}

impl OptionTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a spec under all of its names.
    ///
    /// If any of the names is already taken, the whole registration fails
    /// with [`RegisterError::DuplicateName`] and the table is left unchanged.
    pub fn register(&mut self, spec: OptionSpec) -> Result<(), RegisterError> {
        for name in spec.names() {
            if self.names.contains_key(name) {
                return Err(RegisterError::DuplicateName(name.clone()));
            }
        }
        let index = self.specs.len();
        for name in spec.names() {
            self.names.insert(name.clone(), index);
        }
        self.specs.push(spec);
        Ok(())
    }

    /// Finds the spec owning the given name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&OptionSpec> {
        self.names.get(name).map(|&index| &self.specs[index])
    }

    /// Resolves any name, primary or alias, to the owning spec's primary
    /// name.
    #[must_use]
    pub fn canonical_name(&self, name: &str) -> Option<&str> {
        self.lookup(name).map(OptionSpec::primary_name)
    }

    /// Registered specs in registration order
    #[must_use]
    pub fn specs(&self) -> &[OptionSpec] {
        &self.specs
    }

    /// All registered names starting with the given prefix, paired with their
    /// owning specs, in name order
    #[must_use]
    pub fn prefix_matches(&self, prefix: &str) -> Vec<(&str, &OptionSpec)> {
        self.names
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|(name, _)| name.starts_with(prefix))
            .map(|(name, &index)| (name.as_str(), &self.specs[index]))
            .collect()
    }
}
