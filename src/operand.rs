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

//! Operand patterns and operand-to-slot assignment
//!
//! An [`OperandPattern`] describes how many operands a command accepts and
//! which named slot each of them fills. The pattern language supports slot
//! names, parenthesized groups, optional groups in brackets, alternation with
//! `|`, and one-or-more repetition with a `...` suffix:
//!
//! ```text
//! SOURCE... DEST
//! [SECTION] PAGE
//! (KEY VALUE)...
//! ```
//!
//! [`OperandPattern::compile`] rejects patterns that are *ambiguous*, that is,
//! patterns for which some number of operands could be distributed over the
//! slots in more than one way. A compiled pattern therefore maps every
//! matching operand count to exactly one assignment, so
//! [`match_operands`](OperandPattern::match_operands) never has to guess.

use itertools::Itertools;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use thiserror::Error;

mod parse;

use parse::{Alternation, Element};

/// Error in compiling an operand pattern
///
/// Like [`RegisterError`](crate::option::RegisterError), these indicate a
/// mistake in the parser's setup, not in the command line being parsed.
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
#[non_exhaustive]
pub enum PatternError {
    /// A `(`, `)`, `[`, or `]` is not properly paired.
    #[error("unbalanced group delimiter in pattern")]
    UnbalancedGroup,

    /// The pattern contains a character with no meaning in the grammar.
    #[error("unexpected character {0:?} in pattern")]
    UnexpectedCharacter(char),

    /// A `...` is not preceded by an element to repeat.
    #[error("repetition marker without a preceding element")]
    DanglingRepetition,

    /// Some operand count can be distributed over the slots in more than one
    /// way.
    #[error(
        "ambiguous pattern: {length} operands may fill \"{}\" as well as \"{}\"",
        first.join(" "),
        second.join(" ")
    )]
    Ambiguous {
        /// Number of operands admitting more than one assignment
        length: usize,
        /// One possible slot sequence for that many operands
        first: Vec<String>,
        /// Another possible slot sequence of the same length
        second: Vec<String>,
    },
}

/// Error in matching operands against a pattern
///
/// The operand count does not match any expansion of the pattern.
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
#[error("{count} operand(s) do not match the expected pattern {pattern:?}")]
pub struct OperandError {
    /// The pattern the operands were matched against
    pub pattern: String,
    /// Number of operands given
    pub count: usize,
}

/// Result of matching operands against a pattern
///
/// Every slot named in the pattern is present, mapped to the operands it
/// received, in command-line order. Slots left unfilled map to an empty list.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct OperandAssignment {
    values: BTreeMap<String, Vec<String>>,
}

impl OperandAssignment {
    /// Returns the operands assigned to the named slot.
    ///
    /// The result is `None` only if the pattern does not name the slot at
    /// all. A slot that merely received no operands yields an empty slice.
    #[must_use]
    pub fn values_of(&self, slot: &str) -> Option<&[String]> {
        self.values.get(slot).map(Vec::as_slice)
    }

    /// Iterates over all slots and their operands, in slot name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.values
            .iter()
            .map(|(slot, values)| (slot.as_str(), values.as_slice()))
    }
}

/// Compiled operand pattern
///
/// See the [module documentation](self) for the pattern language. A pattern
/// is compiled once with [`compile`](Self::compile) and then matched against
/// operand lists any number of times.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OperandPattern {
    pattern: String,
    ast: Alternation,
    slots: Vec<String>,
}

impl OperandPattern {
    /// Compiles a pattern string, rejecting malformed and ambiguous patterns.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let ast = parse::parse(pattern)?;
        check_ambiguity(&ast)?;

        let mut slots = Vec::new();
        collect_slots(&ast, &mut slots);

        Ok(OperandPattern {
            pattern: pattern.to_owned(),
            ast,
            slots,
        })
    }

    /// The original pattern string
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Names of all slots in the pattern, in order of first appearance
    pub fn slot_names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(String::as_str)
    }

    /// Distributes operands over the pattern's slots.
    ///
    /// Because compilation rejected ambiguous patterns, the assignment is
    /// uniquely determined by the operand count. If no expansion of the
    /// pattern has that exact length, the result is an [`OperandError`].
    pub fn match_operands<S: AsRef<str>>(
        &self,
        operands: &[S],
    ) -> Result<OperandAssignment, OperandError> {
        let Some(names) = match_alternation(&self.ast, operands.len()) else {
            return Err(OperandError {
                pattern: self.pattern.clone(),
                count: operands.len(),
            });
        };

        let mut values: BTreeMap<String, Vec<String>> = self
            .slots
            .iter()
            .map(|slot| (slot.clone(), Vec::new()))
            .collect();
        for (name, operand) in names.iter().zip(operands) {
            values
                .entry((*name).to_owned())
                .or_default()
                .push(operand.as_ref().to_owned());
        }
        Ok(OperandAssignment { values })
    }
}

/// Shows the original pattern string.
impl std::fmt::Display for OperandPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.pattern)
    }
}

fn collect_slots(alternation: &Alternation, slots: &mut Vec<String>) {
    for branch in &alternation.branches {
        for element in &branch.elements {
            collect_element_slots(element, slots);
        }
    }
}

fn collect_element_slots(element: &Element, slots: &mut Vec<String>) {
    match element {
        Element::Slot(name) => {
            if !slots.contains(name) {
                slots.push(name.clone());
            }
        }
        Element::Group(inner) | Element::Optional(inner) => collect_slots(inner, slots),
        Element::Repeat(inner) => collect_element_slots(inner, slots),
    }
}

/// Length of the longest expansion with every optional taken and every
/// repetition expanded twice
fn saturated_length(alternation: &Alternation) -> usize {
    alternation
        .branches
        .iter()
        .map(|branch| branch.elements.iter().map(element_saturated_length).sum())
        .max()
        .unwrap_or(0)
}

fn element_saturated_length(element: &Element) -> usize {
    match element {
        Element::Slot(_) => 1,
        Element::Group(inner) | Element::Optional(inner) => saturated_length(inner),
        Element::Repeat(inner) => 2 * element_saturated_length(inner),
    }
}

/// Product of the unit lengths of every repetition in the pattern
///
/// Repetitions whose units differ in length first produce expansions of equal
/// total length at a common multiple of the unit lengths. Any such multiple
/// of any subset of the units divides into this product, so offsetting it by
/// the saturated length covers every first collision.
fn repetition_unit_product(alternation: &Alternation) -> usize {
    alternation
        .branches
        .iter()
        .flat_map(|branch| &branch.elements)
        .map(element_unit_product)
        .product()
}

fn element_unit_product(element: &Element) -> usize {
    match element {
        Element::Slot(_) => 1,
        Element::Group(inner) | Element::Optional(inner) => repetition_unit_product(inner),
        Element::Repeat(inner) => {
            element_saturated_length(inner).max(1) * element_unit_product(inner)
        }
    }
}

fn check_ambiguity(ast: &Alternation) -> Result<(), PatternError> {
    // Expanding each repetition twice exercises the repeated branches; the
    // unit product additionally reaches the smallest length where repetitions
    // of different unit lengths can line up.
    let bound = saturated_length(ast) + repetition_unit_product(ast);
    let expansions = enumerate_alternation(ast, bound);

    // A BTreeSet iterates in lexicographic order, so within each length group
    // the expansions stay sorted and the first two are the canonical pair to
    // report.
    let collision = expansions
        .into_iter()
        .into_group_map_by(Vec::len)
        .into_iter()
        .filter(|(_, group)| group.len() > 1)
        .min_by_key(|&(length, _)| length);

    match collision {
        None => Ok(()),
        Some((length, mut group)) => {
            let second = group.swap_remove(1);
            let first = group.swap_remove(0);
            Err(PatternError::Ambiguous {
                length,
                first,
                second,
            })
        }
    }
}

/// All expansions of the alternation no longer than `bound`
fn enumerate_alternation(alternation: &Alternation, bound: usize) -> BTreeSet<Vec<String>> {
    alternation
        .branches
        .iter()
        .flat_map(|branch| enumerate_sequence(&branch.elements, bound))
        .collect()
}

fn enumerate_sequence(elements: &[Element], bound: usize) -> BTreeSet<Vec<String>> {
    let mut expansions = BTreeSet::from([Vec::new()]);
    for element in elements {
        let suffixes = enumerate_element(element, bound);
        expansions = expansions
            .iter()
            .flat_map(|prefix| {
                suffixes.iter().filter_map(move |suffix| {
                    (prefix.len() + suffix.len() <= bound)
                        .then(|| prefix.iter().chain(suffix).cloned().collect())
                })
            })
            .collect();
    }
    expansions
}

fn enumerate_element(element: &Element, bound: usize) -> BTreeSet<Vec<String>> {
    match element {
        Element::Slot(name) => BTreeSet::from([vec![name.clone()]]),
        Element::Group(inner) => enumerate_alternation(inner, bound),
        Element::Optional(inner) => {
            let mut expansions = enumerate_alternation(inner, bound);
            expansions.insert(Vec::new());
            expansions
        }
        Element::Repeat(inner) => {
            let once = enumerate_element(inner, bound);
            let mut expansions = once.clone();
            loop {
                let longer: Vec<Vec<String>> = expansions
                    .iter()
                    .flat_map(|prefix| {
                        once.iter().filter_map(move |suffix| {
                            (prefix.len() + suffix.len() <= bound)
                                .then(|| prefix.iter().chain(suffix).cloned().collect())
                        })
                    })
                    .collect();
                let before = expansions.len();
                expansions.extend(longer);
                if expansions.len() == before {
                    break;
                }
            }
            expansions
        }
    }
}

/// Finds an expansion of the alternation with exactly `length` slots.
///
/// Compilation guaranteed at most one exists, so the first found is the
/// answer.
fn match_alternation(alternation: &Alternation, length: usize) -> Option<Vec<&str>> {
    alternation
        .branches
        .iter()
        .find_map(|branch| match_sequence(&branch.elements, length))
}

fn match_sequence<'a>(elements: &'a [Element], length: usize) -> Option<Vec<&'a str>> {
    let Some((first, rest)) = elements.split_first() else {
        return (length == 0).then(Vec::new);
    };
    for head_length in 0..=length {
        if let Some(mut head) = match_element(first, head_length) {
            if let Some(tail) = match_sequence(rest, length - head_length) {
                head.extend(tail);
                return Some(head);
            }
        }
    }
    None
}

fn match_element(element: &Element, length: usize) -> Option<Vec<&str>> {
    match element {
        Element::Slot(name) => (length == 1).then(|| vec![name.as_str()]),
        Element::Group(inner) => match_alternation(inner, length),
        Element::Optional(inner) => {
            if length == 0 {
                Some(Vec::new())
            } else {
                match_alternation(inner, length)
            }
        }
        Element::Repeat(inner) => match_repeat(inner, length),
    }
}

fn match_repeat(inner: &Element, length: usize) -> Option<Vec<&str>> {
    // A single copy covering everything, else peel off one nonempty copy and
    // recurse on the remainder.
    if let Some(expansion) = match_element(inner, length) {
        return Some(expansion);
    }
    for head_length in 1..length {
        if let Some(mut head) = match_element(inner, head_length) {
            if let Some(tail) = match_repeat(inner, length - head_length) {
                head.extend(tail);
                return Some(head);
            }
        }
    }
    None
}
