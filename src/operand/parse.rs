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

//! Parser for the operand pattern mini-language
//!
//! The grammar is a sequence of whitespace-separated elements: slot names
//! (`[A-Za-z0-9-]+`), groups `(...)`, optional groups `[...]`, and alternation
//! `|` between sibling sequences. A `...` suffix repeats the preceding
//! element one or more times.

use super::PatternError;
use std::iter::Peekable;
use std::str::Chars;

/// One element of a pattern sequence
#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) enum Element {
    /// Named slot consuming exactly one operand
    Slot(String),
    /// Parenthesized group
    Group(Alternation),
    /// Optional group, also accepting nothing
    Optional(Alternation),
    /// One-or-more repetition of an element
    Repeat(Box<Element>),
}

/// Consecutive elements, all of which must match in order
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(super) struct Sequence {
    pub elements: Vec<Element>,
}

/// Alternative sequences, exactly one of which must match
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(super) struct Alternation {
    pub branches: Vec<Sequence>,
}

fn is_slot_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

struct PatternParser<'a> {
    chars: Peekable<Chars<'a>>,
}

impl PatternParser<'_> {
    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|c| c.is_whitespace()).is_some() {}
    }

    fn alternation(&mut self) -> Result<Alternation, PatternError> {
        let mut branches = vec![self.sequence()?];
        while self.chars.next_if_eq(&'|').is_some() {
            branches.push(self.sequence()?);
        }
        Ok(Alternation { branches })
    }

    fn sequence(&mut self) -> Result<Sequence, PatternError> {
        let mut elements = Vec::new();
        loop {
            self.skip_whitespace();
            match self.chars.peek() {
                None | Some(')' | ']' | '|') => break,
                Some('(') => {
                    self.chars.next();
                    let inner = self.alternation()?;
                    if self.chars.next_if_eq(&')').is_none() {
                        return Err(PatternError::UnbalancedGroup);
                    }
                    elements.push(Element::Group(inner));
                }
                Some('[') => {
                    self.chars.next();
                    let inner = self.alternation()?;
                    if self.chars.next_if_eq(&']').is_none() {
                        return Err(PatternError::UnbalancedGroup);
                    }
                    elements.push(Element::Optional(inner));
                }
                Some('.') => {
                    self.ellipsis()?;
                    let Some(last) = elements.pop() else {
                        return Err(PatternError::DanglingRepetition);
                    };
                    elements.push(Element::Repeat(Box::new(last)));
                }
                Some(&c) if is_slot_char(c) => {
                    let mut name = String::new();
                    while let Some(c) = self.chars.next_if(|&c| is_slot_char(c)) {
                        name.push(c);
                    }
                    elements.push(Element::Slot(name));
                }
                Some(&c) => return Err(PatternError::UnexpectedCharacter(c)),
            }
        }
        Ok(Sequence { elements })
    }

    fn ellipsis(&mut self) -> Result<(), PatternError> {
        for _ in 0..3 {
            if self.chars.next_if_eq(&'.').is_none() {
                return Err(PatternError::UnexpectedCharacter('.'));
            }
        }
        Ok(())
    }
}

/// Parses a whole pattern string.
pub(super) fn parse(pattern: &str) -> Result<Alternation, PatternError> {
    let mut parser = PatternParser {
        chars: pattern.chars().peekable(),
    };
    let alternation = parser.alternation()?;
    match parser.chars.next() {
        None => Ok(alternation),
        Some(')' | ']') => Err(PatternError::UnbalancedGroup),
        Some(c) => Err(PatternError::UnexpectedCharacter(c)),
    }
}
