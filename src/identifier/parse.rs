//! This module contains the parser from decoded type identifiers into their
//! structural representation.

use crate::{
    constant::{CONTRACT_HEAD, ENUM_HEAD, RETURNS_MARKER, STRUCT_HEAD},
    error::identifier::{Error, Result},
    identifier::codec,
};

/// The decoded structure of a type identifier.
///
/// An identifier such as `t_mapping(t_address,t_uint256)` has the head
/// `t_mapping` and the two arguments `t_address` and `t_uint256`. Function
/// types additionally carry the types after their `returns` marker in `rets`.
///
/// The parenthesised part of struct, enum and contract identifiers is the name
/// of the type rather than a list of type identifiers, so these have no
/// arguments.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ParsedTypeId {
    /// The normalized identifier of the type, usable as a key into a layout's
    /// types.
    pub id: String,

    /// The category tag of the type, such as `t_struct` or `t_uint256`.
    pub head: String,

    /// The type arguments, if the identifier has a parenthesised argument
    /// list.
    pub args: Option<Vec<ParsedTypeId>>,

    /// The return types of a function type identifier.
    pub rets: Option<Vec<ParsedTypeId>>,
}

impl ParsedTypeId {
    /// Gets the stabilized form of this identifier, with the embedded AST ids
    /// removed.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if the identifier cannot be decoded.
    pub fn stable_id(&self) -> Result<String> {
        codec::stabilize(&self.id)
    }

    /// Checks whether the type is a user-defined type whose identifier embeds
    /// a name rather than type arguments.
    #[must_use]
    pub fn is_named(&self) -> bool {
        is_named_head(&self.head)
    }
}

/// Parses the provided `raw` type identifier, which may be escaped or already
/// decoded.
///
/// The identifier is normalized before parsing, so the `id` of the result and
/// of all of its arguments are the keys used in a layout's types.
///
/// # Errors
///
/// Returns [`Err`] if the identifier cannot be decoded or its parentheses do
/// not balance.
pub fn parse(raw: &str) -> Result<ParsedTypeId> {
    let text = codec::normalize(raw)?;
    let mut parser = Parser::new(&text);
    let parsed = parser.type_id()?;

    if parser.position < text.len() {
        return Err(Error::TrailingInput {
            identifier: text.clone(),
            trailing:   text[parser.position..].to_string(),
        });
    }

    Ok(parsed)
}

/// Checks whether `head` is the head of a type that embeds a name in its
/// parentheses.
fn is_named_head(head: &str) -> bool {
    [STRUCT_HEAD, ENUM_HEAD, CONTRACT_HEAD].contains(&head)
}

/// A recursive-descent parser over a decoded type identifier.
struct Parser<'a> {
    text:     &'a str,
    position: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        let position = 0;
        Self { text, position }
    }

    /// Parses a single type identifier starting at the current position.
    fn type_id(&mut self) -> Result<ParsedTypeId> {
        let start = self.position;
        let head = self.take_until_delimiter().to_string();
        let mut args = None;
        let mut rets = None;

        if self.eat('(') {
            if is_named_head(&head) {
                self.skip_balanced()?;
            } else {
                args = Some(self.list()?);
            }

            if self.rest().starts_with(RETURNS_MARKER) {
                self.position += RETURNS_MARKER.len();
                if !self.eat('(') {
                    return Err(self.unbalanced());
                }
                rets = Some(self.list()?);
            } else {
                self.take_until_delimiter();
            }
        }

        let id = self.text[start..self.position].to_string();
        Ok(ParsedTypeId {
            id,
            head,
            args,
            rets,
        })
    }

    /// Parses a comma-separated list of type identifiers up to and including
    /// the closing parenthesis, assuming that the opening one has been
    /// consumed.
    fn list(&mut self) -> Result<Vec<ParsedTypeId>> {
        let mut items = Vec::new();
        if self.eat(')') {
            return Ok(items);
        }

        loop {
            items.push(self.type_id()?);
            if self.eat(',') {
                continue;
            }
            if self.eat(')') {
                return Ok(items);
            }
            return Err(self.unbalanced());
        }
    }

    /// Skips input up to and including the parenthesis that closes the one
    /// already consumed.
    fn skip_balanced(&mut self) -> Result<()> {
        let mut depth = 1usize;
        for (offset, char) in self.rest().char_indices() {
            match char {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        self.position += offset + 1;
                        return Ok(());
                    }
                }
                _ => (),
            }
        }
        Err(self.unbalanced())
    }

    /// Consumes input until the next parenthesis or comma, returning it.
    fn take_until_delimiter(&mut self) -> &'a str {
        let rest = self.rest();
        let length = rest.find(['(', ')', ',']).unwrap_or(rest.len());
        self.position += length;
        &rest[..length]
    }

    /// Consumes `expected` if it is the next character.
    fn eat(&mut self, expected: char) -> bool {
        if self.rest().starts_with(expected) {
            self.position += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.position..]
    }

    fn unbalanced(&self) -> Error {
        Error::UnbalancedParentheses {
            identifier: self.text.to_string(),
        }
    }
}
