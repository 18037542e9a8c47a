//! This module contains the codec for the escaped type-identifier grammar used
//! by the compiler.
//!
//! The compiler writes type identifiers without parentheses or commas, using
//! the escape tokens in [`crate::constant::ESCAPE_TOKENS`] in their place.

use crate::{
    constant::{
        ESCAPE_CLOSE,
        ESCAPE_COMMA,
        ESCAPE_OPEN,
        ESCAPE_TOKENS,
        ID_BEARING_PREFIXES,
        STORAGE_POINTER_SUFFIX,
        STORAGE_SUFFIX,
    },
    error::identifier::{Error, Result},
};

/// Decodes the escaped `raw` type identifier, replacing the escape tokens with
/// the parentheses and commas that they stand for.
///
/// The escape grammar is not prefix-free, so at each position that starts an
/// escape token the decoder tries the tokens in order and only commits to one
/// if what follows it is zero or more further escape tokens followed by either
/// a character that cannot start a token or the end of the input.
///
/// Decoding input that contains no escape tokens returns it unchanged, so
/// decoding is idempotent on already-decoded identifiers.
///
/// # Errors
///
/// Returns [`Err`] if `raw` contains an escape position for which no token has
/// a valid continuation.
pub fn decode(raw: &str) -> Result<String> {
    let bytes = raw.as_bytes();
    let mut decoded = String::with_capacity(raw.len());
    let mut position = 0;

    while position < bytes.len() {
        if !starts_escape(bytes, position) {
            // Escape tokens are pure ASCII, so we only ever stop on char boundaries.
            let next = raw[position..].chars().next().map_or(1, char::len_utf8);
            decoded.push_str(&raw[position..position + next]);
            position += next;
            continue;
        }

        let accepted = ESCAPE_TOKENS.iter().find(|(token, _)| {
            bytes[position..].starts_with(token.as_bytes())
                && continues_validly(bytes, position + token.len())
        });

        match accepted {
            Some((token, replacement)) => {
                decoded.push(*replacement);
                position += token.len();
            }
            None => {
                return Err(Error::MalformedEscape {
                    identifier: raw.to_string(),
                    position,
                })
            }
        }
    }

    Ok(decoded)
}

/// Encodes the provided `decoded` type identifier into the escaped form that
/// the compiler emits.
#[must_use]
pub fn encode(decoded: &str) -> String {
    let mut encoded = String::with_capacity(decoded.len() * 2);
    for char in decoded.chars() {
        match char {
            '(' => encoded.push_str(ESCAPE_OPEN),
            ')' => encoded.push_str(ESCAPE_CLOSE),
            ',' => encoded.push_str(ESCAPE_COMMA),
            c => encoded.push(c),
        }
    }
    encoded
}

/// Decodes `raw` and folds storage pointer locations into storage reference
/// locations, so that both forms of the same declared type compare equal.
///
/// # Errors
///
/// Returns [`Err`] if `raw` cannot be decoded.
pub fn normalize(raw: &str) -> Result<String> {
    let decoded = decode(raw)?;
    Ok(decoded.replace(STORAGE_POINTER_SUFFIX, STORAGE_SUFFIX))
}

/// Decodes `raw` and removes the compiler-assigned AST ids that follow the
/// closing parenthesis of every struct, enum and contract reference.
///
/// The result is safe to compare across compilations, as the embedded ids
/// change whenever the source is reorganised.
///
/// # Errors
///
/// Returns [`Err`] if `raw` cannot be decoded.
pub fn stabilize(raw: &str) -> Result<String> {
    let decoded = decode(raw)?;
    let text = decoded.as_str();
    let mut stable = String::with_capacity(text.len());

    // The depths at which currently-open id-bearing references were opened.
    let mut open_references: Vec<usize> = Vec::new();
    let mut depth = 0usize;
    let mut position = 0;

    while position < text.len() {
        let rest = &text[position..];

        if let Some(prefix) = ID_BEARING_PREFIXES.iter().find(|p| rest.starts_with(*p)) {
            open_references.push(depth);
            depth += 1;
            stable.push_str(prefix);
            position += prefix.len();
            continue;
        }

        let Some(char) = rest.chars().next() else {
            break;
        };
        stable.push(char);
        position += char.len_utf8();

        match char {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if open_references.last() == Some(&depth) {
                    open_references.pop();
                    position += embedded_id_length(&text[position..]);
                }
            }
            _ => (),
        }
    }

    Ok(stable)
}

/// Checks whether an escape token could start at `position` in `bytes`.
fn starts_escape(bytes: &[u8], position: usize) -> bool {
    match bytes[position] {
        b'$' => true,
        b'_' => bytes.get(position + 1) == Some(&b'$'),
        _ => false,
    }
}

/// Checks whether the input from `position` consists of zero or more escape
/// tokens followed by either the end of input or a character that is neither
/// `_` nor `$`.
fn continues_validly(bytes: &[u8], position: usize) -> bool {
    match bytes.get(position) {
        None => true,
        Some(b'_' | b'$') => ESCAPE_TOKENS.iter().any(|(token, _)| {
            bytes[position..].starts_with(token.as_bytes())
                && continues_validly(bytes, position + token.len())
        }),
        Some(_) => true,
    }
}

/// Gets the length of the embedded id at the start of `text`, being a run of
/// one or more digits optionally followed by a single underscore.
fn embedded_id_length(text: &str) -> usize {
    let digits = text.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return 0;
    }

    if text.as_bytes().get(digits) == Some(&b'_') {
        digits + 1
    } else {
        digits
    }
}
