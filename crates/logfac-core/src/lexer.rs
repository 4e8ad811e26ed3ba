//! Lexer: splits configuration text into [`Token`]s.
//!
//! Tokens are separated by whitespace. A token starting with `"` or `'` is a
//! quoted string running to the next unescaped occurrence of the same quote;
//! inside it a backslash introduces a C-style escape (`\n`, `\x41`, ...).
//! Anything else is a bare token kept verbatim. Only bare tokens can act as
//! keywords, which is how values such as `"file"` stay plain strings.
//!
//! Unquoted tokens and quoted tokens without escapes borrow from the input.
//! Escapes are decoded into an owned buffer reserved once at the length of
//! the quoted slice, which decoding can never exceed.

use crate::error::{LexError, Result};
use std::borrow::Cow;

/// One lexed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    text: Cow<'a, [u8]>,
    quoted: bool,
    offset: usize,
}

impl<'a> Token<'a> {
    /// Decoded token bytes, without surrounding quotes.
    pub fn text(&self) -> &[u8] {
        &self.text
    }

    /// Whether the token was written as a quoted string.
    pub fn quoted(&self) -> bool {
        self.quoted
    }

    /// Byte offset of the token's first character (the opening quote for
    /// quoted tokens) in the input.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// True if this is the bare keyword `keyword`.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        !self.quoted && self.text.as_ref() == keyword.as_bytes()
    }

    /// Token bytes for display, with invalid UTF-8 replaced.
    pub fn text_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.text)
    }

    /// Take the decoded bytes. A decoded buffer is handed over with its
    /// allocation as-is, which is at most the quoted slice's length; borrowed
    /// text is copied.
    pub fn into_bytes(self) -> Vec<u8> {
        self.text.into_owned()
    }
}

/// Whitespace as classified by C `isspace` in the "C" locale. Unlike
/// [`u8::is_ascii_whitespace`] this includes vertical tab.
pub fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r')
}

/// Split `input` into tokens, front to back.
pub fn tokenize(input: &[u8]) -> Result<Vec<Token<'_>>> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    loop {
        while pos < input.len() && is_space(input[pos]) {
            pos += 1;
        }
        if pos == input.len() {
            break;
        }

        let token = match input[pos] {
            quote @ (b'"' | b'\'') => {
                let (token, next) = lex_quoted(input, pos, quote)?;
                pos = next;
                token
            }
            _ => {
                let start = pos;
                while pos < input.len() && !is_space(input[pos]) {
                    pos += 1;
                }
                Token {
                    text: Cow::Borrowed(&input[start..pos]),
                    quoted: false,
                    offset: start,
                }
            }
        };

        tracing::trace!(
            offset = token.offset,
            quoted = token.quoted,
            text = %token.text_lossy(),
            "token"
        );
        tokens.try_reserve(1)?;
        tokens.push(token);
    }

    Ok(tokens)
}

/// Lex a quoted string whose opening quote sits at `start`. Returns the token
/// and the position just past the closing quote.
fn lex_quoted(input: &[u8], start: usize, quote: u8) -> Result<(Token<'_>, usize)> {
    let body = start + 1;
    let mut pos = body;
    let mut decoded: Option<Vec<u8>> = None;

    loop {
        let Some(&byte) = input.get(pos) else {
            return Err(LexError::UnterminatedString.into());
        };

        if byte == quote {
            let text = match decoded {
                Some(buf) => Cow::Owned(buf),
                None => Cow::Borrowed(&input[body..pos]),
            };
            pos += 1;
            if input.get(pos).is_some_and(|&next| !is_space(next)) {
                return Err(LexError::TrailingGarbage.into());
            }
            let token = Token {
                text,
                quoted: true,
                offset: start,
            };
            return Ok((token, pos));
        }

        if byte == b'\\' {
            if decoded.is_none() {
                let mut buf = Vec::new();
                buf.try_reserve_exact(quoted_len(input, body, quote))?;
                buf.extend_from_slice(&input[body..pos]);
                decoded = Some(buf);
            }
            let (unescaped, next) = unescape(input, pos + 1)?;
            if let Some(buf) = decoded.as_mut() {
                buf.push(unescaped);
            }
            pos = next;
        } else {
            if let Some(buf) = decoded.as_mut() {
                buf.push(byte);
            }
            pos += 1;
        }
    }
}

/// Length of the quoted slice starting at `body`, up to the closing quote or
/// the end of input. Bytes after a backslash never close the string.
fn quoted_len(input: &[u8], body: usize, quote: u8) -> usize {
    let mut pos = body;
    while let Some(&byte) = input.get(pos) {
        match byte {
            b'\\' => pos += 2,
            _ if byte == quote => return pos - body,
            _ => pos += 1,
        }
    }
    input.len() - body
}

/// Decode the escape whose first character (after the backslash) is at `pos`.
fn unescape(input: &[u8], pos: usize) -> Result<(u8, usize)> {
    let Some(&escape) = input.get(pos) else {
        return Err(LexError::UnterminatedString.into());
    };
    let byte = match escape {
        b'a' => 0x07,
        b'b' => 0x08,
        b'f' => 0x0c,
        b'n' => b'\n',
        b'r' => b'\r',
        b't' => b'\t',
        b'v' => 0x0b,
        b'x' => {
            let high = hex_digit(input.get(pos + 1))?;
            let low = hex_digit(input.get(pos + 2))?;
            return Ok(((high << 4) | low, pos + 3));
        }
        // `\\`, `\?`, `\"`, `\'` and unknown escapes all copy the character.
        other => other,
    };
    Ok((byte, pos + 1))
}

fn hex_digit(byte: Option<&u8>) -> Result<u8> {
    let Some(&byte) = byte else {
        return Err(LexError::UnterminatedString.into());
    };
    match byte {
        b'0'..=b'9' => Ok(byte - b'0'),
        b'a'..=b'f' => Ok(byte - b'a' + 10),
        b'A'..=b'F' => Ok(byte - b'A' + 10),
        _ => Err(LexError::InvalidHexEscape.into()),
    }
}
