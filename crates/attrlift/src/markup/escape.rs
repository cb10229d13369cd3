//! Entity decoding and reserved-character escaping

use std::borrow::Cow;

use crate::error::{Error, ErrorKind, Result, Span};
use crate::markup::model::Quote;

/// Escape an attribute value for the given quote style
///
/// `&`, `<`, the active quote character and the whitespace a reader would
/// normalize to a space (`\t`, `\n`, `\r`) are replaced; everything else is kept.
pub fn escape_attribute(value: &str, quote: Quote) -> Cow<'_, str> {
    let quote_char = quote.as_char();
    escape_with(value, |ch| match ch {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '"' if quote_char == '"' => Some("&quot;"),
        '\'' if quote_char == '\'' => Some("&apos;"),
        '\t' => Some("&#9;"),
        '\n' => Some("&#10;"),
        '\r' => Some("&#13;"),
        _ => None,
    })
}

/// Escape character data between tags
pub fn escape_text(text: &str) -> Cow<'_, str> {
    escape_with(text, |ch| match ch {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        _ => None,
    })
}

fn escape_with(input: &str, replace: impl Fn(char) -> Option<&'static str>) -> Cow<'_, str> {
    if !input.chars().any(|ch| replace(ch).is_some()) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + 8);
    for ch in input.chars() {
        match replace(ch) {
            Some(entity) => out.push_str(entity),
            None => out.push(ch),
        }
    }
    Cow::Owned(out)
}

/// Replace predefined and numeric character references with the characters they name
pub fn decode_entities(input: &str) -> Result<String> {
    if !input.contains('&') {
        return Ok(input.to_string());
    }

    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch != '&' {
            result.push(ch);
            continue;
        }

        let mut entity = String::new();
        let mut terminated = false;
        for next in chars.by_ref() {
            if next == ';' {
                terminated = true;
                break;
            }
            entity.push(next);
        }

        let decoded = match entity.as_str() {
            _ if !terminated => None,
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => decode_numeric_entity(&entity),
        };

        match decoded {
            Some(ch) => result.push(ch),
            None => {
                return Err(Error::new(ErrorKind::InvalidEntity { entity }, Span::empty()));
            }
        }
    }

    Ok(result)
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        None
    }
}
