use std::borrow::Cow;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

// @module: HTML character reference decoding (HTML5 rules)

// @const: Character reference, with or without the closing semicolon
static CHARREF_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[0-9]+;?|#[xX][0-9a-fA-F]+;?|[^\t\n\x0C <&#;]{1,32};?)").unwrap()
});

// @const: Named references that HTML5 accepts without a trailing semicolon
const LEGACY_ENTITIES: [&str; 106] = [
    "AElig", "AMP", "Aacute", "Acirc", "Agrave", "Aring", "Atilde", "Auml",
    "COPY", "Ccedil", "ETH", "Eacute", "Ecirc", "Egrave", "Euml", "GT",
    "Iacute", "Icirc", "Igrave", "Iuml", "LT", "Ntilde", "Oacute", "Ocirc",
    "Ograve", "Oslash", "Otilde", "Ouml", "QUOT", "REG", "THORN", "Uacute",
    "Ucirc", "Ugrave", "Uuml", "Yacute", "aacute", "acirc", "acute", "aelig",
    "agrave", "amp", "aring", "atilde", "auml", "brvbar", "ccedil", "cedil",
    "cent", "copy", "curren", "deg", "divide", "eacute", "ecirc", "egrave",
    "eth", "euml", "frac12", "frac14", "frac34", "gt", "iacute", "icirc",
    "iexcl", "igrave", "iquest", "iuml", "laquo", "lt", "macr", "micro",
    "middot", "nbsp", "not", "ntilde", "oacute", "ocirc", "ograve", "ordf",
    "ordm", "oslash", "otilde", "ouml", "para", "plusmn", "pound", "quot",
    "raquo", "reg", "sect", "shy", "sup1", "sup2", "sup3", "szlig",
    "thorn", "times", "uacute", "ucirc", "ugrave", "uml", "uuml", "yacute",
    "yen", "yuml",
];

// @const: Windows-1252 meaning of C1 control references
const C1_REPLACEMENTS: [char; 32] = [
    '\u{20ac}', '\u{81}', '\u{201a}', '\u{192}', '\u{201e}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{2c6}', '\u{2030}', '\u{160}', '\u{2039}', '\u{152}', '\u{8d}', '\u{17d}', '\u{8f}',
    '\u{90}', '\u{2018}', '\u{2019}', '\u{201c}', '\u{201d}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{2dc}', '\u{2122}', '\u{161}', '\u{203a}', '\u{153}', '\u{9d}', '\u{17e}', '\u{178}',
];

/// Decode named and numeric character references the way an HTML5 parser
/// does in text, including legacy forms without a semicolon
/// (`&lt`, `&#39`, `&copy 2020`).
pub fn unescape(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    CHARREF_REGEX.replace_all(text, |caps: &Captures| decode_reference(&caps[1]))
}

fn decode_reference(reference: &str) -> String {
    if let Some(number) = reference.strip_prefix('#') {
        return decode_numeric(number.trim_end_matches(';'));
    }

    if let Some(decoded) = decode_named(reference) {
        return decoded;
    }

    // Longest legacy name that prefixes the reference, rest kept verbatim
    for end in (2..reference.len()).rev() {
        if !reference.is_char_boundary(end) {
            continue;
        }
        let (name, rest) = reference.split_at(end);
        if let Some(decoded) = decode_named(name) {
            return format!("{}{}", decoded, rest);
        }
    }

    format!("&{}", reference)
}

// `name` is either `xxx;` (any HTML5 entity) or a bare legacy name
fn decode_named(name: &str) -> Option<String> {
    let full = match name.strip_suffix(';') {
        Some(_) => format!("&{}", name),
        None if LEGACY_ENTITIES.contains(&name) => format!("&{};", name),
        None => return None,
    };

    let decoded = html_escape::decode_html_entities(&full);
    if decoded == full {
        None
    } else {
        Some(decoded.into_owned())
    }
}

fn decode_numeric(digits: &str) -> String {
    let parsed = match digits.strip_prefix(['x', 'X']) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => digits.parse::<u64>(),
    };
    // Every digit is valid, so a failure means overflow
    let code = parsed.unwrap_or(u64::MAX);

    match code {
        0x00 => '\u{fffd}'.to_string(),
        0x0d => '\r'.to_string(),
        0x80..=0x9f => C1_REPLACEMENTS[(code - 0x80) as usize].to_string(),
        0xd800..=0xdfff => '\u{fffd}'.to_string(),
        _ if code > 0x10ffff => '\u{fffd}'.to_string(),
        _ if is_noncharacter(code) => String::new(),
        _ => char::from_u32(code as u32)
            .map(String::from)
            .unwrap_or_else(|| '\u{fffd}'.to_string()),
    }
}

// Control and noncharacter code points that decode to nothing
fn is_noncharacter(code: u64) -> bool {
    matches!(code, 0x01..=0x08 | 0x0b | 0x0e..=0x1f | 0x7f | 0xfdd0..=0xfdef)
        || (code & 0xfffe) == 0xfffe
}
