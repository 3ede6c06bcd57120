//! Language utilities for caption codes
//!
//! Caption preferences name languages with ISO 639-1 (2-letter) or
//! ISO 639-2 (3-letter) codes, optionally prefixed with `a.` for
//! auto-generated tracks.

use anyhow::{Result, anyhow};
use isolang::Language;

use crate::caption_tracks::CaptionCode;

// @const: ISO 639-2/B codes that differ from their 639-2/T form
const PART2B_TO_PART2T: [(&str, &str); 18] = [
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

/// Resolve a 2- or 3-letter code to its language
pub fn resolve_language(code: &str) -> Result<Language> {
    let normalized_code = code.trim().to_lowercase();

    let language = match normalized_code.len() {
        2 => Language::from_639_1(&normalized_code),
        3 => {
            let part2t = PART2B_TO_PART2T
                .iter()
                .find(|(bibliographic, _)| *bibliographic == normalized_code)
                .map(|(_, terminologic)| *terminologic)
                .unwrap_or(normalized_code.as_str());
            Language::from_639_3(part2t)
        }
        _ => None,
    };

    language.ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// Primary subtag of a regional code, `pt` for `pt-BR`
pub fn primary_subtag(code: &str) -> &str {
    code.split('-').next().unwrap_or(code)
}

/// Validate a caption code such as `en`, `deu`, `a.en` or `pt-BR`.
///
/// Only the primary subtag must be an ISO code; region suffixes are kept as given.
pub fn validate_caption_code(code: &str) -> Result<CaptionCode> {
    let caption_code: CaptionCode = code.parse()?;
    resolve_language(primary_subtag(&caption_code.language))?;
    Ok(caption_code)
}

/// Human readable name of a caption code, e.g. "English (auto-generated)"
pub fn caption_language_name(code: &str) -> Result<String> {
    let caption_code = validate_caption_code(code)?;
    let name = resolve_language(primary_subtag(&caption_code.language))?.to_name();

    if caption_code.auto_generated {
        Ok(format!("{} (auto-generated)", name))
    } else {
        Ok(name.to_string())
    }
}
