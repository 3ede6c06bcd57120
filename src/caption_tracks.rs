/*!
 * Caption track selection and sources.
 *
 * A caption source offers one track per site caption code, e.g. `en` for an
 * uploaded English track or `a.en` for the auto-generated one. The track to
 * convert is the first code of a preference list that the source offers.
 */

use async_trait::async_trait;
use std::fmt::{self, Debug};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use anyhow::{Result, anyhow};
use log::debug;

use crate::errors::TrackError;

// @const: Prefix marking auto-generated tracks
const AUTO_GENERATED_PREFIX: &str = "a.";

// @const: Extension of track files in a directory source
const TRACK_EXTENSION: &str = "xml";

/// Default preference order: uploaded English, then auto-generated English
pub const DEFAULT_PREFERENCES: [&str; 2] = ["en", "a.en"];

/// A site caption code split into language and origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionCode {
    /// Language code as given by the site
    pub language: String,
    /// Whether the track was generated by speech recognition
    pub auto_generated: bool,
}

impl fmt::Display for CaptionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.auto_generated {
            write!(f, "{}{}", AUTO_GENERATED_PREFIX, self.language)
        } else {
            write!(f, "{}", self.language)
        }
    }
}

impl FromStr for CaptionCode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim();
        let (language, auto_generated) = match code.strip_prefix(AUTO_GENERATED_PREFIX) {
            Some(rest) => (rest, true),
            None => (code, false),
        };

        if language.is_empty() {
            return Err(anyhow!("Empty caption code: '{}'", s));
        }

        Ok(Self {
            language: language.to_string(),
            auto_generated,
        })
    }
}

/// Pick the first preferred code that is available.
///
/// Returns `TrackError::Unavailable` when nothing matches; an empty key is
/// never looked up.
pub fn select_track(available: &[String], preferences: &[String]) -> Result<String, TrackError> {
    preferences
        .iter()
        .filter(|code| !code.trim().is_empty())
        .find(|code| available.iter().any(|a| a == *code))
        .cloned()
        .ok_or_else(|| TrackError::Unavailable {
            requested: preferences.to_vec(),
            available: available.to_vec(),
        })
}

/// Provider of raw timed-text XML caption tracks
#[async_trait]
pub trait CaptionSource: Send + Sync + Debug {
    /// List the caption codes this source offers
    async fn available_codes(&self) -> Result<Vec<String>, TrackError>;

    /// Fetch the raw XML of one track
    async fn xml_captions(&self, code: &str) -> Result<String, TrackError>;
}

/// Caption source backed by a directory of `<code>.xml` files
#[derive(Debug, Clone)]
pub struct DirectoryCaptionSource {
    dir: PathBuf,
}

impl DirectoryCaptionSource {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn track_path(&self, code: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", code, TRACK_EXTENSION))
    }
}

#[async_trait]
impl CaptionSource for DirectoryCaptionSource {
    async fn available_codes(&self) -> Result<Vec<String>, TrackError> {
        let mut codes = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_track = path
                .extension()
                .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(TRACK_EXTENSION));
            if !is_track || !path.is_file() {
                continue;
            }
            if let Some(stem) = path.file_stem() {
                codes.push(stem.to_string_lossy().to_string());
            }
        }

        codes.sort();
        debug!("Found {} caption track(s) in {:?}: {}", codes.len(), self.dir, codes.join(", "));
        Ok(codes)
    }

    async fn xml_captions(&self, code: &str) -> Result<String, TrackError> {
        let path = self.track_path(code);
        if !path.is_file() {
            return Err(TrackError::NotFound(code.to_string()));
        }
        Ok(tokio::fs::read_to_string(&path).await?)
    }
}
