use anyhow::{Result, Context, anyhow};
use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::caption_converter;
use crate::caption_tracks::{self, CaptionSource};
use crate::file_utils::FileManager;
use crate::language_utils;

// @module: Application controller for caption conversion

// @const: Extension of timed-text caption files
const CAPTION_EXTENSION: &str = "xml";

/// What happened to one requested conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// The subtitle file was written at this path
    Written(PathBuf),
    /// An existing file at this path was left alone
    Skipped(PathBuf),
}

impl ConversionOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Written(path) | Self::Skipped(path) => path,
        }
    }
}

/// Main application controller for caption conversion
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    /// Convert one timed-text XML file into `<output_dir>/<title>.srt`.
    ///
    /// The title defaults to the file stem.
    pub async fn convert_file(&self, xml_path: &Path, title: Option<&str>, force_overwrite: bool) -> Result<ConversionOutcome> {
        if !FileManager::file_exists(xml_path) {
            return Err(anyhow!("Caption file does not exist: {:?}", xml_path));
        }

        let title = match title {
            Some(title) => title.to_string(),
            None => xml_path
                .file_stem()
                .map(|stem| stem.to_string_lossy().to_string())
                .ok_or_else(|| anyhow!("Cannot derive a title from {:?}", xml_path))?,
        };

        let xml = FileManager::read_to_string(xml_path)?;
        self.write_subtitles(&xml, &title, force_overwrite)
            .with_context(|| format!("Failed to convert captions from {:?}", xml_path))
    }

    /// Pick a track from `source` by the configured preferences and save it
    pub async fn save_caption(&self, source: &dyn CaptionSource, title: &str, force_overwrite: bool) -> Result<ConversionOutcome> {
        let available = source.available_codes().await?;
        let code = match caption_tracks::select_track(&available, &self.config.caption_preferences) {
            Ok(code) => code,
            Err(e) => {
                warn!("Could not find an acceptable caption track for '{}'", title);
                return Err(e.into());
            }
        };

        debug!(
            "Selected caption track '{}' ({})",
            code,
            language_utils::caption_language_name(&code).unwrap_or_else(|_| "unknown language".to_string())
        );

        let xml = source.xml_captions(&code).await?;
        self.write_subtitles(&xml, title, force_overwrite)
            .with_context(|| format!("Failed to convert caption track '{}'", code))
    }

    /// Convert every `.xml` file below `input_dir`.
    ///
    /// Output names come from the path relative to `input_dir`, so
    /// `a/en.xml` becomes `a_en.srt`. A file that fails is logged and the
    /// batch continues. Returns the number of subtitle files written.
    pub async fn convert_folder(&self, input_dir: &Path, force_overwrite: bool) -> Result<usize> {
        if !input_dir.is_dir() {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let caption_files = FileManager::find_files(input_dir, CAPTION_EXTENSION)?;
        if caption_files.is_empty() {
            return Err(anyhow!("No caption files found in directory: {:?}", input_dir));
        }

        info!("Converting {} caption file(s) from {:?}", caption_files.len(), input_dir);

        let mut written = 0;
        for path in &caption_files {
            let title = relative_title(input_dir, path);
            match self.convert_file(path, Some(&title), force_overwrite).await {
                Ok(ConversionOutcome::Written(_)) => written += 1,
                Ok(ConversionOutcome::Skipped(_)) => {}
                Err(e) => error!("Error processing file {:?}: {:#}", path, e),
            }
        }

        info!("Finished: {} of {} file(s) written", written, caption_files.len());
        Ok(written)
    }

    // Converts before writing; a failed conversion leaves no file behind
    fn write_subtitles(&self, xml: &str, title: &str, force_overwrite: bool) -> Result<ConversionOutcome> {
        let base_name = FileManager::title_to_filename(title);
        if base_name.is_empty() {
            return Err(anyhow!("Title '{}' leaves an empty file name", title));
        }

        let output_path = FileManager::subtitle_output_path(&self.config.output_dir, &base_name);
        if output_path.exists() && !force_overwrite {
            warn!("Skipping {:?}, file already exists (use -f to force overwrite)", output_path);
            return Ok(ConversionOutcome::Skipped(output_path));
        }

        let srt = caption_converter::convert(xml)?;
        FileManager::write_to_file(&output_path, &srt)?;

        info!("Success: {}", output_path.display());
        Ok(ConversionOutcome::Written(output_path))
    }
}

// @returns: Path below `root` without extension, components joined by '_'
fn relative_title(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path).with_extension("");
    relative
        .components()
        .map(|part| part.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("_")
}
