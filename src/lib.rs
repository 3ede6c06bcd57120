/*!
 * # savetube - caption saving for downloaded videos
 *
 * A Rust library that turns the timed-text XML caption tracks of a
 * video-sharing site into SubRip (SRT) subtitle files.
 *
 * ## Features
 *
 * - Parse timed-text XML (`<body>` of `<p t=".." d="..">` nodes)
 * - Normalize caption text and decode HTML entities
 * - Clamp overlapping caption timings in one forward pass
 * - Serialize numbered SRT blocks with `HH:MM:SS,mmm` timestamps
 * - Select a caption track by language preference (`en`, then `a.en`)
 * - Write subtitle files under a configurable output directory
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `caption_converter`: XML to SRT conversion (pure, no I/O)
 * - `caption_tracks`: Track selection and caption sources
 * - `app_config`: Configuration management
 * - `app_controller`: Orchestration of conversions and file output
 * - `file_utils`: File system operations and file name sanitizing
 * - `html_entities`: HTML5 character reference decoding
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod caption_converter;
pub mod caption_tracks;
pub mod errors;
pub mod file_utils;
pub mod html_entities;
pub mod language_utils;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{ConversionOutcome, Controller};
pub use caption_converter::{convert, CaptionEntry, SubtitleBlock};
pub use caption_tracks::{select_track, CaptionSource, DirectoryCaptionSource};
pub use errors::{CaptionError, TrackError};
