// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, Context};
use log::{warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use savetube::app_config::{self, Config};
use savetube::{ConversionOutcome, Controller, DirectoryCaptionSource};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// Options shared by every command that writes subtitle files
#[derive(Args, Debug)]
struct OutputArgs {
    /// Directory to write subtitle files to (overrides the config)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert one timed-text XML caption file to SRT
    Convert {
        /// Caption XML file
        #[arg(value_name = "XML_PATH")]
        xml_path: PathBuf,

        /// Video title used for the output file name (defaults to the file stem)
        #[arg(long)]
        title: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Pick the preferred track from a directory of `<code>.xml` files and convert it
    Tracks {
        /// Directory holding one XML file per caption code
        #[arg(value_name = "TRACK_DIR")]
        track_dir: PathBuf,

        /// Video title used for the output file name (defaults to the directory name)
        #[arg(long)]
        title: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Convert every caption XML file found below a directory
    Folder {
        /// Directory to scan recursively
        #[arg(value_name = "INPUT_DIR")]
        input_dir: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Generate shell completions for savetube
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// savetube - save video captions as SRT subtitles
#[derive(Parser, Debug)]
#[command(name = "savetube")]
#[command(version)]
#[command(about = "Convert timed-text XML captions to SRT subtitles")]
#[command(long_about = "savetube converts the timed-text XML caption tracks of a video-sharing site into SRT subtitle files.

EXAMPLES:
    savetube convert captions.xml --title \"My Video\"  # Write My_Video.srt
    savetube tracks ./tracks --title \"My Video\"       # Prefer en.xml, then a.en.xml
    savetube folder ./captions -o ./subs -f           # Convert a whole directory
    savetube completions bash > savetube.bash         # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level: LevelFilter::Trace }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Start at info, the config may lower or raise it
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "savetube", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let (mut config, created) = Config::load_or_create(&cli.config_path)?;
    if created {
        warn!("Config file not found at '{}', created default config.", cli.config_path);
    }

    match &cli.log_level {
        Some(level) => config.log_level = level.clone().into(),
        None => log::set_max_level(config.log_level.to_level_filter()),
    }

    match cli.command {
        Commands::Convert { xml_path, title, output } => {
            let controller = build_controller(config, &output)?;
            let outcome = controller
                .convert_file(&xml_path, title.as_deref(), output.force_overwrite)
                .await?;
            report(&outcome);
        }
        Commands::Tracks { track_dir, title, output } => {
            let title = match title {
                Some(title) => title,
                None => track_dir
                    .canonicalize()
                    .ok()
                    .and_then(|dir| dir.file_name().map(|name| name.to_string_lossy().to_string()))
                    .context("Cannot derive a title from the track directory, pass --title")?,
            };
            let controller = build_controller(config, &output)?;
            let source = DirectoryCaptionSource::new(&track_dir);
            let outcome = controller
                .save_caption(&source, &title, output.force_overwrite)
                .await?;
            report(&outcome);
        }
        Commands::Folder { input_dir, output } => {
            let controller = build_controller(config, &output)?;
            controller.convert_folder(&input_dir, output.force_overwrite).await?;
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

// Apply CLI overrides, then validate through the controller
fn build_controller(mut config: Config, output: &OutputArgs) -> Result<Controller> {
    if let Some(dir) = &output.output_dir {
        config.output_dir = dir.clone();
    }
    Controller::with_config(config)
}

fn report(outcome: &ConversionOutcome) {
    if let ConversionOutcome::Skipped(path) = outcome {
        info!("Nothing written, {} already exists", path.display());
    }
}
