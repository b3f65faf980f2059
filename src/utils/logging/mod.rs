//! Tracing subscriber setup.
//!
//! Settings come from the environment, which the CLI fills in before logging starts:
//!
//! - `LOG_MODE`: `stdout` (default) or `file`
//! - `LOG_LEVEL`: `trace`, `debug`, `info` (default), `warn` or `error`
//! - `LOG_DATA_DIR`: directory for log files, `logs/` by default
//! - `LOG_MAX_SIZE`: size at which a log file is rolled over, e.g. `512MB`; 1 GiB by default
//!
//! Log files are named `chain-monitor-<date>.<n>.log`. A new file is started every UTC day,
//! and a new index whenever the current file exceeds `LOG_MAX_SIZE`.

pub mod error;

use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;
use std::{
	env, fs,
	path::{Path, PathBuf},
};
use tracing::{level_filters::LevelFilter, Subscriber};
use tracing_subscriber::{
	filter::EnvFilter,
	fmt::{self, format::Writer, FmtContext, FormatEvent, FormatFields},
	prelude::*,
	registry::LookupSpan,
};

use crate::utils::parsing::parse_string_to_bytes_size;

const LOG_FILE_STEM: &str = "chain-monitor";
const DEFAULT_MAX_SIZE: u64 = 1 << 30;

lazy_static! {
	static ref ANSI_ESCAPE: Regex = Regex::new(r"\x1b\[[0-9;]*[a-zA-Z]").unwrap();
}

/// Where log lines go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
	Stdout,
	File { dir: PathBuf, max_size: u64 },
}

/// Logging settings resolved from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
	pub level: LevelFilter,
	pub target: LogTarget,
}

impl LogSettings {
	pub fn from_env() -> Result<Self, String> {
		let level = match env::var("LOG_LEVEL") {
			Ok(level) => level
				.parse::<LevelFilter>()
				.map_err(|_| format!("LOG_LEVEL must be a log level, got '{}'", level))?,
			Err(_) => LevelFilter::INFO,
		};

		let file_mode = env::var("LOG_MODE").is_ok_and(|mode| mode.eq_ignore_ascii_case("file"));
		let target = if file_mode {
			let dir = env::var("LOG_DATA_DIR").unwrap_or_else(|_| "logs".to_string());
			let max_size = match env::var("LOG_MAX_SIZE") {
				Ok(size) => parse_string_to_bytes_size(&size)
					.map_err(|e| format!("LOG_MAX_SIZE: {}", e))?,
				Err(_) => DEFAULT_MAX_SIZE,
			};
			LogTarget::File {
				dir: PathBuf::from(dir),
				max_size,
			}
		} else {
			LogTarget::Stdout
		};

		Ok(Self { level, target })
	}
}

/// Wraps a formatter and removes colour codes from its output
struct PlainText<F>(F);

impl<S, N, F> FormatEvent<S, N> for PlainText<F>
where
	S: Subscriber + for<'a> LookupSpan<'a>,
	N: for<'a> FormatFields<'a> + 'static,
	F: FormatEvent<S, N>,
{
	fn format_event(
		&self,
		ctx: &FmtContext<'_, S, N>,
		mut writer: Writer<'_>,
		event: &tracing::Event<'_>,
	) -> std::fmt::Result {
		use std::fmt::Write as _;

		let mut line = String::new();
		self.0.format_event(ctx, Writer::new(&mut line), event)?;
		writer.write_str(&strip_ansi_escapes(&line))
	}
}

fn strip_ansi_escapes(s: &str) -> String {
	ANSI_ESCAPE.replace_all(s, "").into_owned()
}

/// File for `date` in `dir`: the first index whose file is missing or holds at most
/// `max_size` bytes.
pub fn rolled_log_path(dir: &Path, date: &str, max_size: u64) -> PathBuf {
	(1u32..)
		.map(|index| dir.join(format!("{}-{}.{}.log", LOG_FILE_STEM, date, index)))
		.find(|path| fs::metadata(path).map_or(true, |meta| meta.len() <= max_size))
		.unwrap_or_else(|| dir.join(format!("{}-{}.log", LOG_FILE_STEM, date)))
}

/// Installs the global tracing subscriber.
pub fn setup_logging() -> Result<(), Box<dyn std::error::Error>> {
	let settings = LogSettings::from_env()?;
	let filter = EnvFilter::new(settings.level.to_string());
	let format = fmt::format().with_target(true).compact();

	match &settings.target {
		LogTarget::Stdout => {
			tracing_subscriber::registry()
				.with(filter)
				.with(
					fmt::layer()
						.event_format(format.with_ansi(true))
						.fmt_fields(fmt::format::PrettyFields::new()),
				)
				.try_init()?;
		}
		LogTarget::File { dir, max_size } => {
			fs::create_dir_all(dir)?;
			let date = Utc::now().format("%Y-%m-%d").to_string();
			let path = rolled_log_path(dir, &date, *max_size);
			let file_name = path
				.file_name()
				.ok_or("log file path has no file name")?
				.to_owned();

			tracing_subscriber::registry()
				.with(filter)
				.with(
					fmt::layer()
						.event_format(PlainText(format.with_ansi(false)))
						.with_writer(tracing_appender::rolling::never(dir, file_name))
						.fmt_fields(fmt::format::PrettyFields::new()),
				)
				.try_init()?;

			tracing::info!(path = %path.display(), "Logging to file");
		}
	}

	tracing::debug!(level = %settings.level, "Logging configured");
	Ok(())
}
