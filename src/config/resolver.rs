//! Resolution of raw [`Settings`] into an immutable compiled snapshot.
//!
//! The snapshot is what a planning pass reads: compiled regexes, compiled
//! format strings, the effective suffix. It is built lazily, cached, and
//! invalidated wholesale on a settings change - there is no per-field
//! invalidation, so a pass can never observe a half-updated configuration.
//!
//! A value that fails to compile disables its field for the pass and is
//! reported as a warning on the snapshot; a document must never fail to
//! save because of one bad setting.

use crate::config::schema::Settings;
use crate::format::TimestampFormat;
use regex::Regex;
use std::env;
use std::fmt;
use std::sync::Arc;

/// A setting that failed to compile, with the field it disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    /// Settings key the bad value came from
    pub key: &'static str,
    pub message: String,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "setting '{}' is disabled: {}", self.key, self.message)
    }
}

/// Compiled start/end delimiter pair of a delimited field.
#[derive(Debug, Clone)]
pub struct DelimitedField {
    pub start: Regex,
    pub end: Regex,
}

/// Immutable per-pass configuration snapshot.
///
/// `None` fields were disabled by a compile failure; the corresponding
/// warning names the offending key.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// `None` when the filename pattern failed to compile, which disables
    /// scanning entirely
    pub filename_pattern: Option<Regex>,
    pub line_limit: i64,
    pub birth: Option<DelimitedField>,
    pub modified: Option<DelimitedField>,
    pub tex_placeholder: Option<Regex>,
    /// Shared format for birth and modified stamps
    pub stamp_format: Option<TimestampFormat>,
    pub tex_format: Option<TimestampFormat>,
    pub suffix: String,
    pub warnings: Vec<ConfigWarning>,
}

impl ResolvedConfig {
    /// Compile a snapshot from raw settings. Never fails: bad values
    /// disable their field and leave a warning instead.
    pub fn compile(settings: &Settings) -> Self {
        let mut warnings = Vec::new();

        let filename_pattern =
            compile_regex(&mut warnings, "filename_pattern", &settings.filename_pattern);
        let birth_start = compile_regex(&mut warnings, "birth_time_start", &settings.birth_time_start);
        let birth_end = compile_regex(&mut warnings, "birth_time_end", &settings.birth_time_end);
        let modified_start = compile_regex(
            &mut warnings,
            "modified_time_start",
            &settings.modified_time_start,
        );
        let modified_end =
            compile_regex(&mut warnings, "modified_time_end", &settings.modified_time_end);
        let tex_placeholder =
            compile_regex(&mut warnings, "tex_placeholder", &settings.tex_placeholder);

        let stamp_format = compile_format(&mut warnings, "format", &settings.format);
        let tex_format = compile_format(&mut warnings, "tex_format", &settings.tex_format);

        let birth = birth_start
            .zip(birth_end)
            .map(|(start, end)| DelimitedField { start, end });
        let modified = modified_start
            .zip(modified_end)
            .map(|(start, end)| DelimitedField { start, end });

        let suffix = settings
            .suffix
            .clone()
            .unwrap_or_else(|| format!(" by {}", current_user()));

        Self {
            filename_pattern,
            line_limit: settings.line_limit,
            birth,
            modified,
            tex_placeholder,
            stamp_format,
            tex_format,
            suffix,
            warnings,
        }
    }
}

fn compile_regex(
    warnings: &mut Vec<ConfigWarning>,
    key: &'static str,
    pattern: &str,
) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(err) => {
            warnings.push(ConfigWarning {
                key,
                message: err.to_string(),
            });
            None
        }
    }
}

fn compile_format(
    warnings: &mut Vec<ConfigWarning>,
    key: &'static str,
    spec: &str,
) -> Option<TimestampFormat> {
    match TimestampFormat::compile(spec) {
        Ok(fmt) => Some(fmt),
        Err(err) => {
            warnings.push(ConfigWarning {
                key,
                message: err.to_string(),
            });
            None
        }
    }
}

fn current_user() -> String {
    env::var("USER")
        .or_else(|_| env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Holds the raw settings and lazily compiles the cached snapshot.
///
/// Hosts call [`ConfigResolver::invalidate`] (or [`ConfigResolver::update`])
/// on a settings-change notification; the next pass recompiles from the
/// current raw values. During a pass the snapshot is a read-only `Arc`.
#[derive(Debug)]
pub struct ConfigResolver {
    settings: Settings,
    cached: Option<Arc<ResolvedConfig>>,
}

impl ConfigResolver {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            cached: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The current compiled snapshot, compiling it on first use.
    pub fn snapshot(&mut self) -> Arc<ResolvedConfig> {
        if self.cached.is_none() {
            self.cached = Some(Arc::new(ResolvedConfig::compile(&self.settings)));
        }
        Arc::clone(self.cached.as_ref().expect("snapshot was just compiled"))
    }

    /// Drop the cached snapshot; the next [`ConfigResolver::snapshot`] call
    /// recompiles every derived field from the raw settings.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Replace the raw settings and invalidate the snapshot.
    pub fn update(&mut self, settings: Settings) {
        self.settings = settings;
        self.invalidate();
    }
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
