use anyhow::Result;
use autostamp::{
    apply_edits, plan, write_document, DocumentKind, DocumentView, ResolvedConfig, Settings,
    SystemTimeSource,
};
use clap::{Parser, Subcommand};
use colored::Colorize;
use similar::{ChangeTag, TextDiff};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "autostamp")]
#[command(about = "Timestamp placeholder stamping for text documents", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stamp timestamp placeholders in files
    Stamp {
        /// Files or directories to stamp (defaults to the current directory)
        paths: Vec<PathBuf>,

        /// Settings file (otherwise autostamp.toml / .autostamp.toml is
        /// discovered walking up from the current directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Dry run - show what would be stamped without modifying files
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show unified diff of changes
        #[arg(short, long)]
        diff: bool,
    },

    /// Report which files would change, without modifying anything
    Check {
        /// Files or directories to check (defaults to the current directory)
        paths: Vec<PathBuf>,

        /// Settings file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the resolved configuration, including disabled fields
    Config {
        /// Settings file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Stamp {
            paths,
            config,
            dry_run,
            diff,
        } => cmd_stamp(paths, config, dry_run, diff),

        Commands::Check { paths, config } => cmd_stamp(paths, config, true, false),

        Commands::Config { config } => cmd_config(config),
    }
}

/// Load settings from an explicit path, a discovered settings file, or
/// built-in defaults.
///
/// Discovery walks up from the current directory looking for
/// `autostamp.toml`, then `.autostamp.toml`, in each ancestor.
fn resolve_settings(explicit: Option<PathBuf>) -> Result<(Settings, Option<PathBuf>)> {
    if let Some(path) = explicit {
        let settings = autostamp::load_from_path(&path)?;
        return Ok((settings, Some(path)));
    }

    if let Some(path) = discover_settings_file() {
        let settings = autostamp::load_from_path(&path)?;
        return Ok((settings, Some(path)));
    }

    Ok((Settings::default(), None))
}

fn discover_settings_file() -> Option<PathBuf> {
    let cwd = env::current_dir().ok()?;
    for dir in cwd.ancestors() {
        for name in ["autostamp.toml", ".autostamp.toml"] {
            let candidate = dir.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }
    None
}

/// Expand path arguments into the list of candidate files.
///
/// Directory arguments are walked recursively, skipping hidden entries;
/// explicit file arguments pass through untouched (the planner's filename
/// filter still gates them).
fn collect_targets(paths: Vec<PathBuf>) -> Result<Vec<PathBuf>> {
    let roots = if paths.is_empty() {
        vec![env::current_dir()?]
    } else {
        paths
    };

    let mut files = Vec::new();
    for root in roots {
        if root.is_dir() {
            let walker = WalkDir::new(&root).into_iter().filter_entry(|entry| {
                entry.depth() == 0 || !is_hidden(entry.file_name().to_string_lossy().as_ref())
            });
            for entry in walker {
                let entry = entry?;
                if entry.file_type().is_file() {
                    files.push(entry.into_path());
                }
            }
        } else {
            files.push(root);
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

fn report_warnings(config: &ResolvedConfig) {
    for warning in &config.warnings {
        eprintln!("{}", format!("Warning: {}", warning).yellow());
    }
}

/// Outcome of one file in a stamping run.
enum FileOutcome {
    Stamped,
    Unchanged,
    Skipped,
    Failed,
}

fn cmd_stamp(
    paths: Vec<PathBuf>,
    config_path: Option<PathBuf>,
    dry_run: bool,
    show_diff: bool,
) -> Result<()> {
    let (settings, source) = resolve_settings(config_path)?;
    let config = ResolvedConfig::compile(&settings);
    report_warnings(&config);

    match &source {
        Some(path) => println!("Settings: {}", path.display()),
        None => println!("Settings: defaults"),
    }
    if dry_run {
        println!("{}", "[DRY RUN - no files will be modified]".cyan());
    }
    println!();

    let targets = collect_targets(paths)?;

    let mut stamped = 0;
    let mut unchanged = 0;
    let mut skipped = 0;
    let mut failed = 0;

    for path in targets {
        match stamp_file(&path, &config, dry_run, show_diff) {
            FileOutcome::Stamped => stamped += 1,
            FileOutcome::Unchanged => unchanged += 1,
            FileOutcome::Skipped => skipped += 1,
            FileOutcome::Failed => failed += 1,
        }
    }

    println!();
    println!("{}", "Summary:".bold());
    if dry_run {
        println!("  {} would be stamped", format!("{}", stamped).green());
    } else {
        println!("  {} stamped", format!("{}", stamped).green());
    }
    println!("  {} unchanged", format!("{}", unchanged).dimmed());
    println!("  {} skipped", format!("{}", skipped).cyan());
    println!("  {} failed", format!("{}", failed).red());

    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn stamp_file(path: &Path, config: &ResolvedConfig, dry_run: bool, show_diff: bool) -> FileOutcome {
    // The planner gates on the filename filter too, but checking here lets
    // non-matching files skip the read entirely.
    if let Some(filter) = config.filename_pattern.as_ref() {
        if !filter.is_match(&path.to_string_lossy()) {
            return FileOutcome::Skipped;
        }
    }

    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(_) => {
            // Binary or unreadable file in a walked directory; not a failure.
            println!(
                "{} {}: skipped (not readable as text)",
                "⊘".cyan(),
                path.display()
            );
            return FileOutcome::Skipped;
        }
    };

    let doc = DocumentView::over(path, DocumentKind::from_path(path), &text);
    let edits = plan(&doc, config, &SystemTimeSource);

    if edits.is_empty() {
        return FileOutcome::Unchanged;
    }

    let new_text = match apply_edits(&text, &edits) {
        Ok(new_text) => new_text,
        Err(e) => {
            eprintln!("{} {}: {}", "✗".red(), path.display(), e);
            return FileOutcome::Failed;
        }
    };

    if dry_run {
        println!(
            "{} {}: would stamp {} field(s)",
            "✓".green(),
            path.display(),
            edits.len()
        );
    } else {
        if let Err(e) = write_document(path, &new_text) {
            eprintln!("{} {}: {}", "✗".red(), path.display(), e);
            return FileOutcome::Failed;
        }
        println!(
            "{} {}: stamped {} field(s)",
            "✓".green(),
            path.display(),
            edits.len()
        );
    }

    if show_diff {
        display_diff(path, &text, &new_text);
    }

    FileOutcome::Stamped
}

/// Show unified diff between original and stamped content.
fn display_diff(file: &Path, original: &str, modified: &str) {
    println!(
        "\n{}",
        format!("--- {} (original)", file.display()).dimmed()
    );
    println!("{}", format!("+++ {} (stamped)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, modified);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", sign);
    }
}

fn cmd_config(config_path: Option<PathBuf>) -> Result<()> {
    let (settings, source) = resolve_settings(config_path)?;
    let config = ResolvedConfig::compile(&settings);

    println!("{}", "Resolved configuration".bold());
    match &source {
        Some(path) => println!("Settings file: {}", path.display()),
        None => println!("Settings file: (none, using defaults)"),
    }
    println!();

    let field = |name: &str, enabled: bool, raw: &str| {
        if enabled {
            println!("  {:<20} {}", name, raw);
        } else {
            println!("  {:<20} {}", name, format!("{} (disabled)", raw).red());
        }
    };

    field(
        "filename_pattern",
        config.filename_pattern.is_some(),
        &settings.filename_pattern,
    );
    println!("  {:<20} {}", "line_limit", config.line_limit);
    field(
        "birth_time_start",
        config.birth.is_some(),
        &settings.birth_time_start,
    );
    field(
        "birth_time_end",
        config.birth.is_some(),
        &settings.birth_time_end,
    );
    field(
        "modified_time_start",
        config.modified.is_some(),
        &settings.modified_time_start,
    );
    field(
        "modified_time_end",
        config.modified.is_some(),
        &settings.modified_time_end,
    );
    field("format", config.stamp_format.is_some(), &settings.format);
    println!("  {:<20} {:?}", "suffix", config.suffix);
    field(
        "tex_placeholder",
        config.tex_placeholder.is_some(),
        &settings.tex_placeholder,
    );
    field("tex_format", config.tex_format.is_some(), &settings.tex_format);

    if !config.warnings.is_empty() {
        println!();
        println!("{}", "Warnings:".yellow().bold());
        for warning in &config.warnings {
            println!("  - {}", warning);
        }
    }

    Ok(())
}
