//! bytelit - Turn binary files into source-code literals
//!
//! This tool reads binary files and prints (or writes) equivalent literal
//! declarations for C/C++, Go, Python and Rust.

use anyhow::{bail, Context, Result};
use bytelit_core::{
    verify_literal, Encoder, EncoderConfig, Format, InputLoader, StreamEncoder,
    DEFAULT_ITEMS_PER_LINE, DEFAULT_VARIABLE_NAME, MAX_INPUT_SIZE,
};
use clap::{Args, Parser, ValueEnum};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, error, info, trace, warn, Level};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

/// Turn binary files into C/C++, Go, Python and Rust source literals
#[derive(Parser, Debug)]
#[command(name = "bytelit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    input: InputMode,

    /// Target formats (repeatable; default: all)
    #[arg(short = 't', long = "format", value_enum)]
    formats: Vec<FormatArg>,

    /// Name of the declared variable
    #[arg(short, long, env = "BYTELIT_NAME", default_value = DEFAULT_VARIABLE_NAME)]
    name: String,

    /// Elements per line for array formats
    #[arg(long, default_value_t = DEFAULT_ITEMS_PER_LINE)]
    items_per_line: usize,

    /// Spaces of indentation for array elements (0-32)
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(0..=32))]
    indent: u8,

    /// Write each rendering to a file in this directory instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Dry run - don't write files, just show what would be written
    #[arg(long, requires = "output")]
    dry_run: bool,

    /// Overwrite existing files
    #[arg(long)]
    force: bool,

    /// Render straight from the file in chunks instead of loading it
    #[arg(long)]
    stream: bool,

    /// Decode every rendering and check it reproduces the input
    #[arg(long, conflicts_with = "stream")]
    verify: bool,

    /// Largest input accepted in bytes, ignored with --stream (0 = unlimited)
    #[arg(long, default_value_t = MAX_INPUT_SIZE)]
    max_size: u64,

    /// Render empty files instead of rejecting them
    #[arg(long)]
    allow_empty: bool,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct InputMode {
    /// Path to a single file to render
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Path to a directory of files to render
    #[arg(short, long)]
    directory: Option<PathBuf>,
}

/// Target format as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// unsigned char array (C/C++)
    #[value(alias = "c", alias = "cpp")]
    CCpp,
    /// []byte slice (Go)
    #[value(alias = "go")]
    GoBytes,
    /// String constant with \x escapes (Go)
    GoString,
    /// bytes.fromhex call (Python)
    #[value(alias = "py")]
    Python,
    /// &[u8] slice (Rust)
    #[value(alias = "rs")]
    Rust,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::CCpp => Format::CCpp,
            FormatArg::GoBytes => Format::GoBytes,
            FormatArg::GoString => Format::GoString,
            FormatArg::Python => Format::Python,
            FormatArg::Rust => Format::Rust,
        }
    }
}

impl Cli {
    /// Formats to render, in presentation order without duplicates
    fn selected_formats(&self) -> Vec<Format> {
        if self.formats.is_empty() {
            return Format::ALL.to_vec();
        }
        let mut formats: Vec<Format> = self.formats.iter().map(|&f| f.into()).collect();
        formats.sort();
        formats.dedup();
        formats
    }

    fn encoder(&self) -> Result<Encoder> {
        let config = EncoderConfig::new()
            .variable_name(&self.name)
            .items_per_line(self.items_per_line)
            .indent(" ".repeat(usize::from(self.indent)));
        Encoder::with_config(config).context("Invalid rendering options")
    }

    fn loader(&self) -> InputLoader {
        InputLoader::new()
            .max_size(if self.stream { 0 } else { self.max_size })
            .allow_empty(self.allow_empty)
    }
}

/// Per-run bookkeeping
#[derive(Default)]
struct RunRegistry {
    /// Maps content hash -> first input seen with that content
    seen: HashMap<String, PathBuf>,
    /// Output files already claimed in this run
    outputs: HashSet<PathBuf>,
    stats: RunStats,
}

#[derive(Default)]
struct RunStats {
    inputs: usize,
    duplicates_skipped: usize,
    conflicts_renamed: usize,
    skipped: usize,
    failed: usize,
    written: usize,
}

impl RunRegistry {
    fn new() -> Self {
        Self::default()
    }

    /// Compute a short hash of the content (first 16 chars of blake3)
    fn content_hash(data: &[u8]) -> String {
        let hash = blake3::hash(data);
        hash.to_hex()[..16].to_string()
    }

    /// Record an input, returning the earlier path if the same bytes were
    /// already rendered in this run
    fn register(&mut self, path: &Path, content_hash: &str) -> Option<PathBuf> {
        self.stats.inputs += 1;
        if let Some(first) = self.seen.get(content_hash) {
            self.stats.duplicates_skipped += 1;
            return Some(first.clone());
        }
        self.seen.insert(content_hash.to_string(), path.to_path_buf());
        None
    }

    /// Reserve an output file for `source`.
    ///
    /// If another input of this run already claimed the same file, a short
    /// hash of `source` is appended to the file stem: `fw.py` -> `fw~1a2b3c4d.py`.
    fn claim_output(&mut self, candidate: PathBuf, source: &Path) -> PathBuf {
        if self.outputs.insert(candidate.clone()) {
            return candidate;
        }

        let source_hash = Self::content_hash(source.to_string_lossy().as_bytes());
        let mut resolved = Self::add_suffix(&candidate, &format!("~{}", &source_hash[..8]));
        // Second clash: fall back to the longer hash
        if !self.outputs.insert(resolved.clone()) {
            resolved = Self::add_suffix(&candidate, &format!("~{}", source_hash));
            self.outputs.insert(resolved.clone());
        }
        info!(
            "Conflict resolved: {} -> {} (from {})",
            candidate.display(),
            resolved.display(),
            source.display()
        );
        self.stats.conflicts_renamed += 1;
        resolved
    }

    /// Add a suffix before the file extension
    fn add_suffix(path: &Path, suffix: &str) -> PathBuf {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = match path.extension() {
            Some(ext) => format!("{}{}.{}", stem, suffix, ext.to_string_lossy()),
            None => format!("{}{}", stem, suffix),
        };
        path.with_file_name(name)
    }

    fn print_summary(&self) {
        info!(
            "Summary: {} inputs, {} duplicates skipped, {} conflicts renamed, {} unreadable or empty, {} failed, {} files written",
            self.stats.inputs,
            self.stats.duplicates_skipped,
            self.stats.conflicts_renamed,
            self.stats.skipped,
            self.stats.failed,
            self.stats.written
        );
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing on stderr; stdout carries the rendered code
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let encoder = cli.encoder()?;

    // Dispatch based on input mode
    if let Some(ref file) = cli.input.file {
        process_single_file(&cli, &encoder, file)
    } else if let Some(ref directory) = cli.input.directory {
        process_directory(&cli, &encoder, directory).map(|_| ())
    } else {
        bail!("Either --file or --directory must be specified")
    }
}

/// Process a single input file
fn process_single_file(cli: &Cli, encoder: &Encoder, file: &Path) -> Result<()> {
    if !file.exists() {
        bail!("Input file does not exist: {}", file.display());
    }
    if !file.is_file() {
        bail!("Input path is not a file: {}", file.display());
    }

    let mut registry = RunRegistry::new();
    let relative = file.file_name().map(PathBuf::from).unwrap_or_else(|| file.to_path_buf());
    process_input(cli, encoder, file, &relative, false, &mut registry)?;

    if cli.output.is_some() && !cli.dry_run {
        registry.print_summary();
    }

    Ok(())
}

/// Process every file below a directory
fn process_directory(cli: &Cli, encoder: &Encoder, directory: &Path) -> Result<RunStats> {
    if !directory.exists() {
        bail!("Directory does not exist: {}", directory.display());
    }
    if !directory.is_dir() {
        bail!("Path is not a directory: {}", directory.display());
    }

    info!("Scanning directory: {}", directory.display());

    // Compare normalized paths so `./in` and `in/sub/../out` still line up
    let root = fs::canonicalize(directory)
        .with_context(|| format!("Failed to resolve directory: {}", directory.display()))?;
    let output = cli.output.as_deref().map(normalize_path);

    let mut registry = RunRegistry::new();

    for entry in WalkDir::new(&root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let location = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| root.display().to_string());
                warn!("Error walking {}: {}", location, e);
                registry.stats.failed += 1;
                continue;
            }
        };

        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        // Never re-read our own output when it lives inside the input tree
        if let Some(output) = &output {
            if path.starts_with(output) {
                trace!("Skipping output file: {}", path.display());
                continue;
            }
        }

        let relative = path.strip_prefix(&root).unwrap_or(path);
        debug!("Processing input: {}", path.display());
        if let Err(e) = process_input(cli, encoder, path, relative, true, &mut registry) {
            // Log error but continue with other files
            let skippable = e
                .downcast_ref::<bytelit_core::Error>()
                .is_some_and(bytelit_core::Error::is_input_error);
            if skippable {
                info!("Skipping {}: {:#}", path.display(), e);
                registry.stats.skipped += 1;
            } else {
                warn!("Error processing {}: {:#}", path.display(), e);
                registry.stats.failed += 1;
            }
        }
    }

    registry.print_summary();

    Ok(registry.stats)
}

/// Absolute form of `path` with `.`/`..` and symlinks resolved as far as
/// the path exists; the missing tail is appended as given
fn normalize_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    let mut lexical = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                lexical.pop();
            }
            other => lexical.push(other),
        }
    }

    let mut existing = lexical.as_path();
    let mut tail = Vec::new();
    loop {
        if let Ok(resolved) = fs::canonicalize(existing) {
            return tail.iter().rev().fold(resolved, |acc, name| acc.join(name));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                tail.push(name);
                existing = parent;
            }
            _ => return lexical.clone(),
        }
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}

/// Render one input in every selected format
fn process_input(
    cli: &Cli,
    encoder: &Encoder,
    path: &Path,
    relative: &Path,
    in_directory: bool,
    registry: &mut RunRegistry,
) -> Result<()> {
    let formats = cli.selected_formats();
    let loader = cli.loader();

    if cli.stream {
        let size = loader
            .check(path)
            .with_context(|| format!("Rejected input: {}", path.display()))?;
        registry.stats.inputs += 1;
        debug!("Streaming {} ({} bytes)", path.display(), size);
        return stream_input(cli, encoder, path, relative, in_directory, &formats, registry);
    }

    let data = loader
        .load(path)
        .with_context(|| format!("Failed to load input: {}", path.display()))?;

    let content_hash = RunRegistry::content_hash(&data);
    if let Some(first) = registry.register(path, &content_hash) {
        info!(
            "Skipping {}: same content as {}",
            path.display(),
            first.display()
        );
        return Ok(());
    }

    let renderings = encoder.encode_formats_parallel(&data, &formats);

    if cli.verify {
        for (format, text) in &renderings {
            verify_literal(&data, text, *format)
                .with_context(|| format!("Verification failed for {}", path.display()))?;
        }
        debug!("Verified {} renderings of {}", renderings.len(), path.display());
    }

    emit(cli, relative, in_directory, &renderings, registry)
}

/// Present finished renderings on stdout or as files
fn emit(
    cli: &Cli,
    relative: &Path,
    in_directory: bool,
    renderings: &BTreeMap<Format, String>,
    registry: &mut RunRegistry,
) -> Result<()> {
    let Some(output_dir) = &cli.output else {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let with_headers = in_directory || renderings.len() > 1;
        for (format, text) in renderings {
            if with_headers {
                writeln!(out, "{}", header(*format, in_directory.then_some(relative)))?;
            }
            writeln!(out, "{}", text)?;
            if with_headers {
                writeln!(out)?;
            }
        }
        return Ok(());
    };

    let mut failures = 0;
    for (format, text) in renderings {
        let output_path =
            registry.claim_output(output_path(output_dir, relative, *format), relative);
        if cli.dry_run {
            println!("Would write: {}", output_path.display());
            if cli.verbose > 0 {
                println!("---");
                println!("{}", text);
                println!("---");
            }
            continue;
        }
        match write_output_file(&output_path, text, cli.force) {
            Ok(()) => {
                println!("Wrote {}", output_path.display());
                registry.stats.written += 1;
            }
            Err(e) => {
                error!("Failed to write {}: {:#}", output_path.display(), e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} renderings could not be written", failures, renderings.len());
    }
    Ok(())
}

/// Render one input per format straight from disk
fn stream_input(
    cli: &Cli,
    encoder: &Encoder,
    path: &Path,
    relative: &Path,
    in_directory: bool,
    formats: &[Format],
    registry: &mut RunRegistry,
) -> Result<()> {
    for &format in formats {
        let file = fs::File::open(path)
            .with_context(|| format!("Failed to open input: {}", path.display()))?;
        let streamer = StreamEncoder::new(encoder, format);

        match &cli.output {
            None => {
                let stdout = io::stdout();
                let mut out = stdout.lock();
                let with_headers = in_directory || formats.len() > 1;
                if with_headers {
                    writeln!(out, "{}", header(format, in_directory.then_some(relative)))?;
                }
                streamer.write_stream(file, &mut out)?;
                writeln!(out)?;
                if with_headers {
                    writeln!(out)?;
                }
            }
            Some(output_dir) => {
                let output_path =
                    registry.claim_output(output_path(output_dir, relative, format), relative);
                if cli.dry_run {
                    println!("Would write: {}", output_path.display());
                    continue;
                }
                write_output_with(&output_path, cli.force, |target| {
                    streamer.write_stream(file, &mut *target)?;
                    writeln!(target)?;
                    Ok(())
                })?;
                println!("Wrote {}", output_path.display());
                registry.stats.written += 1;
            }
        }
    }
    Ok(())
}

/// Separator line printed above a rendering on stdout
fn header(format: Format, source: Option<&Path>) -> String {
    match source {
        Some(source) => format!(
            "{} ==== {} ({}) ====",
            format.comment_prefix(),
            source.display(),
            format
        ),
        None => format!("{} ==== {} ====", format.comment_prefix(), format),
    }
}

/// Output file for one rendering: `<dir>/<relative parent>/<stem><suffix>.<ext>`
fn output_path(output_dir: &Path, relative: &Path, format: Format) -> PathBuf {
    let stem = relative
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(DEFAULT_VARIABLE_NAME);
    let name = format!("{}{}.{}", stem, format.file_suffix(), format.extension());
    match relative.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => output_dir.join(parent).join(name),
        None => output_dir.join(name),
    }
}

/// Create an output file, creating parent directories as needed
fn create_output_file(output_path: &Path, force: bool) -> Result<fs::File> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    if output_path.exists() && !force {
        bail!(
            "File already exists: {} (use --force to overwrite)",
            output_path.display()
        );
    }

    fs::File::create(output_path)
        .with_context(|| format!("Failed to create file: {}", output_path.display()))
}

/// Create an output file and fill it with `write`.
///
/// A file left half-written by a failed `write` is removed, so it can't
/// block the next run.
fn write_output_with<F>(output_path: &Path, force: bool, write: F) -> Result<()>
where
    F: FnOnce(&mut fs::File) -> Result<()>,
{
    let mut file = create_output_file(output_path, force)?;

    if let Err(e) = write(&mut file) {
        drop(file);
        if let Err(remove_err) = fs::remove_file(output_path) {
            warn!(
                "Failed to remove partial file {}: {}",
                output_path.display(),
                remove_err
            );
        }
        return Err(e.context(format!("Failed to write file: {}", output_path.display())));
    }

    Ok(())
}

/// Write a rendering to disk, ending it with a newline
fn write_output_file(output_path: &Path, content: &str, force: bool) -> Result<()> {
    write_output_with(output_path, force, |file| {
        file.write_all(content.as_bytes())?;
        file.write_all(b"\n")?;
        Ok(())
    })
}
