use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use frutool_core::{ConfigError, FruError, Record};
use glob::glob;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("FRUTOOL_BUILD_COMMIT"),
    ", built ",
    env!("FRUTOOL_BUILD_DATE"),
    ")"
);

const EXAMPLES: &str = "Examples:\n  frutool sample template.toml\n  frutool generate board.toml board.fru\n  frutool dump board.fru board.toml\n  frutool dump 'images/*.fru' --json --pretty";

#[derive(Parser, Debug)]
#[command(name = "frutool")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Read and write IPMI FRU inventory images.",
    long_about = None,
    after_help = EXAMPLES
)]
struct Cli {
    /// Log more detail (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output, including decode warnings
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a FRU image from a TOML description.
    Generate {
        /// TOML description of the record
        config: PathBuf,

        /// Output FRU image
        output: PathBuf,

        /// Overwrite the output file if it exists
        #[arg(long)]
        force: bool,
    },
    /// Decode a FRU image to TOML, or JSON with --json.
    Dump {
        /// FRU image to decode
        input: PathBuf,

        /// Output path (stdout when omitted)
        output: Option<PathBuf>,

        /// Overwrite the output file if it exists
        #[arg(long)]
        force: bool,

        /// Write JSON instead of TOML
        #[arg(long)]
        json: bool,

        /// Pretty-print JSON output
        #[arg(long, requires = "json")]
        pretty: bool,

        /// Exit with a non-zero code if any checksum warning is present
        #[arg(long)]
        strict: bool,
    },
    /// Write a blank TOML template.
    Sample {
        /// Output path (stdout when omitted)
        output: Option<PathBuf>,

        /// Overwrite the output file if it exists
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Generate {
            config,
            output,
            force,
        } => cmd_generate(&config, &output, force, cli.quiet),
        Commands::Dump {
            input,
            output,
            force,
            json,
            pretty,
            strict,
        } => cmd_dump(&input, output.as_deref(), force, json, pretty, strict, cli.quiet),
        Commands::Sample { output, force } => cmd_sample(output.as_deref(), force, cli.quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = match (quiet, verbose) {
        (true, _) => EnvFilter::new("error"),
        (false, 0) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        (false, 1) => EnvFilter::new("debug"),
        (false, _) => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err), None)
    }
}

fn cmd_generate(config: &Path, output: &Path, force: bool, quiet: bool) -> Result<(), CliError> {
    let config = resolve_input_path(config)?;
    validate_input_file(&config)?;
    ensure_distinct(&config, output)?;
    ensure_writable(output, force)?;

    let text = fs::read_to_string(&config)
        .with_context(|| format!("Failed to read config: {}", config.display()))?;
    let parsed = frutool_core::parse_config(&text).map_err(|err| config_error(&config, err))?;
    let image = frutool_core::encode_with(&parsed.record, &parsed.encode_options())
        .map_err(|err| encode_error(&config, err))?;

    write_output(output, &image)?;
    if !quiet {
        eprintln!("OK: {} bytes written -> {}", image.len(), output.display());
    }
    Ok(())
}

fn cmd_dump(
    input: &Path,
    output: Option<&Path>,
    force: bool,
    json: bool,
    pretty: bool,
    strict: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let input = resolve_input_path(input)?;
    validate_input_file(&input)?;
    if let Some(output) = output {
        ensure_distinct(&input, output)?;
        ensure_writable(output, force)?;
    }

    let bytes =
        fs::read(&input).with_context(|| format!("Failed to read image: {}", input.display()))?;
    debug!(path = %input.display(), bytes = bytes.len(), "read image");
    let record = frutool_core::decode(&bytes).map_err(|err| decode_error(&input, err))?;
    let text = render_record(&record, bytes.len(), json, pretty)?;

    match output {
        None => print!("{}", text),
        Some(output) => {
            write_output(output, text.as_bytes())?;
            if !quiet {
                eprintln!("OK: dump written -> {}", output.display());
            }
        }
    }

    if strict && record.has_warnings() {
        return Err(CliError::new(
            format!(
                "{} checksum warning(s) in {}",
                record.warnings().len(),
                input.display()
            ),
            Some("rerun without --quiet to list them, or drop --strict".to_string()),
        ));
    }
    Ok(())
}

fn cmd_sample(output: Option<&Path>, force: bool, quiet: bool) -> Result<(), CliError> {
    let text = frutool_core::sample_config().context("Failed to render template")?;
    match output {
        None => print!("{}", text),
        Some(output) => {
            ensure_writable(output, force)?;
            write_output(output, text.as_bytes())?;
            if !quiet {
                eprintln!("OK: template written -> {}", output.display());
            }
        }
    }
    Ok(())
}

fn render_record(
    record: &Record,
    image_size: usize,
    json: bool,
    pretty: bool,
) -> Result<String, CliError> {
    if !json {
        return frutool_core::render_config(record, Some(image_size))
            .context("TOML serialization failed")
            .map_err(Into::into);
    }
    let mut text = if pretty {
        serde_json::to_string_pretty(record).context("JSON serialization failed")?
    } else {
        serde_json::to_string(record).context("JSON serialization failed")?
    };
    text.push('\n');
    Ok(text)
}

fn config_error(path: &Path, err: ConfigError) -> CliError {
    CliError::new(
        format!("invalid config {}: {}", path.display(), err),
        Some("run `frutool sample` for an annotated template".to_string()),
    )
}

fn encode_error(path: &Path, err: FruError) -> CliError {
    match err {
        FruError::InvalidRecord { violations } => {
            let mut message = format!("cannot encode {}:", path.display());
            for violation in &violations {
                message.push_str("\n  ");
                message.push_str(&violation.to_string());
            }
            CliError::new(
                message,
                Some("fix the listed values, then run generate again".to_string()),
            )
        }
        other => CliError::new(format!("cannot encode {}: {}", path.display(), other), None),
    }
}

fn decode_error(path: &Path, err: FruError) -> CliError {
    let hint = match err {
        FruError::InvalidHeader { .. } => "the file is not a FRU image, or its header is corrupt",
        _ => "the image is damaged; compare it against a known-good copy",
    };
    CliError::new(
        format!("cannot decode {}: {}", path.display(), err),
        Some(hint.to_string()),
    )
}

fn ensure_writable(output: &Path, force: bool) -> Result<(), CliError> {
    if output.exists() && !force {
        return Err(CliError::new(
            format!("output file already exists: {}", output.display()),
            Some("use --force to overwrite it".to_string()),
        ));
    }
    Ok(())
}

fn ensure_distinct(input: &Path, output: &Path) -> Result<(), CliError> {
    let input_abs = fs::canonicalize(input)
        .with_context(|| format!("Failed to resolve input path: {}", input.display()))?;
    let output_abs = output
        .parent()
        .map(|parent| {
            if parent.as_os_str().is_empty() {
                fs::canonicalize(".")
            } else {
                fs::canonicalize(parent)
            }
        })
        .transpose()
        .ok()
        .flatten()
        .zip(output.file_name())
        .map(|(dir, name)| dir.join(name));
    if output_abs.as_deref() == Some(input_abs.as_path()) {
        return Err(CliError::new(
            format!("output path must differ from input: {}", output.display()),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn write_output(path: &Path, contents: &[u8]) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("check the path, or quote a glob pattern".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("pass a single file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        ));
    }
    if matches.len() > 1 {
        let hint = "pass a single file, or run once per file".to_string();
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let more = if matches.len() > 3 { ", ..." } else { "" };
        let message = format!(
            "multiple files match pattern '{}' ({} matches); matches: {}{}",
            pattern,
            matches.len(),
            listed,
            more
        );
        return Err(CliError::new(message, Some(hint)));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
