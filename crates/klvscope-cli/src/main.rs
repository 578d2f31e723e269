use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use glob::glob;
use klvscope_core::{
    DEFAULT_MAX_DEPTH, DecodeOptions, DecodeSummary, Report, analyze_klv_file, analyze_pcap_file,
    decode_local_set_with, parse_hex_string, try_parse_klv_packet,
};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("KLVSCOPE_BUILD_COMMIT"),
    ", ",
    env!("KLVSCOPE_BUILD_DATE"),
    ")"
);

const EXAMPLES: &str = "Examples:\n  klvscope pcap decode capture.pcapng -o report.json\n  klvscope file decode flight.klv --stdout --pretty\n  klvscope hex '060e2b34020b01010e01030101000000 04 0502 8000'";

#[derive(Parser, Debug)]
#[command(name = "klvscope")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Offline decoder for MISB ST 0601 UAS Datalink KLV metadata.",
    long_about = None,
    after_help = EXAMPLES
)]
struct Cli {
    /// Log decoder decisions to stderr (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on PCAP/PCAPNG captures carrying KLV over UDP.
    Pcap {
        #[command(subcommand)]
        command: PcapCommands,
    },
    /// Operations on files holding KLV packets back to back.
    File {
        #[command(subcommand)]
        command: FileCommands,
    },
    /// Decode one packet given as hex and print its fields as JSON.
    Hex(HexArgs),
}

#[derive(Subcommand, Debug)]
enum PcapCommands {
    /// Decode every KLV packet found in UDP payloads into a JSON report.
    #[command(aliases = ["analyze", "analyse"])]
    Decode(DecodeArgs),
}

#[derive(Subcommand, Debug)]
enum FileCommands {
    /// Decode a raw KLV byte stream into a JSON report.
    Decode(DecodeArgs),
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Input path (glob patterns must match exactly one file)
    input: PathBuf,

    /// Output report path (JSON)
    #[arg(short = 'o', long, required_unless_present = "stdout")]
    report: Option<PathBuf>,

    /// Write JSON report to stdout
    #[arg(long, conflicts_with = "report")]
    stdout: bool,

    #[command(flatten)]
    format: FormatArgs,

    /// Suppress non-error output
    #[arg(long)]
    quiet: bool,

    /// Exit with a non-zero code if bytes were skipped or sets truncated
    #[arg(long)]
    strict: bool,
}

#[derive(Args, Debug)]
struct HexArgs {
    /// Hex digits; whitespace is ignored
    hex: String,

    /// Input is a bare local set without key and length
    #[arg(long)]
    local_set: bool,

    #[command(flatten)]
    format: FormatArgs,
}

#[derive(Args, Debug)]
struct FormatArgs {
    /// Pretty-print JSON output
    #[arg(long, conflicts_with = "compact")]
    pretty: bool,

    /// Compact JSON output (default)
    #[arg(long)]
    compact: bool,

    /// Nesting depth for container tags; deeper sets stay as raw bytes
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

impl FormatArgs {
    fn options(&self) -> DecodeOptions {
        DecodeOptions {
            max_depth: self.max_depth,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputKind {
    Capture,
    Klv,
}

impl InputKind {
    fn expected(self) -> &'static str {
        match self {
            InputKind::Capture => "expected a .pcap or .pcapng file",
            InputKind::Klv => "expected a file of KLV packets",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Pcap {
            command: PcapCommands::Decode(args),
        } => cmd_decode(InputKind::Capture, args),
        Commands::File {
            command: FileCommands::Decode(args),
        } => cmd_decode(InputKind::Klv, args),
        Commands::Hex(args) => cmd_hex(args),
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

fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        "klvscope=debug,klvscope_core=debug"
    } else {
        "klvscope=info,klvscope_core=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
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
        CliError::new(format!("{err:#}"), None)
    }
}

fn cmd_decode(kind: InputKind, args: DecodeArgs) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&args.input, kind)?;
    validate_input_file(&resolved_input, kind)?;
    let report_path = if args.stdout {
        None
    } else {
        let path = args.report.ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?;
        ensure_distinct_output(&resolved_input, &path)?;
        Some(path)
    };

    let options = args.format.options();
    debug!(input = %resolved_input.display(), max_depth = options.max_depth, "decoding input");
    let rep = match kind {
        InputKind::Capture => analyze_pcap_file(&resolved_input, &options)
            .context("PCAP/PCAPNG decoding failed")?,
        InputKind::Klv => {
            analyze_klv_file(&resolved_input, &options).context("KLV file decoding failed")?
        }
    };
    let json = serialize_json(&rep, args.format.pretty, args.format.compact)?;

    match report_path {
        None => print!("{}", json),
        Some(path) => {
            write_report(&path, &json)?;
            if !args.quiet {
                eprintln!("OK: report written -> {}", path.display());
            }
        }
    }
    if !args.quiet {
        print_summary(&rep);
    }
    if args.strict && rep.summary.has_anomalies() {
        return Err(CliError::new(
            "decode anomalies detected",
            Some("inspect skipped_bytes and truncated_sets in the report summary".to_string()),
        ));
    }
    Ok(())
}

fn cmd_hex(args: HexArgs) -> Result<(), CliError> {
    let data = parse_hex_string(&args.hex).ok_or_else(|| {
        CliError::new(
            "invalid hex input",
            Some("use an even number of hex digits; whitespace is ignored".to_string()),
        )
    })?;
    let options = args.format.options();

    let fields = if args.local_set {
        decode_local_set_with(&data, &options)
    } else {
        try_parse_klv_packet(&data)
            .map_err(|err| {
                CliError::new(
                    format!("invalid KLV packet: {err}"),
                    Some("pass --local-set to decode a bare local set".to_string()),
                )
            })?
            .decode_with(&options)
    };

    let json = serialize_json(&fields, args.format.pretty, args.format.compact)?;
    println!("{}", json);
    Ok(())
}

fn ensure_distinct_output(input: &Path, report_path: &Path) -> Result<(), CliError> {
    let input_abs = fs::canonicalize(input)
        .with_context(|| format!("Failed to resolve input path: {}", input.display()))?;
    let parent = match report_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // A missing output directory is created later and cannot alias the input.
    let Ok(report_dir) = fs::canonicalize(parent) else {
        return Ok(());
    };
    let file_name = report_path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid report path: {}", report_path.display()))?;
    if report_dir.join(file_name) == input_abs {
        return Err(CliError::new(
            format!(
                "report path must differ from input: {}",
                report_path.display()
            ),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn write_report(path: &Path, json: &str) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(path, json).with_context(|| format!("Failed to write report: {}", path.display()))?;
    Ok(())
}

fn serialize_json<T: Serialize>(value: &T, pretty: bool, compact: bool) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(value)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(value)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn print_summary(rep: &Report) {
    let DecodeSummary {
        source_packets,
        klv_packets,
        skipped_bytes,
        truncated_sets,
        unknown_tags,
        ..
    } = &rep.summary;
    match source_packets {
        Some(frames) => eprintln!("Decoded {klv_packets} KLV packets from {frames} frames"),
        None => eprintln!("Decoded {klv_packets} KLV packets"),
    }
    if *skipped_bytes > 0 || *truncated_sets > 0 || *unknown_tags > 0 {
        eprintln!(
            "  skipped bytes: {skipped_bytes}, truncated sets: {truncated_sets}, unknown tags: {unknown_tags}"
        );
    }
}

fn validate_input_file(input: &Path, kind: InputKind) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some(kind.expected().to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some(kind.expected().to_string()),
        ));
    }
    if kind == InputKind::Capture {
        let ext = input
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        if ext != "pcap" && ext != "pcapng" {
            return Err(CliError::new(
                format!("unsupported input format '{}'", input.display()),
                Some(kind.expected().to_string()),
            ));
        }
    }
    Ok(())
}

fn resolve_input_path(input: &Path, kind: InputKind) -> Result<PathBuf, CliError> {
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

    match matches.len() {
        0 => Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some(format!("check the path or quote the pattern; {}", kind.expected())),
        )),
        1 => Ok(matches.remove(0)),
        count => {
            let mut listed = matches
                .iter()
                .take(3)
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            if count > 3 {
                listed.push_str(", ...");
            }
            Err(CliError::new(
                format!("multiple files match pattern '{pattern}' ({count} matches); matches: {listed}"),
                Some("pass a single input file, or run once per file".to_string()),
            ))
        }
    }
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
