use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use railcode_core::{DecodeReport, decode_envelope, make_report};

#[derive(Parser, Debug)]
#[command(name = "railcode")]
#[command(version)]
#[command(long_version = concat!(
    env!("CARGO_PKG_VERSION"),
    " (", env!("RAILCODE_BUILD_COMMIT"), " ", env!("RAILCODE_BUILD_DATE"), ")"
))]
#[command(
    about = "Structured-data decoder for railway ticket barcodes.",
    long_about = None,
    after_help = "Examples:\n  railcode decode ticket.bin -o report.json\n  railcode decode ticket.hex --hex --stdout --pretty\n  railcode decode ticket.bin --expect-version U2 --strict"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a barcode payload and generate a versioned JSON report.
    #[command(
        after_help = "Examples:\n  railcode decode ticket.bin -o report.json\n  railcode decode ticket.hex --hex --stdout"
    )]
    Decode {
        /// Path to the raw payload bytes (or hex text with --hex)
        input: PathBuf,

        /// Treat the input file as hex text instead of raw bytes
        #[arg(long)]
        hex: bool,

        /// Envelope version tag the payload is expected to carry
        #[arg(long, default_value = "U1")]
        expect_version: String,

        /// Output report path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        report: Option<PathBuf>,

        /// Write JSON report to stdout
        #[arg(long, conflicts_with = "report")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,

        /// Exit with a non-zero code if the envelope is invalid
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Decode {
            input,
            hex,
            expect_version,
            report,
            stdout,
            pretty,
            compact,
            quiet,
            strict,
        } => cmd_decode(
            input,
            hex,
            &expect_version,
            report,
            stdout,
            pretty,
            compact,
            quiet,
            strict,
        ),
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
        CliError::new(err.to_string(), None)
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_decode(
    input: PathBuf,
    hex: bool,
    expect_version: &str,
    report: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    compact: bool,
    quiet: bool,
    strict: bool,
) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("pass a file holding the barcode payload bytes".to_string()),
        ));
    }
    let meta = fs::metadata(&input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;
    if !meta.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("pass a file holding the barcode payload bytes".to_string()),
        ));
    }

    let payload = read_payload(&input, hex)?;
    let envelope = decode_envelope(&payload, expect_version);

    let mut rep = make_report(
        &input.display().to_string(),
        payload.len() as u64,
        &envelope,
    );
    rep.generated_at = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| railcode_core::DEFAULT_GENERATED_AT.to_string());

    let json = serialize_report(&rep, pretty, compact)?;

    if !quiet {
        if let Some(diagnostic) = envelope.error() {
            eprintln!("invalid envelope: {diagnostic}");
        }
    }

    if stdout {
        print!("{}", json);
    } else {
        let report = report.expect("report required when not using stdout");
        if let Some(parent) = report.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }
        }
        fs::write(&report, json)
            .with_context(|| format!("Failed to write report: {}", report.display()))?;
        if !quiet {
            eprintln!("OK: report written -> {}", report.display());
        }
    }

    if strict && !envelope.is_valid() {
        return Err(CliError::new(
            "envelope did not validate",
            Some("drop --strict to still get a report for invalid input".to_string()),
        ));
    }
    Ok(())
}

fn read_payload(input: &PathBuf, hex: bool) -> Result<Vec<u8>, CliError> {
    if !hex {
        return fs::read(input)
            .with_context(|| format!("Failed to read input file: {}", input.display()))
            .map_err(Into::into);
    }

    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;
    let digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    // Byte-index slicing below requires single-byte characters.
    if !digits.is_ascii() {
        return Err(CliError::new(
            "non-ASCII character in hex input",
            Some("hex input may contain only 0-9, a-f and whitespace".to_string()),
        ));
    }
    if digits.len() % 2 != 0 {
        return Err(CliError::new(
            "odd number of hex digits in input",
            Some("hex input must hold whole bytes".to_string()),
        ));
    }
    (0..digits.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| {
                CliError::new(
                    format!("invalid hex at offset {i}"),
                    Some("hex input may contain only 0-9, a-f and whitespace".to_string()),
                )
            })
        })
        .collect()
}

fn serialize_report(rep: &DecodeReport, pretty: bool, compact: bool) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}
