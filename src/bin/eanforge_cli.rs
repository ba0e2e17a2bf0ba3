//! EANForge CLI - Bridge interface for host scripts
//!
//! Commands: profiles, check, render, batch
//! Outputs JSON to stdout, logs to stderr
//! Returns 2 on checksum failure, 1 on any other error

use base64::Engine as _;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

use eanforge_core::{
    logging::init_cli_logger, verify, BarcodePipeline, DigitString, LayoutGeometry,
    ProfileRegistry, RenderSink, SvgSink, TextRun, DEFAULT_PROFILE_ID,
};

#[derive(Parser)]
#[command(name = "eanforge-cli")]
#[command(about = "EANForge CLI - EAN-13 barcode artwork engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to layout profiles directory
    #[arg(long, default_value = "profiles")]
    profiles_dir: PathBuf,

    /// Layout profile ID
    #[arg(short, long, default_value = DEFAULT_PROFILE_ID)]
    profile: String,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Svg,
}

#[derive(Subcommand)]
enum Commands {
    /// List available layout profiles
    Profiles,

    /// Verify the check digit of a 13-digit code
    Check {
        #[arg(short, long)]
        code: String,
    },

    /// Render one symbol at the origin
    Render {
        #[arg(short, long)]
        code: String,

        /// Point size of the text the symbol stands in for
        #[arg(short, long, default_value_t = 10.0)]
        size: f64,

        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },

    /// Replace 13-digit text runs with barcodes
    Batch {
        /// JSON array of text runs, or @path to a file holding one
        #[arg(long)]
        payload: String,

        /// Fonts installed on the target
        #[arg(long, value_delimiter = ',', default_value = "MyriadPro-Regular")]
        fonts: Vec<String>,
    },
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => println!(r#"{{"error": "Serialization failed: {}"}}"#, e),
    }
}

fn fail(message: impl std::fmt::Display) -> ExitCode {
    print_json(&serde_json::json!({ "success": false, "error": message.to_string() }));
    ExitCode::FAILURE
}

fn read_payload(payload: &str) -> std::io::Result<String> {
    match payload.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path),
        None => Ok(payload.to_string()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_cli_logger(cli.verbose);

    // Load profiles
    let registry = match ProfileRegistry::load_from_dir(&cli.profiles_dir) {
        Ok(r) => r,
        Err(e) => return fail(e),
    };

    match cli.command {
        Commands::Profiles => {
            let profiles: Vec<_> = registry
                .list()
                .iter()
                .map(|p| serde_json::json!({
                    "id": p.id,
                    "name": p.name,
                    "version": p.profile_version,
                    "font": p.font_name,
                }))
                .collect();
            print_json(&serde_json::Value::from(profiles));
            ExitCode::SUCCESS
        }

        Commands::Check { code } => {
            let digits = match DigitString::parse(&code) {
                Ok(d) => d,
                Err(e) => {
                    print_json(&serde_json::json!({ "code": code, "valid": false, "error": e.to_string() }));
                    return ExitCode::from(2);
                }
            };
            match verify(&digits) {
                Ok(()) => {
                    print_json(&serde_json::json!({ "code": code, "valid": true }));
                    ExitCode::SUCCESS
                }
                Err(mismatch) => {
                    print_json(&serde_json::json!({
                        "code": code,
                        "valid": false,
                        "expected_check_digit": mismatch.expected,
                        "error": mismatch.to_string(),
                    }));
                    ExitCode::from(2)
                }
            }
        }

        Commands::Render { code, size, format } => {
            let pipeline = match BarcodePipeline::from_registry(&registry, &cli.profile) {
                Ok(p) => p,
                Err(e) => return fail(e),
            };
            let digits = match DigitString::parse(&code) {
                Ok(d) => d,
                Err(e) => return fail(e),
            };
            if let Err(mismatch) = verify(&digits) {
                print_json(&serde_json::json!({ "success": false, "error": mismatch.to_string() }));
                return ExitCode::from(2);
            }

            let geometry = LayoutGeometry::from_font_size(size, &pipeline.profile().layout);
            let symbol = pipeline.local_symbol(&digits, &geometry);

            match format {
                Format::Json => {
                    print_json(&serde_json::json!({ "success": true, "geometry": geometry, "symbol": symbol }));
                    ExitCode::SUCCESS
                }
                Format::Svg => {
                    let mut sink = SvgSink::new(vec![pipeline.profile().font_name.clone()]);
                    if let Err(e) = sink.draw_symbol(&symbol) {
                        return fail(e);
                    }
                    println!("{}", sink.finish());
                    ExitCode::SUCCESS
                }
            }
        }

        Commands::Batch { payload, fonts } => {
            let pipeline = match BarcodePipeline::from_registry(&registry, &cli.profile) {
                Ok(p) => p,
                Err(e) => return fail(e),
            };
            let runs: Vec<TextRun> = match read_payload(&payload)
                .map_err(|e| e.to_string())
                .and_then(|s| serde_json::from_str(&s).map_err(|e| e.to_string()))
            {
                Ok(r) => r,
                Err(e) => return fail(format!("Invalid payload: {}", e)),
            };

            let mut sink = SvgSink::new(fonts).with_sources(&runs);
            match pipeline.run_batch(&runs, &mut sink) {
                Ok(report) => {
                    let svg = base64::engine::general_purpose::STANDARD.encode(sink.finish());
                    let all_accepted = report.rejected().next().is_none();
                    print_json(&serde_json::json!({
                        "success": true,
                        "report": report,
                        "svg_base64": svg,
                    }));
                    if all_accepted {
                        ExitCode::SUCCESS
                    } else {
                        ExitCode::from(2)  // At least one checksum failure
                    }
                }
                Err(e) => fail(e),
            }
        }
    }
}
