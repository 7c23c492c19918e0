mod config;
mod load;
mod render;
mod serve;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::load::LoadError;
use crate::render::RenderFormat;

/// Output format for CLI status and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Speedrun split-history dashboard.
#[derive(Parser)]
#[command(name = "valruns", version, about = "Speedrun split-history dashboard")]
struct Cli {
    /// Output format for status and error messages (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Path to a valruns.toml configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the split table for a splits document
    Render {
        /// Path to the splits JSON document (defaults to [source] in the config)
        document: Option<PathBuf>,
        /// Fetch the document from a URL instead of a local file
        #[arg(long, conflicts_with = "document")]
        url: Option<String>,
        /// Rendering format
        #[arg(long, default_value = "html", value_enum)]
        format: RenderFormat,
        /// Banner shown above the table
        #[arg(long)]
        notice: Option<String>,
    },

    /// Check a splits document without rendering it
    Validate {
        /// Path to the splits JSON document
        document: PathBuf,
    },

    /// Start the dashboard HTTP server
    Serve {
        /// Port to listen on (default: VALRUNS_PORT, [server] port, then 8080)
        #[arg(long)]
        port: Option<u16>,
        /// Serve a local splits JSON document
        #[arg(long)]
        document: Option<PathBuf>,
        /// Serve a document fetched from a URL on every page load
        #[arg(long, conflicts_with = "document")]
        url: Option<String>,
        /// Banner shown above the table
        #[arg(long)]
        notice: Option<String>,
    },
}

/// Install the stderr log subscriber. `RUST_LOG` overrides the default.
fn init_tracing(default_directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Serve { .. } => init_tracing("info"),
        _ => init_tracing("warn"),
    }

    let config = match config::load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            report_error(&e, cli.output, cli.quiet);
            process::exit(1);
        }
    };

    match cli.command {
        Commands::Render {
            document,
            url,
            format,
            notice,
        } => {
            let source = match config.resolve_source(document, url) {
                Ok(s) => s,
                Err(e) => {
                    report_error(&e, cli.output, cli.quiet);
                    process::exit(1);
                }
            };
            let notice = config.resolve_notice(notice);
            cmd_render(source, format, notice.as_deref(), cli.output, cli.quiet);
        }
        Commands::Validate { document } => {
            cmd_validate(&document, cli.output, cli.quiet);
        }
        Commands::Serve {
            port,
            document,
            url,
            notice,
        } => {
            let (source, port) = match config
                .resolve_source(document, url)
                .and_then(|s| Ok((s, config.resolve_port(port)?)))
            {
                Ok(v) => v,
                Err(e) => {
                    report_error(&e, cli.output, cli.quiet);
                    process::exit(1);
                }
            };
            let notice = config.resolve_notice(notice);
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    report_error(
                        &format!("failed to create tokio runtime: {}", e),
                        cli.output,
                        cli.quiet,
                    );
                    process::exit(1);
                }
            };
            if let Err(e) = rt.block_on(serve::start_server(port, source.into_provider(), notice)) {
                report_error(&format!("server error: {}", e), cli.output, cli.quiet);
                process::exit(1);
            }
        }
    }
}

fn cmd_render(
    source: config::Source,
    format: RenderFormat,
    notice: Option<&str>,
    output: OutputFormat,
    quiet: bool,
) {
    let provider = source.into_provider();
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            report_error(&format!("failed to create tokio runtime: {}", e), output, quiet);
            process::exit(1);
        }
    };

    let dashboard = match rt.block_on(load::load_dashboard(provider.as_ref())) {
        Ok(d) => d,
        Err(e) => {
            report_load_error(&e, output, quiet);
            process::exit(1);
        }
    };

    match format {
        RenderFormat::Html => {
            print!(
                "{}",
                render::render_html(&dashboard, notice, &render::rendered_at())
            );
        }
        RenderFormat::Text => {
            print!("{}", render::render_text(&dashboard, notice));
        }
        RenderFormat::Json => {
            let pretty = serde_json::to_string_pretty(&render::render_json(&dashboard, notice))
                .unwrap_or_else(|e| format!("serialization error: {}", e));
            println!("{}", pretty);
        }
    }
}

static SPLITS_SCHEMA_STR: &str = include_str!("../../../docs/splits-schema.json");

/// Report a failed validation, tagged with its category.
fn report_invalid(kind: &str, errors: &[String], output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => {
            eprintln!("invalid document ({})", kind.replace('_', " "));
            for err in errors {
                eprintln!("  - {}", err);
            }
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "valid": false,
                "kind": kind,
                "errors": errors,
            });
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&json).unwrap_or_default()
            );
        }
    }
}

fn cmd_validate(document_path: &Path, output: OutputFormat, quiet: bool) {
    let schema: serde_json::Value = match serde_json::from_str(SPLITS_SCHEMA_STR) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("internal error: failed to parse embedded splits schema: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };
    let validator = match jsonschema::validator_for(&schema) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("internal error: failed to compile schema: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let doc_str = match std::fs::read_to_string(document_path) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error reading file '{}': {}", document_path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let doc: serde_json::Value = match serde_json::from_str(&doc_str) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("error parsing JSON in '{}': {}", document_path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    // Missing data is reported on its own, before any shape checking.
    let typed = valruns_interchange::from_document(&doc);
    if let Err(e) = &typed {
        if e.is_missing_data() {
            report_invalid("missing_data", &[e.to_string()], output, quiet);
            process::exit(1);
        }
    }

    let mut errors: Vec<String> = validator
        .iter_errors(&doc)
        .map(|e| format!("{}", e))
        .collect();

    let document = match typed {
        Ok(d) if errors.is_empty() => d,
        Ok(_) => {
            report_invalid("invalid_document", &errors, output, quiet);
            process::exit(1);
        }
        Err(e) => {
            if errors.is_empty() {
                errors.push(e.to_string());
            }
            report_invalid("invalid_document", &errors, output, quiet);
            process::exit(1);
        }
    };

    let table = match valruns_core::build_table(&document) {
        Ok(t) => t,
        Err(e) => {
            report_invalid("malformed_time", &[e.to_string()], output, quiet);
            process::exit(1);
        }
    };

    if !quiet {
        let runs = table.run_rows().count();
        match output {
            OutputFormat::Text => {
                println!(
                    "valid: {} segments, {} runs shown ({} attempts listed)",
                    table.columns.len(),
                    runs,
                    document.runs.len()
                );
            }
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "valid": true,
                    "segments": table.columns.len(),
                    "runs_shown": runs,
                    "attempts_listed": document.runs.len(),
                });
                println!("{}", json);
            }
        }
    }
}

fn report_load_error(error: &LoadError, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", error),
        OutputFormat::Json => {
            let json = serde_json::json!({
                "error": error.to_string(),
                "kind": error.kind(),
            });
            eprintln!("{}", json);
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
