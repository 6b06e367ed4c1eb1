//! Command line parsing and dispatch.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use serde::Serialize;

use crate::app::format::render_report;
use crate::app::generate::GenerateRequest;
use crate::app::language::Language;
use crate::app::runner::ProcessRunner;
use crate::app::scan::{Scanner, ScannerConfig};
use crate::domain::model::{CommandInvocation, ExecutionResult};
use crate::infra::config::Config;
use crate::ui::app::UiApp;

#[derive(Debug, Parser)]
#[command(name = "protoc-ui", author, version, about = "Generate protocol buffer bindings with protoc", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Preselect directories and language for the interactive UI
    #[command(flatten)]
    pub selection: SelectionArgs,
}

#[derive(Debug, Clone, Default, Args)]
pub struct SelectionArgs {
    /// Directory containing .proto files
    #[arg(short, long, value_name = "DIR")]
    pub input: Option<PathBuf>,

    /// Directory receiving generated code
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Output language (e.g. "C++", "Golang", go, python)
    #[arg(short, long, value_name = "LANG")]
    pub language: Option<Language>,

    /// protoc executable to run instead of the configured one
    #[arg(long, value_name = "PATH")]
    pub protoc: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate bindings without the interactive UI
    Generate {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Only include these files (repeatable); all scanned files otherwise
        #[arg(short, long = "file", value_name = "NAME")]
        files: Vec<String>,

        /// Print the protoc command line instead of running it
        #[arg(long)]
        dry_run: bool,

        /// Emit the invocation and its result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the .proto files found in a directory
    Scan {
        /// Directory to scan
        dir: PathBuf,
    },

    /// Show supported output languages and their protoc flags
    Languages,

    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl SelectionArgs {
    fn into_request(self, files: Vec<String>) -> GenerateRequest {
        GenerateRequest {
            input: self.input,
            output: self.output,
            language: self.language,
            files,
            protoc: self.protoc,
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    command: String,
    invocation: &'a CommandInvocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a ExecutionResult>,
}

/// Run the parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;

    match cli.command {
        None => {
            let mut app = UiApp::new(config, cli.selection.into_request(Vec::new()));
            app.run()
        }
        Some(Commands::Generate {
            selection,
            files,
            dry_run,
            json,
        }) => generate(&config, selection.into_request(files), dry_run, json),
        Some(Commands::Scan { dir }) => scan(&config, dir),
        Some(Commands::Languages) => languages(),
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "protoc-ui", &mut io::stdout());
            Ok(())
        }
    }
}

fn generate(config: &Config, request: GenerateRequest, dry_run: bool, json: bool) -> Result<()> {
    let scanner = Scanner::new();
    let mut stdout = io::stdout().lock();

    if dry_run {
        let invocation = request.plan(config, &scanner)?;
        if json {
            write_json(&mut stdout, &invocation, None)?;
        } else {
            writeln!(stdout, "{invocation}")?;
        }
        return Ok(());
    }

    let (invocation, result) = request.run(config, &scanner, &ProcessRunner::new())?;
    if json {
        write_json(&mut stdout, &invocation, Some(&result))?;
    } else {
        writeln!(
            stdout,
            "{}",
            render_report(&result, config.defaults.wrap_width())
        )?;
    }

    if let Some(reason) = result.exit_error {
        bail!("protoc failed: {reason}");
    }
    Ok(())
}

fn write_json(
    out: &mut impl Write,
    invocation: &CommandInvocation,
    result: Option<&ExecutionResult>,
) -> Result<()> {
    let report = JsonReport {
        command: invocation.to_string(),
        invocation,
        result,
    };
    serde_json::to_writer_pretty(&mut *out, &report).context("failed to serialize report")?;
    writeln!(out)?;
    Ok(())
}

fn scan(config: &Config, dir: PathBuf) -> Result<()> {
    let result = Scanner::new().scan(&ScannerConfig::from_root(dir, config))?;
    let mut stdout = io::stdout().lock();
    for file in &result.files {
        writeln!(stdout, "{file}")?;
    }
    Ok(())
}

fn languages() -> Result<()> {
    let mut stdout = io::stdout().lock();
    for language in Language::ALL {
        writeln!(stdout, "{:<12} {}", language.label(), language.flag())?;
    }
    Ok(())
}
