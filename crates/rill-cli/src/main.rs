// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Rill compiler command-line driver.
//!
//! Runs the front-end over each given source file: read, lex, parse,
//! render diagnostics. Later passes only run on files with no errors;
//! until those passes exist, `--ast` shows what they would receive.

use camino::Utf8PathBuf;
use clap::Parser as ClapParser;
use miette::Result;
use rill_core::CompileContext;
use rill_core::print::print_module;
use rill_core::source_analysis::{Diagnostic, Severity, SourceSpan, lex, parse};

mod diagnostic;

/// Rill: a small statically-typed, class-based language
#[derive(Debug, ClapParser)]
#[command(name = "rill")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Source files to compile
    #[arg(required = true)]
    files: Vec<Utf8PathBuf>,

    /// Dump the token stream of each file after lexing
    #[arg(long)]
    tokens: bool,

    /// Pretty-print the parsed module of each file
    #[arg(long)]
    ast: bool,
}

fn main() -> Result<()> {
    // Initialize tracing only when RUST_LOG is explicitly set, so normal
    // compiler output stays clean.
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .try_init();
    }

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let context = CompileContext {
        debug_output: cli.tokens,
    };

    let mut failed = false;
    for file in &cli.files {
        if !compile_file(file, &context, cli.ast) {
            failed = true;
        }
    }

    if failed {
        std::process::exit(1);
    }
    Ok(())
}

/// Runs the front-end over one file. Returns `false` if the file had
/// errors.
fn compile_file(file: &Utf8PathBuf, context: &CompileContext, show_ast: bool) -> bool {
    tracing::debug!(%file, "compiling");

    let source = match std::fs::read_to_string(file) {
        Ok(source) => source,
        Err(error) => {
            // A missing source file is the driver's one fatal condition:
            // the renderer exits after reporting it.
            let fatal = Diagnostic::new(
                SourceSpan::new(file.as_str(), 0, 0),
                Severity::Fatal,
                format!("could not open source file: {error}"),
            );
            diagnostic::render(&fatal, file.as_str(), "");
            return false;
        }
    };

    let (tokens, lex_diagnostics) = lex(file.as_str(), &source);
    if context.debug_output {
        println!("tokens of {file}:");
        for token in &tokens {
            println!(
                "  {:>5}..{:<5} {}",
                token.span().pos(),
                token.span().end(),
                token
            );
        }
    }

    let (module, parse_diagnostics) = parse(file.clone(), &tokens);

    let mut has_error = false;
    for diagnostic in lex_diagnostics.iter().chain(parse_diagnostics.iter()) {
        has_error |= diagnostic.severity.is_error();
        diagnostic::render(diagnostic, file.as_str(), &source);
    }

    if has_error {
        tracing::debug!(%file, "front-end failed, skipping later passes");
        return false;
    }

    if show_ast {
        print!("{}", print_module(&module));
    }
    true
}
