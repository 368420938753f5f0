//! ezyc command-line interface.
//!
//! A single `build` subcommand, plus a bare-positional shorthand
//! (`ezyc foo.ez` is equivalent to `ezyc build foo.ez`) implemented by
//! inserting the subcommand name before parsing rather than duplicating
//! every flag across two argument structs.

use clap::{Parser as ClapParser, Subcommand};
use ezyc::TranspilerConfig;
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(ClapParser)]
#[command(name = "ezyc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Transpile ezy source files to C", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transpile a .ez source file to C
    Build {
        /// Input .ez source file
        input: PathBuf,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the parsed AST to stdout before the generated C source
        #[arg(long)]
        emit_ast: bool,

        /// Explicitly emit the generated C source (the default behavior;
        /// accepted for symmetry with --emit-ast)
        #[arg(long)]
        emit_c: bool,

        /// Verbose logging (DEBUG level instead of INFO)
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() {
    let mut argv: Vec<String> = std::env::args().collect();
    if argv.len() > 1 && argv[1] != "build" && argv[1] != "help" && !argv[1].starts_with('-') {
        argv.insert(1, "build".to_string());
    }
    let cli = Cli::parse_from(argv);

    match cli.command {
        Commands::Build { input, output, emit_ast, emit_c, verbose } => {
            run_build(&input, output.as_deref(), emit_ast, emit_c, verbose);
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).with_target(false).without_time().init();
}

/// With neither `--emit-ast` nor `--emit-c`, both are printed to stdout
/// (the AST first), matching the plain positional-argument contract. Either
/// flag alone narrows stdout to just that one.
fn run_build(input: &std::path::Path, output: Option<&std::path::Path>, emit_ast: bool, emit_c: bool, verbose: bool) {
    init_tracing(verbose);

    let src = match fs::read_to_string(input) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(path = %input.display(), %e, "could not read input file");
            eprintln!("error: could not read {}: {e}", input.display());
            process::exit(1);
        }
    };

    let config = TranspilerConfig::default();
    let want_ast = emit_ast || !emit_c;
    let want_c = emit_c || !emit_ast;

    let result = ezyc::parser::Parser::new(&src, &config).parse();
    if want_ast {
        for node in result.nodes.siblings(result.top_level) {
            println!("{:#?}", result.nodes.get(node));
        }
    }

    let mut diagnostics = result.diagnostics;
    let c_source = ezyc::transpiler::transpile(&result.nodes, result.top_level, &mut diagnostics, &config);

    if want_c {
        match output {
            Some(path) => {
                if let Err(e) = fs::write(path, &c_source) {
                    tracing::error!(path = %path.display(), %e, "could not write output file");
                    eprintln!("error: could not write {}: {e}", path.display());
                    process::exit(1);
                }
            }
            None => print!("{c_source}"),
        }
    }

    let warnings = diagnostics.iter().filter(|d| d.severity == ezyc::Severity::Warning).count();
    let errors = diagnostics.iter().filter(|d| d.severity == ezyc::Severity::Error).count();
    for d in diagnostics.iter() {
        eprintln!("{d}");
    }
    eprintln!("{warnings} warnings, {errors} errors");

    if diagnostics.has_errors() {
        process::exit(1);
    }
}
