//! aipack — PDS4 delivery package builder.
//!
//! The main entry point, handling:
//! - Product indexing and validation
//! - Transfer and checksum manifest generation
//! - AIP descriptor generation from a template
//! - Delivery archive assembly

use aipack_common::OutputFormat;
use aipack_core::config::{LayoutPolicy, PackagerConfig};
use aipack_core::exit_codes::ExitCode;
use aipack_core::logging::{init_logging, LogFormat};
use aipack_core::pipeline::Packager;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// aipack - package PDS4 products into an AIP delivery for ingestion
#[derive(Parser)]
#[command(name = "aipack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Output format for the summary printed on stdout
    #[arg(long, short = 'f', global = true, default_value = "text")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (errors only)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a delivery package from a directory of product labels
    Build(BuildArgs),

    /// Index and validate products without writing anything
    Check(CheckArgs),

    /// Print version information
    Version,
}

#[derive(Args, Debug)]
struct InputOpts {
    /// Root directory containing the product labels
    #[arg(short, long, default_value = ".", env = "AIPACK_INPUT_DIR")]
    input_dir: PathBuf,

    /// File pattern matching label names
    #[arg(short, long, default_value = "*.xml")]
    products: String,

    /// Do not descend into subdirectories
    #[arg(long)]
    no_recursive: bool,

    /// Archive tree layout
    #[arg(long, value_enum, default_value_t = LayoutPolicy::Flat)]
    layout: LayoutPolicy,
}

#[derive(Args, Debug)]
struct BuildArgs {
    #[command(flatten)]
    input: InputOpts,

    /// Output directory for the archive
    #[arg(short, long, default_value = ".", env = "AIPACK_OUTPUT_DIR")]
    output_dir: PathBuf,

    /// Descriptor template override (bundled template used when unset)
    #[arg(long, env = "AIPACK_TEMPLATE")]
    template: Option<PathBuf>,

    /// Keep the staging directory next to the archive
    #[arg(long)]
    keep_staging: bool,

    /// Sender code (defaults to the mission acronym of the bundle)
    #[arg(long)]
    sendfrom: Option<String>,

    /// Recipient code (defaults to the archive code)
    #[arg(long)]
    sendto: Option<String>,
}

#[derive(Args, Debug)]
struct CheckArgs {
    #[command(flatten)]
    input: InputOpts,
}

fn main() {
    let cli = Cli::parse();

    let log_format = if cli.global.log_json {
        LogFormat::Json
    } else {
        LogFormat::Human
    };
    init_logging(
        cli.global.verbose,
        cli.global.quiet,
        !cli.global.no_color,
        log_format,
    );

    let code = match cli.command {
        Commands::Build(args) => cmd_build(args, cli.global.format),
        Commands::Check(args) => cmd_check(args, cli.global.format),
        Commands::Version => cmd_version(),
    };
    std::process::exit(code.code());
}

fn build_config(input: InputOpts) -> PackagerConfig {
    PackagerConfig {
        input_dir: input.input_dir,
        pattern: input.products,
        recursive: !input.no_recursive,
        layout: input.layout,
        ..PackagerConfig::default()
    }
}

fn cmd_build(args: BuildArgs, format: OutputFormat) -> ExitCode {
    let mut config = build_config(args.input);
    config.output_dir = args.output_dir;
    config.template = args.template;
    config.clean = !args.keep_staging;
    config.sendfrom = args.sendfrom;
    config.sendto = args.sendto;

    match Packager::new(config).and_then(|packager| packager.run()) {
        Ok(summary) => {
            print!("{}", summary.render(format));
            ExitCode::Success
        }
        Err(err) => {
            eprintln!("aipack: error: {err}");
            err.exit_code()
        }
    }
}

fn cmd_check(args: CheckArgs, format: OutputFormat) -> ExitCode {
    match Packager::new(build_config(args.input)).and_then(|packager| packager.check()) {
        Ok(report) => {
            print!("{}", report.render(format));
            ExitCode::Success
        }
        Err(err) => {
            eprintln!("aipack: error: {err}");
            err.exit_code()
        }
    }
}

fn cmd_version() -> ExitCode {
    println!("aipack {}", env!("CARGO_PKG_VERSION"));
    ExitCode::Success
}
