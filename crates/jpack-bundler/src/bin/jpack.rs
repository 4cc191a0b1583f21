/// jpack CLI

use std::path::PathBuf;
use std::process;
use anyhow::Context;
use clap::Parser;
use jpack_bundler::{Bundler, BundleOptions};
use jpack_bundler::driver::DEFAULT_TEMPLATE_COMMAND;
use jpack_bundler::vendor::default_vendor_dirs;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "jpack")]
#[command(about = "jpack - packs require()-linked scripts and components into one bundle")]
#[command(version)]
struct Args {
    /// Root source file or directory
    #[arg(long, value_name = "PATH")]
    root: PathBuf,

    /// Bundle file to write
    #[arg(long, value_name = "FILE")]
    out: PathBuf,

    /// Directory of pre-built vendor libraries (repeatable)
    #[arg(long = "vendor-dir", value_name = "DIR")]
    vendor_dirs: Vec<PathBuf>,

    /// Compile component templates into render functions
    #[arg(long)]
    compile_templates: bool,

    /// Command that compiles a template read from stdin
    #[arg(long, value_name = "CMD", default_value = DEFAULT_TEMPLATE_COMMAND)]
    template_compiler: String,

    /// Write collected component styles to this file
    #[arg(long, value_name = "FILE")]
    css_out: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "jpack=debug,jpack_bundler=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> anyhow::Result<()> {
    let vendor_dirs = if args.vendor_dirs.is_empty() {
        default_vendor_dirs()
    } else {
        args.vendor_dirs
    };

    let mut options = BundleOptions::new(&args.root, &args.out)
        .vendor_dirs(vendor_dirs)
        .compile_templates(args.compile_templates)
        .template_command(args.template_compiler);

    if let Some(css_out) = args.css_out {
        options = options.css_output(css_out);
    }

    let bundler = Bundler::new(options);
    let output = bundler
        .run()
        .with_context(|| format!("failed to bundle {}", args.root.display()))?;

    info!(
        modules = output.module_count,
        entry = output.entry,
        out = %args.out.display(),
        "bundle complete"
    );
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Bundling failed: {:#}", e);
        process::exit(1);
    }
}
