//! CLI command handler: size one directory on the local disk and print the total.

use anyhow::{Context as _, Result};
use log::{debug, info};
use std::path::Path;
use std::time::Duration;

use crate::Opts;
use crate::context::Context;
use crate::engine::arg_parser::Cli;
use crate::engine::tools::{check_root_and_canonicalize, human_bytes};
use crate::fs::{LocalFs, LocalFsOpts};
use crate::pipeline::Sizer;
use crate::utils::config::{SizerConsts, WorkerThreadLimits};
use crate::utils::dirsizer_toml::{apply_file_to_opts, load_dirsizer_toml};
use crate::utils::setup_logging;
use crate::{SizeResult, SizerOpts};

/// Build opts: config file first, then CLI flags on top.
fn setup_opts(cli: &Cli) -> Opts {
    let mut opts = Opts {
        config_path: cli.config.clone(),
        ..Opts::default()
    };
    if let Some(file) = load_dirsizer_toml(&cli.dir, cli.config.as_deref()) {
        apply_file_to_opts(&file, &mut opts);
    }
    if cli.workers.is_some() {
        opts.workers = cli.workers;
    }
    if cli.channel_cap.is_some() {
        opts.channel_cap = cli.channel_cap;
    }
    if cli.timeout.is_some() {
        opts.timeout_secs = cli.timeout;
    }
    if let Some(v) = cli.follow_links {
        opts.follow_links = v;
    }
    if !cli.exclude.is_empty() {
        opts.exclude = cli.exclude.clone();
    }
    if let Some(v) = cli.verbose {
        opts.verbose = v;
    }
    opts.bytes_only = cli.bytes;
    opts
}

fn sizer_opts(opts: &Opts) -> SizerOpts {
    SizerOpts {
        workers: opts
            .workers
            .unwrap_or_else(|| WorkerThreadLimits::current().workers()),
        file_channel_cap: opts.channel_cap.unwrap_or(SizerConsts::FILE_CHANNEL_CAP),
    }
}

/// Root context for the CLI: cancelled on Ctrl-C, bounded by `--timeout` when given.
fn cli_context(opts: &Opts) -> Result<Context> {
    let ctx = Context::new();
    let on_interrupt = ctx.clone();
    ctrlc::set_handler(move || on_interrupt.cancel()).context("install Ctrl-C handler")?;
    Ok(match opts.timeout_secs {
        Some(secs) => Context::with_timeout(&ctx, Duration::from_secs(secs)),
        None => ctx,
    })
}

/// Size `root` on the local disk with `opts` under `ctx`.
pub fn size_local_dir(ctx: &Context, root: &Path, opts: &Opts) -> Result<SizeResult> {
    let root = check_root_and_canonicalize(root)?;
    let sizer_opts = sizer_opts(opts);
    debug!(
        "{} CONFIG:{:#?} {:#?}",
        crate::utils::PackagePaths::get().pkg_name().to_uppercase(),
        opts,
        sizer_opts
    );
    let sizer = Sizer::new(LocalFs::new(LocalFsOpts::from(opts)), sizer_opts);
    let totals = sizer
        .size(ctx, root.clone())
        .with_context(|| format!("size {}", root.display()))?;
    Ok(totals)
}

pub fn format_totals(totals: &SizeResult, bytes_only: bool) -> String {
    if bytes_only {
        return totals.size.to_string();
    }
    format!(
        "{} ({} bytes) in {} files",
        human_bytes(totals.size),
        totals.size,
        totals.count
    )
}

/// Run the CLI: size DIR and print the total on stdout.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let opts = setup_opts(cli);
    setup_logging(opts.verbose);
    let ctx = cli_context(&opts)?;
    let totals = size_local_dir(&ctx, &cli.dir, &opts)?;
    info!("Sized {}", cli.dir.display());
    println!("{}", format_totals(&totals, opts.bytes_only));
    Ok(())
}
