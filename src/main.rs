mod cli;

use reelforge::{config, plan};
use reelforge_common::{discover_inputs, InputSelection};
use reelforge_exec::{BatchConfig, BatchOrchestrator, BatchReport};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, ConvertArgs};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "reelforge=debug,reelforge_exec=debug,reelforge_av=debug,reelforge_common=debug"
                .to_string()
        } else {
            "reelforge=info,reelforge_exec=info,reelforge_av=warn,reelforge_common=warn".to_string()
        }
    });

    // Logs go to stderr so `--json` output stays machine readable
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Convert(args) => convert(args, cli.config.as_deref()),
        Commands::CheckTools => check_tools(cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("reelforge {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn convert(args: ConvertArgs, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    let selection = match args.recursive {
        Some(root) => InputSelection::Recursive {
            root,
            extensions: args.ext,
        },
        None => InputSelection::Files(args.input),
    };
    let inputs = discover_inputs(&selection).context("Failed to collect input files")?;

    if inputs.is_empty() {
        println!("No video files found.");
        return Ok(());
    }

    let ffmpeg = resolve_ffmpeg(config.tools.ffmpeg_path.as_deref(), args.dry_run)?;
    let mut settings = config.transcode_settings(ffmpeg);
    if let Some(codec) = args.codec {
        settings.video_codec = codec;
    }
    if let Some(crf) = args.crf {
        settings.crf = crf;
    }
    if let Some(preset) = args.preset {
        settings.preset = preset;
    }
    settings.overwrite |= args.overwrite;

    let plan = plan::build_plan(&inputs, &args.output, &settings)?;
    for collision in &plan.collisions {
        tracing::warn!(
            "{} inputs write to the same output {:?}: {:?}",
            collision.sources.len(),
            collision.destination,
            collision.sources
        );
    }

    // With --json, stdout carries only the report.
    let jobs = plan.jobs();
    for job in &jobs {
        if args.json {
            eprintln!("{}", job.command());
        } else {
            println!("{}", job.command());
        }
    }

    if args.dry_run {
        let summary = format!("[DRY RUN] Would run {} conversions", jobs.len());
        if args.json {
            eprintln!("{}", summary);
        } else {
            println!("\n{}", summary);
        }
        return Ok(());
    }

    if args.remove_source {
        tracing::warn!(
            "--remove-source is set: source files are deleted after a successful conversion"
        );
    }

    let batch = BatchConfig {
        max_concurrency: args.speedup.unwrap_or(config.workers.max_concurrency),
        delete_source_on_success: args.remove_source,
    };
    let orchestrator = BatchOrchestrator::new(batch)?;

    let rt = tokio::runtime::Runtime::new()?;
    let report = rt.block_on(orchestrator.run_batch(jobs))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    if report.has_failures() {
        anyhow::bail!(
            "{} of {} conversions failed, {} sources could not be removed",
            report.failed.len(),
            report.len(),
            report.cleanup_failures.len()
        );
    }

    Ok(())
}

/// Locate ffmpeg. A dry run never launches it, so it need not exist.
fn resolve_ffmpeg(configured: Option<&Path>, dry_run: bool) -> Result<PathBuf> {
    if dry_run {
        return Ok(configured
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("ffmpeg")));
    }
    reelforge_av::find_ffmpeg(configured)
        .context("ffmpeg is required for conversion (see `reelforge check-tools`)")
}

fn print_summary(report: &BatchReport) {
    println!();
    println!(
        "{} converted, {} failed",
        report.succeeded.len(),
        report.failed.len()
    );

    for failure in report.failures() {
        println!(
            "  ✗ {}: {}",
            failure.identity,
            failure.failure_summary().unwrap_or_default()
        );
    }

    for path in &report.removed_sources {
        println!("  removed {}", path.display());
    }

    for failure in &report.cleanup_failures {
        println!(
            "  ✗ could not remove {}: {}",
            failure.path.display(),
            failure.message
        );
    }
}

fn check_tools(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    println!("Checking external tools...\n");

    let status = reelforge_av::ffmpeg_status(config.tools.ffmpeg_path.as_deref());
    print!("{} ffmpeg", if status.is_usable() { "✓" } else { "✗" });
    if let Some(ref version) = status.version {
        print!(" ({})", version);
    }
    if let Some(ref path) = status.path {
        print!(" - {}", path.display());
    }
    println!();

    if let Some(ref configured) = status.configured {
        if status.path.as_deref() != Some(configured.as_path()) {
            println!("  configured as {}", configured.display());
        }
    }

    println!();
    if status.is_usable() {
        println!("All required tools are available!");
    } else {
        println!("ffmpeg is missing. Install it or set [tools] ffmpeg_path to convert files.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    println!("  Workers: {}", config.workers.max_concurrency);
    println!(
        "  Transcode: {} preset={} crf={}",
        config.transcode.video_codec, config.transcode.preset, config.transcode.crf
    );
    println!("  Overwrite: {}", config.transcode.overwrite);
    match config.tools.ffmpeg_path {
        Some(ref ffmpeg) => println!("  ffmpeg: {}", ffmpeg.display()),
        None => println!("  ffmpeg: from PATH"),
    }

    Ok(())
}
