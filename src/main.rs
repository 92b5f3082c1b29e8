use docbatch::{
    browse, config, conversion,
    grid::{self, StatusGrid},
    runner::{BatchRunner, ChannelObserver, ConversionBatch},
    selection,
};
use docbatch_common::{FailureReporting, Operation};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};

mod cli;

struct RunArgs {
    operation: Operation,
    output: Option<PathBuf>,
    jobs: Option<usize>,
    strict: bool,
    recursive: bool,
    inputs: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "docbatch=trace,docbatch_convert=debug".to_string()
        } else {
            "docbatch=info,docbatch_convert=info".to_string()
        }
    });

    // Logs go to stderr so the status grid on stdout stays readable
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            operation,
            output,
            jobs,
            strict,
            recursive,
            inputs,
        } => run_batch(
            RunArgs {
                operation,
                output,
                jobs,
                strict,
                recursive,
                inputs,
            },
            cli.config.as_deref(),
        ),
        Commands::Browse { path, json } => browse_folders(path.as_deref(), json),
        Commands::Operations => list_operations(),
        Commands::CheckTools => check_tools(cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("docbatch {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn run_batch(args: RunArgs, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    let output_dir = args
        .output
        .or_else(|| config::configured_output_dir(&config))
        .unwrap_or_else(browse::default_output_dir);
    let output_dir = browse::validate_output_dir(&output_dir)
        .with_context(|| format!("Invalid output directory: {:?}", output_dir))?;

    let files = selection::collect_inputs(args.operation, &args.inputs, args.recursive)?;
    if files.is_empty() {
        tracing::warn!("Nothing to convert");
        println!(
            "No {} files selected.",
            selection::extension_filter(args.operation)
        );
        return Ok(());
    }

    let mut batch = ConversionBatch::new(args.operation, output_dir, files);
    let converter = conversion::build_converter(args.operation, batch.output_dir(), &config)?;

    let reporting = if args.strict {
        FailureReporting::Strict
    } else {
        config.conversion.failure_reporting
    };
    let runner = BatchRunner::new(conversion::max_concurrency(
        args.operation,
        &config.conversion,
        args.jobs,
    ))?
    .with_failure_reporting(reporting);

    println!(
        "{}: {} file(s) -> {}",
        args.operation.display_name(),
        batch.len(),
        batch.output_dir().display()
    );

    let mut status_grid = StatusGrid::from_batch(&batch);
    let (observer, mut updates) = ChannelObserver::channel();

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let worker = tokio::task::spawn_blocking(move || {
            runner.run(&mut batch, converter.as_ref(), &observer)
        });

        // This task is the only writer of the grid.
        while let Some(update) = updates.recv().await {
            status_grid.apply(&update);
            println!("{}", grid::render_update(&update));
        }

        worker.await.context("Conversion worker panicked")??;

        println!();
        print!("{}", status_grid.render());
        let counts = status_grid.counts();
        println!(
            "\n{} succeeded, {} failed",
            counts.succeeded, counts.failed
        );
        Ok::<(), anyhow::Error>(())
    })
}

fn browse_folders(path: Option<&Path>, json: bool) -> Result<()> {
    let entries = match path {
        Some(p) => browse::list_children(p)?,
        None => browse::root_locations(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if let Some(p) = path {
        let crumbs: Vec<String> = browse::breadcrumbs(p).into_iter().map(|(n, _)| n).collect();
        println!("{}\n", crumbs.join(" > "));
    }

    if entries.is_empty() {
        println!("(no sub-folders)");
    }
    for entry in &entries {
        let leaf = if entry.is_leaf { "" } else { "  >" };
        println!("{:<24} {}{}", entry.name, entry.path.display(), leaf);
    }

    Ok(())
}

fn list_operations() -> Result<()> {
    for op in Operation::ALL {
        println!(
            "{:<12} {:<12} {:<14} max concurrency {}",
            op.to_string(),
            op.display_name(),
            selection::extension_filter(op),
            op.default_max_concurrency()
        );
    }
    Ok(())
}

fn check_tools(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    println!("Checking external tools...\n");

    let tools = docbatch_convert::check_tools(&config.tools.tool_paths());
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Install LibreOffice and poppler-utils to enable all operations.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            print_config_summary(&config);
        }
        None => {
            println!("No config file specified, using defaults");
            print_config_summary(&config::Config::default());
        }
    }

    Ok(())
}

fn print_config_summary(config: &config::Config) {
    println!(
        "  Output dir: {}",
        config::configured_output_dir(config)
            .unwrap_or_else(browse::default_output_dir)
            .display()
    );
    println!("  Failure reporting: {}", config.conversion.failure_reporting);
    println!(
        "  Images: {} dpi, quality {}",
        config.image.dpi, config.image.jpeg_quality
    );
}
