use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ophir_core::{FailurePolicy, Operation, PassManager};
use ophir_emit::OpPrintingFlags;
use ophir_transform::{PassRegistry, PrintIrOptions, PrintIrPass};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "ophir")]
#[command(about = "ophir - run pass pipelines over operation IR and dump it between stages")]
#[command(version = "0.1.0")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[arg(long, value_enum, global = true)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a textual pass pipeline over an IR file
    Run {
        input: PathBuf,

        #[arg(short, long)]
        pass_pipeline: String,

        #[arg(long)]
        continue_on_failure: bool,

        #[arg(long)]
        stats: bool,
    },

    /// Dump an IR file once through the print-ir pass
    Print {
        input: PathBuf,

        #[arg(short, long, default_value = "")]
        label: String,

        /// Write the dump here instead of stderr
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long)]
        elide_large_elements: Option<usize>,

        #[arg(long)]
        debug_info: bool,

        #[arg(long)]
        value_users: bool,

        #[arg(long)]
        skip_regions: bool,

        #[arg(long)]
        color: bool,
    },

    /// List the passes a pipeline may use
    ListPasses,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.log_level);

    match cli.command {
        Commands::Run {
            input,
            pass_pipeline,
            continue_on_failure,
            stats,
        } => cmd_run(&input, &pass_pipeline, continue_on_failure, stats),
        Commands::Print {
            input,
            label,
            output,
            elide_large_elements,
            debug_info,
            value_users,
            skip_regions,
            color,
        } => {
            let options = PrintIrOptions {
                file_name: output,
                label,
            };
            let mut flags = OpPrintingFlags::new().with_colors(color);
            flags.elide_large_elements_attrs = elide_large_elements;
            flags.print_debug_info = debug_info;
            flags.print_value_users = value_users;
            flags.skip_regions = skip_regions;
            cmd_print(&input, options, flags)
        }
        Commands::ListPasses => cmd_list_passes(),
    }
}

fn setup_logging(verbose: u8, log_level: Option<LogLevel>) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if let Some(level) = log_level {
        EnvFilter::new(match level {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        })
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(match verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            })
        })
    };

    let formatter = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(formatter)
        .with(filter)
        .init();
}

fn load_unit(input: &Path) -> Result<Operation> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let unit = ophir_core::load_json(&content)
        .with_context(|| format!("failed to load IR from {}", input.display()))?;
    info!(
        input = %input.display(),
        operations = unit.num_operations(),
        "loaded IR"
    );
    Ok(unit)
}

fn cmd_run(input: &Path, pipeline: &str, continue_on_failure: bool, stats: bool) -> Result<()> {
    use colored::*;

    let mut unit = load_unit(input)?;
    let policy = if continue_on_failure {
        FailurePolicy::Continue
    } else {
        FailurePolicy::Halt
    };

    let mut manager = PassManager::new().with_failure_policy(policy);
    if stats {
        manager.enable_statistics();
    }
    PassRegistry::with_builtin_passes().populate(&mut manager, pipeline)?;

    let result = manager.run(&mut unit);

    if stats {
        println!("{}", " Pass statistics".bright_cyan().bold());
        println!("{}", "=".repeat(50).bright_cyan());
        for stat in manager.statistics() {
            let status = if stat.failed {
                "FAILED".bright_red().bold()
            } else {
                "ok".bright_green()
            };
            println!(
                "  {:<20} {:>10.3}ms  {}",
                stat.name,
                stat.duration.as_secs_f64() * 1000.0,
                status
            );
        }
    }

    result.map_err(Into::into)
}

fn cmd_print(input: &Path, options: PrintIrOptions, flags: OpPrintingFlags) -> Result<()> {
    let mut unit = load_unit(input)?;
    let mut manager = PassManager::new();
    manager.register_pass(PrintIrPass::new(options).with_printing_flags(flags));
    manager.run(&mut unit)?;
    Ok(())
}

fn cmd_list_passes() -> Result<()> {
    use colored::*;

    for info in PassRegistry::with_builtin_passes().passes() {
        println!("  {:<20} {}", info.name.bright_green(), info.description);
    }
    Ok(())
}
