use anyhow::Context;
use brainlife_utils::channels::{apply_bads, channel_types_summary, ChannelInfo, ChannelsTable};
use brainlife_utils::config::{json_kind, ConfigLoader, DEFAULT_CONFIG_FILE};
use brainlife_utils::files::{ensure_output_dirs, read_optional_files};
use brainlife_utils::report::{
    create_product_json, optional_files_messages, read_product_json, DEFAULT_PRODUCT_FILE,
};
use brainlife_utils::{ErrorCode, UtilsError};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, trace};

/// Helpers for brainlife.io neuroimaging apps
#[derive(Parser)]
#[command(name = "bl-utils")]
#[command(about = "Config, input file, channel and product.json helpers for brainlife.io apps", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect an app config.json
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Stage optional input files
    Files {
        #[command(subcommand)]
        command: FilesCommands,
    },
    /// Channel metadata helpers
    Channels {
        #[command(subcommand)]
        command: ChannelsCommands,
    },
    /// Validate or build product.json
    Product {
        #[command(subcommand)]
        command: ProductCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the normalized parameters
    Show {
        #[arg(default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,
    },
    /// Print the ids of the platform inputs
    Inputs {
        #[arg(default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,
    },
}

#[derive(Subcommand)]
enum FilesCommands {
    /// Resolve optional files and copy them into the output directory
    Stage {
        /// Path to config.json
        #[arg(short = 'c', long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
        /// Directory receiving the staged files
        #[arg(short = 'o', long, default_value = "out_dir")]
        out_dir: PathBuf,
    },
}

#[derive(Subcommand)]
enum ChannelsCommands {
    /// Replace the bads of a channel description with those of channels.tsv
    Reconcile {
        /// Channel description (JSON with ch_names, ch_types and bads)
        #[arg(long)]
        info: PathBuf,
        /// BIDS channels.tsv
        #[arg(long)]
        channels: PathBuf,
        /// Where to write the updated channel description
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Count channels per type
    Summary {
        #[arg(long)]
        info: PathBuf,
    },
}

#[derive(Subcommand)]
enum ProductCommands {
    /// Validate an existing product.json
    Validate {
        #[arg(default_value = DEFAULT_PRODUCT_FILE)]
        path: PathBuf,
    },
    /// Validate a list of items and write product.json
    Build {
        /// JSON file holding the list of items
        #[arg(long)]
        items: PathBuf,
        /// JSON file holding extra top-level fields
        #[arg(long)]
        unstructured: Option<PathBuf>,
        #[arg(short = 'o', long, default_value = DEFAULT_PRODUCT_FILE)]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .with_target(cli.verbose >= 2)
        .with_line_number(cli.verbose >= 2)
        .init();

    debug!("bl-utils started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());

    let result = match cli.command {
        Commands::Config { command } => run_config_command(command),
        Commands::Files { command } => run_files_command(command),
        Commands::Channels { command } => run_channels_command(command),
        Commands::Product { command } => run_product_command(command),
    };

    if let Err(e) = result {
        error!("Fatal error: {:#}", e);
        let utils_error = e.chain().find_map(|c| c.downcast_ref::<UtilsError>());
        match utils_error {
            Some(err) => {
                eprintln!("Error: {}", err.user_message());
                std::process::exit(err.exit_code());
            }
            None => {
                eprintln!("Error: {e:#}");
                std::process::exit(1);
            }
        }
    }
}

fn run_config_command(command: ConfigCommands) -> anyhow::Result<()> {
    match command {
        ConfigCommands::Show { path } => {
            let config = ConfigLoader::new(path).load()?;
            print_json(&config)
        }
        ConfigCommands::Inputs { path } => {
            let loaded = ConfigLoader::new(path).load_with_inputs()?;
            print_json(&loaded.inputs)
        }
    }
}

fn run_files_command(command: FilesCommands) -> anyhow::Result<()> {
    match command {
        FilesCommands::Stage { config, out_dir } => {
            let mut config = ConfigLoader::new(config).load()?;
            ensure_output_dirs([&out_dir])?;
            let files = read_optional_files(&mut config, &out_dir)?;
            let messages = optional_files_messages(&files);
            print_json(&json!({
                "files": files,
                "messages": messages,
                "config": config,
            }))
        }
    }
}

fn run_channels_command(command: ChannelsCommands) -> anyhow::Result<()> {
    match command {
        ChannelsCommands::Reconcile {
            info,
            channels,
            output,
        } => {
            let mut channel_info: ChannelInfo = read_json_as(&info)?;
            let table = ChannelsTable::from_path(&channels)?;
            let warning = apply_bads(&mut channel_info, table.bad_channels());

            if let Some(output) = output {
                let content = serde_json::to_string_pretty(&channel_info)?;
                fs::write(&output, content)
                    .with_context(|| format!("Failed to write {}", output.display()))?;
            }

            print_json(&json!({
                "updated": warning.is_some(),
                "bads": channel_info.bads,
                "warning": warning,
            }))
        }
        ChannelsCommands::Summary { info } => {
            let channel_info: ChannelInfo = read_json_as(&info)?;
            print_json(&channel_types_summary(&channel_info)?)
        }
    }
}

fn run_product_command(command: ProductCommands) -> anyhow::Result<()> {
    match command {
        ProductCommands::Validate { path } => {
            let document = read_product_json(&path)?;
            let kinds: Vec<&str> = document.items.iter().map(|i| i.type_name()).collect();
            print_json(&json!({
                "valid": true,
                "items": document.items.len(),
                "types": kinds,
                "unstructured_keys": document.unstructured.keys().collect::<Vec<_>>(),
            }))
        }
        ProductCommands::Build {
            items,
            unstructured,
            output,
        } => {
            let items = match read_json(&items)? {
                Value::Array(items) => items,
                other => {
                    return Err(UtilsError::validation_with_code(
                        ErrorCode::VALIDATION_WRONG_TYPE,
                        format!("items file must hold a list, got {}", json_kind(&other)),
                        Some("items".to_string()),
                    )
                    .into())
                }
            };
            let unstructured: Option<Map<String, Value>> = match unstructured {
                Some(path) => Some(read_json_as(&path)?),
                None => None,
            };

            create_product_json(&items, &output, unstructured.as_ref())?;
            print_json(&json!({
                "path": output,
                "items": items.len(),
            }))
        }
    }
}

fn read_json(path: &Path) -> brainlife_utils::Result<Value> {
    let content = fs::read_to_string(path)
        .map_err(|e| UtilsError::from(e).with_context(path.display()))?;
    serde_json::from_str(&content).map_err(|e| {
        UtilsError::validation_with_code(
            ErrorCode::VALIDATION_INVALID_INPUT,
            format!("{} is not valid JSON", path.display()),
            None,
        )
        .with_source(e)
    })
}

fn read_json_as<T: serde::de::DeserializeOwned>(path: &Path) -> brainlife_utils::Result<T> {
    serde_json::from_value(read_json(path)?).map_err(|e| {
        UtilsError::validation_with_code(
            ErrorCode::VALIDATION_INVALID_INPUT,
            format!("{} has an unexpected shape: {}", path.display(), e),
            None,
        )
    })
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
