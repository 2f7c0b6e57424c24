//! # brainlife-utils
//!
//! Shared helpers for neuroimaging apps running on brainlife.io.
//!
//! ## Usage
//!
//! ```bash
//! bl-utils files stage --config config.json --out-dir out_dir
//! bl-utils product build --items items.json --output product.json
//! ```
//!
//! ## Modules
//!
//! - `config` - Load `config.json` and normalize app parameters
//! - `files` - Resolve and stage optional auxiliary input files
//! - `channels` - Channel metadata, `channels.tsv` and bad channel handling
//! - `report` - Validate and assemble `product.json` report items
//! - `plot` - Headless figure rendering to PNG/base64
//! - `error` - Error types and error codes
pub mod channels;
pub mod config;
pub mod error;
pub mod files;
pub mod plot;
pub mod report;


pub use channels::{
    channel_types_summary, update_bads, validate_input, ChannelInfo, ChannelTypeSummary,
    DataKind, Recording,
};
pub use config::{load_config, AppConfig};
pub use error::{ErrorCode, Result, UtilsError};
pub use files::{copy_optional_files, ensure_output_dirs, read_optional_files, OptionalFiles};
pub use plot::{save_figure_with_base64, save_plot_to_base64, FigureLayout};
pub use report::{
    create_product_json, optional_files_messages, validate_item, ImageSource, MessageLevel,
    Product, ProductItem,
};
