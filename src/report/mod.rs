//! Structured reports (`product.json`) for the platform UI.
//!
//! Supported item types:
//! - `info`, `warning`, `error`, `danger`, `success`: text messages
//! - `image/png`: base64-encoded PNG images
//! - `plotly`: interactive Plotly plots with data and layout

pub mod item;
pub mod messages;
pub mod product;
pub mod validator;

pub use item::{ItemKind, MessageLevel, ProductItem, IMAGE_TYPE, PLOTLY_TYPE};
pub use messages::optional_files_messages;
pub use product::{
    assemble_document, create_product_json, parse_document, read_product_json, ImageSource,
    Product, ProductDocument, DEFAULT_PRODUCT_FILE, PRODUCT_KEY,
};
pub use validator::{
    validate_as, validate_image, validate_item, validate_items, validate_message, validate_plotly,
};
