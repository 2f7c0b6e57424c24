//! Assembly of `product.json`, the document the platform UI renders next to
//! an app's outputs.

use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::item::{ItemKind, MessageLevel, ProductItem};
use super::validator::{validate_as, validate_items};
use crate::channels::{channel_types_summary, Recording};
use crate::error::{common, ErrorCode, ErrorExt, Result, UtilsError};
use crate::plot::encode_base64;

/// Top-level key holding the item list.
pub const PRODUCT_KEY: &str = "brainlife";
pub const DEFAULT_PRODUCT_FILE: &str = "product.json";

/// Where the pixels of an image item come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Already base64-encoded PNG data.
    Base64(String),
    /// PNG file to read and encode.
    File(PathBuf),
}

impl ImageSource {
    fn into_base64(self) -> Result<String> {
        match self {
            ImageSource::Base64(data) => Ok(data),
            ImageSource::File(path) => {
                if !path.exists() {
                    return Err(common::file_not_found("Image file", &path));
                }
                let bytes = fs::read(&path)
                    .to_storage_error(format!("Failed to read image {}", path.display()))?;
                Ok(encode_base64(&bytes))
            }
        }
    }
}

/// Ordered list of report items under construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Product {
    items: Vec<ProductItem>,
}

impl Product {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[ProductItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<ProductItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, item: ProductItem) -> &mut Self {
        self.items.push(item);
        self
    }

    /// Append a text message.
    pub fn add_info(&mut self, message: impl Into<String>, level: MessageLevel) -> &mut Self {
        self.push(ProductItem::message(level, message))
    }

    /// Append a message with a level given by name, e.g. from app config.
    pub fn add_message(&mut self, level: &str, message: impl Into<String>) -> Result<&mut Self> {
        let level = level.parse::<MessageLevel>().map_err(|_| {
            UtilsError::validation_with_code(
                ErrorCode::VALIDATION_UNKNOWN_KIND,
                format!(
                    "msg_type must be one of info, warning, error, danger, success, got '{}'",
                    level
                ),
                Some("msg_type".to_string()),
            )
        })?;
        Ok(self.add_info(message, level))
    }

    /// Append several messages of one level.
    pub fn extend_messages<I, S>(&mut self, level: MessageLevel, messages: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for message in messages {
            self.add_info(message, level);
        }
        self
    }

    /// Append a PNG image.
    pub fn add_image(
        &mut self,
        name: impl Into<String>,
        source: ImageSource,
    ) -> Result<&mut Self> {
        let base64 = source.into_base64()?;
        Ok(self.push(ProductItem::Image {
            name: name.into(),
            base64,
        }))
    }

    /// Append an interactive Plotly plot. `data` must be a list of
    /// dictionaries and `layout` a dictionary.
    pub fn add_plotly(
        &mut self,
        name: impl Into<String>,
        data: Value,
        layout: Value,
    ) -> Result<&mut Self> {
        let mut item = Map::new();
        item.insert("type".into(), Value::from(super::item::PLOTLY_TYPE));
        item.insert("name".into(), Value::String(name.into()));
        item.insert("data".into(), data);
        item.insert("layout".into(), layout);

        let item = validate_as(ItemKind::Plotly, &Value::Object(item))
            .map_err(|e| e.with_context("Invalid plotly item"))?;
        Ok(self.push(item))
    }

    /// Append a summary of a recording's channels, plus a warning listing
    /// its bad channels when there are any.
    pub fn add_recording_info(&mut self, recording: &Recording) -> Result<&mut Self> {
        let summary = channel_types_summary(&recording.info)?;
        let per_type = summary
            .iter()
            .map(|(ch_type, s)| format!("{} {}", s.count, ch_type))
            .collect::<Vec<_>>()
            .join(", ");
        let mut msg = format!(
            "{} data with {} channels",
            capitalize(&recording.kind.to_string()),
            recording.info.n_channels()
        );
        if !per_type.is_empty() {
            msg.push_str(&format!(" ({})", per_type));
        }
        self.add_info(msg, MessageLevel::Info);

        if !recording.info.bads.is_empty() {
            self.add_info(
                format!(
                    "{} bad channel(s): {}",
                    recording.info.bads.len(),
                    recording.info.bads.join(", ")
                ),
                MessageLevel::Warning,
            );
        }
        Ok(self)
    }

    /// Build the document, with `unstructured` fields at the top level.
    pub fn to_document(&self, unstructured: Option<&Map<String, Value>>) -> Result<Value> {
        let items = self.items.iter().map(ProductItem::to_value).collect();
        build_document(items, unstructured)
    }

    /// Write the document to `path`.
    pub fn write(
        &self,
        path: impl AsRef<Path>,
        unstructured: Option<&Map<String, Value>>,
    ) -> Result<()> {
        write_document(path.as_ref(), &self.to_document(unstructured)?)
    }
}

/// A parsed `product.json`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDocument {
    pub items: Vec<ProductItem>,
    /// Top-level keys other than `brainlife`.
    pub unstructured: Map<String, Value>,
}

impl ProductDocument {
    pub fn into_product(self) -> Product {
        Product { items: self.items }
    }
}

/// Validate `items` and assemble them into a product document.
///
/// Items are written exactly as given once they pass validation.
pub fn assemble_document(
    items: &[Value],
    unstructured: Option<&Map<String, Value>>,
) -> Result<Value> {
    validate_items(items)?;
    build_document(items.to_vec(), unstructured)
}

/// Validate `items` and write the product document to `path`.
pub fn create_product_json(
    items: &[Value],
    path: impl AsRef<Path>,
    unstructured: Option<&Map<String, Value>>,
) -> Result<()> {
    let document = assemble_document(items, unstructured)?;
    write_document(path.as_ref(), &document)
}

/// Parse and validate a product document.
pub fn parse_document(document: &Value) -> Result<ProductDocument> {
    let obj = document
        .as_object()
        .ok_or_else(|| common::wrong_type("Product", "document", "a dictionary"))?;
    let items = obj
        .get(PRODUCT_KEY)
        .ok_or_else(|| common::missing_required_field("Product document", PRODUCT_KEY))?
        .as_array()
        .ok_or_else(|| common::wrong_type("Product document", PRODUCT_KEY, "a list"))?;

    let items = validate_items(items)?;
    let unstructured = obj
        .iter()
        .filter(|(key, _)| key.as_str() != PRODUCT_KEY)
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Ok(ProductDocument {
        items,
        unstructured,
    })
}

/// Read and validate a `product.json` file.
pub fn read_product_json(path: impl AsRef<Path>) -> Result<ProductDocument> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(common::file_not_found("Product file", path));
    }
    let content = fs::read_to_string(path)
        .to_storage_error(format!("Failed to read {}", path.display()))?;
    let document: Value = serde_json::from_str(&content).map_err(|e| {
        UtilsError::validation_with_code(
            ErrorCode::VALIDATION_INVALID_INPUT,
            format!("{} is not valid JSON", path.display()),
            None,
        )
        .with_source(e)
    })?;
    parse_document(&document)
}

fn build_document(items: Vec<Value>, unstructured: Option<&Map<String, Value>>) -> Result<Value> {
    let mut document = Map::new();
    document.insert(PRODUCT_KEY.to_string(), Value::Array(items));

    if let Some(extra) = unstructured {
        if extra.contains_key(PRODUCT_KEY) {
            return Err(UtilsError::validation_with_code(
                ErrorCode::VALIDATION_RESERVED_KEY,
                format!("unstructured data may not contain the '{}' key", PRODUCT_KEY),
                Some(PRODUCT_KEY.to_string()),
            ));
        }
        for (key, value) in extra {
            document.insert(key.clone(), value.clone());
        }
    }

    Ok(Value::Object(document))
}

fn write_document(path: &Path, document: &Value) -> Result<()> {
    let json = serde_json::to_string_pretty(document)
        .to_storage_error("Failed to serialize product document")?;
    fs::write(path, json).to_storage_error(format!(
        "Failed to write product.json to {}",
        path.display()
    ))?;

    let count = document
        .get(PRODUCT_KEY)
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    info!(path = %path.display(), items = count, "Wrote product document");
    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests;
