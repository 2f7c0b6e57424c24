//! Typed product items.

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use super::validator::validate_item;
use crate::error::{common, UtilsError};

/// `type` value of image items.
pub const IMAGE_TYPE: &str = "image/png";
/// `type` value of interactive plot items.
pub const PLOTLY_TYPE: &str = "plotly";

/// Severity of a text message item; also its `type` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    #[default]
    Info,
    Warning,
    Error,
    Danger,
    Success,
}

impl MessageLevel {
    pub const ALL: [MessageLevel; 5] = [
        MessageLevel::Info,
        MessageLevel::Warning,
        MessageLevel::Error,
        MessageLevel::Danger,
        MessageLevel::Success,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MessageLevel::Info => "info",
            MessageLevel::Warning => "warning",
            MessageLevel::Error => "error",
            MessageLevel::Danger => "danger",
            MessageLevel::Success => "success",
        }
    }
}

impl fmt::Display for MessageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageLevel {
    type Err = UtilsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MessageLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| common::unknown_kind(s))
    }
}

/// Coarse item kind, used to pick a validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Message,
    Image,
    Plotly,
}

impl ItemKind {
    /// Kind of a `type` string, or `None` if it is not a known item type.
    pub fn of(type_name: &str) -> Option<Self> {
        if type_name.parse::<MessageLevel>().is_ok() {
            Some(ItemKind::Message)
        } else if type_name == IMAGE_TYPE {
            Some(ItemKind::Image)
        } else if type_name == PLOTLY_TYPE {
            Some(ItemKind::Plotly)
        } else {
            None
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ItemKind::Message => "Message",
            ItemKind::Image => "Image",
            ItemKind::Plotly => "Plotly",
        }
    }
}

/// One entry of the `brainlife` list in `product.json`.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductItem {
    Message {
        level: MessageLevel,
        msg: String,
    },
    Image {
        name: String,
        base64: String,
    },
    Plotly {
        name: String,
        data: Vec<Map<String, Value>>,
        layout: Map<String, Value>,
    },
}

impl ProductItem {
    pub fn message(level: MessageLevel, msg: impl Into<String>) -> Self {
        ProductItem::Message {
            level,
            msg: msg.into(),
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self::message(MessageLevel::Info, msg)
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self::message(MessageLevel::Warning, msg)
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            ProductItem::Message { .. } => ItemKind::Message,
            ProductItem::Image { .. } => ItemKind::Image,
            ProductItem::Plotly { .. } => ItemKind::Plotly,
        }
    }

    /// The `type` value written for this item.
    pub fn type_name(&self) -> &'static str {
        match self {
            ProductItem::Message { level, .. } => level.as_str(),
            ProductItem::Image { .. } => IMAGE_TYPE,
            ProductItem::Plotly { .. } => PLOTLY_TYPE,
        }
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("type".into(), Value::from(self.type_name()));
        match self {
            ProductItem::Message { msg, .. } => {
                map.insert("msg".into(), Value::from(msg.as_str()));
            }
            ProductItem::Image { name, base64 } => {
                map.insert("name".into(), Value::from(name.as_str()));
                map.insert("base64".into(), Value::from(base64.as_str()));
            }
            ProductItem::Plotly { name, data, layout } => {
                map.insert("name".into(), Value::from(name.as_str()));
                map.insert(
                    "data".into(),
                    Value::Array(data.iter().cloned().map(Value::Object).collect()),
                );
                map.insert("layout".into(), Value::Object(layout.clone()));
            }
        }
        Value::Object(map)
    }
}

impl TryFrom<&Value> for ProductItem {
    type Error = UtilsError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        validate_item(value)
    }
}

impl TryFrom<Value> for ProductItem {
    type Error = UtilsError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        validate_item(&value)
    }
}

impl Serialize for ProductItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ProductItem::Message { level, msg } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", level.as_str())?;
                map.serialize_entry("msg", msg)?;
                map.end()
            }
            ProductItem::Image { name, base64 } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("type", IMAGE_TYPE)?;
                map.serialize_entry("name", name)?;
                map.serialize_entry("base64", base64)?;
                map.end()
            }
            ProductItem::Plotly { name, data, layout } => {
                let mut map = serializer.serialize_map(Some(4))?;
                map.serialize_entry("type", PLOTLY_TYPE)?;
                map.serialize_entry("name", name)?;
                map.serialize_entry("data", data)?;
                map.serialize_entry("layout", layout)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for ProductItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        validate_item(&value).map_err(|e| D::Error::custom(e.to_string()))
    }
}
