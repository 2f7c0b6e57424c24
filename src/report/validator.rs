//! Shape checks for product items.
//!
//! Items arrive as arbitrary JSON. Each check confirms presence and JSON
//! shape of the fields the report UI reads and fails on the first problem,
//! naming the field.

use serde_json::{Map, Value};

use super::item::{ItemKind, MessageLevel, ProductItem, IMAGE_TYPE, PLOTLY_TYPE};
use crate::error::{common, ErrorCode, Result, UtilsError};

/// Non-PNG image types. They fail the image check instead of being reported
/// as unknown types.
const UNSUPPORTED_IMAGE_TYPES: [&str; 2] = ["image/jpeg", "image/svg+xml"];

/// Validate any product item, dispatching on its `type`.
pub fn validate_item(item: &Value) -> Result<ProductItem> {
    let (obj, type_name) = type_of("Product", item)?;
    match ItemKind::of(type_name) {
        Some(kind) => validate_fields(kind, obj, type_name),
        None if UNSUPPORTED_IMAGE_TYPES.contains(&type_name) => {
            Err(mismatched_kind(ItemKind::Image, type_name))
        }
        None => Err(common::unknown_kind(type_name)),
    }
}

/// Validate `item` as a specific kind. An item of another kind is rejected.
pub fn validate_as(kind: ItemKind, item: &Value) -> Result<ProductItem> {
    let (obj, type_name) = type_of(kind.label(), item)?;
    if ItemKind::of(type_name) != Some(kind) {
        return Err(mismatched_kind(kind, type_name));
    }
    validate_fields(kind, obj, type_name)
}

/// Text message: `type` is one of the message levels, `msg` is a string.
pub fn validate_message(item: &Value) -> Result<ProductItem> {
    validate_as(ItemKind::Message, item)
}

/// Image: `type` is `image/png`, `name` and `base64` are strings.
pub fn validate_image(item: &Value) -> Result<ProductItem> {
    validate_as(ItemKind::Image, item)
}

/// Plotly plot: `name` string, `data` list of dictionaries, `layout`
/// dictionary.
pub fn validate_plotly(item: &Value) -> Result<ProductItem> {
    validate_as(ItemKind::Plotly, item)
}

/// Validate a list of items; the error of the first bad item carries its
/// index.
pub fn validate_items(items: &[Value]) -> Result<Vec<ProductItem>> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| validate_item(item).map_err(|e| e.at_index(i)))
        .collect()
}

fn validate_fields(
    kind: ItemKind,
    obj: &Map<String, Value>,
    type_name: &str,
) -> Result<ProductItem> {
    let label = kind.label();
    match kind {
        ItemKind::Message => {
            let level: MessageLevel = type_name.parse()?;
            let msg = required_str(label, obj, "msg")?;
            Ok(ProductItem::Message {
                level,
                msg: msg.to_string(),
            })
        }
        ItemKind::Image => Ok(ProductItem::Image {
            name: required_str(label, obj, "name")?.to_string(),
            base64: required_str(label, obj, "base64")?.to_string(),
        }),
        ItemKind::Plotly => {
            let name = required_str(label, obj, "name")?.to_string();
            let data = required(label, obj, "data")?
                .as_array()
                .ok_or_else(|| common::wrong_type(label, "data", "a list"))?
                .iter()
                .enumerate()
                .map(|(i, point)| {
                    point.as_object().cloned().ok_or_else(|| {
                        UtilsError::validation_with_code(
                            ErrorCode::VALIDATION_WRONG_TYPE,
                            format!("Plotly data point {} must be a dictionary", i),
                            Some(format!("data[{}]", i)),
                        )
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            let layout = required(label, obj, "layout")?
                .as_object()
                .cloned()
                .ok_or_else(|| common::wrong_type(label, "layout", "a dictionary"))?;
            Ok(ProductItem::Plotly { name, data, layout })
        }
    }
}

fn type_of<'a>(label: &str, item: &'a Value) -> Result<(&'a Map<String, Value>, &'a str)> {
    let obj = item
        .as_object()
        .ok_or_else(|| common::wrong_type(label, "item", "a dictionary"))?;
    let type_name = required(label, obj, "type")?
        .as_str()
        .ok_or_else(|| common::wrong_type(label, "type", "a string"))?;
    Ok((obj, type_name))
}

fn required<'a>(label: &str, obj: &'a Map<String, Value>, field: &str) -> Result<&'a Value> {
    obj.get(field)
        .ok_or_else(|| common::missing_required_field(label, field))
}

fn required_str<'a>(label: &str, obj: &'a Map<String, Value>, field: &str) -> Result<&'a str> {
    required(label, obj, field)?
        .as_str()
        .ok_or_else(|| common::wrong_type(label, field, "a string"))
}

fn mismatched_kind(kind: ItemKind, got: &str) -> UtilsError {
    let expected = match kind {
        ItemKind::Message => MessageLevel::ALL
            .iter()
            .map(|l| format!("'{}'", l))
            .collect::<Vec<_>>()
            .join(", "),
        ItemKind::Image => format!("'{}'", IMAGE_TYPE),
        ItemKind::Plotly => format!("'{}'", PLOTLY_TYPE),
    };
    UtilsError::validation_with_code(
        ErrorCode::VALIDATION_UNKNOWN_KIND,
        format!("{} type must be {}, got '{}'", kind.label(), expected, got),
        Some("type".to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn assert_field_error(item: Value, code: u16, field: &str) {
        let err = validate_item(&item).unwrap_err();
        assert_eq!(err.code(), code, "unexpected error: {}", err);
        assert_eq!(err.field(), Some(field));
    }

    #[test]
    fn test_valid_message_items() {
        for level in MessageLevel::ALL {
            let item = json!({"type": level.as_str(), "msg": "ok"});
            assert_eq!(validate_item(&item).unwrap().to_value(), item);
        }
    }

    #[test]
    fn test_message_missing_msg() {
        assert_field_error(
            json!({"type": "info"}),
            ErrorCode::VALIDATION_MISSING_FIELD,
            "msg",
        );
    }

    #[test]
    fn test_message_msg_wrong_type() {
        assert_field_error(
            json!({"type": "warning", "msg": 42}),
            ErrorCode::VALIDATION_WRONG_TYPE,
            "msg",
        );
    }

    #[test]
    fn test_valid_image_item() {
        let item = json!({"type": "image/png", "name": "PSD", "base64": "iVBORw0KGgo="});
        assert_eq!(validate_item(&item).unwrap().to_value(), item);
    }

    #[test]
    fn test_image_missing_fields() {
        assert_field_error(
            json!({"type": "image/png", "base64": "aaaa"}),
            ErrorCode::VALIDATION_MISSING_FIELD,
            "name",
        );
        assert_field_error(
            json!({"type": "image/png", "name": "PSD"}),
            ErrorCode::VALIDATION_MISSING_FIELD,
            "base64",
        );
        assert_field_error(
            json!({"type": "image/png", "name": ["PSD"], "base64": "aaaa"}),
            ErrorCode::VALIDATION_WRONG_TYPE,
            "name",
        );
    }

    #[test]
    fn test_valid_plotly_item() {
        let item = json!({
            "type": "plotly",
            "name": "Events",
            "data": [{"x": "2014-06-11", "y": 10}, {"x": "2014-06-12", "y": 25}],
            "layout": {"title": "Counts", "xaxis": {"type": "date"}},
        });
        assert_eq!(validate_item(&item).unwrap().to_value(), item);
    }

    #[test]
    fn test_plotly_empty_data_is_valid() {
        let item = json!({"type": "plotly", "name": "n", "data": [], "layout": {}});
        assert!(validate_item(&item).is_ok());
    }

    #[test]
    fn test_plotly_shape_errors() {
        assert_field_error(
            json!({"type": "plotly", "name": "n", "data": {}, "layout": {}}),
            ErrorCode::VALIDATION_WRONG_TYPE,
            "data",
        );
        assert_field_error(
            json!({"type": "plotly", "name": "n", "data": [{}, 3], "layout": {}}),
            ErrorCode::VALIDATION_WRONG_TYPE,
            "data[1]",
        );
        assert_field_error(
            json!({"type": "plotly", "name": "n", "data": []}),
            ErrorCode::VALIDATION_MISSING_FIELD,
            "layout",
        );
        assert_field_error(
            json!({"type": "plotly", "name": "n", "data": [], "layout": []}),
            ErrorCode::VALIDATION_WRONG_TYPE,
            "layout",
        );
    }

    #[test]
    fn test_unknown_kinds_are_rejected() {
        for kind in ["image/jpeg", "image/svg+xml", "html", "INFO", ""] {
            assert_field_error(
                json!({"type": kind, "msg": "x"}),
                ErrorCode::VALIDATION_UNKNOWN_KIND,
                "type",
            );
        }

        let err = validate_item(&json!({"type": "image/jpeg", "name": "n", "base64": "b"}))
            .unwrap_err();
        assert!(err
            .to_string()
            .contains("Image type must be 'image/png', got 'image/jpeg'"));
    }

    #[test]
    fn test_missing_or_non_string_type() {
        assert_field_error(
            json!({"msg": "x"}),
            ErrorCode::VALIDATION_MISSING_FIELD,
            "type",
        );
        assert_field_error(
            json!({"type": 1, "msg": "x"}),
            ErrorCode::VALIDATION_WRONG_TYPE,
            "type",
        );
    }

    #[test]
    fn test_non_object_item() {
        let err = validate_item(&json!("info")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::VALIDATION_WRONG_TYPE);
    }

    #[test]
    fn test_validate_as_rejects_other_kinds() {
        let info = json!({"type": "info", "msg": "ok"});
        assert!(validate_message(&info).is_ok());

        let err = validate_image(&info).unwrap_err();
        assert_eq!(err.code(), ErrorCode::VALIDATION_UNKNOWN_KIND);
        assert!(err.to_string().contains("'image/png'"));

        assert!(validate_plotly(&info).is_err());
    }

    #[test]
    fn test_validate_items_reports_index() {
        let items = vec![
            json!({"type": "info", "msg": "ok"}),
            json!({"type": "success", "msg": "done"}),
            json!({"type": "image/png", "name": "x"}),
        ];

        let err = validate_items(&items).unwrap_err();

        assert_eq!(err.index(), Some(2));
        assert_eq!(err.field(), Some("base64"));
        assert!(err.to_string().contains("Invalid item at index 2"));
    }
}
