use super::*;
use crate::channels::{ChannelInfo, DataKind};
use serde_json::json;
use tempfile::TempDir;

fn unstructured(value: Value) -> Map<String, Value> {
    value.as_object().unwrap().clone()
}

#[test]
fn test_assemble_single_message() {
    let document = assemble_document(&[json!({"type": "info", "msg": "ok"})], None).unwrap();
    assert_eq!(document, json!({"brainlife": [{"type": "info", "msg": "ok"}]}));
}

#[test]
fn test_assemble_empty_list() {
    let document = assemble_document(&[], None).unwrap();
    assert_eq!(document, json!({"brainlife": []}));
}

#[test]
fn test_assemble_with_unstructured_fields() {
    let extra = unstructured(json!({"snr": 12.5, "label": "subject-01"}));

    let document =
        assemble_document(&[json!({"type": "success", "msg": "done"})], Some(&extra)).unwrap();

    assert_eq!(
        document,
        json!({
            "brainlife": [{"type": "success", "msg": "done"}],
            "snr": 12.5,
            "label": "subject-01",
        })
    );
}

#[test]
fn test_assemble_keeps_items_unchanged() {
    let item = json!({"type": "info", "msg": "ok", "extra": true});
    let document = assemble_document(std::slice::from_ref(&item), None).unwrap();
    assert_eq!(document["brainlife"][0], item);
}

#[test]
fn test_assemble_rejects_invalid_item_with_index() {
    let items = [json!({"type": "info", "msg": "ok"}), json!({"type": "info"})];

    let err = assemble_document(&items, None).unwrap_err();

    assert_eq!(err.index(), Some(1));
    assert_eq!(err.field(), Some("msg"));
    assert_eq!(err.code(), ErrorCode::VALIDATION_MISSING_FIELD);
}

#[test]
fn test_reserved_key_in_unstructured() {
    let extra = unstructured(json!({"brainlife": []}));
    let err = assemble_document(&[], Some(&extra)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::VALIDATION_RESERVED_KEY);
}

#[test]
fn test_create_and_read_product_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(DEFAULT_PRODUCT_FILE);
    let items = vec![
        json!({"type": "warning", "msg": "bads updated"}),
        json!({"type": "image/png", "name": "PSD", "base64": "iVBORw0KGgo="}),
        json!({"type": "plotly", "name": "p", "data": [{"x": [1], "y": [2]}], "layout": {}}),
    ];
    let extra = unstructured(json!({"n_events": 42}));

    create_product_json(&items, &path, Some(&extra)).unwrap();
    let document = read_product_json(&path).unwrap();

    assert_eq!(document.items.len(), 3);
    let values: Vec<Value> = document.items.iter().map(ProductItem::to_value).collect();
    assert_eq!(values, items);
    assert_eq!(document.unstructured, extra);

    // Written pretty-printed with two-space indentation
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("\n  \"brainlife\""));
}

#[test]
fn test_create_product_json_does_not_write_on_invalid_item() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(DEFAULT_PRODUCT_FILE);

    let result = create_product_json(&[json!({"type": "video"})], &path, None);

    assert!(result.is_err());
    assert!(!path.exists());
}

#[test]
fn test_create_product_json_unwritable_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing-dir").join("product.json");

    let err = create_product_json(&[], &path, None).unwrap_err();

    assert!(matches!(err, UtilsError::Storage { .. }));
}

#[test]
fn test_read_product_json_errors() {
    let dir = TempDir::new().unwrap();

    let err = read_product_json(dir.path().join("product.json")).unwrap_err();
    assert_eq!(err.code(), ErrorCode::STORAGE_NOT_FOUND);

    let path = dir.path().join("bad.json");
    fs::write(&path, r#"{"items": []}"#).unwrap();
    let err = read_product_json(&path).unwrap_err();
    assert_eq!(err.field(), Some("brainlife"));

    fs::write(&path, "not json").unwrap();
    let err = read_product_json(&path).unwrap_err();
    assert_eq!(err.code(), ErrorCode::VALIDATION_INVALID_INPUT);
}

#[test]
fn test_product_builder() {
    let mut product = Product::new();
    product
        .add_info("Filtering done", MessageLevel::Success)
        .add_info("Check the PSD", MessageLevel::Info);
    product
        .add_image("PSD", ImageSource::Base64("iVBORw0KGgo=".into()))
        .unwrap();
    product
        .add_plotly("Trace", json!([{"x": 1, "y": 2}]), json!({"title": "t"}))
        .unwrap();

    let document = product.to_document(None).unwrap();

    assert_eq!(
        document,
        json!({"brainlife": [
            {"type": "success", "msg": "Filtering done"},
            {"type": "info", "msg": "Check the PSD"},
            {"type": "image/png", "name": "PSD", "base64": "iVBORw0KGgo="},
            {"type": "plotly", "name": "Trace", "data": [{"x": 1, "y": 2}], "layout": {"title": "t"}},
        ]})
    );
}

#[test]
fn test_add_message_by_name() {
    let mut product = Product::new();
    product.add_message("danger", "Data is clipped").unwrap();

    let err = product.add_message("critical", "nope").unwrap_err();

    assert_eq!(err.field(), Some("msg_type"));
    assert_eq!(product.len(), 1);
}

#[test]
fn test_add_plotly_rejects_bad_shapes() {
    let mut product = Product::new();

    let err = product
        .add_plotly("Trace", json!({"x": 1}), json!({}))
        .unwrap_err();
    assert_eq!(err.field(), Some("data"));

    let err = product
        .add_plotly("Trace", json!([1, 2]), json!({}))
        .unwrap_err();
    assert_eq!(err.field(), Some("data[0]"));

    let err = product
        .add_plotly("Trace", json!([]), json!("title"))
        .unwrap_err();
    assert_eq!(err.field(), Some("layout"));
    assert!(err.to_string().contains("Invalid plotly item"));

    assert!(product.is_empty());
}

#[test]
fn test_add_image_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("psd.png");
    fs::write(&path, b"\x89PNG").unwrap();

    let mut product = Product::new();
    product
        .add_image("PSD", ImageSource::File(path.clone()))
        .unwrap();

    match &product.items()[0] {
        ProductItem::Image { name, base64 } => {
            assert_eq!(name, "PSD");
            assert_eq!(base64, "iVBORw==");
        }
        other => panic!("unexpected item {:?}", other),
    }
}

#[test]
fn test_add_image_missing_file() {
    let mut product = Product::new();

    let err = product
        .add_image("PSD", ImageSource::File(PathBuf::from("/nonexistent/psd.png")))
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::STORAGE_NOT_FOUND);
    assert!(product.is_empty());
}

#[test]
fn test_add_recording_info() {
    let recording = Recording::new(
        DataKind::Raw,
        ChannelInfo {
            ch_names: vec!["MEG0111".into(), "MEG0112".into(), "EEG001".into()],
            ch_types: vec!["mag".into(), "grad".into(), "eeg".into()],
            bads: vec!["MEG0112".into()],
        },
    );

    let mut product = Product::new();
    product.add_recording_info(&recording).unwrap();

    assert_eq!(
        product.items(),
        &[
            ProductItem::info("Raw data with 3 channels (1 eeg, 1 grad, 1 mag)"),
            ProductItem::warning("1 bad channel(s): MEG0112"),
        ]
    );
}

#[test]
fn test_product_write_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("product.json");
    let mut product = Product::new();
    product.extend_messages(MessageLevel::Warning, ["a", "b", "c"]);

    product.write(&path, None).unwrap();
    let document = read_product_json(&path).unwrap();

    assert!(document.unstructured.is_empty());
    assert_eq!(document.into_product(), product);
}
