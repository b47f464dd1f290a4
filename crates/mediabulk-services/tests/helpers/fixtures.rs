//! Test fixtures: catalogs and uploaded files on disk.

use std::path::Path;

use mediabulk_core::models::UploadedFile;

/// Minimal valid 1x1 PNG bytes.
pub fn create_minimal_png() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00, 0x90,
        0x77, 0x53, 0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49, 0x44, 0x41, 0x54, 0x08, 0xD7, 0x63, 0xF8,
        0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x18, 0xDD, 0x8D, 0x89, 0x00, 0x00, 0x00,
        0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ]
}

/// Write `data` as a temporary upload named `filename`.
///
/// Each upload gets its own directory so several uploads may share a name.
pub async fn write_upload(root: &Path, filename: &str, data: &[u8]) -> UploadedFile {
    let dir = root.join(format!("upload-{}", uuid::Uuid::new_v4()));
    tokio::fs::create_dir_all(&dir).await.unwrap();
    let path = dir.join(filename);
    tokio::fs::write(&path, data).await.unwrap();
    UploadedFile::new(filename, path, data.len() as u64)
}

/// Upload of `size` zero bytes.
pub async fn sized_upload(root: &Path, filename: &str, size: usize) -> UploadedFile {
    write_upload(root, filename, &vec![0u8; size]).await
}

/// Two overlapping media types: `type_a` takes jpg/png up to 1MB, `type_b`
/// takes png/gif up to 5MB. Both carry `field_credit`; only `type_a` has
/// `field_alt`.
pub fn overlapping_catalog(form_mode: Option<&str>) -> String {
    let form_mode = match form_mode {
        Some(mode) => format!("\"{}\"", mode),
        None => "null".to_string(),
    };
    format!(
        r#"{{
        "bulk_configs": [
            {{"id": "gallery", "label": "Gallery", "content_types": ["type_a", "type_b"], "form_mode": {form_mode}}}
        ],
        "content_types": [
            {{
                "id": "type_a",
                "label": "TypeA",
                "source_field": "field_media_a",
                "fields": [
                    {{"name": "field_media_a", "settings": {{"file_extensions": "jpg png", "max_filesize": "1 MB", "file_directory": "a/[date:custom:Y]"}}}},
                    {{"name": "field_credit"}},
                    {{"name": "field_alt"}}
                ]
            }},
            {{
                "id": "type_b",
                "label": "TypeB",
                "source_field": "field_media_b",
                "fields": [
                    {{"name": "field_media_b", "settings": {{"file_extensions": "png gif", "max_filesize": "5 MB", "file_directory": "b", "uri_scheme": "private"}}}},
                    {{"name": "field_credit"}}
                ]
            }}
        ],
        "form_displays": [
            {{
                "content_type": "type_a",
                "mode": "bulk",
                "components": [
                    {{"field_name": "field_media_a", "weight": 0, "widget": {{"kind": "input", "key": "target_id", "type": "managed_file", "required": true}}}},
                    {{"field_name": "field_credit", "weight": 1, "widget": {{"kind": "group", "key": "widget", "required": true, "children": [{{"kind": "input", "key": "value", "required": true}}]}}}},
                    {{"field_name": "field_alt", "weight": 2, "widget": {{"kind": "input", "key": "value", "required": true}}}}
                ]
            }},
            {{
                "content_type": "type_b",
                "mode": "default",
                "components": [
                    {{"field_name": "field_media_b", "weight": 0, "widget": {{"kind": "input", "key": "target_id", "type": "managed_file"}}}},
                    {{"field_name": "field_credit", "weight": 1, "widget": {{"kind": "input", "key": "value"}}}}
                ]
            }}
        ],
        "servers": [
            {{"id": "solr", "name": "Solr", "backend": {{"plugin_id": "search_api_solr", "capabilities": ["solr_admin", "facets"]}}}},
            {{"id": "database", "name": "Database", "backend": {{"plugin_id": "search_api_db", "capabilities": ["facets"]}}}}
        ]
    }}"#
    )
}
