use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::core::document::TemplateDocument;
use crate::core::shared::align_to_four;
use crate::io::data_uri::is_data_uri;

#[remain::sorted]
#[derive(Debug, thiserror::Error)]
pub enum Err {
    #[error("Failed to import buffers: {0}")]
    BufferError(String),
    #[error("Invalid buffer view {index}: {reason}")]
    InvalidBufferView { index: usize, reason: String },
    #[error("Failed to load glTF: {0}")]
    InvalidDocument(String),
    #[error("Failed to read template {}: {source}", .path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Loads the glTF or GLB template stored at `path`.
/// Relative buffer URIs are resolved against the directory holding the template.
pub fn load_template<P: AsRef<Path>>(path: P) -> Result<TemplateDocument, Err> {
    let path = path.as_ref();
    let contents = std::fs::read(path)
        .map_err(|source| Err::IoError { path: path.to_path_buf(), source })?;

    let document = load_template_from_slice(&contents, path.parent())?;
    debug!(
        template = %path.display(),
        images = document.num_images(),
        binary_len = document.binary().len(),
        "loaded template"
    );
    Ok(document)
}

/// Loads a template from an in-memory glTF JSON document or GLB container.
/// Without `base_dir`, only embedded buffers (data URIs or the GLB blob) can be resolved.
pub fn load_template_from_slice(contents: &[u8], base_dir: Option<&Path>) -> Result<TemplateDocument, Err> {
    let (json, blob) = if contents.starts_with(b"glTF") {
        let glb = gltf::Glb::from_slice(contents)
            .map_err(|e| Err::InvalidDocument(format!("Failed to parse GLB: {}", e)))?;
        (glb.json.into_owned(), glb.bin.map(|bin| bin.into_owned()))
    } else {
        (contents.to_vec(), None)
    };

    let document = match gltf::Gltf::from_slice(&json) {
        Ok(gltf) => gltf.document,
        Err(e) => {
            // The unvalidated parse only tells a broken document apart from an invalid one.
            return Err(match gltf::Gltf::from_slice_without_validation(&json) {
                Ok(_) => Err::InvalidDocument(format!("template failed glTF validation: {}", e)),
                Err(gltf_e) => Err::InvalidDocument(format!("{} (validation error: {})", gltf_e, e)),
            });
        }
    };

    let external_images = document.images()
        .filter(|image| matches!(image.source(), gltf::image::Source::Uri { uri, .. } if !is_data_uri(uri)))
        .count();
    if external_images > 0 {
        debug!(external_images, "template references external image files");
    }

    let buffers = gltf::import_buffers(&document, base_dir, blob)
        .map_err(|e| Err::BufferError(e.to_string()))?;

    let mut root: Value = serde_json::from_slice(&json)
        .map_err(|e| Err::InvalidDocument(e.to_string()))?;
    let binary = merge_buffers(&mut root, buffers)?;

    Ok(TemplateDocument::from_parts(root, binary))
}

/// Concatenates all buffers into the single GLB binary buffer.
///
/// Each buffer starts on a four-byte boundary. Buffer views pointing into later
/// buffers are rebased onto buffer 0, which loses its `uri` and covers the whole
/// blob. The remaining buffer entries are dropped.
fn merge_buffers(root: &mut Value, buffers: Vec<gltf::buffer::Data>) -> Result<Vec<u8>, Err> {
    if buffers.is_empty() {
        return Ok(Vec::new());
    }

    let mut binary = Vec::new();
    let mut offsets = Vec::with_capacity(buffers.len());
    for data in buffers {
        offsets.push(binary.len());
        binary.extend_from_slice(&data.0);
        binary.resize(align_to_four(binary.len()), 0);
    }

    if let Some(views) = root.get_mut("bufferViews").and_then(Value::as_array_mut) {
        for (index, view) in views.iter_mut().enumerate() {
            let buffer = view.get("buffer")
                .and_then(Value::as_u64)
                .ok_or_else(|| Err::InvalidBufferView { index, reason: "missing buffer index".to_string() })?
                as usize;
            let base = *offsets.get(buffer)
                .ok_or_else(|| Err::InvalidBufferView { index, reason: format!("buffer {} does not exist", buffer) })?;
            if buffer == 0 {
                continue;
            }
            let offset = view.get("byteOffset").and_then(Value::as_u64).unwrap_or(0) as usize;
            view["buffer"] = Value::from(0);
            view["byteOffset"] = Value::from(base + offset);
        }
    }

    if let Some(entries) = root.get_mut("buffers").and_then(Value::as_array_mut) {
        entries.truncate(1);
        if let Some(first) = entries.first_mut().and_then(Value::as_object_mut) {
            first.remove("uri");
            first.insert("byteLength".to_string(), Value::from(binary.len()));
        }
    }

    Ok(binary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::data_uri;
    use serde_json::json;

    fn two_buffer_template() -> Vec<u8> {
        let first = data_uri::encode("application/octet-stream", &[1, 2, 3, 4, 5, 6]);
        let second = data_uri::encode("application/octet-stream", &[7, 8, 9, 10]);
        serde_json::to_vec(&json!({
            "asset": { "version": "2.0" },
            "buffers": [
                { "byteLength": 6, "uri": first },
                { "byteLength": 4, "uri": second },
            ],
            "bufferViews": [
                { "buffer": 0, "byteOffset": 2, "byteLength": 4 },
                { "buffer": 1, "byteLength": 2 },
                { "buffer": 1, "byteOffset": 2, "byteLength": 2 },
            ],
            "images": [
                { "uri": "a.png" },
                { "bufferView": 1, "mimeType": "image/png" },
            ]
        })).unwrap()
    }

    #[test]
    fn test_merges_buffers_and_rebases_views() {
        let doc = load_template_from_slice(&two_buffer_template(), None).unwrap();
        assert_eq!(doc.binary(), &[1, 2, 3, 4, 5, 6, 0, 0, 7, 8, 9, 10]);

        let json = doc.json();
        assert_eq!(json["buffers"], json!([{ "byteLength": 12 }]));
        assert_eq!(json["bufferViews"][0], json!({ "buffer": 0, "byteOffset": 2, "byteLength": 4 }));
        assert_eq!(json["bufferViews"][1], json!({ "buffer": 0, "byteLength": 2, "byteOffset": 8 }));
        assert_eq!(json["bufferViews"][2], json!({ "buffer": 0, "byteOffset": 10, "byteLength": 2 }));
        assert_eq!(doc.num_images(), 2);
    }

    #[test]
    fn test_loads_glb_container() {
        let json = br#"{"asset":{"version":"2.0"},"buffers":[{"byteLength":4}],"images":[{"uri":"x.png"}]}"#;
        let mut glb = Vec::new();
        crate::io::gltf::encode::write_glb(&mut glb, json, &[1, 2, 3, 4]).unwrap();

        let doc = load_template_from_slice(&glb, None).unwrap();
        assert_eq!(doc.binary(), &[1, 2, 3, 4]);
        assert_eq!(doc.image_uri(0), Some("x.png"));
        assert_eq!(doc.json()["buffers"], json!([{ "byteLength": 4 }]));
    }

    #[test]
    fn test_document_without_buffers() {
        let json = br#"{"asset":{"version":"2.0"},"images":[{"uri":"a.png"},{"uri":"b.png"},{"uri":"c.jpg"}]}"#;
        let doc = load_template_from_slice(json, None).unwrap();
        assert!(doc.binary().is_empty());
        assert_eq!(doc.num_images(), 3);
    }

    #[test]
    fn test_malformed_document() {
        let err = load_template_from_slice(b"{ this is not json", None).unwrap_err();
        assert!(matches!(err, Err::InvalidDocument(_)), "unexpected error: {:?}", err);

        let err = load_template_from_slice(b"glTF\x02\x00\x00\x00", None).unwrap_err();
        assert!(matches!(err, Err::InvalidDocument(_)), "unexpected error: {:?}", err);
    }

    #[test]
    fn test_template_failing_validation_is_rejected() {
        let json = br#"{"asset":{"version":"2.0"},"textures":[{"source":7}],"images":[{"uri":"a.png"},{"uri":"b.png"},{"uri":"c.jpg"}]}"#;
        match load_template_from_slice(json, None).unwrap_err() {
            Err::InvalidDocument(message) => assert!(message.contains("validation"), "unexpected message: {}", message),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_external_buffer_resolved_against_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("scene.bin"), [5u8, 6, 7, 8]).unwrap();
        let path = dir.path().join("scene.gltf");
        std::fs::write(
            &path,
            br#"{"asset":{"version":"2.0"},"buffers":[{"byteLength":4,"uri":"scene.bin"}]}"#,
        ).unwrap();

        let doc = load_template(&path).unwrap();
        assert_eq!(doc.binary(), &[5, 6, 7, 8]);
        assert_eq!(doc.json()["buffers"], json!([{ "byteLength": 4 }]));

        let err = load_template_from_slice(&std::fs::read(&path).unwrap(), None).unwrap_err();
        assert!(matches!(err, Err::BufferError(_)), "unexpected error: {:?}", err);
    }

    #[test]
    fn test_missing_template() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_template(dir.path().join("missing.gltf")).unwrap_err();
        match err {
            Err::IoError { path, source } => {
                assert!(path.ends_with("missing.gltf"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
