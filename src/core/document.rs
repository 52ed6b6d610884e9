use serde_json::Value;

#[remain::sorted]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Err {
    #[error("Image index {index} is out of range: the template has {count} images")]
    ImageIndexOutOfRange { index: usize, count: usize },
    #[error("Image entry {0} is not a JSON object")]
    MalformedImage(usize),
}

/// In-memory template scene.
///
/// `json` is the raw glTF document tree, kept untyped so that every field of the
/// template survives a load/save cycle, including extensions and extras. `binary`
/// holds the single merged buffer that becomes the GLB `BIN` chunk; buffer 0 of
/// `json` describes it and has no `uri`.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateDocument {
    json: Value,
    binary: Vec<u8>,
}

impl TemplateDocument {
    pub(crate) fn from_parts(json: Value, binary: Vec<u8>) -> Self {
        Self { json, binary }
    }

    pub fn json(&self) -> &Value {
        &self.json
    }

    pub fn binary(&self) -> &[u8] {
        &self.binary
    }

    fn images(&self) -> &[Value] {
        self.json.get("images")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn num_images(&self) -> usize {
        self.images().len()
    }

    pub fn image(&self, index: usize) -> Option<&Value> {
        self.images().get(index)
    }

    /// Returns the `uri` of the image at `index`, if the image is stored by URI.
    pub fn image_uri(&self, index: usize) -> Option<&str> {
        self.image(index)?.get("uri")?.as_str()
    }

    /// Points the image at `index` to `uri`.
    ///
    /// Only the source reference changes. An image previously stored in a buffer view
    /// drops its `bufferView` and takes `mime_type`, because a glTF image carries
    /// exactly one of `uri` and `bufferView`. A URI image keeps its other fields,
    /// `mimeType` included.
    pub fn set_image_uri(&mut self, index: usize, uri: String, mime_type: &str) -> Result<(), Err> {
        let count = self.num_images();
        let image = self.json.get_mut("images")
            .and_then(Value::as_array_mut)
            .and_then(|images| images.get_mut(index))
            .ok_or(Err::ImageIndexOutOfRange { index, count })?;
        let image = image.as_object_mut()
            .ok_or(Err::MalformedImage(index))?;

        if image.remove("bufferView").is_some() {
            image.insert("mimeType".to_string(), Value::String(mime_type.to_string()));
        }
        image.insert("uri".to_string(), Value::String(uri));
        Ok(())
    }
}
