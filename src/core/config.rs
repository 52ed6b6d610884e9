use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::shared::{
    ConfigType,
    ASSET_DIR,
    JPEG_MIME_TYPE,
    TEMPLATE_DISPLAY_IMAGE_INDEX,
    TEMPLATE_FILE,
};

/// Configuration of a [`Converter`](crate::convert::Converter).
///
/// The defaults reproduce the bundled art-display template: the template is read from
/// the crate's asset directory, and the picture goes into image 2 as a JPEG data URI.
/// Missing fields in a deserialized configuration fall back to these defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path of the glTF (or GLB) template. Read on every conversion.
    pub template_path: PathBuf,
    /// Index of the image entry whose source is replaced.
    pub display_image_index: usize,
    /// Media type written into the data URI.
    pub mime_type: String,
}

impl ConfigType for Config {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from(ASSET_DIR).join(TEMPLATE_FILE),
            display_image_index: TEMPLATE_DISPLAY_IMAGE_INDEX,
            mime_type: JPEG_MIME_TYPE.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        <Self as ConfigType>::default()
    }
}

impl Config {
    pub fn new() -> Self {
        <Self as ConfigType>::default()
    }

    pub fn with_template_path<P: Into<PathBuf>>(mut self, template_path: P) -> Self {
        self.template_path = template_path.into();
        self
    }

    pub fn with_display_image_index(mut self, display_image_index: usize) -> Self {
        self.display_image_index = display_image_index;
        self
    }

    pub fn with_mime_type<S: Into<String>>(mut self, mime_type: S) -> Self {
        self.mime_type = mime_type.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = <Config as Default>::default();
        assert_eq!(config.display_image_index, 2);
        assert_eq!(config.mime_type, "image/jpeg");
        assert!(config.template_path.ends_with("assets/template.gltf"));
        assert_eq!(config, Config::new());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config: Config = serde_json::from_str(r#"{ "template_path": "/tmp/other.glb" }"#).unwrap();
        assert_eq!(config.template_path, PathBuf::from("/tmp/other.glb"));
        assert_eq!(config.display_image_index, TEMPLATE_DISPLAY_IMAGE_INDEX);
        assert_eq!(config.mime_type, JPEG_MIME_TYPE);
    }

    #[test]
    fn test_builder_setters() {
        let config = Config::new()
            .with_template_path("scene.gltf")
            .with_display_image_index(0)
            .with_mime_type("image/png");
        assert_eq!(config.template_path, PathBuf::from("scene.gltf"));
        assert_eq!(config.display_image_index, 0);
        assert_eq!(config.mime_type, "image/png");
    }
}
