use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::config::Config;
use crate::io::data_uri;
use crate::io::gltf::decode::load_template;
use crate::io::gltf::encode::encode_template_to_vec;

#[remain::sorted]
#[derive(Debug, thiserror::Error)]
pub enum Err {
    #[error("Template Error: {0}")]
    DocumentError(#[from] crate::core::document::Err),
    #[error("GLB Encoding Error: {0}")]
    EncodingError(#[from] crate::io::gltf::encode::Err),
    #[error("Failed to read input image {}: {source}", .path.display())]
    InputIoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Template Load Error: {0}")]
    TemplateError(#[from] crate::io::gltf::decode::Err),
}

/// Turns JPEG images into GLB files by placing them in a template scene.
///
/// The converter only holds its configuration. The template is read from disk on
/// every call and the in-memory document is dropped once serialized, so one converter
/// can be shared between threads.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: Config,
}

impl Converter {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Converts the JPEG bytes in `input` into a GLB byte stream.
    ///
    /// The bytes are embedded as-is: nothing checks that they really are a JPEG, so
    /// any input produces a structurally valid GLB.
    pub fn convert(&self, input: &[u8]) -> Result<Vec<u8>, Err> {
        let mut document = load_template(&self.config.template_path)?;

        if !looks_like_jpeg(input) {
            warn!(input_len = input.len(), "input does not look like a JPEG, embedding it anyway");
        }

        let uri = data_uri::encode(&self.config.mime_type, input);
        document.set_image_uri(self.config.display_image_index, uri, &self.config.mime_type)?;

        let glb = encode_template_to_vec(&document)?;
        debug!(input_len = input.len(), output_len = glb.len(), "converted image to GLB");
        Ok(glb)
    }

    /// Reads the image stored at `path` and converts it.
    pub fn convert_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<u8>, Err> {
        let path = path.as_ref();
        let input = std::fs::read(path)
            .map_err(|source| Err::InputIoError { path: path.to_path_buf(), source })?;
        self.convert(&input)
    }
}

/// True when `data` starts with the JPEG SOI marker and contains an EOI marker.
/// Trailing bytes after the EOI are allowed.
pub fn looks_like_jpeg(data: &[u8]) -> bool {
    data.starts_with(&[0xFF, 0xD8]) && data[2..].windows(2).any(|window| window == [0xFF, 0xD9])
}

/// Converts `input` with the bundled template.
pub fn convert(input: &[u8]) -> Result<Vec<u8>, Err> {
    Converter::default().convert(input)
}

/// Reads the image at `path` and converts it with the bundled template.
pub fn convert_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, Err> {
    Converter::default().convert_file(path)
}
