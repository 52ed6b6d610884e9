/// Index of the image in the template's image list that receives the input picture.
pub const TEMPLATE_DISPLAY_IMAGE_INDEX: usize = 2;

/// File name of the bundled template, relative to the crate's asset directory.
pub const TEMPLATE_FILE: &str = "template.gltf";

/// Directory holding the bundled template and the files it references.
pub const ASSET_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets");

pub const JPEG_MIME_TYPE: &str = "image/jpeg";

pub trait ConfigType {
    fn default() -> Self;
}

/// Rounds `len` up to the next multiple of four, as required for GLB chunks.
pub(crate) fn align_to_four(len: usize) -> usize {
    (len + 3) & !3
}
