// lib.rs

/// Contains the interface between the template document and glTF/GLB files.
pub mod io;

/// Contains the shared definitions, the configuration, and the template document.
pub mod core;

/// Defines the JPEG to GLB converter.
pub mod convert;

/// Contains the most commonly used traits, types, and objects.
pub mod prelude {
    pub use crate::convert::{self, convert, convert_file, looks_like_jpeg, Converter};
    pub use crate::core::config::Config;
    pub use crate::core::document::TemplateDocument;
    pub use crate::core::shared::{
        ConfigType,
        JPEG_MIME_TYPE,
        TEMPLATE_DISPLAY_IMAGE_INDEX,
        TEMPLATE_FILE,
    };
    pub use crate::io::gltf::decode::{load_template, load_template_from_slice};
    pub use crate::io::gltf::encode::encode_template_to_vec;
}
