/// Encoding and decoding of base64 `data:` URIs.
pub mod data_uri;

/// Loads templates from glTF/GLB files and writes them back as GLB.
pub mod gltf;
