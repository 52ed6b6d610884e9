use std::io::Write;

use crate::core::document::TemplateDocument;
use crate::core::shared::align_to_four;

pub const GLB_MAGIC: &[u8; 4] = b"glTF";
pub const GLB_VERSION: u32 = 2;
pub const GLB_HEADER_LENGTH: usize = 12;
pub const GLB_CHUNK_HEADER_LENGTH: usize = 8;
pub const CHUNK_TYPE_JSON: &[u8; 4] = b"JSON";
pub const CHUNK_TYPE_BIN: &[u8; 4] = b"BIN\0";

#[remain::sorted]
#[derive(Debug, thiserror::Error)]
pub enum Err {
    #[error("IO Error: {0}")]
    IoError(String),
    #[error("Failed to serialize glTF JSON: {0}")]
    JsonError(String),
    #[error("GLB output of {0} bytes exceeds the 4 GiB container limit")]
    TooLarge(usize),
}

/// Serializes the template into a complete GLB byte buffer.
pub fn encode_template_to_vec(document: &TemplateDocument) -> Result<Vec<u8>, Err> {
    let json_data = serde_json::to_vec(document.json())
        .map_err(|e| Err::JsonError(e.to_string()))?;
    let binary_data = document.binary();

    let mut out = Vec::with_capacity(glb_length(json_data.len(), binary_data.len()));
    write_glb(&mut out, &json_data, binary_data)?;
    Ok(out)
}

/// Total length of a GLB holding the given chunk payloads, padding included.
pub fn glb_length(json_length: usize, binary_length: usize) -> usize {
    let bin_chunk = if binary_length > 0 {
        GLB_CHUNK_HEADER_LENGTH + align_to_four(binary_length)
    } else {
        0
    };
    GLB_HEADER_LENGTH + GLB_CHUNK_HEADER_LENGTH + align_to_four(json_length) + bin_chunk
}

/// Write GLB binary format with proper header and chunks.
/// The BIN chunk is omitted when `binary_data` is empty.
pub fn write_glb<W: Write>(writer: &mut W, json_data: &[u8], binary_data: &[u8]) -> Result<(), Err> {
    let json_padded_length = align_to_four(json_data.len());
    let binary_padded_length = align_to_four(binary_data.len());
    let total_length = glb_length(json_data.len(), binary_data.len());
    let total_length = u32::try_from(total_length).map_err(|_| Err::TooLarge(total_length))?;

    // GLB header: magic (4 bytes) + version (4 bytes) + length (4 bytes)
    writer.write_all(GLB_MAGIC)
        .map_err(|e| Err::IoError(format!("Failed to write GLB magic: {}", e)))?;
    writer.write_all(&GLB_VERSION.to_le_bytes())
        .map_err(|e| Err::IoError(format!("Failed to write GLB version: {}", e)))?;
    writer.write_all(&total_length.to_le_bytes())
        .map_err(|e| Err::IoError(format!("Failed to write GLB length: {}", e)))?;

    // JSON chunk, padded with spaces
    writer.write_all(&(json_padded_length as u32).to_le_bytes())
        .map_err(|e| Err::IoError(format!("Failed to write JSON chunk length: {}", e)))?;
    writer.write_all(CHUNK_TYPE_JSON)
        .map_err(|e| Err::IoError(format!("Failed to write JSON chunk type: {}", e)))?;
    writer.write_all(json_data)
        .map_err(|e| Err::IoError(format!("Failed to write JSON data: {}", e)))?;
    writer.write_all(&b"   "[..json_padded_length - json_data.len()])
        .map_err(|e| Err::IoError(format!("Failed to write JSON padding: {}", e)))?;

    if binary_padded_length > 0 {
        writer.write_all(&(binary_padded_length as u32).to_le_bytes())
            .map_err(|e| Err::IoError(format!("Failed to write BIN chunk length: {}", e)))?;
        writer.write_all(CHUNK_TYPE_BIN)
            .map_err(|e| Err::IoError(format!("Failed to write BIN chunk type: {}", e)))?;
        writer.write_all(binary_data)
            .map_err(|e| Err::IoError(format!("Failed to write binary data: {}", e)))?;
        writer.write_all(&[0u8; 3][..binary_padded_length - binary_data.len()])
            .map_err(|e| Err::IoError(format!("Failed to write binary padding: {}", e)))?;
    }

    Ok(())
}
