use base64::{engine::general_purpose, Engine as _};

#[remain::sorted]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Err {
    #[error("Failed to decode base64 payload: {0}")]
    InvalidBase64(String),
    #[error("Data URI has no ',' separating the header from the payload")]
    MissingComma,
    #[error("Data URI payload is not base64 encoded")]
    NotBase64Encoded,
    #[error("URI does not use the 'data:' scheme")]
    NotDataUri,
}

/// A decoded `data:<mime>;base64,<payload>` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// Builds `data:<mime_type>;base64,<payload>` using the standard alphabet with padding.
pub fn encode(mime_type: &str, data: &[u8]) -> String {
    let payload = general_purpose::STANDARD.encode(data);
    format!("data:{};base64,{}", mime_type, payload)
}

pub fn decode(uri: &str) -> Result<DataUri, Err> {
    let rest = uri.strip_prefix("data:").ok_or(Err::NotDataUri)?;
    let (header, payload) = rest.split_once(',').ok_or(Err::MissingComma)?;
    let mime_type = header.strip_suffix(";base64").ok_or(Err::NotBase64Encoded)?;
    let data = general_purpose::STANDARD.decode(payload)
        .map_err(|e| Err::InvalidBase64(e.to_string()))?;
    Ok(DataUri { mime_type: mime_type.to_string(), data })
}

pub fn is_data_uri(uri: &str) -> bool {
    uri.starts_with("data:")
}
