use crate::TransferError;

/// Model formats the backend accepts.
const ALLOWED_EXTENSIONS: &[&str] = &["glb", "gltf"];

/// Validates a model file name before a session is initiated.
///
/// Rejects:
/// - Empty names
/// - Names containing path separators (the server stores by map + resolution,
///   never by client path)
/// - Names without an allowed model extension
pub fn validate_model_file_name(file_name: &str) -> Result<(), TransferError> {
    if file_name.is_empty() {
        return Err(TransferError::InvalidFileName("empty file name".into()));
    }

    if file_name.contains('/') || file_name.contains('\\') {
        return Err(TransferError::InvalidFileName(format!(
            "path separators not allowed: {file_name}"
        )));
    }

    let extension = file_name.rsplit_once('.').map(|(_, ext)| ext);
    match extension {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) => Ok(()),
        Some(ext) => Err(TransferError::InvalidFileName(format!(
            "unsupported model format: .{ext}"
        ))),
        None => Err(TransferError::InvalidFileName(format!(
            "missing file extension: {file_name}"
        ))),
    }
}
