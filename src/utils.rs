use std::path::Path;

use uuid::Uuid;

use crate::error::AppError;

/// Extensions accepted for upload, lower-case.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// Extracts the file extension from a filename and converts it to lowercase.
pub fn get_file_extension(filename: &str) -> Option<String> {
    Path::new(filename) // treats string as filesystem path.
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

pub fn allowed_file(filename: &str) -> bool {
    get_file_extension(filename).is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// Reduces a client-supplied filename to a safe, flat ASCII name.
///
/// Keeps only the last path component, joins whitespace runs with `_`, drops
/// everything but ASCII alphanumerics and `._-`, then trims leading and
/// trailing dots and underscores. May return an empty string.
pub fn secure_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = base
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    cleaned.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Names derived from an accepted upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadName {
    /// Sanitized client name, kept for display.
    pub original: String,
    /// Collision-free name the original is written under.
    pub stored: String,
}

/// Validates a client filename and derives its display and on-disk names.
pub fn prepare_upload_name(filename: &str) -> Result<UploadName, AppError> {
    if filename.trim().is_empty() {
        return Err(AppError::MissingFile);
    }

    let extension = get_file_extension(filename)
        .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .ok_or_else(|| AppError::InvalidFileType(filename.to_string()))?;

    let mut original = secure_filename(filename);
    if !allowed_file(&original) {
        // Sanitizing ate the stem or the extension (e.g. non-ASCII names)
        original = format!("photo.{extension}");
    }

    let stored = format!("{}_{}", Uuid::new_v4().simple(), original);
    Ok(UploadName { original, stored })
}

/// Content type for a stored original, guessed from its extension.
pub fn content_type_for(filename: &str) -> &'static str {
    match get_file_extension(filename).as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}
