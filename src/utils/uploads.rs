use std::path::{Path, PathBuf};

/// Relative paths are resolved against the working directory.
pub fn resolve_uploads_dir(configured: &str) -> std::io::Result<PathBuf> {
    let path = Path::new(configured);
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(path))
}

/// Keeps the final path component and replaces anything outside `[A-Za-z0-9._-]`.
pub fn sanitize_file_name(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim_start_matches('.');

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        String::from("upload")
    } else {
        cleaned
    }
}

/// `<unix millis>-<sanitized name>`, unique enough for an admin panel.
pub fn stored_file_name(timestamp_millis: i64, original: &str) -> String {
    format!("{}-{}", timestamp_millis, sanitize_file_name(original))
}

pub async fn save_upload(dir: &Path, file_name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(file_name);
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}
