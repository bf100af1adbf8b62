use std::path::Path;

use axum::http::{HeaderMap, header::COOKIE};

use crate::error::AppError;

pub fn require<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, AppError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(AppError::MissingField(field))
}

/// Extension of an uploaded file's original name, dot included.
pub fn file_extension(original_name: &str) -> Option<&str> {
    let base = original_name.rsplit(['/', '\\']).next()?;
    let dot = base.rfind('.')?;

    Some(&base[dot..]).filter(|ext| ext.len() > 1 && ext[1..].chars().all(char::is_alphanumeric))
}

/// A stored upload name is a single plain path component.
pub fn is_safe_filename(filename: &str) -> bool {
    !filename.is_empty()
        && !filename.contains(['/', '\\'])
        && filename != "."
        && !filename.contains("..")
        && Path::new(filename).file_name().is_some()
}

/// Value of the cookie `name` across every `Cookie` header of a request.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

pub fn content_type_for(filename: &str) -> &'static str {
    let lower = filename.to_ascii_lowercase();

    match lower.rsplit_once('.').map(|(_, ext)| ext) {
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mov") => "video/quicktime",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_types() {
        assert_eq!(content_type_for("clip.MP4"), "video/mp4");
        assert_eq!(content_type_for("clip.webm"), "video/webm");
        assert_eq!(content_type_for("clip.mov"), "video/quicktime");
        assert_eq!(content_type_for("photo.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("photo.JPG"), "image/jpeg");
        assert_eq!(content_type_for("photo.png"), "image/png");
        assert_eq!(content_type_for("anim.gif"), "image/gif");
        assert_eq!(content_type_for("notes.txt"), "application/octet-stream");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }

    #[test]
    fn test_extensions() {
        assert_eq!(file_extension("cake.png"), Some(".png"));
        assert_eq!(file_extension("archive.tar.gz"), Some(".gz"));
        assert_eq!(file_extension("C:\\photos\\cake.jpg"), Some(".jpg"));
        assert_eq!(file_extension("README"), None);
        assert_eq!(file_extension("trailing."), None);
        assert_eq!(file_extension("bad.p/ng"), None);
        assert_eq!(file_extension("evil.png;rm"), None);
    }

    #[test]
    fn test_safe_filenames() {
        assert!(is_safe_filename("0b7c.png"));
        assert!(!is_safe_filename(""));
        assert!(!is_safe_filename("."));
        assert!(!is_safe_filename(".."));
        assert!(!is_safe_filename("../secret"));
        assert!(!is_safe_filename("a/b.png"));
        assert!(!is_safe_filename("a\\b.png"));
    }

    #[test]
    fn test_require() {
        assert_eq!(require(&Some(" u1 ".into()), "userId").unwrap(), "u1");
        assert!(matches!(
            require(&Some("  ".into()), "userId"),
            Err(AppError::MissingField("userId"))
        ));
        assert!(require(&None, "userId").is_err());
    }

    #[test]
    fn test_cookie_values() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, "theme=dark; paf_oauth_nonce=abc123".parse().unwrap());
        headers.append(COOKIE, "other=1".parse().unwrap());

        assert_eq!(cookie_value(&headers, "paf_oauth_nonce"), Some("abc123"));
        assert_eq!(cookie_value(&headers, "other"), Some("1"));
        assert_eq!(cookie_value(&headers, "nonce"), None);
        assert_eq!(cookie_value(&HeaderMap::new(), "theme"), None);
    }
}
