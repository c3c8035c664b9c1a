//! MIME type detection module
//!
//! Returns the corresponding Content-Type based on file extension.

/// Get MIME Content-Type based on file extension
///
/// The extension is lower-cased before lookup. Unknown extensions map to
/// `application/octet-stream`.
///
/// # Examples
/// ```
/// use staticd::http::mime::content_type_for;
/// assert_eq!(content_type_for(Some("html")), "text/html");
/// assert_eq!(content_type_for(Some("MP4")), "video/mp4");
/// assert_eq!(content_type_for(None), "application/octet-stream");
/// ```
pub fn content_type_for(extension: Option<&str>) -> &'static str {
    let Some(ext) = extension else {
        return "application/octet-stream";
    };

    match ext.to_ascii_lowercase().as_str() {
        "css" => "text/css",
        "js" => "application/javascript",
        "txt" => "text/plain",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "png" => "image/png",
        "htm" | "html" => "text/html",
        "doc" | "dot" => "application/msword",
        "pdf" => "application/pdf",
        "mp3" => "audio/mpeg",
        "wav" => "audio/x-wav",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        "mp4" => "video/mp4",
        "avi" => "video/x-msvideo",
        _ => "application/octet-stream",
    }
}

/// MIME major type (the part before the `/`)
pub fn major_type(mime: &str) -> &str {
    mime.split('/').next().unwrap_or(mime)
}

/// Whether the MIME class is delivered via chunked streaming regardless of
/// size (audio and video, so a slow media consumer cannot stall the process)
pub fn is_streamable_media(mime: &str) -> bool {
    matches!(major_type(mime), "audio" | "video")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_entries() {
        assert_eq!(content_type_for(Some("css")), "text/css");
        assert_eq!(content_type_for(Some("js")), "application/javascript");
        assert_eq!(content_type_for(Some("htm")), "text/html");
        assert_eq!(content_type_for(Some("html")), "text/html");
        assert_eq!(content_type_for(Some("jpeg")), "image/jpeg");
        assert_eq!(content_type_for(Some("dot")), "application/msword");
        assert_eq!(content_type_for(Some("mp3")), "audio/mpeg");
        assert_eq!(content_type_for(Some("avi")), "video/x-msvideo");
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(content_type_for(Some("HTML")), "text/html");
        assert_eq!(content_type_for(Some("Jpg")), "image/jpeg");
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(content_type_for(Some("xyz")), "application/octet-stream");
        assert_eq!(content_type_for(None), "application/octet-stream");
    }

    #[test]
    fn test_media_detection() {
        assert!(is_streamable_media("video/mp4"));
        assert!(is_streamable_media("audio/x-wav"));
        assert!(!is_streamable_media("text/html"));
        assert!(!is_streamable_media("application/octet-stream"));
    }

    #[test]
    fn test_major_type() {
        assert_eq!(major_type("video/mp4"), "video");
        assert_eq!(major_type("noslash"), "noslash");
    }
}
