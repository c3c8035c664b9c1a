//! Request path resolution module
//!
//! Maps a request path onto the document root. Traversal segments are dropped
//! rather than applied, so the resolved path can never climb above the root.

use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};

/// Classification of a resolved filesystem target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Directory,
    File,
    Missing,
}

/// A request path resolved against the document root
#[derive(Debug, Clone)]
pub struct ResolvedTarget {
    /// Root-relative normalized path (URL-style, no leading slash)
    pub relative: String,
    /// Absolute path on the local filesystem
    pub absolute: PathBuf,
    pub kind: TargetKind,
    /// URL of the enclosing directory, for the listing's parent link.
    /// Computed from the retained segments, independent of what exists on disk.
    pub parent_url: String,
}

/// Resolve a request path against the document root and classify the target.
///
/// Each `/`-separated segment is percent-decoded, then segments that are
/// empty, `.`, `..`, or contain a path separator after decoding are dropped.
/// Decoding before filtering means `%2e%2e` and `%2f` cannot smuggle a
/// traversal past the filter.
pub fn resolve(document_root: &Path, request_path: &str) -> ResolvedTarget {
    let segments = sanitize_segments(request_path);

    let parent_url = parent_url(&segments);
    let relative = segments.join("/");

    let mut absolute = document_root.to_path_buf();
    for segment in &segments {
        absolute.push(segment);
    }

    let kind = classify(&absolute);

    ResolvedTarget {
        relative,
        absolute,
        kind,
        parent_url,
    }
}

/// Split, decode and filter a request path into safe segments
fn sanitize_segments(request_path: &str) -> Vec<String> {
    request_path
        .split('/')
        .map(|segment| {
            percent_decode_str(segment)
                .decode_utf8_lossy()
                .into_owned()
        })
        .filter(|segment| {
            !segment.is_empty()
                && segment != "."
                && segment != ".."
                && !segment.contains('/')
                && !segment.contains('\\')
        })
        .collect()
}

/// URL of the directory one level up from the retained segments
fn parent_url(segments: &[String]) -> String {
    if segments.len() <= 1 {
        return "/".to_string();
    }
    format!("/{}", segments[..segments.len() - 1].join("/"))
}

fn classify(absolute: &Path) -> TargetKind {
    match std::fs::metadata(absolute) {
        Ok(meta) if meta.is_dir() => TargetKind::Directory,
        Ok(_) => TargetKind::File,
        Err(_) => TargetKind::Missing,
    }
}
