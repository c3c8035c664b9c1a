//! Directory listing module
//!
//! Renders a self-contained HTML page enumerating a directory: one table row
//! per entry plus a synthetic parent link. Entries are sorted by name so the
//! page is deterministic across platforms.

use chrono::{DateTime, Local};
use std::fs;
use std::io;
use std::path::Path;

/// Render the listing page for `dir`.
///
/// `request_uri` is the URI the client asked for (normalized here to end with
/// `/` before links are built); `parent_url` is the precomputed URL of the
/// enclosing directory used by the `..` row.
pub fn render(request_uri: &str, parent_url: &str, dir: &Path) -> io::Result<String> {
    let uri = normalize_uri(request_uri);

    let mut entries: Vec<fs::DirEntry> = fs::read_dir(dir)?.collect::<io::Result<Vec<_>>>()?;
    entries.sort_by_key(fs::DirEntry::file_name);

    let mut rows = String::new();

    // Synthetic parent row; the self entry is never listed
    rows.push_str(&format!(
        "<tr><td><a href='{parent_url}'>..</a></td><td>Directory</td><td></td><td>{}</td></tr>\n",
        dir.parent()
            .and_then(|p| fs::metadata(p).ok())
            .map(|m| format_mtime(&m))
            .unwrap_or_default(),
    ));

    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        let meta = entry.metadata()?;

        let (kind, size) = if meta.is_dir() {
            ("Directory", String::new())
        } else {
            ("File", format_size(meta.len()))
        };

        rows.push_str(&format!(
            "<tr><td><a href='{uri}{name}'>{name}</a></td><td>{kind}</td><td>{size}</td><td>{}</td></tr>\n",
            format_mtime(&meta),
        ));
    }

    Ok(format!(
        "<html>
    <head>
        <title>Content of {uri}</title>
    </head>
    <body>
        <table border>
            <tr>
                <th>Name</th>
                <th>Type</th>
                <th>Size</th>
                <th>Modified</th>
            </tr>
{rows}        </table>
    </body>
</html>"
    ))
}

/// Ensure the URI ends with a slash so entry links nest under it
fn normalize_uri(request_uri: &str) -> String {
    if request_uri.ends_with('/') {
        request_uri.to_string()
    } else {
        format!("{request_uri}/")
    }
}

/// Format a byte count with binary units, one unit step per division:
/// B -> KB -> MB -> GB, rounding to one decimal at each step.
fn format_size(bytes: u64) -> String {
    #[allow(clippy::cast_precision_loss)]
    let mut value = bytes as f64;
    let mut unit = "B";
    while unit != "GB" && value >= 1024.0 {
        value = (value / 1024.0 * 10.0).round() / 10.0;
        unit = match unit {
            "B" => "KB",
            "KB" => "MB",
            _ => "GB",
        };
    }
    format!("{value} {unit}")
}

/// Last-modified timestamp as `DD.MM.YYYY HH:MM:SS`, empty if unavailable
fn format_mtime(meta: &fs::Metadata) -> String {
    meta.modified().map_or_else(
        |_| String::new(),
        |mtime| {
            DateTime::<Local>::from(mtime)
                .format("%d.%m.%Y %H:%M:%S")
                .to_string()
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fixture_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("staticd-listing-{name}"));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_one_row_per_entry_plus_parent() {
        let dir = fixture_dir("rows");
        fs::write(dir.join("a.txt"), b"aaa").unwrap();
        fs::write(dir.join("b.txt"), b"bbb").unwrap();
        fs::create_dir(dir.join("sub")).unwrap();

        let html = render("/files", "/", &dir).unwrap();

        assert_eq!(html.matches("<tr><td>").count(), 4); // 3 entries + parent
        assert!(html.contains("<a href='/'>..</a>"));
        assert!(html.contains("<a href='/files/a.txt'>a.txt</a>"));
        assert!(html.contains("<a href='/files/sub'>sub</a>"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_entries_sorted_by_name() {
        let dir = fixture_dir("sorted");
        fs::write(dir.join("zeta.txt"), b"z").unwrap();
        fs::write(dir.join("alpha.txt"), b"a").unwrap();
        fs::write(dir.join("mid.txt"), b"m").unwrap();

        let html = render("/d/", "/", &dir).unwrap();

        let alpha = html.find("alpha.txt").unwrap();
        let mid = html.find("mid.txt").unwrap();
        let zeta = html.find("zeta.txt").unwrap();
        assert!(alpha < mid && mid < zeta);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_directories_have_no_size() {
        let dir = fixture_dir("dirsize");
        fs::create_dir(dir.join("sub")).unwrap();

        let html = render("/d", "/", &dir).unwrap();
        assert!(html.contains("<td>Directory</td><td></td>"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_uri_normalized_with_trailing_slash() {
        let dir = fixture_dir("slash");
        fs::write(dir.join("x.txt"), b"x").unwrap();

        let html = render("/nested/dir", "/nested", &dir).unwrap();
        assert!(html.contains("<title>Content of /nested/dir/</title>"));
        assert!(html.contains("href='/nested/dir/x.txt'"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unreadable_directory_propagates_error() {
        let missing = std::env::temp_dir().join("staticd-listing-definitely-missing");
        assert!(render("/x", "/", &missing).is_err());
    }

    #[test]
    fn test_format_size_units() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1024), "1 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1_048_576), "1 MB");
        assert_eq!(format_size(1_572_864), "1.5 MB");
        assert_eq!(format_size(3_221_225_472), "3 GB");
    }
}
