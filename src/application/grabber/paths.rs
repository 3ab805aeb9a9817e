//! URL and file name helpers for the grabber.

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use url::Url;

/// Extension used when a direct link does not end in one.
pub const DEFAULT_EXTENSION: &str = ".mp4";

const FALLBACK_STEM: &str = "untitled";

static UNSAFE_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[\\/*?:"<>|\x00-\x1f]"#).expect("file name pattern is valid")
});

/// Turns a display name into something safe to use as a file stem inside the
/// working directory.
pub fn file_stem(name: &str) -> String {
    let cleaned = UNSAFE_CHARS.replace_all(name, "");
    let cleaned = cleaned.trim().trim_matches('.');
    if cleaned.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Everything before the last `/` of the link's path, query excluded.
pub fn link_directory(link: &str) -> &str {
    let path = link.split_once('?').map_or(link, |(path, _)| path);
    path.rfind('/').map_or(path, |pos| &path[..pos])
}

/// Parses and re-serializes a URL, resolving dot segments and dropping default ports.
pub fn normalize_url(raw: &str) -> Result<String, url::ParseError> {
    Url::parse(raw).map(String::from)
}

/// The extension of a direct link, taken from its last four characters.
pub fn direct_extension(link: &str) -> String {
    let bytes = link.as_bytes();
    if bytes.len() >= 4 && bytes[bytes.len() - 4] == b'.' {
        // a '.' is always a char boundary
        link[link.len() - 4..].to_string()
    } else {
        DEFAULT_EXTENSION.to_string()
    }
}

/// Extension (with the dot) of a segment URL, ignoring any query string.
pub fn segment_extension(url: &str) -> String {
    let path = url.split_once('?').map_or(url, |(path, _)| path);
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem_strips_path_components() {
        assert_eq!(file_stem("My Clip"), "My Clip");
        assert_eq!(file_stem("../../etc/passwd"), "etcpasswd");
        assert_eq!(file_stem("a/b\\c"), "abc");
        assert_eq!(file_stem("what? <now>"), "what now");
    }

    #[test]
    fn test_file_stem_fallback() {
        assert_eq!(file_stem(""), "untitled");
        assert_eq!(file_stem("  "), "untitled");
        assert_eq!(file_stem(".."), "untitled");
        assert_eq!(file_stem("///"), "untitled");
    }

    #[test]
    fn test_link_directory() {
        assert_eq!(
            link_directory("https://cdn.host/a/b/master.json?base64_init=1"),
            "https://cdn.host/a/b"
        );
        assert_eq!(
            link_directory("https://cdn.host/a/master.json?next=/x/y"),
            "https://cdn.host/a"
        );
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(
            normalize_url("https://cdn.host:443/a/b/../c/video/").unwrap(),
            "https://cdn.host/a/c/video/"
        );
        assert_eq!(
            normalize_url("HTTP://Cdn.Host:80/a/./b").unwrap(),
            "http://cdn.host/a/b"
        );
        assert!(normalize_url("not a url").is_err());
    }

    #[test]
    fn test_direct_extension() {
        assert_eq!(direct_extension("https://host/track.mp3"), ".mp3");
        assert_eq!(direct_extension("https://host/movie.webm"), DEFAULT_EXTENSION);
        assert_eq!(direct_extension("https://host/watch?v=1"), DEFAULT_EXTENSION);
        assert_eq!(direct_extension(".mp"), DEFAULT_EXTENSION);
    }

    #[test]
    fn test_segment_extension() {
        assert_eq!(segment_extension("segment-0.m4s"), ".m4s");
        assert_eq!(segment_extension("chunk.mp4?range=0-100"), ".mp4");
        assert_eq!(segment_extension("chunk"), "");
    }
}
