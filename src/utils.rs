use std::path::{Path, PathBuf};

use url::Url;

/// Fallback name when neither the caller nor the resolved URL suggests one.
pub const DEFAULT_FILENAME: &str = "video.mp4";

/// Last path segment of the URL, sanitized, when it looks like a file name.
pub fn filename_from_url(url_str: &str) -> Option<String> {
    let url = Url::parse(url_str).ok()?;
    let filename = url.path_segments()?.last()?;
    if filename.is_empty() || !filename.contains('.') {
        return None;
    }
    Some(sanitize_filename(filename))
}

pub fn sanitize_filename(filename: &str) -> String {
    filename.replace(
        |c: char| !c.is_alphanumeric() && c != '.' && c != '-' && c != '_',
        "_",
    )
}

pub fn unique_filepath(dir: &Path, filename: &str) -> PathBuf {
    let mut path = dir.join(filename);
    let mut counter = 1;

    while path.exists() {
        let file_stem = path.file_stem().unwrap().to_string_lossy();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();

        let new_filename = if extension.is_empty() {
            format!("{}_{}", file_stem, counter)
        } else {
            format!("{}_{}.{}", file_stem, counter, extension)
        };

        path = dir.join(new_filename);
        counter += 1;
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_comes_from_last_segment() {
        assert_eq!(
            filename_from_url("https://cdn.example.com/media/clip.mp4").as_deref(),
            Some("clip.mp4")
        );
    }

    #[test]
    fn extensionless_segment_is_rejected() {
        assert_eq!(filename_from_url("https://example.com/watch"), None);
        assert_eq!(filename_from_url("https://example.com/"), None);
    }

    #[test]
    fn unparseable_url_yields_no_name() {
        assert_eq!(filename_from_url("not a url"), None);
    }

    #[test]
    fn sanitize_replaces_path_and_space_characters() {
        assert_eq!(sanitize_filename("my video (1).mp4"), "my_video__1_.mp4");
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_filename("clean-name_01.mp4"), "clean-name_01.mp4");
    }

    #[test]
    fn unique_filepath_counts_past_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("video.mp4"), b"a").unwrap();
        std::fs::write(dir.path().join("video_1.mp4"), b"b").unwrap();

        let path = unique_filepath(dir.path(), "video.mp4");
        assert_eq!(path, dir.path().join("video_2.mp4"));
    }

    #[test]
    fn unique_filepath_returns_untouched_name_when_free() {
        let dir = tempfile::tempdir().unwrap();
        let path = unique_filepath(dir.path(), "video.mp4");
        assert_eq!(path, dir.path().join("video.mp4"));
    }
}
