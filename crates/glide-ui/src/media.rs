//! Media placeholders plus helpers for video sources.
pub use glide_ui_core::media::*;

use crate::error::Error;
use crate::error::Result;
use url::Url;

const VIDEO_EXTENSIONS: [&str; 5] = [".mp4", ".webm", ".ogg", ".mov", ".avi"];
const VIDEO_HOSTS: [&str; 4] = ["youtube.com", "youtu.be", "vimeo.com", "stream.mux.com"];

/// How a video element should request a cross-origin source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CorsMode {
    /// Request without credentials.
    Anonymous,
}

impl CorsMode {
    pub fn as_str(self) -> &'static str {
        match self {
            CorsMode::Anonymous => "anonymous",
        }
    }
}

/// Value of the first `id=` query parameter anywhere in `url`.
fn drive_query_id(url: &str) -> Option<&str> {
    let start = ["?id=", "&id="]
        .iter()
        .filter_map(|p| url.find(p).map(|i| i + p.len()))
        .min()?;
    let rest = &url[start..];
    let id = rest.split(['&', '#']).next().unwrap_or_default();
    (!id.is_empty()).then_some(id)
}

/// The `<id>` in a `/file/d/<id>` path segment.
fn drive_path_id(url: &str) -> Option<&str> {
    let start = url.find("/file/d/")? + "/file/d/".len();
    let id = url[start..].split(['/', '?', '#']).next().unwrap_or_default();
    (!id.is_empty()).then_some(id)
}

/// Converts a Google Drive share link into a direct download link.
///
/// Accepts `/file/d/<id>/view` and `open?id=<id>` links, with or without a scheme; links that
/// already point at a download endpoint are returned unchanged.
#[deprecated(
    note = "Google Drive does not serve the CORS headers video embedding needs; \
            host the file yourself or use a video CDN"
)]
pub fn google_drive_video_url(url: &str) -> Result<String> {
    tracing::warn!(
        url,
        "google_drive_video_url is deprecated: Drive does not allow CORS video embedding"
    );
    let query_id = drive_query_id(url);
    if query_id.is_some()
        && (url.contains("uc?export=download") || url.contains("drive.usercontent.google.com"))
    {
        return Ok(url.to_string());
    }

    let Some(file_id) = query_id.or_else(|| drive_path_id(url)) else {
        return Err(Error::invalid_video_url(url, "could not extract file ID"));
    };
    Ok(format!(
        "https://drive.usercontent.google.com/download?id={file_id}&export=download"
    ))
}

/// Root-relative path for a file served from the public assets folder.
pub fn public_video_url(filename: &str) -> String {
    if filename.starts_with('/') {
        filename.to_string()
    } else {
        format!("/{filename}")
    }
}

/// True for absolute URLs with a video extension or on a known video host, and for relative
/// paths that name a file.
pub fn is_valid_video_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => {
            let path = parsed.path().to_lowercase();
            let has_extension = VIDEO_EXTENSIONS.iter().any(|ext| path.ends_with(ext));
            let host = parsed.host_str().unwrap_or_default();
            has_extension || VIDEO_HOSTS.iter().any(|h| host.contains(h))
        }
        Err(_) => url.starts_with('/') && url.contains('.'),
    }
}

/// `None` for same-host and relative sources, otherwise anonymous CORS.
pub fn video_cors_mode(url: &str, current_host: &str) -> Option<CorsMode> {
    let parsed = Url::parse(url).ok()?;
    if parsed.host_str().unwrap_or_default() == current_host {
        return None;
    }
    Some(CorsMode::Anonymous)
}

#[cfg(test)]
#[allow(deprecated)]
mod tests {
    use super::*;

    #[test]
    fn drive_share_links_become_download_links() {
        let expected = "https://drive.usercontent.google.com/download?id=abc123&export=download";
        assert_eq!(
            google_drive_video_url("https://drive.google.com/file/d/abc123/view?usp=sharing")
                .unwrap(),
            expected
        );
        assert_eq!(
            google_drive_video_url("https://drive.google.com/open?id=abc123").unwrap(),
            expected
        );
    }

    #[test]
    fn drive_download_links_pass_through() {
        let direct = "https://drive.google.com/uc?export=download&id=abc123";
        assert_eq!(google_drive_video_url(direct).unwrap(), direct);
        let content = "https://drive.usercontent.google.com/download?id=abc123&export=download";
        assert_eq!(google_drive_video_url(content).unwrap(), content);
    }

    #[test]
    fn drive_links_without_an_id_are_rejected() {
        let err = google_drive_video_url("https://drive.google.com/drive/folders").unwrap_err();
        assert!(matches!(err, Error::InvalidVideoUrl { .. }));
        assert!(google_drive_video_url("not a url").is_err());
        assert!(google_drive_video_url("https://drive.google.com/file/d/").is_err());
    }

    #[test]
    fn drive_links_without_a_scheme_are_accepted() {
        let expected = "https://drive.usercontent.google.com/download?id=abc123&export=download";
        assert_eq!(
            google_drive_video_url("drive.google.com/file/d/abc123/view").unwrap(),
            expected
        );
        assert_eq!(
            google_drive_video_url("drive.google.com/open?usp=x&id=abc123").unwrap(),
            expected
        );
    }

    #[test]
    fn public_paths_are_rooted() {
        assert_eq!(public_video_url("videos/demo.mp4"), "/videos/demo.mp4");
        assert_eq!(public_video_url("/videos/demo.mp4"), "/videos/demo.mp4");
    }

    #[test]
    fn video_url_validation() {
        assert!(is_valid_video_url("https://cdn.example.com/clip.MP4"));
        assert!(is_valid_video_url("https://www.youtube.com/watch?v=x"));
        assert!(is_valid_video_url("https://youtu.be/x"));
        assert!(!is_valid_video_url("https://example.com/page.html"));
        assert!(is_valid_video_url("/videos/demo.webm"));
        assert!(!is_valid_video_url("videos"));
    }

    #[test]
    fn cors_mode_depends_on_host() {
        assert_eq!(video_cors_mode("https://app.test/v.mp4", "app.test"), None);
        assert_eq!(
            video_cors_mode("https://cdn.test/v.mp4", "app.test"),
            Some(CorsMode::Anonymous)
        );
        assert_eq!(video_cors_mode("/videos/v.mp4", "app.test"), None);
        assert_eq!(CorsMode::Anonymous.as_str(), "anonymous");
    }
}
