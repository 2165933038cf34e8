//! Utility functions.
//!
//! Small string helpers shared by the renderers and widgets.

/// Escape text for safe interpolation into HTML element content or
/// double-quoted attribute values.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Join an asset path onto the project's base path.
///
/// An absent base joins as the empty prefix, so `None` + `a.png` is `/a.png`.
pub fn join_asset_path(base: Option<&str>, relative: &str) -> String {
    let base = base.unwrap_or("").trim_end_matches('/');
    let relative = relative.trim_start_matches('/');
    format!("{}/{}", base, relative)
}

/// Derive a display title from a media file path.
///
/// Takes the last path segment, drops the extension and turns `_`/`-` into spaces:
/// `Video/1.Main_Window.mp4` becomes `1.Main Window`.
pub fn media_title(path: &str) -> String {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let stem = match file_name.rfind('.') {
        Some(dot) if dot > 0 => &file_name[..dot],
        _ => file_name,
    };
    stem.replace(['_', '-'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<b>\"R&D\"</b>"), "&lt;b&gt;&quot;R&amp;D&quot;&lt;/b&gt;");
        assert_eq!(html_escape("plain"), "plain");
    }

    #[test]
    fn test_join_asset_path() {
        assert_eq!(join_asset_path(Some("Projects/IOTsystem"), "Image/Main.png"), "Projects/IOTsystem/Image/Main.png");
        assert_eq!(join_asset_path(Some("Projects/SAM3/"), "/a.png"), "Projects/SAM3/a.png");
        assert_eq!(join_asset_path(None, "a.png"), "/a.png");
    }

    #[test]
    fn test_media_title() {
        assert_eq!(media_title("Video/1.MainWindow.mp4"), "1.MainWindow");
        assert_eq!(media_title("Video/2.Single image inference.mp4"), "2.Single image inference");
        assert_eq!(media_title("demo_clip-final.webm"), "demo clip final");
        assert_eq!(media_title("noext"), "noext");
        assert_eq!(media_title(".hidden"), ".hidden");
    }
}
