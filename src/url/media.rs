/// Extensions of non-document media, archives and executables
pub const MEDIA_EXTENSIONS: &[&str] = &[
    // Images
    ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".webp", ".svg", ".tiff", ".tif", ".ico", ".heic",
    ".heif",
    // Video
    ".mp4", ".m4v", ".mov", ".avi", ".mkv", ".wmv", ".flv", ".webm", ".mpg", ".mpeg", ".3gp",
    ".3g2", ".ts", ".mts",
    // Audio
    ".mp3", ".wav", ".aac", ".flac", ".ogg", ".oga", ".wma", ".m4a", ".amr", ".opus",
    // Archives
    ".zip", ".rar", ".7z", ".tar", ".gz",
    // Executables
    ".exe", ".msi", ".dmg", ".apk",
];

/// Returns the matching media extension if the path ends with one
///
/// The comparison is case-insensitive.
pub fn media_extension(path: &str) -> Option<&'static str> {
    let lower = path.to_ascii_lowercase();
    MEDIA_EXTENSIONS
        .iter()
        .find(|ext| lower.ends_with(*ext))
        .copied()
}
