use std::path::{Path, PathBuf};

use meridian_core::IMAGES_DIR;

pub const MARKDOWN_FILE: &str = "ai-news.md";
pub const HTML_FILE: &str = "index.html";

/// File locations under one output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn markdown_path(&self) -> PathBuf {
        self.root.join(MARKDOWN_FILE)
    }

    #[must_use]
    pub fn html_path(&self) -> PathBuf {
        self.root.join(HTML_FILE)
    }

    #[must_use]
    pub fn images_dir(&self) -> PathBuf {
        self.root.join(IMAGES_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_hang_off_root() {
        let layout = OutputLayout::new("out");
        assert_eq!(layout.markdown_path(), PathBuf::from("out/ai-news.md"));
        assert_eq!(layout.html_path(), PathBuf::from("out/index.html"));
        assert_eq!(layout.images_dir(), PathBuf::from("out/images"));
    }

    #[test]
    fn embedded_image_src_points_into_images_dir() {
        let layout = OutputLayout::new("out");
        let image = meridian_core::GeneratedImage {
            rank: 2,
            filename: meridian_core::image_filename(2),
            path: layout.images_dir().join(meridian_core::image_filename(2)),
        };
        assert_eq!(layout.root().join(image.relative_src()), image.path);
    }
}
