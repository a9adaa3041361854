use std::path::{Path, PathBuf};

use url::Url;

/// Process-wide configuration, built once at startup and threaded by
/// reference through every stage. There is no configuration file; the
/// surrounding program supplies fixed values.
pub struct Config {
    /// The site title, shown in page headers and the feed channel.
    pub title: String,

    /// The feed channel description.
    pub description: String,

    /// The absolute URL prefix for all external-facing links: permalinks,
    /// the feed `<link>`, and GUIDs.
    pub base_url: Url,

    /// The project root.
    pub root_directory: PathBuf,

    /// Where source documents live.
    pub content_directory: PathBuf,

    /// Where the layout and content-fragment templates live.
    pub templates_directory: PathBuf,

    /// Static assets copied verbatim into the output tree.
    pub static_directory: PathBuf,

    /// Where the generated site is written.
    pub output_directory: PathBuf,
}

impl Config {
    /// Resolves the conventional directory layout under a project root.
    pub fn for_project(root: &Path, title: String, description: String, base_url: Url) -> Config {
        Config {
            title,
            description,
            base_url,
            root_directory: root.to_owned(),
            content_directory: root.join("content"),
            templates_directory: root.join("templates"),
            static_directory: root.join("static"),
            output_directory: root.join("output"),
        }
    }

    /// The base layout shared by every page.
    pub fn layout_template(&self) -> PathBuf {
        self.templates_directory.join("layout.html")
    }

    /// The content fragment for the index page.
    pub fn index_template(&self) -> PathBuf {
        self.templates_directory.join("index.html")
    }

    /// The content fragment for individual post pages.
    pub fn post_template(&self) -> PathBuf {
        self.templates_directory.join("post.html")
    }

    /// The directory post pages are rendered into.
    pub fn posts_output_directory(&self) -> PathBuf {
        self.output_directory.join("posts")
    }

    /// The directory static assets are copied into.
    pub fn static_output_directory(&self) -> PathBuf {
        self.output_directory.join("static")
    }

    /// Where the feed document is written.
    pub fn feed_output_path(&self) -> PathBuf {
        self.output_directory.join("feed.xml")
    }
}
