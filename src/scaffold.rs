//! Project bootstrapping: the conventional source directories, default
//! templates and stylesheet, sample content for a fresh project, and a
//! `.gitignore`. Defaults are written only when the target file is missing;
//! files the author has touched are never overwritten.

use std::fs;
use std::io;
use std::path::Path;

use crate::config::Config;

/// Ensures the project tree under the configured root exists and is
/// populated with defaults where nothing is present yet.
pub fn ensure_project(config: &Config) -> io::Result<()> {
    fs::create_dir_all(&config.content_directory)?;
    fs::create_dir_all(&config.templates_directory)?;
    fs::create_dir_all(&config.static_directory)?;

    write_if_missing(&config.layout_template(), DEFAULT_LAYOUT_TEMPLATE)?;
    write_if_missing(&config.index_template(), DEFAULT_INDEX_TEMPLATE)?;
    write_if_missing(&config.post_template(), DEFAULT_POST_TEMPLATE)?;
    write_if_missing(
        &config.static_directory.join("style.css"),
        DEFAULT_STYLESHEET,
    )?;
    write_if_missing(&config.root_directory.join(".gitignore"), DEFAULT_GITIGNORE)?;

    // seed a fresh project with something to render
    if directory_is_empty(&config.content_directory)? {
        fs::write(
            config.content_directory.join("first-post.md"),
            SAMPLE_POST_WELCOME,
        )?;
        fs::write(
            config.content_directory.join("writing-in-markdown.md"),
            SAMPLE_POST_MARKDOWN,
        )?;
    }

    Ok(())
}

fn write_if_missing(path: &Path, contents: &str) -> io::Result<()> {
    if path.exists() {
        return Ok(());
    }
    fs::write(path, contents)
}

fn directory_is_empty(path: &Path) -> io::Result<bool> {
    Ok(fs::read_dir(path)?.next().is_none())
}

const DEFAULT_LAYOUT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{.site.title}} - {{.title}}</title>
    <link rel="stylesheet" href="/static/style.css">
    <link rel="alternate" type="application/rss+xml" href="/feed.xml" title="{{.site.title}} RSS Feed">
</head>
<body>
    <header>
        <h1><a href="/">{{.site.title}}</a></h1>
    </header>
    <main>
        {{template "content" .}}
    </main>
    <footer>
        <p>&copy; {{current_year}} {{.site.title}}</p>
    </footer>
</body>
</html>
"#;

const DEFAULT_INDEX_TEMPLATE: &str = r#"{{define "content"}}
    <h2>Posts</h2>
    <ul class="post-list">
    {{range .posts}}
        <li>
            <a href="/posts/{{.slug}}.html">{{.title}}</a>
            <span class="post-date">{{.date}}</span>
            <p>{{.summary}}</p>
        </li>
    {{end}}
    </ul>
{{end}}
"#;

const DEFAULT_POST_TEMPLATE: &str = r#"{{define "content"}}
    <article class="post">
        <h2>{{.title}}</h2>
        <div class="post-meta">{{.date}}</div>
        <div class="post-content">{{.content}}</div>
    </article>
{{end}}
"#;

const DEFAULT_STYLESHEET: &str = r#"body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, Cantarell, sans-serif;
    line-height: 1.6;
    color: #333;
    max-width: 800px;
    margin: 0 auto;
    padding: 20px;
}

header {
    border-bottom: 1px solid #eee;
    padding-bottom: 20px;
    margin-bottom: 30px;
}

h1 {
    margin: 0;
}

a {
    color: #333;
    text-decoration: none;
}

a:hover {
    color: #007acc;
}

main {
    margin-bottom: 40px;
}

footer {
    border-top: 1px solid #eee;
    padding-top: 20px;
    text-align: center;
    color: #777;
}

.post-list {
    list-style: none;
    padding: 0;
}

.post-list li {
    margin-bottom: 30px;
    padding-bottom: 20px;
    border-bottom: 1px solid #eee;
}

.post-list a {
    font-size: 1.2em;
    font-weight: bold;
    display: block;
    margin-bottom: 5px;
}

.post-date {
    display: block;
    color: #777;
    font-size: 0.9em;
    margin-bottom: 10px;
}

.post {
    margin-bottom: 40px;
}

.post-meta {
    color: #777;
    margin-bottom: 20px;
}

.post-content {
    line-height: 1.8;
}

.post-content h2 {
    margin-top: 40px;
}

.post-content pre {
    background-color: #f5f5f5;
    padding: 15px;
    border-radius: 5px;
    overflow-x: auto;
}

.post-content code {
    background-color: #f5f5f5;
    padding: 2px 5px;
    border-radius: 3px;
}
"#;

const DEFAULT_GITIGNORE: &str = r#"# Generated site
output/

# Editor litter
.vscode/
.idea/
*.swp
*~
"#;

const SAMPLE_POST_WELCOME: &str = r#"---
Title: First post
Date: 2024-04-16
---
Welcome! This site is generated from a directory of markdown documents.

Each document starts with a small front-matter block naming its title and
publication date; everything after the block is the post body.
"#;

const SAMPLE_POST_MARKDOWN: &str = r#"---
Title: Writing in markdown
Date: 2024-04-10
---
Posts are plain markdown.

## What works

- headings (with anchors)
- emphasis and *lists*
- fenced code blocks
- [links](https://commonmark.org), which open in a new tab
"#;

#[cfg(test)]
mod test {
    use super::*;
    use url::Url;

    fn test_config(root: &Path) -> Config {
        Config::for_project(
            root,
            "blog".to_owned(),
            "a blog".to_owned(),
            Url::parse("https://example.org").unwrap(),
        )
    }

    #[test]
    fn test_scaffold_fresh_project() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        ensure_project(&config).unwrap();

        assert!(config.layout_template().is_file());
        assert!(config.index_template().is_file());
        assert!(config.post_template().is_file());
        assert!(config.static_directory.join("style.css").is_file());
        assert!(config.root_directory.join(".gitignore").is_file());
        assert!(config.content_directory.join("first-post.md").is_file());
    }

    #[test]
    fn test_scaffold_preserves_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());

        std::fs::create_dir_all(&config.templates_directory).unwrap();
        std::fs::write(config.layout_template(), "edited").unwrap();
        std::fs::create_dir_all(&config.content_directory).unwrap();
        std::fs::write(config.content_directory.join("mine.md"), "body").unwrap();

        ensure_project(&config).unwrap();

        let layout = std::fs::read_to_string(config.layout_template()).unwrap();
        assert_eq!(layout, "edited");
        // sample content is only seeded into an empty directory
        assert!(!config.content_directory.join("first-post.md").exists());
    }
}
