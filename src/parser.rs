//! Defines the document parser and the post-collection builder. A source
//! document is a markdown file with an optional front-matter block:
//!
//! ```md
//! ---
//! Title: Hello, world!
//! Date: 2024-04-16
//! ---
//! # Hello
//!
//! World
//! ```
//!
//! The front-matter block is delimited by two lines containing exactly `---`;
//! inside it, lines are `Key: Value` pairs split on the first `": "`. Only
//! `Title` and `Date` are recognized; everything else is silently ignored. A
//! document whose first line is not a delimiter has no front matter and is
//! all body.

use std::fmt;
use std::fs::{read_dir, File};
use std::path::{Path, PathBuf};

use log::warn;

use crate::markdown;
use crate::post::Post;

const MARKDOWN_EXTENSION: &str = ".md";
const DELIMITER: &str = "---";
const KEY_VALUE_SEPARATOR: &str = ": ";

const SUMMARY_LINE_LIMIT: usize = 6;
const SUMMARY_CHARACTER_LIMIT: usize = 150;
const SUMMARY_ELLIPSIS: &str = "...";

/// Searches `source_directory` for post files (extension = `.md`) and
/// returns the successfully parsed [`Post`]s, in directory enumeration
/// order. Entries without the markdown extension are ignored. A document
/// that fails to parse is reported and skipped, so one bad post never aborts
/// the run; an unreadable directory, on the other hand, is an error.
pub fn parse_posts(source_directory: &Path) -> Result<Vec<Post>> {
    let mut posts = Vec::new();
    for result in read_dir(source_directory)? {
        let entry = result?;
        let os_file_name = entry.file_name();
        let file_name = os_file_name.to_string_lossy();
        if !file_name.ends_with(MARKDOWN_EXTENSION) {
            continue;
        }
        match parse_post(&entry.path()) {
            Ok(post) => posts.push(post),
            Err(err) => warn!("skipping post `{}`: {}", file_name, err),
        }
    }
    Ok(posts)
}

/// Parses a single [`Post`] from a source file. The post's slug is the file's
/// base name with the markdown extension stripped; no further normalization
/// is applied, so slug uniqueness follows from file-name uniqueness.
pub fn parse_post(path: &Path) -> Result<Post> {
    match parse_post_file(path) {
        Ok(post) => Ok(post),
        Err(e) => Err(Error::Annotated(
            format!("parsing post `{}`", path.display()),
            Box::new(e),
        )),
    }
}

fn parse_post_file(path: &Path) -> Result<Post> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| Error::InvalidFileName(path.to_owned()))?;

    use std::io::Read;
    let mut contents = String::new();
    File::open(path)?.read_to_string(&mut contents)?;

    parse_document(file_name.trim_end_matches(MARKDOWN_EXTENSION), &contents)
}

/// Parses a [`Post`] from a slug and the document text. Exposed separately
/// from [`parse_post`] so parsing is testable without the file system.
pub fn parse_document(slug: &str, input: &str) -> Result<Post> {
    let (front_matter, body) = split_front_matter(input)?;
    Ok(Post {
        title: front_matter.title,
        date: front_matter.date,
        slug: slug.to_owned(),
        summary: summarize(body),
        content: markdown::to_html(body),
    })
}

#[derive(Default)]
struct FrontMatter {
    title: String,
    date: String,
}

/// Splits a document into its front matter and body. The body is everything
/// after the closing delimiter line, verbatim. A document that does not open
/// with a delimiter has no front matter and is returned whole as the body;
/// a delimiter that is opened but never closed is an error.
fn split_front_matter(input: &str) -> Result<(FrontMatter, &str)> {
    let mut front_matter = FrontMatter::default();

    let (first, mut rest) = next_line(input);
    if first != DELIMITER {
        return Ok((front_matter, input));
    }

    loop {
        if rest.is_empty() {
            return Err(Error::UnterminatedFrontMatter);
        }
        let (line, tail) = next_line(rest);
        rest = tail;
        if line == DELIMITER {
            return Ok((front_matter, rest));
        }
        if let Some((key, value)) = line.split_once(KEY_VALUE_SEPARATOR) {
            match key {
                "Title" => front_matter.title = value.to_owned(),
                "Date" => front_matter.date = value.to_owned(),
                // unrecognized keys are ignored
                _ => {}
            }
        }
        // lines without the separator are ignored too
    }
}

// Splits off the first line, without its line terminator, from the text that
// follows it.
fn next_line(s: &str) -> (&str, &str) {
    match s.find('\n') {
        Some(i) => (s[..i].trim_end_matches('\r'), &s[i + 1..]),
        None => (s.trim_end_matches('\r'), ""),
    }
}

/// Derives a plain-text summary from a raw markdown body: at most the first
/// six lines, minus headings, fence markers, and blank lines, joined with
/// single spaces and truncated to 150 characters with a trailing ellipsis.
pub fn summarize(body: &str) -> String {
    let mut summary = String::new();
    for line in body.lines().take(SUMMARY_LINE_LIMIT) {
        if line.is_empty() || line.starts_with('#') || line.starts_with("```") {
            continue;
        }
        if !summary.is_empty() {
            summary.push(' ');
        }
        summary.push_str(line);
    }
    truncate_characters(summary)
}

// Truncation counts characters rather than bytes so a multi-byte sequence
// straddling the limit survives intact.
fn truncate_characters(summary: String) -> String {
    match summary.char_indices().nth(SUMMARY_CHARACTER_LIMIT) {
        None => summary,
        Some((offset, _)) => {
            let mut truncated = summary[..offset].to_owned();
            truncated.push_str(SUMMARY_ELLIPSIS);
            truncated
        }
    }
}

/// Represents the result of a [`Post`]-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing a [`Post`] object.
#[derive(Debug)]
pub enum Error {
    /// Returned when a front-matter block is opened with `---` but never
    /// closed.
    UnterminatedFrontMatter,

    /// Returned when a source file's name isn't valid UTF-8.
    InvalidFileName(PathBuf),

    /// Returned for I/O errors, including documents that aren't valid UTF-8.
    Io(std::io::Error),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::UnterminatedFrontMatter => {
                write!(f, "front matter opened with `---` but never closed")
            }
            Error::InvalidFileName(path) => {
                write!(f, "invalid file name: {:?}", path)
            }
            Error::Io(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::UnterminatedFrontMatter => None,
            Error::InvalidFileName(_) => None,
            Error::Io(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_document_with_front_matter() -> Result<()> {
        let post = parse_document(
            "hello-world",
            "---\nTitle: Hello, world!\nDate: 2024-04-16\n---\nFirst line.\n",
        )?;
        assert_eq!(post.title, "Hello, world!");
        assert_eq!(post.date, "2024-04-16");
        assert_eq!(post.slug, "hello-world");
        assert_eq!(post.summary, "First line.");
        assert_eq!(post.content, "<p>First line.</p>\n");
        Ok(())
    }

    #[test]
    fn test_parse_document_without_front_matter() -> Result<()> {
        let post = parse_document("plain", "Just a body.\n")?;
        assert_eq!(post.title, "");
        assert_eq!(post.date, "");
        assert_eq!(post.content, "<p>Just a body.</p>\n");
        Ok(())
    }

    #[test]
    fn test_parse_document_ignores_unknown_and_malformed_keys() -> Result<()> {
        let post = parse_document(
            "odd",
            "---\nAuthor: nobody\nno separator here\nTitle:missing-space\nTitle: Kept\n---\nBody.\n",
        )?;
        assert_eq!(post.title, "Kept");
        assert_eq!(post.date, "");
        Ok(())
    }

    #[test]
    fn test_parse_document_unterminated_front_matter() {
        match parse_document("broken", "---\nTitle: Never closed\n") {
            Err(_) => {}
            Ok(_) => panic!("expected an unterminated front matter error"),
        }
    }

    #[test]
    fn test_body_preserved_after_delimiter() -> Result<()> {
        let post = parse_document("dashes", "---\nTitle: T\n---\nline one\n\n---\n\nline two\n")?;
        // a later `---` belongs to the body, not the front matter
        assert!(post.content.contains("<hr />"));
        Ok(())
    }

    #[test]
    fn test_summary_window_is_six_lines() {
        let body = "one\ntwo\nthree\nfour\nfive\nsix\nseven\n";
        assert_eq!(summarize(body), "one two three four five six");
    }

    #[test]
    fn test_summary_blank_lines_consume_the_window() {
        // line seven is outside the window even though earlier lines were
        // blank and contributed nothing
        let body = "one\n\n\n\n\n\nseven\n";
        assert_eq!(summarize(body), "one");
    }

    #[test]
    fn test_summary_skips_headings_and_fences() {
        let body = "# Heading\nprose\n```\ncode\n```\nmore\n";
        assert_eq!(summarize(body), "prose code more");
    }

    #[test]
    fn test_summary_truncates_on_character_boundaries() {
        let body = "日".repeat(200);
        let summary = summarize(&body);
        assert_eq!(summary.chars().count(), 150 + SUMMARY_ELLIPSIS.len());
        assert!(summary.starts_with(&"日".repeat(150)));
        assert!(summary.ends_with(SUMMARY_ELLIPSIS));
    }

    #[test]
    fn test_summary_at_exact_limit_is_untouched() {
        let body = "x".repeat(150);
        assert_eq!(summarize(&body), body);
    }

    #[test]
    fn test_parse_posts_skips_bad_documents() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(
            dir.path().join("good.md"),
            "---\nTitle: Good\nDate: 2024-01-01\n---\nFine.\n",
        )?;
        std::fs::write(dir.path().join("bad.md"), [0xff, 0xfe, 0xfd])?;
        std::fs::write(dir.path().join("notes.txt"), "not a post")?;

        let posts = parse_posts(dir.path())?;
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "good");
        Ok(())
    }

    #[test]
    fn test_parse_posts_missing_directory_is_fatal() {
        match parse_posts(Path::new("./does-not-exist")) {
            Err(Error::Io(_)) => {}
            other => panic!("expected an I/O error, got {:?}", other.map(|p| p.len())),
        }
    }
}
