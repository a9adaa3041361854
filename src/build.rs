//! Exports the [`build_site`] function which stitches together the
//! high-level steps of building the output site: parsing the posts
//! ([`crate::parser`]), ordering them into a [`Site`], rendering the index
//! and post pages ([`crate::write`]), copying the static source directory
//! into the output tree, and generating the RSS feed ([`crate::feed`]).

use std::fmt;
use std::fs::File;
use std::path::Path;

use chrono::Utc;
use log::{error, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::feed::{self, Error as FeedError};
use crate::parser::{self, Error as ParseError};
use crate::site::Site;
use crate::write::{Error as WriteError, Writer};

/// Builds the site from a [`Config`]. Per-document and per-page failures
/// are reported and skipped inside the stages; an unreadable content
/// directory or template source propagates out of here and aborts the run.
pub fn build_site(config: &Config) -> Result<()> {
    // collect all posts, then run the ordering stage once
    let posts = parser::parse_posts(&config.content_directory)?;
    let site = Site::new(config, posts);

    // compile the page templates once for the whole run
    let writer = Writer::new(config)?;

    std::fs::create_dir_all(&config.output_directory)?;
    if let Err(err) = writer.write_index(&site) {
        error!("rendering index page: {}", err);
    }
    writer.write_posts(&site)?;

    copy_static(&config.static_directory, &config.static_output_directory())?;

    // the fallback timestamp for unparsable feed dates; taken once per run
    feed::write_feed(&site, Utc::now(), File::create(config.feed_output_path())?)?;

    Ok(())
}

// Copies the static source tree verbatim into the output tree. A missing
// source directory is not an error, and a file that fails to copy is
// reported and skipped.
fn copy_static(src: &Path, dst: &Path) -> Result<()> {
    if !src.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(dst)?;
    for result in WalkDir::new(src) {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                warn!("walking static directory: {}", err);
                continue;
            }
        };
        // strip_prefix can't fail: every entry is under `src`
        let target = dst.join(entry.path().strip_prefix(src).unwrap());
        if entry.file_type().is_dir() {
            if let Err(err) = std::fs::create_dir_all(&target) {
                warn!("creating static directory `{}`: {}", target.display(), err);
            }
        } else if let Err(err) = std::fs::copy(entry.path(), &target) {
            warn!(
                "copying static file `{}`: {}",
                entry.path().display(),
                err
            );
        }
    }
    Ok(())
}

/// The result of building a site.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors during parsing.
    Parse(ParseError),

    /// Returned for errors rendering pages to disk.
    Write(WriteError),

    /// Returned for errors writing the feed.
    Feed(FeedError),

    /// Returned for other I/O errors.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Parse(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::Feed(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::Feed(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<ParseError> for Error {
    /// Converts [`ParseError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: ParseError) -> Error {
        Error::Parse(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}

impl From<FeedError> for Error {
    /// Converts [`FeedError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: FeedError) -> Error {
        Error::Feed(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
