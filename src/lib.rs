//! The library code for the `quern` static site generator. The architecture
//! can be generally broken down into three distinct steps:
//!
//! 1. Parsing posts from source files on disk ([`crate::parser`]) and
//!    ordering them by publication date into a [`site::Site`]
//! 2. Rendering the ordered posts into output files on disk
//!    ([`crate::write`]): the index page and one page per post, each the
//!    composition of the shared layout template and a content fragment
//! 3. Serializing the same ordered posts as an RSS feed ([`crate::feed`])
//!
//! [`build::build_site`] stitches the steps together, along with the
//! simpler side effects around them (static asset copying, output directory
//! creation). [`scaffold::ensure_project`] bootstraps a fresh project tree
//! with default templates and sample content.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod feed;
pub mod markdown;
pub mod parser;
pub mod post;
pub mod scaffold;
pub mod site;
pub mod write;
