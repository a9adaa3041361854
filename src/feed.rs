//! Support for serializing the ordered post collection as an RSS 2.0 feed.
//! The element layout is fixed: a channel carrying title, link, description,
//! and a self-referential `atom:link`, followed by one item per post in the
//! site's post order. Text nodes pass through the XML writer, which escapes
//! reserved characters; already-safe input is emitted byte-for-byte.

use std::fmt;
use std::io::{Cursor, Write};

use chrono::{DateTime, NaiveDate, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer as XmlWriter;

use crate::post::DATE_FORMAT;
use crate::site::Site;

const RFC_1123_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Serializes `site`'s posts as an RSS 2.0 document and writes it to `w`.
/// `now` supplies the fallback `<pubDate>` for posts whose dates don't
/// parse; the caller takes it once, and every item in a run agrees on it.
pub fn write_feed<W: Write>(site: &Site, now: DateTime<Utc>, mut w: W) -> Result<()> {
    let document = render_feed(site, now).map_err(Error::Xml)?;
    w.write_all(&document)?;
    Ok(())
}

fn render_feed(site: &Site, now: DateTime<Utc>) -> quick_xml::Result<Vec<u8>> {
    let mut writer = XmlWriter::new(Cursor::new(Vec::new()));

    // <?xml version="1.0" encoding="UTF-8"?>
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    // <rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">
    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    rss.push_attribute(("xmlns:atom", "http://www.w3.org/2005/Atom"));
    writer.write_event(Event::Start(rss))?;

    writer.write_event(Event::Start(BytesStart::new("channel")))?;
    push_text(&mut writer, "title", &site.title)?;
    push_text(&mut writer, "link", site.base_url_str())?;
    push_text(&mut writer, "description", &site.description)?;

    // <atom:link href="…/feed.xml" rel="self" type="application/rss+xml"/>
    let href = format!("{}/feed.xml", site.base_url_str());
    let mut self_link = BytesStart::new("atom:link");
    self_link.push_attribute(("href", href.as_str()));
    self_link.push_attribute(("rel", "self"));
    self_link.push_attribute(("type", "application/rss+xml"));
    writer.write_event(Event::Empty(self_link))?;

    for post in &site.posts {
        let permalink = site.permalink(&post.slug);

        writer.write_event(Event::Start(BytesStart::new("item")))?;
        push_text(&mut writer, "title", &post.title)?;
        push_text(&mut writer, "link", &permalink)?;
        push_text(&mut writer, "description", &post.summary)?;
        push_text(
            &mut writer,
            "pubDate",
            &format_publication_date(&post.date, now),
        )?;
        push_text(&mut writer, "guid", &permalink)?;
        writer.write_event(Event::End(BytesEnd::new("item")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;

    Ok(writer.into_inner().into_inner())
}

fn push_text(
    writer: &mut XmlWriter<Cursor<Vec<u8>>>,
    tag: &str,
    text: &str,
) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

// Formats a post's date for `<pubDate>`. A date that doesn't parse falls
// back to the supplied current timestamp rather than failing the feed.
fn format_publication_date(date: &str, now: DateTime<Utc>) -> String {
    match NaiveDate::parse_from_str(date, DATE_FORMAT) {
        Ok(date) => date
            .and_hms_opt(0, 0, 0)
            .unwrap() // midnight always exists
            .format(RFC_1123_FORMAT)
            .to_string(),
        Err(_) => now.format(RFC_1123_FORMAT).to_string(),
    }
}

/// The result of a fallible feed operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating the feed.
#[derive(Debug)]
pub enum Error {
    /// Returned when there is a generic I/O error.
    Io(std::io::Error),

    /// Returned when the XML writer reports an error.
    Xml(quick_xml::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Xml(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Xml(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator in fallible feed operations.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use std::str;

    use chrono::TimeZone;
    use url::Url;

    use crate::post::Post;

    use super::*;

    fn test_site(posts: Vec<Post>) -> Site {
        Site {
            title: "my blog".to_owned(),
            description: "a blog".to_owned(),
            base_url: Url::parse("https://example.org").unwrap(),
            posts,
        }
    }

    fn post(slug: &str, title: &str, date: &str, summary: &str) -> Post {
        Post {
            title: title.to_owned(),
            date: date.to_owned(),
            slug: slug.to_owned(),
            content: String::new(),
            summary: summary.to_owned(),
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 5, 6, 7).unwrap()
    }

    #[test]
    fn test_render_feed() {
        let site = test_site(vec![
            post(
                "first-post",
                "First Post",
                "2023-11-15",
                "Welcome to the blog.",
            ),
            post("older", "Older", "not-a-date", "Old words."),
        ]);

        let mut document = Vec::new();
        write_feed(&site, fixed_now(), &mut document).unwrap();
        assert_eq!(str::from_utf8(&document).unwrap(), EXPECTED);
    }

    const EXPECTED: &str = r#"<?xml version="1.0" encoding="UTF-8"?><rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom"><channel><title>my blog</title><link>https://example.org</link><description>a blog</description><atom:link href="https://example.org/feed.xml" rel="self" type="application/rss+xml"/><item><title>First Post</title><link>https://example.org/posts/first-post.html</link><description>Welcome to the blog.</description><pubDate>Wed, 15 Nov 2023 00:00:00 GMT</pubDate><guid>https://example.org/posts/first-post.html</guid></item><item><title>Older</title><link>https://example.org/posts/older.html</link><description>Old words.</description><pubDate>Tue, 02 Jan 2024 05:06:07 GMT</pubDate><guid>https://example.org/posts/older.html</guid></item></channel></rss>"#;

    #[test]
    fn test_items_follow_site_order() {
        // the feed reflects the site's ordering; it never re-sorts
        let site = test_site(vec![
            post("a", "A", "2020-01-01", ""),
            post("b", "B", "2024-01-01", ""),
        ]);
        let mut document = Vec::new();
        write_feed(&site, fixed_now(), &mut document).unwrap();
        let text = str::from_utf8(&document).unwrap();
        let a = text.find("<title>A</title>").unwrap();
        let b = text.find("<title>B</title>").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_reserved_characters_are_escaped() {
        let site = test_site(vec![post(
            "amp",
            "Tea & Biscuits",
            "2023-01-01",
            "1 < 2",
        )]);
        let mut document = Vec::new();
        write_feed(&site, fixed_now(), &mut document).unwrap();
        let text = str::from_utf8(&document).unwrap();
        assert!(text.contains("<title>Tea &amp; Biscuits</title>"));
        assert!(text.contains("<description>1 &lt; 2</description>"));
    }
}
