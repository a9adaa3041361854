//! The adapter over the external markdown engine. The engine itself owns the
//! CommonMark grammar; this module only configures the extension set and
//! rewrites the event stream so headings carry anchor ids and links open in
//! a new tab.

use pulldown_cmark::escape::{escape_href, escape_html};
use pulldown_cmark::{html, CowStr, Event, LinkType, Options, Parser, Tag};

/// Converts a markdown body to HTML. This never fails: malformed markdown is
/// rendered on a best-effort basis by the engine.
pub fn to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let events = rewrite(Parser::new_ext(markdown, options).collect());
    let mut out = String::new();
    html::push_html(&mut out, events.into_iter());
    out
}

/// Rewrites the engine's event stream before rendering:
///
/// * headings become raw `<hN id="...">` tags whose id is the slugified
///   heading text;
/// * links (other than `mailto:` links, which keep their default rendering)
///   gain `target="_blank"` and open in a new tab.
fn rewrite(events: Vec<Event>) -> Vec<Event> {
    let mut out = Vec::with_capacity(events.len());
    let mut i = 0;
    while i < events.len() {
        match events[i].clone() {
            Event::Start(Tag::Heading(level)) => {
                // Scan ahead to the matching end tag, collecting the plain
                // text from which the anchor id is derived. The inner events
                // (emphasis, code spans) are kept as-is.
                let mut text = String::new();
                let mut j = i + 1;
                while j < events.len() {
                    match &events[j] {
                        Event::End(Tag::Heading(_)) => break,
                        Event::Text(t) => text.push_str(t),
                        Event::Code(t) => text.push_str(t),
                        _ => {}
                    }
                    j += 1;
                }
                out.push(raw_html(format!(
                    r#"<h{} id="{}">"#,
                    level,
                    slug::slugify(&text)
                )));
                out.extend(events[i + 1..j].iter().cloned());
                out.push(raw_html(format!("</h{}>", level)));
                i = j + 1;
            }
            Event::Start(Tag::Link(LinkType::Email, dest, title)) => {
                out.push(Event::Start(Tag::Link(LinkType::Email, dest, title)));
                i += 1;
            }
            Event::Start(Tag::Link(_, dest, title)) => {
                out.push(raw_html(anchor_open(&dest, &title)));
                i += 1;
            }
            Event::End(Tag::Link(kind, dest, title)) => {
                // mail links were left to the engine, so their end tag is
                // too; everything else closes the raw anchor we opened
                match kind {
                    LinkType::Email => out.push(Event::End(Tag::Link(kind, dest, title))),
                    _ => out.push(raw_html("</a>".to_owned())),
                }
                i += 1;
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }
    out
}

fn anchor_open(dest: &str, title: &str) -> String {
    let mut href = String::new();
    // writing into a String cannot fail
    let _ = escape_href(&mut href, dest);
    if title.is_empty() {
        format!(r#"<a href="{}" target="_blank" rel="noopener">"#, href)
    } else {
        let mut escaped_title = String::new();
        let _ = escape_html(&mut escaped_title, title);
        format!(
            r#"<a href="{}" title="{}" target="_blank" rel="noopener">"#,
            href, escaped_title
        )
    }
}

fn raw_html<'a>(html: String) -> Event<'a> {
    Event::Html(CowStr::Boxed(html.into_boxed_str()))
}
