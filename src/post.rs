//! Defines the [`Post`] record and the ordering stage that arranges a
//! freshly parsed collection by publication date.

use std::collections::HashMap;

use chrono::NaiveDate;
use gtmpl_value::Value;

/// The front-matter and feed date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single parsed document. Constructed once per source file while the
/// collection is built, then held immutably by the site for the rest of the
/// run.
#[derive(Clone, Debug)]
pub struct Post {
    /// The post's title; empty if the front matter omits one.
    pub title: String,

    /// The publication date exactly as written in the front matter
    /// (`YYYY-MM-DD`). Parsed only where a comparison or a feed timestamp
    /// needs it; never rewritten.
    pub date: String,

    /// The URL path segment and output file name, derived from the source
    /// file's base name. Unique because source file names are unique.
    pub slug: String,

    /// The rendered body. Already HTML: templates interpolate it verbatim.
    pub content: String,

    /// A plain-text summary of at most 150 characters.
    pub summary: String,
}

impl Post {
    /// Converts a [`Post`] into a [`Value`] so it can be rendered in a
    /// template.
    pub fn to_value(&self) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("title".to_owned(), Value::String(self.title.clone()));
        m.insert("date".to_owned(), Value::String(self.date.clone()));
        m.insert("slug".to_owned(), Value::String(self.slug.clone()));
        m.insert("summary".to_owned(), Value::String(self.summary.clone()));
        m.insert("content".to_owned(), Value::String(self.content.clone()));
        Value::Object(m)
    }
}

/// Sorts posts by publication date, most recent first. The sort is stable,
/// so posts sharing a date keep their relative input order. That input order
/// is the content directory's enumeration order, which makes it an
/// observable property of the generated index and feed.
pub fn sort_by_date(posts: &mut [Post]) {
    posts.sort_by(|a, b| date_key(&b.date).cmp(&date_key(&a.date)));
}

// Parses a date for ordering purposes only. A date that doesn't parse
// compares as the epoch, which places it after every valid date without
// aborting the sort.
fn date_key(date: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date, DATE_FORMAT).unwrap_or_else(|_| epoch())
}

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap() // a valid date; cannot fail
}

#[cfg(test)]
mod test {
    use super::*;

    fn post(slug: &str, date: &str) -> Post {
        Post {
            title: slug.to_owned(),
            date: date.to_owned(),
            slug: slug.to_owned(),
            content: String::new(),
            summary: String::new(),
        }
    }

    fn slugs(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.slug.as_str()).collect()
    }

    #[test]
    fn test_sort_descending() {
        let mut posts = vec![
            post("oldest", "2022-03-01"),
            post("newest", "2024-11-15"),
            post("middle", "2023-07-09"),
        ];
        sort_by_date(&mut posts);
        assert_eq!(slugs(&posts), vec!["newest", "middle", "oldest"]);
    }

    #[test]
    fn test_equal_dates_keep_input_order() {
        let mut posts = vec![
            post("first", "2024-01-01"),
            post("second", "2024-01-01"),
            post("third", "2024-01-01"),
        ];
        sort_by_date(&mut posts);
        assert_eq!(slugs(&posts), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_unparsable_dates_sort_last() {
        let mut posts = vec![
            post("undated", "not-a-date"),
            post("dated", "2021-05-05"),
            post("blank", ""),
        ];
        sort_by_date(&mut posts);
        assert_eq!(slugs(&posts), vec!["dated", "undated", "blank"]);
    }
}
