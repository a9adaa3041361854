//! Defines the [`Site`] aggregate: the site's identity plus the ordered
//! post collection, handed read-only to the renderer and the feed builder.

use std::collections::HashMap;

use gtmpl::Value;
use url::Url;

use crate::config::Config;
use crate::post::{self, Post};

/// The whole-blog aggregate.
pub struct Site {
    pub title: String,
    pub description: String,
    pub base_url: Url,

    /// Posts in publication order, newest first. Populated exactly once by
    /// [`Site::new`]; consumers must never re-sort, since index and feed
    /// ordering are defined to be this ordering.
    pub posts: Vec<Post>,
}

impl Site {
    /// Builds a [`Site`] from configuration and freshly parsed posts,
    /// running the ordering stage once.
    pub fn new(config: &Config, mut posts: Vec<Post>) -> Site {
        post::sort_by_date(&mut posts);
        Site {
            title: config.title.clone(),
            description: config.description.clone(),
            base_url: config.base_url.clone(),
            posts,
        }
    }

    /// The absolute URL at which a post is reachable.
    pub fn permalink(&self, slug: &str) -> String {
        format!("{}/posts/{}.html", self.base_url_str(), slug)
    }

    /// The base URL without a trailing slash, ready for link concatenation.
    pub fn base_url_str(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Converts the site's metadata into a [`Value`] for templating.
    pub fn to_value(&self) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("title".to_owned(), Value::String(self.title.clone()));
        m.insert(
            "base_url".to_owned(),
            Value::String(self.base_url_str().to_owned()),
        );
        Value::Object(m)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::path::Path;

    fn test_config() -> Config {
        Config::for_project(
            Path::new("."),
            "blog".to_owned(),
            "a blog".to_owned(),
            Url::parse("https://example.org").unwrap(),
        )
    }

    fn post(slug: &str, date: &str) -> Post {
        Post {
            title: slug.to_owned(),
            date: date.to_owned(),
            slug: slug.to_owned(),
            content: String::new(),
            summary: String::new(),
        }
    }

    #[test]
    fn test_permalink() {
        let site = Site::new(&test_config(), Vec::new());
        assert_eq!(
            site.permalink("my-post"),
            "https://example.org/posts/my-post.html"
        );
    }

    #[test]
    fn test_construction_orders_posts() {
        let site = Site::new(
            &test_config(),
            vec![post("old", "2020-01-01"), post("new", "2024-01-01")],
        );
        assert_eq!(site.posts[0].slug, "new");
        assert_eq!(site.posts[1].slug, "old");
    }
}
