//! The site renderer. Every page is the composition of the shared base
//! layout and one content fragment: the fragment defines a `content` block
//! (`{{define "content"}}…{{end}}`) and the layout places it with
//! `{{template "content" .}}`. Layout and fragment sources are concatenated
//! and compiled exactly once per pair here; rendering a page only executes
//! the compiled template against its data context.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Utc};
use gtmpl::{Context, Template, Value};
use log::error;

use crate::config::Config;
use crate::post::Post;
use crate::site::Site;

/// Renders the index page and one page per post from compiled templates.
pub struct Writer {
    index_template: Template,
    posts_template: Template,
    output_directory: PathBuf,
    posts_output_directory: PathBuf,
}

impl Writer {
    /// Compiles the two page templates. A missing or unreadable template
    /// source file is fatal: there is no fallback layout to render with.
    pub fn new(config: &Config) -> Result<Writer> {
        Ok(Writer {
            index_template: compose_template(&[
                config.layout_template(),
                config.index_template(),
            ])?,
            posts_template: compose_template(&[
                config.layout_template(),
                config.post_template(),
            ])?,
            output_directory: config.output_directory.clone(),
            posts_output_directory: config.posts_output_directory(),
        })
    }

    /// Renders `index.html` against a context exposing the site, the site
    /// title, and the ordered posts.
    pub fn write_index(&self, site: &Site) -> Result<()> {
        let mut context: HashMap<String, Value> = HashMap::new();
        context.insert("site".to_owned(), site.to_value());
        context.insert("title".to_owned(), Value::String(site.title.clone()));
        context.insert(
            "posts".to_owned(),
            Value::Array(site.posts.iter().map(Post::to_value).collect()),
        );
        self.execute(
            &self.index_template,
            Value::Object(context),
            &self.output_directory.join("index.html"),
        )
    }

    /// Renders `posts/<slug>.html` for every post. A failure rendering or
    /// writing one post is reported and does not stop the remaining posts.
    pub fn write_posts(&self, site: &Site) -> Result<()> {
        std::fs::create_dir_all(&self.posts_output_directory)?;
        for post in &site.posts {
            if let Err(err) = self.write_post(site, post) {
                error!("rendering post `{}`: {}", post.slug, err);
            }
        }
        Ok(())
    }

    fn write_post(&self, site: &Site, post: &Post) -> Result<()> {
        let mut context: HashMap<String, Value> = HashMap::new();
        context.insert("site".to_owned(), site.to_value());
        context.insert("title".to_owned(), Value::String(post.title.clone()));
        context.insert("date".to_owned(), Value::String(post.date.clone()));
        // the body is already HTML; gtmpl interpolates it verbatim
        context.insert("content".to_owned(), Value::String(post.content.clone()));
        self.execute(
            &self.posts_template,
            Value::Object(context),
            &self.posts_output_directory.join(format!("{}.html", post.slug)),
        )
    }

    fn execute(&self, template: &Template, value: Value, path: &Path) -> Result<()> {
        let context = Context::from(value).map_err(Error::Template)?;
        template.execute(&mut File::create(path)?, &context)?;
        Ok(())
    }
}

// Loads the template file contents, concatenates them, and parses the result
// into a template with the injected helpers registered.
fn compose_template(template_files: &[PathBuf]) -> Result<Template> {
    let mut contents = String::new();
    for template_file in template_files {
        use std::io::Read;
        File::open(template_file)
            .map_err(|e| Error::OpenTemplateFile {
                path: template_file.to_owned(),
                err: e,
            })?
            .read_to_string(&mut contents)?;
        contents.push('\n');
    }

    let mut template = Template::default();
    template.add_func("current_year", current_year);
    template.parse(&contents).map_err(Error::ParseTemplate)?;
    Ok(template)
}

/// Injected template helper returning the current year, used by the
/// layout's footer line.
fn current_year(_args: &[Value]) -> std::result::Result<Value, String> {
    Ok(Value::from(i64::from(Utc::now().year())))
}

/// The result of a fallible page-rendering operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-rendering operation.
#[derive(Debug)]
pub enum Error {
    /// An error during templating.
    Template(String),

    /// Returned for I/O problems while opening template source files.
    OpenTemplateFile { path: PathBuf, err: io::Error },

    /// Returned for errors parsing template sources.
    ParseTemplate(String),

    /// An error writing the output files.
    Io(io::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => err.fmt(f),
            Error::OpenTemplateFile { path, err } => {
                write!(f, "opening template file `{}`: {}", path.display(), err)
            }
            Error::ParseTemplate(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(_) => None,
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::ParseTemplate(_) => None,
            Error::Io(err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use
    /// the `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`].
    /// This allows us to use the `?` operator for fallible template
    /// operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}
