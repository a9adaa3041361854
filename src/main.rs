use std::path::{Path, PathBuf};
use std::process;

use anyhow::Result;
use clap::{App, Arg};
use log::{error, info};
use url::Url;

use quern::build::build_site;
use quern::config::Config;
use quern::scaffold;

// Site identity is fixed configuration supplied here, not a flag or a file.
const SITE_TITLE: &str = "A Field Notebook";
const SITE_DESCRIPTION: &str = "Notes on software, one post at a time";
const SITE_BASE_URL: &str = "https://example.github.io";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = App::new("quern")
        .about("Generates a static blog from a directory of markdown documents")
        .arg(
            Arg::with_name("directory")
                .help("Project root directory (defaults to the working directory)")
                .index(1),
        )
        .get_matches();

    let root = PathBuf::from(matches.value_of("directory").unwrap_or("."));
    match run(&root) {
        Ok(output_directory) => {
            info!("site generated into `{}`", output_directory.display())
        }
        Err(err) => {
            error!("{:#}", err);
            process::exit(1);
        }
    }
}

fn run(root: &Path) -> Result<PathBuf> {
    let base_url = Url::parse(SITE_BASE_URL)?;
    let config = Config::for_project(
        root,
        SITE_TITLE.to_owned(),
        SITE_DESCRIPTION.to_owned(),
        base_url,
    );
    scaffold::ensure_project(&config)?;
    build_site(&config)?;
    Ok(config.output_directory)
}
