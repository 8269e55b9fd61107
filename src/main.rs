#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use gravatar_tags::{GravatarSettings, GravatarTags, StaticDirectory, TAG_NAMES};

#[derive(Parser)]
struct Cli {
    /// INI file with a [gravatar] section
    #[arg(long)]
    settings_file: Option<PathBuf>,
    /// INI file with a [users] section of `username = email` pairs
    #[arg(long)]
    users_file: Option<PathBuf>,
    #[arg(value_parser = clap::builder::PossibleValuesParser::new(TAG_NAMES))]
    tag: String,
    /// email_or_user [size] [rating]
    args: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    let settings = match &args.settings_file {
        Some(settings_file) => GravatarSettings::load(settings_file)
            .with_context(|| format!("failed to load settings from {}", settings_file.display()))?,
        None => GravatarSettings::default(),
    };
    let users = match &args.users_file {
        Some(users_file) => StaticDirectory::load(users_file)
            .with_context(|| format!("failed to load users from {}", users_file.display()))?,
        None => StaticDirectory::new(),
    };
    tracing::debug!("loaded {} users", users.len());

    let tags =
        GravatarTags::new(settings, users).with_context(|| "failed to initialize gravatar tags")?;
    let tag_args: Vec<&str> = args.args.iter().map(String::as_str).collect();
    let output = tags
        .call(&args.tag, &tag_args)
        .with_context(|| format!("{} failed", args.tag))?;
    println!("{output:#}");

    Ok(())
}
