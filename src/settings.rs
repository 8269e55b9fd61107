use std::path::Path;

use anyhow::{Context, Error, Result};
use configparser::ini::Ini;

const SECTION: &str = "gravatar";

/// Process-wide Gravatar configuration.
///
/// An empty `default_image`/`default_rating` or a zero `default_size` omits
/// the matching query parameter from generated URLs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GravatarSettings {
    pub url_prefix: String,
    pub default_image: String,
    pub default_rating: String,
    pub default_size: u32,
    pub img_class: Option<String>,
}

impl Default for GravatarSettings {
    fn default() -> Self {
        GravatarSettings {
            url_prefix: "http://www.gravatar.com/".to_string(),
            default_image: String::new(),
            default_rating: "g".to_string(),
            default_size: 80,
            img_class: Some("gravatar".to_string()),
        }
    }
}

impl GravatarSettings {
    pub fn load(settings_file: impl AsRef<Path>) -> Result<GravatarSettings> {
        let mut settings_config = Ini::new();
        settings_config
            .load(settings_file.as_ref())
            .map_err(Error::msg)?;
        GravatarSettings::from_ini(&settings_config)
    }

    pub fn from_ini(settings_config: &Ini) -> Result<GravatarSettings> {
        let defaults = GravatarSettings::default();
        let get = |key: &str| settings_config.get(SECTION, key);

        let default_size = match get("default_size") {
            Some(size) if size.trim().is_empty() => 0,
            Some(size) => size
                .trim()
                .parse()
                .with_context(|| format!("invalid default_size {size:?}"))?,
            None => defaults.default_size,
        };
        let img_class = match get("img_class") {
            Some(class) if class.is_empty() => None,
            Some(class) => Some(class),
            None => defaults.img_class,
        };

        Ok(GravatarSettings {
            url_prefix: get("url_prefix").unwrap_or(defaults.url_prefix),
            default_image: get("default_image").unwrap_or(defaults.default_image),
            default_rating: get("default_rating").unwrap_or(defaults.default_rating),
            default_size,
            img_class,
        })
    }
}
