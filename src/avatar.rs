use ammonia::clean_text;
use url::form_urlencoded;

use crate::gravatar_id::gravatar_id;
use crate::settings::GravatarSettings;
use crate::urlquote::smart_urlquote;

/// Builds Gravatar URLs and `<img>` tags from email addresses.
///
/// A size of zero or an empty rating counts as unspecified and is replaced by
/// the configured default, so an explicit `Some(0)` behaves exactly like
/// `None`. Templates in the wild rely on this.
#[derive(Clone, Debug)]
pub struct AvatarUrlBuilder {
    settings: GravatarSettings,
}

impl AvatarUrlBuilder {
    pub fn new(settings: GravatarSettings) -> AvatarUrlBuilder {
        AvatarUrlBuilder { settings }
    }

    pub fn effective_size(&self, size: Option<u32>) -> u32 {
        size.filter(|&size| size != 0)
            .unwrap_or(self.settings.default_size)
    }

    fn effective_rating<'a>(&'a self, rating: Option<&'a str>) -> &'a str {
        rating
            .filter(|rating| !rating.is_empty())
            .unwrap_or(&self.settings.default_rating)
    }

    pub fn url(&self, email: &str, size: Option<u32>, rating: Option<&str>) -> String {
        let mut url = format!("{}avatar/{}", self.settings.url_prefix, gravatar_id(email));

        let size = self.effective_size(size);
        let mut query = form_urlencoded::Serializer::new(String::new());
        let mut has_query = false;
        for (key, value) in [
            ("d", self.settings.default_image.clone()),
            ("s", if size == 0 { String::new() } else { size.to_string() }),
            ("r", self.effective_rating(rating).to_string()),
        ] {
            if !value.is_empty() {
                query.append_pair(key, &value);
                has_query = true;
            }
        }
        if has_query {
            url.push('?');
            url.push_str(&query.finish());
        }

        smart_urlquote(&url)
    }

    /// Same as [`AvatarUrlBuilder::url`] at twice the effective size.
    pub fn retina_url(&self, email: &str, size: Option<u32>, rating: Option<&str>) -> String {
        let size = self.effective_size(size).saturating_mul(2);
        self.url(email, Some(size), rating)
    }

    pub fn profile_url(&self, email: &str) -> String {
        format!("{}{}.json", self.settings.url_prefix, gravatar_id(email))
    }

    pub fn img_tag(&self, url: &str, info: &str, size: u32) -> String {
        let class = match &self.settings.img_class {
            Some(class) if !class.is_empty() => format!(r#" class="{}""#, clean_text(class)),
            _ => String::new(),
        };
        format!(
            r#"<img src="{}"{class} alt="Avatar for {}" height="{size}" width="{size}"/>"#,
            smart_urlquote(url),
            clean_text(info),
        )
    }

    /// An `<img>` for `email`, with `info` naming the avatar in the alt text.
    pub fn img(&self, email: &str, info: &str, size: Option<u32>, rating: Option<&str>) -> String {
        let url = self.url(email, size, rating);
        self.img_tag(&url, info, self.effective_size(size))
    }

    /// An `<img>` fetched at twice the resolution but rendered at `size`.
    pub fn retina_img(
        &self,
        email: &str,
        info: &str,
        size: Option<u32>,
        rating: Option<&str>,
    ) -> String {
        let url = self.retina_url(email, size, rating);
        self.img_tag(&url, info, self.effective_size(size))
    }
}
