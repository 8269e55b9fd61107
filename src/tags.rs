use std::fmt;

use serde_json::Value;

use crate::avatar::AvatarUrlBuilder;
use crate::error::GravatarError;
use crate::gravatar_id::gravatar_id;
use crate::profile::ProfileClient;
use crate::settings::GravatarSettings;
use crate::user::{User, UserDirectory, UserRef};
use crate::Result;

pub const TAG_NAMES: [&str; 10] = [
    "gravatar_id_for_email",
    "gravatar_id_for_user",
    "gravatar_for_email",
    "gravatar_for_user",
    "gravatar_img_for_email",
    "gravatar_img_for_user",
    "gravatar_retina_img_for_email",
    "gravatar_retina_img_for_user",
    "gravatar_profile_for_email",
    "gravatar_profile_for_user",
];

#[derive(Clone, Debug, PartialEq)]
pub enum TagOutput {
    Text(String),
    Json(Value),
}

impl fmt::Display for TagOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagOutput::Text(text) => f.write_str(text),
            TagOutput::Json(value) if f.alternate() => write!(f, "{value:#}"),
            TagOutput::Json(value) => write!(f, "{value}"),
        }
    }
}

/// The Gravatar template tags, bound to one configuration and one user
/// directory.
pub struct GravatarTags<D> {
    avatars: AvatarUrlBuilder,
    profiles: ProfileClient,
    users: D,
}

impl<D: UserDirectory> GravatarTags<D> {
    pub fn new(settings: GravatarSettings, users: D) -> Result<GravatarTags<D>> {
        Ok(GravatarTags::with_profile_client(
            settings,
            users,
            ProfileClient::new()?,
        ))
    }

    pub fn with_profile_client(
        settings: GravatarSettings,
        users: D,
        profiles: ProfileClient,
    ) -> GravatarTags<D> {
        GravatarTags {
            avatars: AvatarUrlBuilder::new(settings),
            profiles,
            users,
        }
    }

    pub fn resolve_user(&self, user: impl Into<UserRef>) -> Result<User> {
        user.into().resolve(&self.users)
    }

    pub fn resolve_email(&self, user: impl Into<UserRef>) -> Result<String> {
        Ok(self.resolve_user(user)?.email)
    }

    pub fn gravatar_id_for_email(&self, email: &str) -> String {
        gravatar_id(email)
    }

    pub fn gravatar_id_for_user(&self, user: impl Into<UserRef>) -> Result<String> {
        Ok(gravatar_id(&self.resolve_email(user)?))
    }

    pub fn gravatar_for_email(&self, email: &str, size: Option<u32>, rating: Option<&str>) -> String {
        self.avatars.url(email, size, rating)
    }

    pub fn gravatar_for_user(
        &self,
        user: impl Into<UserRef>,
        size: Option<u32>,
        rating: Option<&str>,
    ) -> Result<String> {
        Ok(self.avatars.url(&self.resolve_email(user)?, size, rating))
    }

    pub fn gravatar_img_for_email(
        &self,
        email: &str,
        size: Option<u32>,
        rating: Option<&str>,
    ) -> String {
        self.avatars.img(email, email, size, rating)
    }

    pub fn gravatar_img_for_user(
        &self,
        user: impl Into<UserRef>,
        size: Option<u32>,
        rating: Option<&str>,
    ) -> Result<String> {
        let user = self.resolve_user(user)?;
        Ok(self.avatars.img(&user.email, &user.username, size, rating))
    }

    pub fn gravatar_retina_img_for_email(
        &self,
        email: &str,
        size: Option<u32>,
        rating: Option<&str>,
    ) -> String {
        self.avatars.retina_img(email, email, size, rating)
    }

    pub fn gravatar_retina_img_for_user(
        &self,
        user: impl Into<UserRef>,
        size: Option<u32>,
        rating: Option<&str>,
    ) -> Result<String> {
        let user = self.resolve_user(user)?;
        Ok(self
            .avatars
            .retina_img(&user.email, &user.username, size, rating))
    }

    pub fn gravatar_profile_for_email(&self, email: &str) -> Result<Value> {
        self.profiles.fetch(&self.avatars.profile_url(email))
    }

    pub fn gravatar_profile_for_user(&self, user: impl Into<UserRef>) -> Result<Value> {
        self.gravatar_profile_for_email(&self.resolve_email(user)?)
    }

    /// Runs a tag by name with positional template arguments
    /// `(email_or_user, [size], [rating])`. An empty size is unspecified.
    pub fn call(&self, name: &str, args: &[&str]) -> Result<TagOutput> {
        let max_args = match name {
            "gravatar_id_for_email"
            | "gravatar_id_for_user"
            | "gravatar_profile_for_email"
            | "gravatar_profile_for_user" => 1,
            name if TAG_NAMES.contains(&name) => 3,
            name => return Err(GravatarError::UnknownTag(name.to_string())),
        };
        let Some((&subject, rest)) = args.split_first() else {
            return Err(GravatarError::InvalidArgument(format!(
                "{name} needs an email or user"
            )));
        };
        if args.len() > max_args {
            return Err(GravatarError::InvalidArgument(format!(
                "{name} takes at most {max_args} arguments, got {}",
                args.len()
            )));
        }
        let size = rest.first().copied().map(parse_size).transpose()?.flatten();
        let rating = rest.get(1).copied();

        let output = match name {
            "gravatar_id_for_email" => TagOutput::Text(self.gravatar_id_for_email(subject)),
            "gravatar_id_for_user" => TagOutput::Text(self.gravatar_id_for_user(subject)?),
            "gravatar_for_email" => TagOutput::Text(self.gravatar_for_email(subject, size, rating)),
            "gravatar_for_user" => TagOutput::Text(self.gravatar_for_user(subject, size, rating)?),
            "gravatar_img_for_email" => {
                TagOutput::Text(self.gravatar_img_for_email(subject, size, rating))
            }
            "gravatar_img_for_user" => {
                TagOutput::Text(self.gravatar_img_for_user(subject, size, rating)?)
            }
            "gravatar_retina_img_for_email" => {
                TagOutput::Text(self.gravatar_retina_img_for_email(subject, size, rating))
            }
            "gravatar_retina_img_for_user" => {
                TagOutput::Text(self.gravatar_retina_img_for_user(subject, size, rating)?)
            }
            "gravatar_profile_for_email" => {
                TagOutput::Json(self.gravatar_profile_for_email(subject)?)
            }
            "gravatar_profile_for_user" => {
                TagOutput::Json(self.gravatar_profile_for_user(subject)?)
            }
            name => return Err(GravatarError::UnknownTag(name.to_string())),
        };
        Ok(output)
    }
}

fn parse_size(size: &str) -> Result<Option<u32>> {
    let size = size.trim();
    if size.is_empty() {
        return Ok(None);
    }
    size.parse()
        .map(Some)
        .map_err(|_| GravatarError::InvalidArgument(format!("invalid size {size:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::tests::{local_client, serve_once};
    use crate::user::StaticDirectory;
    use rstest::rstest;

    const SOMEONE_ID: &str = "16d113840f999444259f73bac9ab8b10";
    const JTAUBER_ID: &str = "e75005d5a032a4601c8908fbe1e3bed4";

    fn users() -> StaticDirectory {
        let mut users = StaticDirectory::new();
        users.insert("jtauber", "jtauber@example.com");
        users
    }

    fn tags_with_prefix(url_prefix: &str) -> GravatarTags<StaticDirectory> {
        let settings = GravatarSettings {
            url_prefix: url_prefix.to_string(),
            ..GravatarSettings::default()
        };
        GravatarTags::with_profile_client(settings, users(), local_client())
    }

    fn tags() -> GravatarTags<StaticDirectory> {
        tags_with_prefix("http://www.gravatar.com/")
    }

    #[test]
    fn ids() {
        let tags = tags();
        assert_eq!(tags.gravatar_id_for_email("someone@example.com"), SOMEONE_ID);
        assert_eq!(tags.gravatar_id_for_user("jtauber").unwrap(), JTAUBER_ID);
    }

    #[test]
    fn user_variants_match_email_variants() {
        let tags = tags();
        let email = "jtauber@example.com";
        assert_eq!(
            tags.gravatar_for_user("jtauber", Some(48), Some("pg")).unwrap(),
            tags.gravatar_for_email(email, Some(48), Some("pg"))
        );
        assert_eq!(
            tags.gravatar_for_user(
                User {
                    username: "someone".to_string(),
                    email: email.to_string(),
                },
                None,
                None
            )
            .unwrap(),
            tags.gravatar_for_email(email, None, None)
        );
    }

    #[test]
    fn img_alt_text() {
        let tags = tags();
        assert!(tags
            .gravatar_img_for_email("someone@example.com", Some(48), None)
            .contains(r#"alt="Avatar for someone@example.com""#));
        let tag = tags.gravatar_img_for_user("jtauber", Some(48), None).unwrap();
        assert!(tag.contains(r#"alt="Avatar for jtauber""#));
        assert!(tag.contains(JTAUBER_ID));
    }

    #[test]
    fn retina_for_user() {
        let tag = tags()
            .gravatar_retina_img_for_user("jtauber", Some(48), Some("pg"))
            .unwrap();
        assert!(tag.contains("s=96&r=pg"));
        assert!(tag.contains(r#"height="48" width="48""#));
    }

    #[rstest]
    #[case("gravatar_id_for_user")]
    #[case("gravatar_for_user")]
    #[case("gravatar_img_for_user")]
    #[case("gravatar_retina_img_for_user")]
    #[case("gravatar_profile_for_user")]
    fn unknown_user(#[case] name: &str) {
        let tags = GravatarTags::with_profile_client(
            GravatarSettings::default(),
            StaticDirectory::new(),
            local_client(),
        );
        let err = tags.call(name, &["jtauber"]).unwrap_err();
        assert!(matches!(err, GravatarError::UserNotFound(ref username) if username == "jtauber"));
    }

    #[test]
    fn call_with_positional_args() {
        let tags = tags();
        assert_eq!(
            tags.call("gravatar_for_email", &["someone@example.com", "48", "pg"])
                .unwrap(),
            TagOutput::Text(format!(
                "http://www.gravatar.com/avatar/{SOMEONE_ID}?s=48&r=pg"
            ))
        );
        assert_eq!(
            tags.call("gravatar_for_email", &["someone@example.com", "", "x"])
                .unwrap(),
            TagOutput::Text(format!(
                "http://www.gravatar.com/avatar/{SOMEONE_ID}?s=80&r=x"
            ))
        );
        assert_eq!(
            tags.call("gravatar_id_for_user", &["jtauber"]).unwrap(),
            TagOutput::Text(JTAUBER_ID.to_string())
        );
    }

    #[rstest]
    #[case("gravatar_for_email", &[])]
    #[case("gravatar_for_email", &["someone@example.com", "big"])]
    #[case("gravatar_for_email", &["someone@example.com", "-1"])]
    #[case("gravatar_for_email", &["someone@example.com", "48", "pg", "extra"])]
    #[case("gravatar_id_for_email", &["someone@example.com", "48"])]
    fn call_rejects_bad_arguments(#[case] name: &str, #[case] args: &[&str]) {
        let err = tags().call(name, args).unwrap_err();
        assert!(matches!(err, GravatarError::InvalidArgument(_)));
    }

    #[test]
    fn call_unknown_tag() {
        let err = tags().call("gravatar_for_cat", &["tom"]).unwrap_err();
        assert!(matches!(err, GravatarError::UnknownTag(ref name) if name == "gravatar_for_cat"));
    }

    #[test]
    fn profile_for_user() {
        let (base, requests) = serve_once("200 OK", r#"{"entry":[{"preferredUsername":"jtauber"}]}"#);
        let tags = tags_with_prefix(&base);
        let profile = match tags.call("gravatar_profile_for_user", &["jtauber"]).unwrap() {
            TagOutput::Json(profile) => profile,
            other => panic!("expected JSON output, got {other:?}"),
        };
        assert_eq!(profile["entry"][0]["preferredUsername"], "jtauber");
        assert_eq!(
            requests.recv().unwrap(),
            format!("GET /{JTAUBER_ID}.json HTTP/1.1")
        );
    }

    #[test]
    fn output_display() {
        let json = TagOutput::Json(serde_json::json!({"a": 1}));
        assert_eq!(json.to_string(), r#"{"a":1}"#);
        assert_eq!(format!("{json:#}"), "{\n  \"a\": 1\n}");
        assert_eq!(TagOutput::Text("x".to_string()).to_string(), "x");
    }
}
