#![forbid(unsafe_code)]

//! Gravatar template tags: avatar URLs, `<img>` tags and profile lookups for
//! email addresses and users.

pub mod avatar;
pub mod error;
pub mod gravatar_id;
pub mod profile;
pub mod settings;
pub mod tags;
pub mod urlquote;
pub mod user;

pub use crate::avatar::AvatarUrlBuilder;
pub use crate::error::{GravatarError, Result};
pub use crate::gravatar_id::gravatar_id;
pub use crate::profile::ProfileClient;
pub use crate::settings::GravatarSettings;
pub use crate::tags::{GravatarTags, TagOutput, TAG_NAMES};
pub use crate::urlquote::smart_urlquote;
pub use crate::user::{StaticDirectory, User, UserDirectory, UserRef};
