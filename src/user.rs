use std::collections::HashMap;
use std::path::Path;

use anyhow::{Error, Result};
use configparser::ini::Ini;

use crate::error::GravatarError;

const SECTION: &str = "users";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub email: String,
}

/// A user as passed in from a template: either an already loaded record or a
/// username still to be looked up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserRef {
    Resolved(User),
    ByIdentifier(String),
}

impl From<User> for UserRef {
    fn from(user: User) -> Self {
        UserRef::Resolved(user)
    }
}

impl From<&str> for UserRef {
    fn from(username: &str) -> Self {
        UserRef::ByIdentifier(username.to_string())
    }
}

impl From<String> for UserRef {
    fn from(username: String) -> Self {
        UserRef::ByIdentifier(username)
    }
}

impl UserRef {
    pub fn resolve(self, users: &impl UserDirectory) -> crate::Result<User> {
        match self {
            UserRef::Resolved(user) => Ok(user),
            UserRef::ByIdentifier(username) => {
                tracing::debug!("looking up user {username:?}");
                users
                    .get_by_username(&username)
                    .ok_or(GravatarError::UserNotFound(username))
            }
        }
    }
}

pub trait UserDirectory {
    fn get_by_username(&self, username: &str) -> Option<User>;
}

impl<D: UserDirectory + ?Sized> UserDirectory for &D {
    fn get_by_username(&self, username: &str) -> Option<User> {
        (**self).get_by_username(username)
    }
}

#[derive(Clone, Debug, Default)]
pub struct StaticDirectory {
    users: HashMap<String, User>,
}

impl StaticDirectory {
    pub fn new() -> StaticDirectory {
        StaticDirectory::default()
    }

    pub fn insert(&mut self, username: impl Into<String>, email: impl Into<String>) {
        let username = username.into();
        let user = User {
            username: username.clone(),
            email: email.into(),
        };
        self.users.insert(username, user);
    }

    /// Loads `username = email` pairs from the `[users]` section of an INI
    /// file. Usernames are case-sensitive.
    pub fn load(users_file: impl AsRef<Path>) -> Result<StaticDirectory> {
        let mut users_config = Ini::new_cs();
        users_config.load(users_file.as_ref()).map_err(Error::msg)?;
        Ok(StaticDirectory::from_ini(&users_config))
    }

    pub fn from_ini(users_config: &Ini) -> StaticDirectory {
        let mut directory = StaticDirectory::new();
        if let Some(section) = users_config.get_map_ref().get(SECTION) {
            for (username, email) in section {
                if let Some(email) = email {
                    directory.insert(username.as_str(), email.as_str());
                }
            }
        }
        directory
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl UserDirectory for StaticDirectory {
    fn get_by_username(&self, username: &str) -> Option<User> {
        self.users.get(username).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jtauber() -> User {
        User {
            username: "jtauber".to_string(),
            email: "jtauber@example.com".to_string(),
        }
    }

    #[test]
    fn resolved_user_skips_lookup() {
        let users = StaticDirectory::new();
        assert_eq!(UserRef::from(jtauber()).resolve(&users).unwrap(), jtauber());
    }

    #[test]
    fn lookup_by_username() {
        let mut users = StaticDirectory::new();
        users.insert("jtauber", "jtauber@example.com");
        assert_eq!(UserRef::from("jtauber").resolve(&users).unwrap(), jtauber());
    }

    #[test]
    fn unknown_username() {
        let users = StaticDirectory::new();
        let err = UserRef::from("jtauber").resolve(&users).unwrap_err();
        assert!(matches!(err, GravatarError::UserNotFound(ref name) if name == "jtauber"));
    }

    #[test]
    fn from_ini_is_case_sensitive() {
        let mut config = Ini::new_cs();
        config
            .read(
                "[users]\n\
                 jtauber = jtauber@example.com\n\
                 JTauber = other@example.com\n\
                 [other]\n\
                 ignored = nobody@example.com\n"
                    .to_string(),
            )
            .unwrap();
        let users = StaticDirectory::from_ini(&config);
        assert_eq!(users.len(), 2);
        assert_eq!(users.get_by_username("jtauber"), Some(jtauber()));
        assert_eq!(
            users.get_by_username("JTauber").map(|user| user.email),
            Some("other@example.com".to_string())
        );
        assert_eq!(users.get_by_username("ignored"), None);
    }
}
