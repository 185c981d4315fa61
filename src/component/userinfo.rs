use super::{decode, push_encoded, Component};
use crate::{
    pct_enc::{
        encoder::{Credential, Userinfo},
        Encoder, Table,
    },
    status::UriStatus,
};
use alloc::string::String;

const AT: Table = Table::new(b"@");

/// A decoded username.
///
/// A literal `@` is accepted when parsing and always written back as `%40`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Username(String);

/// A decoded password.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Password(String);

impl Username {
    /// Creates a username from decoded data.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the decoded username.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Password {
    /// Creates a password from decoded data.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the decoded password.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Component for Username {
    fn parse(s: &str) -> Result<Self, UriStatus> {
        decode(s, Credential::TABLE.or(AT)).map(|v| Self(v.into_owned()))
    }

    fn append_to(&self, out: &mut String, _: bool) {
        push_encoded::<Credential>(out, &self.0);
    }

    fn has_value(&self) -> bool {
        !self.0.is_empty()
    }
}

impl Component for Password {
    fn parse(s: &str) -> Result<Self, UriStatus> {
        decode(s, Userinfo::TABLE.or(AT)).map(|v| Self(v.into_owned()))
    }

    /// The separator of a password is the `:` that follows the username.
    fn append_to(&self, out: &mut String, with_separators: bool) {
        if with_separators {
            out.push(':');
        }
        push_encoded::<Userinfo>(out, &self.0);
    }

    fn has_value(&self) -> bool {
        !self.0.is_empty()
    }
}

/// The userinfo subcomponent: a username and an optional password.
///
/// ```
/// use uri_kit::component::{Component, UserInfo};
///
/// let info = UserInfo::parse("a@b:p%3Ass")?;
/// assert_eq!(info.username().as_str(), "a@b");
/// assert_eq!(info.password().map(|p| p.as_str()), Some("p:ss"));
///
/// let mut out = String::new();
/// info.append_to(&mut out, true);
/// assert_eq!(out, "a%40b:p:ss@");
/// # Ok::<_, uri_kit::UriStatus>(())
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct UserInfo {
    username: Username,
    password: Option<Password>,
}

impl UserInfo {
    /// Creates userinfo from its parts.
    pub fn new(username: Username, password: Option<Password>) -> Self {
        Self { username, password }
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Returns the password.
    #[must_use]
    pub fn password(&self) -> Option<&Password> {
        self.password.as_ref()
    }
}

impl Component for UserInfo {
    fn parse(s: &str) -> Result<Self, UriStatus> {
        let (username, password) = match s.split_once(':') {
            Some((u, p)) => (u, Some(p)),
            None => (s, None),
        };
        Ok(Self {
            username: Username::parse(username)?,
            password: password.map(Password::parse).transpose()?,
        })
    }

    /// Writes `username[:password]`, followed by `@` with `with_separators`.
    fn append_to(&self, out: &mut String, with_separators: bool) {
        self.username.append_to(out, false);
        if let Some(password) = &self.password {
            password.append_to(out, true);
        }
        if with_separators {
            out.push('@');
        }
    }

    fn has_value(&self) -> bool {
        self.username.has_value() || self.password.is_some()
    }
}
