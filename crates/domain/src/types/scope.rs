//! OAuth scopes understood by the LINE Platform.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Permission requested at login and reported back in the token response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    #[serde(rename = "profile")]
    Profile,
    #[serde(rename = "friends")]
    Friends,
    #[serde(rename = "groups")]
    Groups,
    #[serde(rename = "message.write")]
    MessageWrite,
    #[serde(rename = "openid")]
    OpenIdConnect,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "phone")]
    Phone,
    #[serde(rename = "gender")]
    Gender,
    #[serde(rename = "birthdate")]
    Birthdate,
    #[serde(rename = "address")]
    Address,
    #[serde(rename = "real_name")]
    RealName,
}

const ALL: [Scope; 11] = [
    Scope::Profile,
    Scope::Friends,
    Scope::Groups,
    Scope::MessageWrite,
    Scope::OpenIdConnect,
    Scope::Email,
    Scope::Phone,
    Scope::Gender,
    Scope::Birthdate,
    Scope::Address,
    Scope::RealName,
];

impl Scope {
    /// Wire code of the scope.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Friends => "friends",
            Self::Groups => "groups",
            Self::MessageWrite => "message.write",
            Self::OpenIdConnect => "openid",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Gender => "gender",
            Self::Birthdate => "birthdate",
            Self::Address => "address",
            Self::RealName => "real_name",
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        ALL.iter().copied().find(|scope| scope.code() == code)
    }

    /// Space-join scope codes as the `scope` parameter expects.
    #[must_use]
    pub fn join(scopes: &[Scope]) -> String {
        scopes.iter().map(Scope::code).collect::<Vec<_>>().join(" ")
    }

    /// Parse a space-delimited scope list, dropping codes this SDK doesn't know.
    #[must_use]
    pub fn parse_list(value: &str) -> Vec<Scope> {
        value.split_whitespace().filter_map(Scope::from_code).collect()
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_list_drops_unknown_codes() {
        let scopes = Scope::parse_list("profile  openid unknown.scope email");
        assert_eq!(scopes, vec![Scope::Profile, Scope::OpenIdConnect, Scope::Email]);
    }

    #[test]
    fn join_uses_single_spaces() {
        let joined = Scope::join(&[Scope::Profile, Scope::MessageWrite, Scope::RealName]);
        assert_eq!(joined, "profile message.write real_name");
    }

    #[test]
    fn serde_uses_wire_codes() {
        let json = serde_json::to_string(&Scope::OpenIdConnect).unwrap();
        assert_eq!(json, "\"openid\"");
        let back: Scope = serde_json::from_str("\"message.write\"").unwrap();
        assert_eq!(back, Scope::MessageWrite);
    }

    #[test]
    fn every_code_round_trips() {
        for scope in ALL {
            assert_eq!(Scope::from_code(scope.code()), Some(scope));
        }
    }
}
