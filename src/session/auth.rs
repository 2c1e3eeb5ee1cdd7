//! Community credentials.
//!
//! An [`AuthProfile`] is one community string paired with the protocol
//! version it is sent with. Sessions receive ordered candidate lists of
//! profiles and pick one by probing the agent.

use std::fmt;

/// SNMP version for community-based authentication.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CommunityVersion {
    /// SNMPv1
    V1,
    /// SNMPv2c
    #[default]
    V2c,
}

impl fmt::Display for CommunityVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1 => write!(f, "v1"),
            Self::V2c => write!(f, "v2c"),
        }
    }
}

/// A community string and the version it is valid for.
///
/// ```rust
/// use snmpclient::{AuthProfile, CommunityVersion};
///
/// let profile = AuthProfile::v1("private");
/// assert_eq!(profile.version(), CommunityVersion::V1);
/// assert_eq!(profile.community(), "private");
///
/// // AuthProfile::default() is equivalent to AuthProfile::v2c("public")
/// assert_eq!(AuthProfile::default(), AuthProfile::v2c("public"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AuthProfile {
    /// SNMP version (V1 or V2c)
    #[cfg_attr(feature = "serde", serde(default))]
    pub version: CommunityVersion,
    /// Community string
    pub community: String,
}

impl Default for AuthProfile {
    fn default() -> Self {
        AuthProfile::v2c("public")
    }
}

impl AuthProfile {
    /// SNMPv1 community profile.
    pub fn v1(community: impl Into<String>) -> Self {
        Self {
            version: CommunityVersion::V1,
            community: community.into(),
        }
    }

    /// SNMPv2c community profile.
    pub fn v2c(community: impl Into<String>) -> Self {
        Self {
            version: CommunityVersion::V2c,
            community: community.into(),
        }
    }

    /// Protocol version.
    pub fn version(&self) -> CommunityVersion {
        self.version
    }

    /// Community string.
    pub fn community(&self) -> &str {
        &self.community
    }
}

/// Displays the version only; community strings are credentials and stay
/// out of logs.
impl fmt::Display for AuthProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} community", self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors() {
        assert_eq!(AuthProfile::v2c("public").version(), CommunityVersion::V2c);
        assert_eq!(AuthProfile::v1("public").version(), CommunityVersion::V1);
        assert_ne!(AuthProfile::v1("public"), AuthProfile::v2c("public"));
    }

    #[test]
    fn display_hides_community() {
        let profile = AuthProfile::v2c("s3cret");
        assert_eq!(profile.to_string(), "v2c community");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_defaults_to_v2c() {
        let profile: AuthProfile = serde_json::from_str(r#"{"community":"public"}"#).unwrap();
        assert_eq!(profile, AuthProfile::v2c("public"));

        let profile: AuthProfile =
            serde_json::from_str(r#"{"community":"private","version":"v1"}"#).unwrap();
        assert_eq!(profile, AuthProfile::v1("private"));
    }
}
