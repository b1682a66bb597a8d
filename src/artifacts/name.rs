use crate::artifacts::NODE_NAME_REGEX;
use crate::errors::StoreError;
use anyhow::Context;

/// A validated identifier: team, user, package or path-element name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeName(String);

impl NodeName {
    pub fn try_parse(name: &str) -> anyhow::Result<Self> {
        if Self::is_valid(name)? {
            Ok(Self(name.to_string()))
        } else {
            Err(StoreError::InvalidName {
                name: name.to_string(),
            }
            .into())
        }
    }

    pub fn is_valid(name: &str) -> anyhow::Result<bool> {
        let re = regex::Regex::new(NODE_NAME_REGEX)
            .with_context(|| format!("invalid node name regex: {NODE_NAME_REGEX}"))?;

        Ok(re.is_match(name))
    }
}

impl AsRef<str> for NodeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validate every identity component of a package coordinate.
///
/// Mutating store operations call this before touching the filesystem, so an
/// invalid name never leaves partial effects behind.
pub fn check_names(team: Option<&str>, user: &str, package: &str) -> anyhow::Result<()> {
    if let Some(team) = team {
        NodeName::try_parse(team)?;
    }
    NodeName::try_parse(user)?;
    NodeName::try_parse(package)?;

    Ok(())
}
