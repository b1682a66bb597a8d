//! Store administration commands
//!
//! Implementations of the `depot` subcommands. These only administer an
//! existing store; building manifests from user files is a separate concern.

pub mod init;
pub mod ls;
pub mod prune;
pub mod rm;

use crate::artifacts::name::check_names;

/// A `[team:]user/package` coordinate as typed on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    pub team: Option<String>,
    pub user: String,
    pub package: String,
}

impl PackageSpec {
    pub fn try_parse(spec: &str) -> anyhow::Result<Self> {
        let (team, rest) = match spec.split_once(':') {
            Some((team, rest)) => (Some(team.to_string()), rest),
            None => (None, spec),
        };

        let (user, package) = rest
            .split_once('/')
            .ok_or_else(|| anyhow::anyhow!("expected [team:]user/package, got {:?}", spec))?;

        check_names(team.as_deref(), user, package)?;

        Ok(PackageSpec {
            team,
            user: user.to_string(),
            package: package.to_string(),
        })
    }

    pub fn team(&self) -> Option<&str> {
        self.team.as_deref()
    }
}

impl std::fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.team {
            Some(team) => write!(f, "{}:{}/{}", team, self.user, self.package),
            None => write!(f, "{}/{}", self.user, self.package),
        }
    }
}
