/// On-disk format version of a package store.
///
/// The version is recorded in the store's `.format` file; an absent file means
/// the store predates versioning (or is freshly created) and is treated as
/// compatible. Legacy versions are upgraded one step at a time by the
/// migrator; anything unrecognized is incompatible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatVersion {
    Unversioned,
    V1_2,
    V1_3,
    V1_4,
    Unknown(String),
}

impl FormatVersion {
    pub const CURRENT: FormatVersion = FormatVersion::V1_4;

    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None => FormatVersion::Unversioned,
            Some("1.2") => FormatVersion::V1_2,
            Some("1.3") => FormatVersion::V1_3,
            Some("1.4") => FormatVersion::V1_4,
            Some(other) => FormatVersion::Unknown(other.to_string()),
        }
    }

    /// The string persisted to the `.format` file, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FormatVersion::Unversioned => None,
            FormatVersion::V1_2 => Some("1.2"),
            FormatVersion::V1_3 => Some("1.3"),
            FormatVersion::V1_4 => Some("1.4"),
            FormatVersion::Unknown(version) => Some(version),
        }
    }
}

impl std::fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().unwrap_or("unversioned"))
    }
}
