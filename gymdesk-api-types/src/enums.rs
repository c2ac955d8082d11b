use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a stored or submitted string is not a known variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Columns holding these values are plain TEXT, so every enum round-trips
/// through the same lowercase string it serializes to.
macro_rules! text_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            pub fn all() -> &'static [$name] {
                &[$($name::$variant),+]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    _ => Err(ParseEnumError {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

/// Lifecycle of an inquiry submitted through the public registration form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    #[default]
    New,
    Contacted,
    Enrolled,
    Closed,
}

text_enum!(RegistrationStatus, "registration status", {
    New => "new",
    Contacted => "contacted",
    Enrolled => "enrolled",
    Closed => "closed",
});

/// Member account status.
///
/// `Legacy` marks rows carried over from the old login table that have not
/// been reviewed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    #[default]
    Active,
    Inactive,
    Pending,
    Legacy,
    Archived,
}

text_enum!(MemberStatus, "member status", {
    Active => "active",
    Inactive => "inactive",
    Pending => "pending",
    Legacy => "legacy",
    Archived => "archived",
});

impl MemberStatus {
    /// Whether a member in this status counts towards an active family
    pub fn is_active(&self) -> bool {
        matches!(self, MemberStatus::Active | MemberStatus::Legacy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    #[default]
    Active,
    Waitlisted,
    Completed,
    Dropped,
}

text_enum!(EnrollmentStatus, "enrollment status", {
    Active => "active",
    Waitlisted => "waitlisted",
    Completed => "completed",
    Dropped => "dropped",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    #[default]
    Admin,
    SuperAdmin,
}

text_enum!(AdminRole, "admin role", {
    Admin => "admin",
    SuperAdmin => "super_admin",
});

/// Whether a class iteration runs until further notice or between fixed dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationType {
    #[default]
    Indefinite,
    Finite,
}

text_enum!(DurationType, "duration type", {
    Indefinite => "indefinite",
    Finite => "finite",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Contacted".parse::<RegistrationStatus>().unwrap(), RegistrationStatus::Contacted);
        assert_eq!(" SUPER_ADMIN ".parse::<AdminRole>().unwrap(), AdminRole::SuperAdmin);
    }

    #[test]
    fn test_unknown_value_reports_kind() {
        let err = "gold".parse::<MemberStatus>().unwrap_err();
        assert_eq!(err.kind, "member status");
        assert_eq!(err.to_string(), "unknown member status 'gold'");
    }

    #[test]
    fn test_serde_matches_text_form() {
        for status in MemberStatus::all() {
            let json = serde_json::to_string(status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
        let role: AdminRole = serde_json::from_str("\"super_admin\"").unwrap();
        assert_eq!(role, AdminRole::SuperAdmin);
    }

    #[test]
    fn test_legacy_members_count_as_active() {
        assert!(MemberStatus::Legacy.is_active());
        assert!(!MemberStatus::Archived.is_active());
    }
}
