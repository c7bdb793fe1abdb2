//! User roles on the AgroLink platform.

use serde::{Deserialize, Serialize};

/// Role carried by a platform principal.
///
/// The admin panel only ever grants access to [`Role::Admin`]; the other
/// variants appear in user listings and payout records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Farmer,
    Worker,
    Driver,
    General,
    /// Roles the backend may introduce that this client does not know yet.
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Whether this role may hold an admin session.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Admin => "admin",
            Self::Farmer => "farmer",
            Self::Worker => "worker",
            Self::Driver => "driver",
            Self::General => "general",
            Self::Unknown => "unknown",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde_snake_case() {
        let role: Role = serde_json::from_str("\"farmer\"").expect("deserialize");
        assert_eq!(role, Role::Farmer);
        assert_eq!(serde_json::to_string(&Role::Admin).expect("serialize"), "\"admin\"");
    }

    #[test]
    fn test_unknown_role_tolerated() {
        // The backend may add roles; deserialization must not fail
        let role: Role = serde_json::from_str("\"auditor\"").expect("deserialize");
        assert_eq!(role, Role::Unknown);
        assert!(!role.is_admin());
    }

    #[test]
    fn test_only_admin_is_admin() {
        assert!(Role::Admin.is_admin());
        assert!(!Role::Worker.is_admin());
        assert!(!Role::General.is_admin());
    }
}
