//! User role enum.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Self::User),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::User, Self::Admin]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_role_is_user() {
        assert_eq!(UserRole::default(), UserRole::User);
    }

    #[test]
    fn as_str_round_trips_through_from_str() {
        for role in UserRole::all() {
            assert_eq!(UserRole::from_str(role.as_str()), Some(*role));
        }
    }

    #[test]
    fn from_str_is_case_sensitive() {
        assert_eq!(UserRole::from_str("ADMIN"), None);
        assert_eq!(UserRole::from_str(""), None);
    }
}
