//! User Model

use serde::{Deserialize, Serialize};

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Manager,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Manager => "manager",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(UserRole::Student),
            "manager" => Ok(UserRole::Manager),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Public user profile (never carries the password hash)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    pub role: UserRole,
    pub is_verified: bool,
    pub loyalty_points: u32,
    pub created_at: i64,
}

/// Password strength band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PasswordStrength {
    Weak,
    Fair,
    Strong,
    VeryStrong,
}

/// Password policy evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordReport {
    /// True when there are no blocking issues
    pub is_valid: bool,
    /// 0..=100
    pub score: u8,
    pub strength: PasswordStrength,
    pub issues: Vec<String>,
    /// At most three
    pub suggestions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&UserRole::Manager).unwrap(),
            "\"manager\""
        );
        assert_eq!("student".parse::<UserRole>(), Ok(UserRole::Student));
        assert!("admin".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_strength_kebab_case() {
        assert_eq!(
            serde_json::to_string(&PasswordStrength::VeryStrong).unwrap(),
            "\"very-strong\""
        );
    }
}
