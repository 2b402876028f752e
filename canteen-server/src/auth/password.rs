//! 密码哈希与强度评估

use shared::models::{PasswordReport, PasswordStrength};

const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

const COMMON_PASSWORDS: &[&str] = &["password", "123456", "qwerty", "abc123", "password123"];

const MAX_SUGGESTIONS: usize = 3;

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    use argon2::password_hash::SaltString;
    use argon2::password_hash::rand_core::OsRng;
    use argon2::{Argon2, PasswordHasher};
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Score a password against the account policy
///
/// | Check | Score | Otherwise |
/// |-------|-------|-----------|
/// | length 6-7 / 8-11 / 12+ | 20 / 30 / 40 | issue below 6 |
/// | uppercase, lowercase, digit | 15 each | issue |
/// | special character | 15 | suggestion |
///
/// A common password is capped at 20. Valid means no issues.
pub fn evaluate_password(password: &str) -> PasswordReport {
    let mut score: u32 = 0;
    let mut issues = Vec::new();
    let mut suggestions = Vec::new();

    let len = password.chars().count();
    match len {
        0..=5 => issues.push("Password must be at least 6 characters long".to_string()),
        6..=7 => {
            score += 20;
            suggestions.push("Use at least 8 characters".to_string());
        }
        8..=11 => score += 30,
        _ => score += 40,
    }

    let checks: [(fn(&char) -> bool, &str); 3] = [
        (char::is_ascii_uppercase, "Password must contain at least one uppercase letter"),
        (char::is_ascii_lowercase, "Password must contain at least one lowercase letter"),
        (char::is_ascii_digit, "Password must contain at least one number"),
    ];
    for (check, issue) in checks {
        if password.chars().any(|c| check(&c)) {
            score += 15;
        } else {
            issues.push(issue.to_string());
        }
    }

    if password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        score += 15;
    } else {
        suggestions.push("Add special characters for extra strength".to_string());
    }

    if COMMON_PASSWORDS.contains(&password.to_lowercase().as_str()) {
        score = score.min(20);
        issues.push("Password is too common".to_string());
    }

    let score = score.min(100) as u8;
    let strength = match score {
        0..=39 => PasswordStrength::Weak,
        40..=59 => PasswordStrength::Fair,
        60..=79 => PasswordStrength::Strong,
        _ => PasswordStrength::VeryStrong,
    };
    suggestions.truncate(MAX_SUGGESTIONS);

    PasswordReport {
        is_valid: issues.is_empty(),
        score,
        strength,
        issues,
        suggestions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("Canteen@2024").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("Canteen@2024", &hash));
        assert!(!verify_password("canteen@2024", &hash));
        assert!(!verify_password("Canteen@2024", "not-a-hash"));
    }

    #[test]
    fn test_very_strong_password() {
        let report = evaluate_password("Biryani#Lover42");
        assert!(report.is_valid);
        assert_eq!(report.score, 100);
        assert_eq!(report.strength, PasswordStrength::VeryStrong);
        assert!(report.suggestions.is_empty());
    }

    #[test]
    fn test_short_password_suggests_length() {
        let report = evaluate_password("Abc12x");
        assert!(report.is_valid);
        assert_eq!(report.score, 20 + 45);
        assert_eq!(report.strength, PasswordStrength::Strong);
        assert_eq!(report.suggestions.len(), 2);
    }

    #[test]
    fn test_missing_classes_are_issues() {
        let report = evaluate_password("lowercaseonly");
        assert!(!report.is_valid);
        assert_eq!(report.issues.len(), 2);
        assert_eq!(report.score, 40 + 15);
        assert_eq!(report.strength, PasswordStrength::Fair);
    }

    #[test]
    fn test_too_short() {
        let report = evaluate_password("Ab1");
        assert!(!report.is_valid);
        assert_eq!(report.issues.len(), 1);
        assert!(report.issues[0].contains("at least 6"));
    }

    #[test]
    fn test_common_password_capped() {
        let report = evaluate_password("Password123");
        assert!(!report.is_valid);
        assert_eq!(report.score, 20);
        assert_eq!(report.strength, PasswordStrength::Weak);
        assert!(report.issues.iter().any(|i| i.contains("too common")));
    }
}
