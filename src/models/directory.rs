//! Family member and contact directory entries
//!
//! These are the people an expense participant id can refer to. The settlement
//! engine only reads them through an identity resolver.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ContactId, MemberId};

/// A member of the household
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyMember {
    pub id: MemberId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl FamilyMember {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: MemberId::new(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> Result<(), DirectoryValidationError> {
        validate_name(&self.name)
    }
}

impl fmt::Display for FamilyMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Someone outside the household that expenses are shared with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Contact {
    pub fn new(name: impl Into<String>, email: Option<String>) -> Self {
        Self {
            id: ContactId::new(),
            name: name.into(),
            email: email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty()),
            created_at: Utc::now(),
        }
    }

    /// Check if `id` is this contact's email or name (case-insensitive)
    pub fn matches(&self, id: &str) -> bool {
        let id = normalize(id);
        if let Some(email) = &self.email {
            if normalize(email) == id {
                return true;
            }
        }
        normalize(&self.name) == id
    }

    pub fn validate(&self) -> Result<(), DirectoryValidationError> {
        validate_name(&self.name)?;
        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(DirectoryValidationError::InvalidEmail(email.clone()));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.email {
            Some(email) => write!(f, "{} <{}>", self.name, email),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Normalize a name or email for matching
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

fn validate_name(name: &str) -> Result<(), DirectoryValidationError> {
    if name.trim().is_empty() {
        return Err(DirectoryValidationError::EmptyName);
    }
    if name.len() > 100 {
        return Err(DirectoryValidationError::NameTooLong(name.len()));
    }
    Ok(())
}

/// Validation errors for directory entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidEmail(String),
}

impl fmt::Display for DirectoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Name cannot be empty"),
            Self::NameTooLong(len) => write!(f, "Name too long ({} chars, max 100)", len),
            Self::InvalidEmail(email) => write!(f, "Invalid email address: {}", email),
        }
    }
}

impl std::error::Error for DirectoryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_matches_email_and_name() {
        let contact = Contact::new("Bob Stone", Some("Bob@Example.com".into()));
        assert!(contact.matches("bob@example.com"));
        assert!(contact.matches("  bob stone "));
        assert!(!contact.matches("bob"));
    }

    #[test]
    fn test_blank_email_dropped() {
        let contact = Contact::new("Carol", Some("   ".into()));
        assert!(contact.email.is_none());
    }

    #[test]
    fn test_validation() {
        assert!(FamilyMember::new("Alice").validate().is_ok());
        assert_eq!(
            FamilyMember::new(" ").validate(),
            Err(DirectoryValidationError::EmptyName)
        );
        assert!(matches!(
            Contact::new("Dan", Some("not-an-email".into())).validate(),
            Err(DirectoryValidationError::InvalidEmail(_))
        ));
        assert!(matches!(
            Contact::new("a".repeat(101), None).validate(),
            Err(DirectoryValidationError::NameTooLong(101))
        ));
    }
}
