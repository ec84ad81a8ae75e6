//! Family member and contact repositories
//!
//! Manages members.json and contacts.json. Names are indexed case-insensitively
//! the same way for both.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::TripsplitError;
use crate::models::directory::normalize;
use crate::models::{Contact, ContactId, FamilyMember, MemberId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct MemberData {
    members: Vec<FamilyMember>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ContactData {
    contacts: Vec<Contact>,
}

/// Repository for family member persistence
pub struct MemberRepository {
    path: PathBuf,
    data: RwLock<HashMap<MemberId, FamilyMember>>,
}

impl MemberRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load members from disk
    pub fn load(&self) -> Result<(), TripsplitError> {
        let file_data: MemberData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            TripsplitError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for member in file_data.members {
            data.insert(member.id, member);
        }
        Ok(())
    }

    /// Save members to disk
    pub fn save(&self) -> Result<(), TripsplitError> {
        let members = self.get_all()?;
        write_json_atomic(&self.path, &MemberData { members })
    }

    /// Get all members sorted by name
    pub fn get_all(&self) -> Result<Vec<FamilyMember>, TripsplitError> {
        let data = self.data.read().map_err(|e| {
            TripsplitError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut members: Vec<_> = data.values().cloned().collect();
        members.sort_by(|a, b| {
            normalize(&a.name)
                .cmp(&normalize(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(members)
    }

    /// Find a member by ID (full or short form) or by name
    pub fn find(&self, identifier: &str) -> Result<Option<FamilyMember>, TripsplitError> {
        let data = self.data.read().map_err(|e| {
            TripsplitError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let wanted = normalize(identifier);
        Ok(data
            .values()
            .find(|m| m.id.matches(identifier))
            .or_else(|| data.values().find(|m| normalize(&m.name) == wanted))
            .cloned())
    }

    pub fn upsert(&self, member: FamilyMember) -> Result<(), TripsplitError> {
        let mut data = self.data.write().map_err(|e| {
            TripsplitError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        data.insert(member.id, member);
        Ok(())
    }

    pub fn delete(&self, id: MemberId) -> Result<Option<FamilyMember>, TripsplitError> {
        let mut data = self.data.write().map_err(|e| {
            TripsplitError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        Ok(data.remove(&id))
    }

    pub fn count(&self) -> Result<usize, TripsplitError> {
        let data = self.data.read().map_err(|e| {
            TripsplitError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.len())
    }
}

/// Repository for contact persistence
pub struct ContactRepository {
    path: PathBuf,
    data: RwLock<HashMap<ContactId, Contact>>,
}

impl ContactRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load contacts from disk
    pub fn load(&self) -> Result<(), TripsplitError> {
        let file_data: ContactData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            TripsplitError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for contact in file_data.contacts {
            data.insert(contact.id, contact);
        }
        Ok(())
    }

    /// Save contacts to disk
    pub fn save(&self) -> Result<(), TripsplitError> {
        let contacts = self.get_all()?;
        write_json_atomic(&self.path, &ContactData { contacts })
    }

    /// Get all contacts sorted by name
    pub fn get_all(&self) -> Result<Vec<Contact>, TripsplitError> {
        let data = self.data.read().map_err(|e| {
            TripsplitError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut contacts: Vec<_> = data.values().cloned().collect();
        contacts.sort_by(|a, b| {
            normalize(&a.name)
                .cmp(&normalize(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(contacts)
    }

    /// Find a contact by ID, email or name
    pub fn find(&self, identifier: &str) -> Result<Option<Contact>, TripsplitError> {
        let data = self.data.read().map_err(|e| {
            TripsplitError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data
            .values()
            .find(|c| c.id.matches(identifier))
            .or_else(|| data.values().find(|c| c.matches(identifier)))
            .cloned())
    }

    pub fn upsert(&self, contact: Contact) -> Result<(), TripsplitError> {
        let mut data = self.data.write().map_err(|e| {
            TripsplitError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        data.insert(contact.id, contact);
        Ok(())
    }

    pub fn delete(&self, id: ContactId) -> Result<Option<Contact>, TripsplitError> {
        let mut data = self.data.write().map_err(|e| {
            TripsplitError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        Ok(data.remove(&id))
    }

    pub fn count(&self) -> Result<usize, TripsplitError> {
        let data = self.data.read().map_err(|e| {
            TripsplitError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.len())
    }
}
