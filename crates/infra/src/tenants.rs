use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use atlaserp_core::{DomainError, TenantId};

/// A registered tenant (the original deployment calls these "companies").
///
/// Existence here is what makes a `TenantId` meaningful: accounts and
/// business records point at registry entries, and deleting one takes its
/// scoped data with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantProfile {
    pub id: TenantId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub industry: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TenantProfile {
    pub fn new(name: impl Into<String>, now: DateTime<Utc>) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("tenant name cannot be empty"));
        }

        Ok(Self {
            id: TenantId::new(),
            name,
            email: None,
            phone: None,
            address: None,
            industry: None,
            active: true,
            created_at: now,
            updated_at: now,
        })
    }
}

/// In-memory tenant registry, same RwLock-map idiom as the account store.
#[derive(Debug, Default)]
pub struct InMemoryTenantRegistry {
    inner: RwLock<HashMap<TenantId, TenantProfile>>,
}

impl InMemoryTenantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, profile: TenantProfile) -> Result<TenantId, DomainError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::conflict("registry poisoned"))?;
        let id = profile.id;
        map.insert(id, profile);
        Ok(id)
    }

    pub fn update(&self, profile: TenantProfile) -> Result<(), DomainError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::conflict("registry poisoned"))?;
        if !map.contains_key(&profile.id) {
            return Err(DomainError::NotFound);
        }
        map.insert(profile.id, profile);
        Ok(())
    }

    /// Remove a registration, returning the removed profile so callers can
    /// purge its scoped data.
    pub fn remove(&self, id: TenantId) -> Result<TenantProfile, DomainError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::conflict("registry poisoned"))?;
        map.remove(&id).ok_or(DomainError::NotFound)
    }

    pub fn get(&self, id: TenantId) -> Option<TenantProfile> {
        self.inner.read().ok()?.get(&id).cloned()
    }

    pub fn contains(&self, id: TenantId) -> bool {
        self.get(id).is_some()
    }

    pub fn list(&self) -> Vec<TenantProfile> {
        match self.inner.read() {
            Ok(map) => {
                let mut profiles: Vec<_> = map.values().cloned().collect();
                profiles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                profiles
            }
            Err(_) => vec![],
        }
    }
}
