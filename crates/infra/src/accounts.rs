use std::collections::HashMap;
use std::sync::RwLock;

use atlaserp_auth::{AccountDirectory, AccountRecord};
use atlaserp_core::{AccountId, DomainError};

/// In-memory account directory with a case-insensitive unique email index.
///
/// Account CRUD is the admin surface's concern; the authorization core only
/// reads through [`AccountDirectory`].
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    inner: RwLock<HashMap<AccountId, AccountRecord>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, account: AccountRecord) -> Result<AccountId, DomainError> {
        let mut map = self.inner.write().map_err(|_| DomainError::conflict("store poisoned"))?;
        if map.values().any(|a| a.email == account.email) {
            return Err(DomainError::conflict("email already in use"));
        }
        let id = account.id;
        map.insert(id, account);
        Ok(id)
    }

    /// Replace an account wholesale. The caller is expected to have gone
    /// through `AccountRecord::apply_update`, which keeps the role/module
    /// rule intact.
    pub fn update(&self, account: AccountRecord) -> Result<(), DomainError> {
        let mut map = self.inner.write().map_err(|_| DomainError::conflict("store poisoned"))?;
        if !map.contains_key(&account.id) {
            return Err(DomainError::NotFound);
        }
        if map
            .values()
            .any(|a| a.id != account.id && a.email == account.email)
        {
            return Err(DomainError::conflict("email already in use"));
        }
        map.insert(account.id, account);
        Ok(())
    }

    pub fn remove(&self, id: AccountId) -> Result<(), DomainError> {
        let mut map = self.inner.write().map_err(|_| DomainError::conflict("store poisoned"))?;
        map.remove(&id).map(|_| ()).ok_or(DomainError::NotFound)
    }

    pub fn get(&self, id: AccountId) -> Option<AccountRecord> {
        self.inner.read().ok()?.get(&id).cloned()
    }

    pub fn find_by_email(&self, email: &str) -> Option<AccountRecord> {
        let email = email.to_lowercase();
        let map = self.inner.read().ok()?;
        map.values().find(|a| a.email == email).cloned()
    }

    pub fn list(&self) -> Vec<AccountRecord> {
        match self.inner.read() {
            Ok(map) => {
                let mut accounts: Vec<_> = map.values().cloned().collect();
                accounts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                accounts
            }
            Err(_) => vec![],
        }
    }
}

impl AccountDirectory for InMemoryAccountStore {
    fn find_active_by_email(&self, email: &str) -> Option<AccountRecord> {
        self.find_by_email(email).filter(|a| a.active)
    }
}
