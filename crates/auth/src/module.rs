use core::str::FromStr;

use serde::{Deserialize, Serialize};

use atlaserp_core::DomainError;

/// A functional area that can be independently granted to a non-admin
/// account.
///
/// The set is closed on purpose: adding a module means extending this enum
/// and the exhaustive matches in [`ModuleGrants`], nothing else.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Module {
    Crm,
    Hr,
    Inventory,
    Sales,
}

impl Module {
    pub const ALL: [Module; 4] = [Module::Crm, Module::Hr, Module::Inventory, Module::Sales];

    pub fn as_str(&self) -> &'static str {
        match self {
            Module::Crm => "crm",
            Module::Hr => "hr",
            Module::Inventory => "inventory",
            Module::Sales => "sales",
        }
    }
}

impl core::fmt::Display for Module {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Module {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "crm" => Ok(Module::Crm),
            "hr" => Ok(Module::Hr),
            "inventory" => Ok(Module::Inventory),
            "sales" => Ok(Module::Sales),
            other => Err(DomainError::validation(format!("unknown module: {other}"))),
        }
    }
}

/// Per-account module grants. Keys are fixed and exhaustive — there is no
/// dynamic module set.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ModuleGrants {
    pub crm: bool,
    pub hr: bool,
    pub inventory: bool,
    pub sales: bool,
}

impl ModuleGrants {
    /// No grants (the default for new non-admin accounts and for anonymous
    /// contexts).
    pub fn none() -> Self {
        Self::default()
    }

    /// Every module granted (forced for super-admin accounts).
    pub fn all() -> Self {
        Self {
            crm: true,
            hr: true,
            inventory: true,
            sales: true,
        }
    }

    pub fn get(&self, module: Module) -> bool {
        match module {
            Module::Crm => self.crm,
            Module::Hr => self.hr,
            Module::Inventory => self.inventory,
            Module::Sales => self.sales,
        }
    }

    pub fn set(&mut self, module: Module, granted: bool) {
        match module {
            Module::Crm => self.crm = granted,
            Module::Hr => self.hr = granted,
            Module::Inventory => self.inventory = granted,
            Module::Sales => self.sales = granted,
        }
    }

    pub fn with(mut self, module: Module, granted: bool) -> Self {
        self.set(module, granted);
        self
    }
}
