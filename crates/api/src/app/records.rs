//! Business records held in the tenant-isolated stores.
//!
//! These exist so the guarded module routes have real data to scope; the
//! interesting behavior lives in the guards and [`atlaserp_auth::TenantScope`],
//! not here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use atlaserp_core::{AccountId, TenantId};

/// Anything a tenant store holds: identifiable and stamped with its tenant.
pub trait TenantRecord {
    fn id(&self) -> Uuid;
    fn tenant_id(&self) -> TenantId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactType {
    Customer,
    Supplier,
}

/// CRM contact (customer or supplier).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub name: String,
    #[serde(rename = "type")]
    pub contact_type: ContactType,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub balance: f64,
    pub created_by: AccountId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TenantRecord for Contact {
    fn id(&self) -> Uuid {
        self.id
    }
    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

/// HR employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub name: String,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub salary: f64,
    pub hired_at: Option<DateTime<Utc>>,
    pub created_by: AccountId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TenantRecord for Employee {
    fn id(&self) -> Uuid {
        self.id
    }
    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    HalfDay,
    Holiday,
}

/// HR attendance entry for one employee on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub employee_id: Uuid,
    pub date: DateTime<Utc>,
    pub check_in: Option<DateTime<Utc>>,
    pub check_out: Option<DateTime<Utc>>,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
    pub created_by: AccountId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TenantRecord for AttendanceRecord {
    fn id(&self) -> Uuid {
        self.id
    }
    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

/// Inventory product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub name: String,
    pub sku: Option<String>,
    pub price: f64,
    pub cost: f64,
    pub quantity: i64,
    pub created_by: AccountId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TenantRecord for Product {
    fn id(&self) -> Uuid {
        self.id
    }
    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

/// Recorded sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub customer_name: Option<String>,
    pub total: f64,
    pub created_by: AccountId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TenantRecord for SaleRecord {
    fn id(&self) -> Uuid {
        self.id
    }
    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}
