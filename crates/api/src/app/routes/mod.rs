pub mod admin;
pub mod auth;
pub mod crm;
pub mod dashboard;
pub mod hr;
pub mod inventory;
pub mod sales;
pub mod system;
