pub mod employees;
pub mod inventory;
