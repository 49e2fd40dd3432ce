//! Role-based access control.
//!
//! A flat table mapping accounts to roles. No hierarchy: holding
//! [`Role::Admin`] does not imply [`Role::Executor`], each privilege is
//! granted explicitly. The engines consult the table at the top of
//! privileged operations and reject callers that lack the role.

mod role;
mod table;

pub use role::Role;
pub use table::RoleTable;
