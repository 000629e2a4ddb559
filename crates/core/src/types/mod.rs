//! Core types for the ERP assistant.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod department;
pub mod id;
pub mod status;
pub mod username;

pub use department::{Department, DepartmentError};
pub use id::*;
pub use status::*;
pub use username::{Username, UsernameError};
