//! Shared utilities and common types for the Ella Rises backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Password hashing with Argon2id
//! - JWT issuance and validation
//! - Common validation logic for profile and survey fields
//! - Pagination helpers for listing endpoints

pub mod jwt;
pub mod pagination;
pub mod password;
pub mod validation;
