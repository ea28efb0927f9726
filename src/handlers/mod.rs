// src/handlers/mod.rs

pub mod auth;
pub mod catalog;
pub mod quiz;
pub mod session;
