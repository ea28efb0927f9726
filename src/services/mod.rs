// src/services/mod.rs

pub mod identity;
pub mod recorder;
pub mod scoring;
