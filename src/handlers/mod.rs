// src/handlers/mod.rs

pub mod auth;
pub mod courses;
pub mod profile;
pub mod quiz;
pub mod submission;
