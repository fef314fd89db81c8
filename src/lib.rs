// src/lib.rs

pub mod api;
pub mod scoring;
