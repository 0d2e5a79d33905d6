// src/utils/mod.rs

pub mod certificate;
