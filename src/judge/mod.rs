// src/judge/mod.rs

pub mod adapter;
pub mod backend;
pub mod engine;
pub mod language;
pub mod runner;
pub mod scorer;
