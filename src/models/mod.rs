// src/models/mod.rs

pub mod certification;
pub mod coding_question;
pub mod submission;
