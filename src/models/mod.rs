// src/models/mod.rs

pub mod participation;
pub mod question;
pub mod trivia;
pub mod user;
