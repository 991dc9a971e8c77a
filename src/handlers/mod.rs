// src/handlers/mod.rs

pub mod game;
pub mod health;
pub mod question;
pub mod trivia;
pub mod user;
