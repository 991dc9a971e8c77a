// src/services/mod.rs

pub mod game;
pub mod question;
pub mod scoring;
pub mod trivia;
pub mod user;

pub use game::GameService;
pub use question::QuestionService;
pub use trivia::TriviaService;
pub use user::UserService;
