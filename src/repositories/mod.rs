// src/repositories/mod.rs

//! SQL shared by several handlers and the quiz importer.
//! Every function takes a connection so callers decide the transaction scope.

pub mod quizzes;
pub mod submissions;
