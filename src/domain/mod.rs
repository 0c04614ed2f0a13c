pub mod quiz;
pub mod word;

pub use quiz::{AnswerOutcome, QuizChallenge, QuizOption, QuizView};
pub use word::{Freshness, NewWord, ReviewUpdate, WordDetails, WordItem, WordView};
