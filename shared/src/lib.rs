pub mod models;
pub mod validation;
pub mod tally;
pub mod poll;

pub use models::*;
pub use validation::*;
pub use tally::{Tally, CandidateTally};
pub use poll::{Poll, PollEntry};
