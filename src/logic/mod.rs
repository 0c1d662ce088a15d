pub mod error;
pub mod health;
pub mod predicate;
pub mod survey_repository;

pub use error::*;
pub use health::*;
pub use predicate::*;
pub use survey_repository::*;
