pub mod postgres;
#[cfg(test)]
pub mod scripted;
pub mod traits;

pub use postgres::*;
pub use traits::*;
