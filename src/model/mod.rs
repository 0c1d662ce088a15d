pub mod common;
pub mod filter;
pub mod service;
pub mod survey;

pub use common::*;
pub use filter::*;
pub use service::*;
pub use survey::*;
