pub mod driver;
pub mod ir;
pub mod op;
pub mod parser;

pub use driver::{Config, Driver};
