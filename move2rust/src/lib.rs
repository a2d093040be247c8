// #![warn(rust_2018_idioms)]

pub mod driver;
pub mod files;
pub mod lexer;
pub mod pass;
pub mod scope;
pub mod source;
pub mod support;

// Public exports
pub use driver::{Destination, Driver, Status};
pub use pass::{translate, Options, Translation};
