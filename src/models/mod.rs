pub mod common;
pub mod image;
pub mod outcome;
pub mod request;

pub use common::*;
pub use image::*;
pub use outcome::*;
pub use request::*;
