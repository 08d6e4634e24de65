pub mod image;
pub mod payload;
pub mod request;

pub use image::*;
pub use payload::*;
pub use request::*;
