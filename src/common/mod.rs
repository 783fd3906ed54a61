pub mod error;
pub mod hints;
pub mod matrix;
pub mod pixel;

pub use error::*;
pub use hints::*;
pub use matrix::*;
pub use pixel::*;
