mod color;
mod window;

pub use color::*;
pub use window::*;
