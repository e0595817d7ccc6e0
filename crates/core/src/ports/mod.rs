mod handler;
mod source;

pub use handler::*;
pub use source::*;
