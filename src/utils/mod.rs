// Utility functions
pub mod error;
pub mod format;
pub mod html;

pub use error::*;
pub use format::*;
pub use html::*;
