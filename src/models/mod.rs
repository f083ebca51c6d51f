pub mod insight;
pub mod team;
pub mod user;

pub use insight::*;
pub use team::*;
pub use user::*;
