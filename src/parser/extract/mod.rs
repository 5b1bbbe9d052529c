pub mod description;
pub mod location;
pub mod start;
pub mod title;
