pub mod book;
pub mod history;
pub mod mode;

pub use book::*;
pub use history::*;
pub use mode::*;
