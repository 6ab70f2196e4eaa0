//! Access to the repository being rebased.
//!
//! Nothing outside this module talks to git directly.

mod branches;
mod command;
mod repo;

pub use branches::*;
pub use command::*;
pub use repo::*;
