//! Keep stacked branches attached to their commits during `git rebase --interactive`.

pub mod config;
pub mod edit;
pub mod fs;
pub mod git;
pub mod restack;
pub mod setup;
