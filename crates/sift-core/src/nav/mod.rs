//! Navigation state for sift.
//!
//! Entry [`filter`]ing and sorting, the per-pane model in [`pane`], and the
//! command-line [`history`].

pub mod filter;
pub mod history;
pub mod pane;
