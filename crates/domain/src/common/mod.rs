//! Common utility functions shared across the domain types.
//!
//! Pure functions only: no side effects, no I/O.

pub mod string;

pub use string::{clean_list, clean_text, strip_emphasis};
