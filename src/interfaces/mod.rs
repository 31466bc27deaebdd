//! Outer surfaces: action-style responses and CSV input.

pub mod actions;
pub mod csv;
