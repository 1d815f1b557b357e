//! Reusable UI components

mod input;

pub use input::{Cursor, TextInput};
