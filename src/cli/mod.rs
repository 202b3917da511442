//! Handles Command Line Interface (CLI) related functionalities.
//!
//! Includes defining commands, parsing arguments, handling the interactive menu,
//! and rendering the connection configuration for operators.

mod commands;

pub use commands::*;
