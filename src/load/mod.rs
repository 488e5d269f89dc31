pub mod common;
pub mod csv;
pub mod json;
pub mod console;
pub mod memory;
