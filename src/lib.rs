pub mod cli;
pub mod error;
pub mod manual;
pub mod process;
