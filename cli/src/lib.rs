pub mod cli;
pub mod convert;
pub mod error;
pub mod io;
pub mod report;
