//! Command implementations.
//!
//! Each command lives in its own module and exposes an `execute` function
//! taking the parsed arguments.

pub mod analyze;
pub mod check;
pub mod imports;
pub mod select;
pub(crate) mod utils;

pub use analyze::execute as analyze_execute;
pub use check::execute as check_execute;
pub use imports::execute as imports_execute;
pub use select::execute as select_execute;
