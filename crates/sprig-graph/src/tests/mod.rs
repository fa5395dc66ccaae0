//! Crate-level tests: selection bookkeeping, sessions and properties.

mod selection_tests;
