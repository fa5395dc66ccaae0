//! Scenario tests for the analyzer over real temporary projects.

mod integration_tests;
