//! Unit test harness for simple-step.
//!
//! This module organizes tests that exercise one public component at a time.

mod command_table;
mod config_parsing;
mod config_validation;
