//! End-to-end tests for the gateway workspace live in the sibling test
//! targets; this crate intentionally exports nothing.
