//! Integration tests for the print queue store and retry reconciler.

mod helpers;
mod reconciler_test;
