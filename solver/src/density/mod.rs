//! Exact running-sum distributions for repeated rolls of one die.
//!
//! Instead of sampling rolls, [`table`] pushes the full probability mass of
//! the running sum forward one roll at a time. Every query in
//! [`crate::api_computations`] is a reduction over one of these tables.

pub mod table;
