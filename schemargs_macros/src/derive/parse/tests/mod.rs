//! Unit tests for derive input and attribute parsing.

mod attrs;
mod input;
