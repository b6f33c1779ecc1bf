//! End-to-end tests that drive the compiled mock binary as a child process.

mod control;
mod lifecycle;
