//! # CLI Command Implementations
//!
//! The `atlantis-yaml-generator` binary runs a single command. It lives in
//! its own module like any other command would:
//! - An `Args` struct that defines the command's arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and calls into the
//!   `atlantis_yaml_generator` library to perform the core logic.

pub mod generate;
