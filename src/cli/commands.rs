//! Subcommands of the `conformance-runner` binary.

pub mod init;
pub mod run;
