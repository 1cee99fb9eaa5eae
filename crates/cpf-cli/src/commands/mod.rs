//! Command implementations for cpf-cli

pub mod read;
pub mod write;

pub use read::{run_cat, run_exists, run_ls, run_stat};
pub use write::{run_cp, run_mkdir, run_put, run_rm};
