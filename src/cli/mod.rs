mod args;
mod generate;
mod init;
mod output;

pub use args::{Args, Command};
pub use generate::{run_all, run_classes, run_sequence, run_static, Session};
pub use init::run_init;
pub use output::{print_error, Output};
