mod generate;
mod greet;
mod info;

pub use generate::cmd_generate;
pub use greet::cmd_greet;
pub use info::cmd_info;
