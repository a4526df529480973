pub mod config;
pub mod outcome;
pub mod replay;

pub use config::{handle_config_command, ConfigCommands};
pub use outcome::{handle_deal, handle_mines, handle_seed, handle_wheel, EventArgs};
pub use replay::handle_replay;
