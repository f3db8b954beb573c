//! Interactive answers for `user_input` plan steps

mod terminal;

pub use terminal::TerminalUserInput;
