//! The in-memory transaction processor (C3), the history/ledger processor
//! that layers durable logging on top of it (C4), and the text command
//! parser (C5).

pub mod history;
pub mod parser;
pub mod processor;
pub mod state;

pub use history::HistoryProcessor;
pub use parser::{lower, parse, parse_command, tokenize, Command, CommandParseError};
pub use processor::apply;
pub use state::ProcessorState;
