mod nom_parser;
mod parse;
mod patch;
mod serialize;
pub mod tags;
mod types;

pub use self::nom_parser::MAX_MIDDLE_PARAMS;
pub(crate) use self::parse::normalize_command;
pub use self::patch::{Field, MessagePatch};
pub use self::tags::{Tag, Tags};
pub use self::types::Message;
