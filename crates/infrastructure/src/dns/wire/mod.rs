//! DNS message codec (RFC 1035 §4).
//!
//! Everything here is pure: bytes in, typed values out, or the other way round. Multi-byte
//! fields are big-endian throughout.

mod builder;
mod header;
mod message;
mod name;
mod reader;
mod record;

pub use builder::MessageBuilder;
pub use header::{Header, HEADER_LEN};
pub use message::Message;
pub use name::{decode_name, encode_name, trim_root, MAX_LABEL_LEN, MAX_NAME_LEN};
pub use reader::WireReader;
pub use record::{Question, RData, ResourceRecord};
