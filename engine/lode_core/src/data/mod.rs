//! Parse data: byte sources, values, the parse graph and the parse state.

mod cache;
mod encoding;
mod graph;
pub mod selection;
mod source;
mod state;
mod value;

pub use cache::ParseValueCache;
pub use encoding::{ByteOrder, Charset, Encoding, Sign};
pub use graph::{Items, ParseGraph, ParseItem, ParseReference};
pub use source::{ByteStream, InMemoryByteStream, Slice, Source};
pub use state::{Iteration, ParseState};
pub use value::{ParseValue, Value};
