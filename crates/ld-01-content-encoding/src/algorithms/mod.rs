//! Cell-level encoding algorithms

pub mod dictionary;
pub mod snake;

pub use dictionary::{build_dictionary, dictionary_get, parse_dictionary};
pub use snake::{decode_snake, encode_snake, encode_snake_with_capacity};
