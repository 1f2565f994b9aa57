mod address;
mod hex_word;
pub mod tcp;

pub use address::AddressDecoder;
pub use hex_word::{reverse_bytes_in_hex_word, reversed_hex_word};
