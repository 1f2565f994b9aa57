use super::hex_word::{reverse_bytes_in_hex_word, reversed_hex_word};
use crate::error::{FormatError, WrapFormat};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

const NIBBLES_IN_IPV4_ADDRESS: usize = 8;
const NIBBLES_IN_32BIT_WORD: usize = 8;
const WORDS_IN_IPV6_ADDRESS: usize = 4;
const NIBBLES_IN_IPV6_ADDRESS: usize = NIBBLES_IN_32BIT_WORD * WORDS_IN_IPV6_ADDRESS;

/// Decoder for the hex encoded addresses found in the kernel TCP tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressDecoder {
    /// One 32-bit word in host byte order.
    V4,
    /// Four 32-bit words, each in host byte order, words in network order.
    /// e.g. `::1` is displayed as `00000000 00000000 00000000 01000000`.
    V6,
}

impl AddressDecoder {
    /// Number of hex characters of an encoded address.
    pub fn hex_len(&self) -> usize {
        match self {
            AddressDecoder::V4 => NIBBLES_IN_IPV4_ADDRESS,
            AddressDecoder::V6 => NIBBLES_IN_IPV6_ADDRESS,
        }
    }

    pub fn decode(&self, text: &str) -> Result<IpAddr, FormatError> {
        if text.len() != self.hex_len() {
            return Err(FormatError::new(format!(
                "incorrect string length for {} address {text:?}: {} (expected {})",
                self.name(),
                text.len(),
                self.hex_len()
            )));
        }

        match self {
            AddressDecoder::V4 => {
                let bytes = reverse_bytes_in_hex_word(text)
                    .wrap_format(|| "reversing bytes in address".to_string())?;
                let octets: [u8; 4] = bytes
                    .try_into()
                    .map_err(|_| FormatError::new("IPv4 address is not 4 bytes long"))?;

                Ok(IpAddr::V4(Ipv4Addr::from(octets)))
            }
            AddressDecoder::V6 => {
                let mut octets = [0u8; 16];

                // Only the bytes inside a word are flipped, never the word order.
                for (index, word) in text.as_bytes().chunks(NIBBLES_IN_32BIT_WORD).enumerate() {
                    let bytes = reverse_bytes_in_hex_word(word)
                        .wrap_format(|| format!("reversing bytes in word {index}"))?;
                    octets[index * 4..(index + 1) * 4].copy_from_slice(&bytes);
                }

                Ok(IpAddr::V6(Ipv6Addr::from(octets)))
            }
        }
    }

    /// Encodes `address` the way the kernel displays it.
    pub fn encode(&self, address: &IpAddr) -> Result<String, FormatError> {
        match (self, address) {
            (AddressDecoder::V4, IpAddr::V4(address)) => Ok(reversed_hex_word(&address.octets())),
            (AddressDecoder::V6, IpAddr::V6(address)) => Ok(address
                .octets()
                .chunks(4)
                .map(reversed_hex_word)
                .collect()),
            _ => Err(FormatError::new(format!(
                "address {address} is not an {} address",
                self.name()
            ))),
        }
    }

    /// Whether `address` is of this decoder's family.
    pub fn accepts(&self, address: &IpAddr) -> bool {
        match self {
            AddressDecoder::V4 => address.is_ipv4(),
            AddressDecoder::V6 => address.is_ipv6(),
        }
    }

    /// Zero address of the family.
    pub fn unspecified(&self) -> IpAddr {
        match self {
            AddressDecoder::V4 => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            AddressDecoder::V6 => IpAddr::V6(Ipv6Addr::UNSPECIFIED),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            AddressDecoder::V4 => "IPv4",
            AddressDecoder::V6 => "IPv6",
        }
    }
}
