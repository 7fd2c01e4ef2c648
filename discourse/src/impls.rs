/*!
Value types for the kinds that don't have a suitable standard library type:
hex byte strings, link-layer hardware addresses, and IPv4 netmasks.
 */

use core::{
    fmt::{self, Display, Write as _},
    ops::Deref,
    str::FromStr,
};
use std::{
    net::{AddrParseError, Ipv4Addr},
    string::String,
    vec::Vec,
};

/// Bytes given on the command line as a hex string, such as `deadbeef`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct HexBytes(pub Vec<u8>);

impl HexBytes {
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl Deref for HexBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl From<HexBytes> for Vec<u8> {
    fn from(bytes: HexBytes) -> Self {
        bytes.0
    }
}

impl FromStr for HexBytes {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex::decode(s).map(HexBytes)
    }
}

impl Display for HexBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

/// Errors from parsing the address-like value kinds
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum AddressError {
    #[error("a hardware address has 6, 8 or 20 octets, got {0}")]
    HardwareLength(usize),

    #[error("malformed hardware address group {0:?}")]
    HardwareGroup(String),

    #[error("prefix length must be between 0 and 32, got {0:?}")]
    PrefixLength(String),

    #[error(transparent)]
    Ip(#[from] AddrParseError),
}

/**
A link-layer hardware address: an IEEE 802 MAC-48, EUI-48, EUI-64, or a
20-octet IP over InfiniBand address.

Accepted forms use groups of two hex digits separated by `:` or `-`
(`00:00:5e:00:53:01`, `00-00-5e-00-53-01`), or groups of four hex digits
separated by `.` (`0000.5e00.5301`).
*/
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct HardwareAddr(Vec<u8>);

impl HardwareAddr {
    #[inline]
    #[must_use]
    pub fn octets(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for HardwareAddr {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (separator, digits) = if s.contains('.') {
            ('.', 4)
        } else if s.contains('-') {
            ('-', 2)
        } else {
            (':', 2)
        };

        let mut octets = Vec::with_capacity(20);

        for group in s.split(separator) {
            if group.len() != digits {
                return Err(AddressError::HardwareGroup(group.to_owned()));
            }

            let decoded =
                hex::decode(group).map_err(|_| AddressError::HardwareGroup(group.to_owned()))?;
            octets.extend_from_slice(&decoded);
        }

        match octets.len() {
            6 | 8 | 20 => Ok(Self(octets)),
            len => Err(AddressError::HardwareLength(len)),
        }
    }
}

impl Display for HardwareAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut octets = self.0.iter();

        if let Some(first) = octets.next() {
            write!(f, "{first:02x}")?;
            octets.try_for_each(|octet| {
                f.write_char(':')?;
                write!(f, "{octet:02x}")
            })?;
        }

        Ok(())
    }
}

/**
An IPv4 netmask, given either in dotted-quad form (`255.255.255.0`) or as a
prefix length (`/24`).
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpMask(Ipv4Addr);

impl IpMask {
    #[must_use]
    pub const fn from_prefix_len(len: u8) -> Option<Self> {
        match len {
            0 => Some(Self(Ipv4Addr::UNSPECIFIED)),
            1..=32 => Some(Self(Ipv4Addr::from_bits(u32::MAX << (32 - len)))),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn addr(&self) -> Ipv4Addr {
        self.0
    }

    /// The prefix length of this mask, if its bits are contiguous.
    #[must_use]
    pub const fn prefix_len(&self) -> Option<u32> {
        let bits = self.0.to_bits();
        let len = bits.leading_ones();

        match bits.checked_shl(len) {
            Some(0) | None => Some(len),
            Some(_) => None,
        }
    }
}

impl Default for IpMask {
    fn default() -> Self {
        Self(Ipv4Addr::UNSPECIFIED)
    }
}

impl From<IpMask> for Ipv4Addr {
    fn from(mask: IpMask) -> Self {
        mask.0
    }
}

impl FromStr for IpMask {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix('/') {
            Some(len) => len
                .parse()
                .ok()
                .and_then(Self::from_prefix_len)
                .ok_or_else(|| AddressError::PrefixLength(len.to_owned())),
            None => Ok(Self(s.parse()?)),
        }
    }
}

impl Display for IpMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}
