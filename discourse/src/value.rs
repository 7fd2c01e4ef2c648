/*!
The value coercion engine. Every kind of value a flag can hold is one row in
the `value_kinds!` table below; the row names the Rust type that stores it
and the function that parses it. From that row we get a [`ValueKind`] variant
and [`Target`] implementations for both the type itself (a scalar, which is
overwritten) and a [`Vec`] of it (a sequence, which is appended to).
*/

use core::{convert::Infallible, fmt::Display};
use std::{net::IpAddr, time::Duration};

use crate::impls::{HardwareAddr, HexBytes, IpMask};

/// Whether a flag holds a single value or collects every occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Repetition {
    /// Each occurrence overwrites the previous one
    Single,

    /// Each occurrence is appended, in the order they appeared
    Multiple,
}

/// The full declared kind of a flag: what it holds, and how many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlagKind {
    pub value: ValueKind,
    pub repetition: Repetition,
}

impl FlagKind {
    /// Boolean flags (and sequences of them) don't require a following
    /// value; they only consume a following literal `true` or `false`.
    #[inline]
    #[must_use]
    pub const fn is_boolean(&self) -> bool {
        matches!(self.value, ValueKind::Bool)
    }

    #[inline]
    #[must_use]
    pub const fn is_sequence(&self) -> bool {
        matches!(self.repetition, Repetition::Multiple)
    }
}

/**
A type that can be parsed from a single command-line string. Implemented for
every type in the kinds table; there's no need to implement it yourself.
*/
pub trait Scalar: Sized {
    const KIND: ValueKind;

    /// Parse this type from its standard textual grammar. The error is a
    /// human readable reason.
    fn parse(raw: &str) -> Result<Self, String>;
}

/**
Caller-owned storage that a flag writes through. Scalars are overwritten by
each occurrence of their flag; `Vec`s of scalars are appended to.

Flags hold a `&mut dyn Target`, so the storage always belongs to the caller
and the parser never needs to know its concrete type.
*/
pub trait Target {
    /// The declared kind of this storage
    fn kind(&self) -> FlagKind;

    /// Parse `raw` and write it into this storage. On failure, the storage is
    /// left untouched.
    fn assign(&mut self, raw: &str) -> Result<(), String>;
}

fn parse_with<T, E: Display>(parse: impl FnOnce(&str) -> Result<T, E>, raw: &str) -> Result<T, String> {
    parse(raw).map_err(|err| err.to_string())
}

macro_rules! value_kinds {
    ($(
        $(#[$meta:meta])*
        $kind:ident($type:ty) = $name:literal, $parse:expr;
    )*) => {
        /// The type of a single value held by a flag.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[non_exhaustive]
        pub enum ValueKind {
            $(
                $(#[$meta])*
                $kind,
            )*
        }

        impl ValueKind {
            /// Every kind, in table order
            pub const ALL: &'static [ValueKind] = &[$(ValueKind::$kind,)*];

            /// A short, user-facing name for this kind, used as a placeholder
            /// in help messages.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$kind => $name,)*
                }
            }
        }

        $(
            impl Scalar for $type {
                const KIND: ValueKind = ValueKind::$kind;

                #[inline]
                fn parse(raw: &str) -> Result<Self, String> {
                    parse_with($parse, raw)
                }
            }

            impl Target for $type {
                #[inline]
                fn kind(&self) -> FlagKind {
                    FlagKind {
                        value: <$type as Scalar>::KIND,
                        repetition: Repetition::Single,
                    }
                }

                fn assign(&mut self, raw: &str) -> Result<(), String> {
                    *self = <$type as Scalar>::parse(raw)?;
                    Ok(())
                }
            }

            impl Target for Vec<$type> {
                #[inline]
                fn kind(&self) -> FlagKind {
                    FlagKind {
                        value: <$type as Scalar>::KIND,
                        repetition: Repetition::Multiple,
                    }
                }

                fn assign(&mut self, raw: &str) -> Result<(), String> {
                    self.push(<$type as Scalar>::parse(raw)?);
                    Ok(())
                }
            }
        )*
    };
}

value_kinds! {
    String(String) = "string", |raw: &str| Ok::<_, Infallible>(raw.to_owned());
    /// Only the literals `true` and `false`
    Bool(bool) = "bool", str::parse::<bool>;

    I8(i8) = "int8", str::parse::<i8>;
    I16(i16) = "int16", str::parse::<i16>;
    I32(i32) = "int32", str::parse::<i32>;
    I64(i64) = "int64", str::parse::<i64>;

    U8(u8) = "uint8", str::parse::<u8>;
    U16(u16) = "uint16", str::parse::<u16>;
    U32(u32) = "uint32", str::parse::<u32>;
    U64(u64) = "uint64", str::parse::<u64>;

    F32(f32) = "float32", str::parse::<f32>;
    F64(f64) = "float64", str::parse::<f64>;

    /// Quantity and unit pairs, like `1h50m` or `300ms`
    Duration(Duration) = "duration", humantime::parse_duration;
    /// Hex-encoded bytes
    HexBytes(HexBytes) = "hex", str::parse::<HexBytes>;
    /// IPv4 or IPv6 address
    IpAddr(IpAddr) = "ip", str::parse::<IpAddr>;
    /// MAC, EUI-64 or InfiniBand link-layer address
    HardwareAddr(HardwareAddr) = "mac", str::parse::<HardwareAddr>;
    /// IPv4 netmask
    IpMask(IpMask) = "mask", str::parse::<IpMask>;
}
