use core::fmt;

/**
A single, raw token passed in from the command line.

This type is used in two ways: to indicate flag keys, and to indicate
arguments themselves. For instance, given `--target foo --path=bar input.txt`,
`target`, `foo`, `path`, `bar`, and `input.txt` would all be passed as [`Arg`]
values to the relevant [`Visitor`][crate::Visitor] methods.
*/
#[derive(Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct Arg(str);

impl Arg {
    #[inline]
    #[must_use]
    pub const fn new(arg: &str) -> &Self {
        // SAFETY: Arg is repr transparent to a str, so a pointer to one is a
        // valid pointer to the other, with the same metadata.
        unsafe { &*(arg as *const str as *const Arg) }
    }

    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Arg {
    fn eq(&self, other: &str) -> bool {
        self.0 == *other
    }
}

impl PartialEq<&str> for Arg {
    fn eq(&self, other: &&str) -> bool {
        self.0 == **other
    }
}

impl AsRef<str> for Arg {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &self.0)
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
