//! Transaction scratch space
//!
//! Small transfers are staged in an inline buffer; larger ones fall back to a
//! heap allocation (with the `alloc` feature) that lives for one transfer and
//! is released on drop, whichever way the transfer ends.

use core::ops::{Deref, DerefMut};

use crate::Error;

/// Capacity of the inline buffer, in bytes
pub const INLINE_CAPACITY: usize = 64;

pub enum Scratch {
    Inline(heapless::Vec<u8, INLINE_CAPACITY>),
    #[cfg(feature = "alloc")]
    Heap(alloc::vec::Vec<u8>),
}

impl Scratch {
    /// Acquire `len` zeroed bytes
    pub fn acquire<E>(len: usize) -> Result<Self, Error<E>> {
        if len <= INLINE_CAPACITY {
            let mut buf = heapless::Vec::new();
            buf.resize(len, 0).map_err(|()| Error::ResourceExhausted)?;
            return Ok(Self::Inline(buf));
        }

        Self::heap(len).ok_or(Error::ResourceExhausted)
    }

    #[cfg(feature = "alloc")]
    fn heap(len: usize) -> Option<Self> {
        let mut buf = alloc::vec::Vec::new();
        buf.try_reserve_exact(len).ok()?;
        buf.resize(len, 0);
        Some(Self::Heap(buf))
    }

    #[cfg(not(feature = "alloc"))]
    fn heap(len: usize) -> Option<Self> {
        warn!("transfer needs {} scratch bytes but heap fallback is disabled", len);
        None
    }

    #[cfg(test)]
    pub const fn is_inline(&self) -> bool {
        matches!(self, Self::Inline(_))
    }
}

impl Deref for Scratch {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Self::Inline(buf) => buf.as_slice(),
            #[cfg(feature = "alloc")]
            Self::Heap(buf) => buf.as_slice(),
        }
    }
}

impl DerefMut for Scratch {
    fn deref_mut(&mut self) -> &mut [u8] {
        match self {
            Self::Inline(buf) => buf.as_mut_slice(),
            #[cfg(feature = "alloc")]
            Self::Heap(buf) => buf.as_mut_slice(),
        }
    }
}
