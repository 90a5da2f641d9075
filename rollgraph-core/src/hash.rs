//! FNV-1a hashing and slot addressing for the hash indices.
//!
//! Vertex slots hash the identifier alone. Edge slots hash the concatenation
//! of the canonicalised pair, so the edge hash is symmetric provided callers
//! pass the lexicographically smaller identifier first.

const FNV_OFFSET_32: u32 = 0x811c_9dc5;
const FNV_PRIME_32: u32 = 0x0100_0193;

/// Number of address bits of a hash index; the index holds `1 << bits` slots.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IndexWidth {
    bits: u8,
}

impl IndexWidth {
    /// Widest index the builder accepts.
    pub const MAX_BITS: u8 = 24;

    /// Creates a width of `bits` address bits.
    ///
    /// Returns `None` when `bits` is zero or exceeds [`Self::MAX_BITS`].
    ///
    /// # Examples
    /// ```
    /// use rollgraph_core::IndexWidth;
    ///
    /// let width = IndexWidth::new(13).expect("13 bits is in range");
    /// assert_eq!(width.mask(), 0x1FFF);
    /// assert_eq!(width.slots(), 8192);
    /// assert!(IndexWidth::new(0).is_none());
    /// ```
    #[must_use]
    pub const fn new(bits: u8) -> Option<Self> {
        if bits == 0 || bits > Self::MAX_BITS {
            None
        } else {
            Some(Self { bits })
        }
    }

    /// Returns the configured number of address bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.bits
    }

    /// Returns the mask applied to raw hashes.
    #[must_use]
    pub const fn mask(self) -> u32 {
        (1_u32 << self.bits) - 1
    }

    /// Returns the number of slots in an index of this width.
    #[must_use]
    pub const fn slots(self) -> usize {
        1_usize << self.bits
    }
}

/// Hashes `bytes` with 32-bit FNV-1a.
///
/// # Examples
/// ```
/// use rollgraph_core::fnv1a32;
///
/// assert_eq!(fnv1a32(b""), 0x811c_9dc5);
/// assert_eq!(fnv1a32(b"a"), 0xe40c_292c);
/// ```
#[must_use]
pub fn fnv1a32(bytes: &[u8]) -> u32 {
    fnv1a32_extend(FNV_OFFSET_32, bytes)
}

fn fnv1a32_extend(state: u32, bytes: &[u8]) -> u32 {
    bytes.iter().fold(state, |hash, &byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME_32)
    })
}

/// Returns the vertex-index slot for `identifier`.
#[must_use]
pub fn vertex_hash(identifier: &str, width: IndexWidth) -> u32 {
    fnv1a32(identifier.as_bytes()) & width.mask()
}

/// Returns the edge-index slot for the canonical pair `(low, high)`.
///
/// The hash covers `low` followed by `high` without allocating the
/// concatenated string.
///
/// # Examples
/// ```
/// use rollgraph_core::{IndexWidth, edge_hash, fnv1a32};
///
/// let width = IndexWidth::new(13).expect("valid width");
/// assert_eq!(edge_hash("ann", "bob", width), fnv1a32(b"annbob") & width.mask());
/// ```
#[must_use]
pub fn edge_hash(low: &str, high: &str, width: IndexWidth) -> u32 {
    let partial = fnv1a32_extend(FNV_OFFSET_32, low.as_bytes());
    fnv1a32_extend(partial, high.as_bytes()) & width.mask()
}
