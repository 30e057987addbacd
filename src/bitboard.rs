//! A square bitboard whose side length is chosen at runtime.
//!
//! Cells are packed row-major into an unsigned integer `T`, so a board of side
//! `size` needs `size * size` bits of `T`. Grids in a match are all the same
//! size, but that size is a match parameter, which is why it lives in the
//! value instead of a const generic.

use core::ops::{BitAnd, BitOr, BitOrAssign, Not};
use core::{fmt, mem};
use num_traits::{PrimInt, Unsigned, Zero};
use serde::{Deserialize, Serialize};

/// Errors returned by bitboard operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitBoardError {
    /// Requested board size*size exceeds capacity of `T::BITS`.
    SizeTooLarge { size: usize, capacity: usize },
    /// Column or row index is out of bounds [0..size).
    IndexOutOfBounds { col: usize, row: usize },
}

impl fmt::Display for BitBoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BitBoardError::SizeTooLarge { size, capacity } => {
                write!(
                    f,
                    "SizeTooLarge: size*size={} exceeds T::BITS={}",
                    size * size,
                    capacity
                )
            }
            BitBoardError::IndexOutOfBounds { col, row } => {
                write!(f, "IndexOutOfBounds: col={}, row={}", col, row)
            }
        }
    }
}

impl std::error::Error for BitBoardError {}

/// A `size×size` bitboard stored in the unsigned integer `T`.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitBoard<T> {
    bits: T,
    size: usize,
}

/// Mask type used for every grid in a match.
pub type Mask = BitBoard<u128>;

impl<T> BitBoard<T>
where
    T: PrimInt + Unsigned + Zero,
{
    /// Bits available in `T`.
    pub fn capacity() -> usize {
        mem::size_of::<T>() * 8
    }

    #[inline]
    fn mask(size: usize) -> T {
        let bits = size * size;
        if bits >= Self::capacity() {
            !T::zero()
        } else {
            (T::one() << bits) - T::one()
        }
    }

    /// Create a new empty bitboard without size check. Callers validate
    /// `size` up front, see [`BitBoard::try_new`].
    #[inline]
    pub fn new(size: usize) -> Self {
        BitBoard {
            bits: T::zero(),
            size,
        }
    }

    /// Fallible constructor: returns `Err(SizeTooLarge)` if size*size > T::BITS.
    pub fn try_new(size: usize) -> Result<Self, BitBoardError> {
        let capacity = Self::capacity();
        if size * size > capacity {
            Err(BitBoardError::SizeTooLarge { size, capacity })
        } else {
            Ok(Self::new(size))
        }
    }

    /// Side length of the board.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the number of set bits.
    pub fn count_ones(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Returns true if no bits are set.
    pub fn is_empty(&self) -> bool {
        self.bits.is_zero()
    }

    /// True when every bit set in `self` is also set in `other`.
    pub fn is_subset_of(&self, other: &Self) -> bool {
        (self.bits & !other.bits).is_zero()
    }

    /// Gets the bit at (col, row).
    pub fn get(&self, col: usize, row: usize) -> Result<bool, BitBoardError> {
        let idx = self.index(col, row)?;
        Ok(((self.bits >> idx) & T::one()) != T::zero())
    }

    /// Sets the bit at (col, row) to 1.
    pub fn set(&mut self, col: usize, row: usize) -> Result<(), BitBoardError> {
        let idx = self.index(col, row)?;
        self.bits = self.bits | (T::one() << idx);
        Ok(())
    }

    /// Clears the bit at (col, row) to 0.
    pub fn clear(&mut self, col: usize, row: usize) -> Result<(), BitBoardError> {
        let idx = self.index(col, row)?;
        self.bits = self.bits & !(T::one() << idx);
        Ok(())
    }

    /// Sets all board bits to `1`.
    #[inline]
    pub fn fill(&mut self) {
        self.bits = Self::mask(self.size);
    }

    /// Clears all bits to `0`.
    #[inline]
    pub fn clear_all(&mut self) {
        self.bits = T::zero();
    }

    #[inline]
    fn index(&self, col: usize, row: usize) -> Result<usize, BitBoardError> {
        if col >= self.size || row >= self.size {
            Err(BitBoardError::IndexOutOfBounds { col, row })
        } else {
            Ok(row * self.size + col)
        }
    }

    /// Consumes the board and returns the raw integer.
    #[inline]
    pub fn into_raw(self) -> T {
        self.bits
    }

    /// Creates a bitboard from the raw integer, masking out upper bits.
    #[inline]
    pub fn from_raw(raw: T, size: usize) -> Self {
        BitBoard {
            bits: raw & Self::mask(size),
            size,
        }
    }

    /// Creates a bitboard from an iterator over `(col, row)` positions.
    pub fn from_iter<I>(size: usize, iter: I) -> Result<Self, BitBoardError>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut board = Self::new(size);
        for (c, r) in iter {
            board.set(c, r)?;
        }
        Ok(board)
    }

    /// Iterator over the set bits of the board as `(col, row)`.
    #[inline]
    pub fn iter_set_bits(&self) -> SetBits<'_, T> {
        SetBits {
            board: self,
            idx: 0,
        }
    }
}

impl<T> fmt::Debug for BitBoard<T>
where
    T: PrimInt + Unsigned + Zero,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BitBoard<{}x{}>:", self.size, self.size)?;
        for r in 0..self.size {
            for c in 0..self.size {
                let bit = if self.get(c, r).unwrap_or(false) {
                    '■'
                } else {
                    '□'
                };
                write!(f, "{} ", bit)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Iterator over the set bits of a bitboard.
#[derive(Clone, Copy)]
pub struct SetBits<'a, T> {
    board: &'a BitBoard<T>,
    idx: usize,
}

impl<'a, T> Iterator for SetBits<'a, T>
where
    T: PrimInt + Unsigned + Zero,
{
    type Item = (usize, usize);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let n = self.board.size;
        while self.idx < n * n {
            let idx = self.idx;
            self.idx += 1;
            if ((self.board.bits >> idx) & T::one()) != T::zero() {
                return Some((idx % n, idx / n));
            }
        }
        None
    }
}

/// Bitwise AND for combining two bitboards.
impl<T> BitAnd for BitBoard<T>
where
    T: PrimInt + Unsigned + Zero,
{
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        BitBoard::from_raw(self.bits & rhs.bits, self.size)
    }
}

/// Bitwise OR for combining two bitboards.
impl<T> BitOr for BitBoard<T>
where
    T: PrimInt + Unsigned + Zero,
{
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        BitBoard::from_raw(self.bits | rhs.bits, self.size)
    }
}

/// Bitwise NOT for inverting a bitboard (within board bounds).
impl<T> Not for BitBoard<T>
where
    T: PrimInt + Unsigned + Zero,
{
    type Output = Self;
    #[inline]
    fn not(self) -> Self {
        Self::from_raw(!self.bits, self.size)
    }
}

impl<T> BitOrAssign for BitBoard<T>
where
    T: PrimInt + Unsigned + Zero,
{
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.bits = self.bits | rhs.bits;
    }
}
