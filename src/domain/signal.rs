//! Signal codes, trade sides and the stream primitives shared by every
//! resolution stage.
//!
//! A stream is a sparse per-bar sequence: `None` where nothing happens,
//! otherwise one of the four codes below. Entry codes are negative, exit
//! codes positive, and the magnitude identifies the side.

use std::fmt;

pub const LONG_ENTRY: i8 = -1;
pub const LONG_EXIT: i8 = 1;
pub const SHORT_ENTRY: i8 = -2;
pub const SHORT_EXIT: i8 = 2;

pub type SignalStream = Vec<Option<i8>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Long,
    Short,
}

impl Side {
    pub fn entry(self) -> i8 {
        match self {
            Side::Long => LONG_ENTRY,
            Side::Short => SHORT_ENTRY,
        }
    }

    pub fn exit(self) -> i8 {
        match self {
            Side::Long => LONG_EXIT,
            Side::Short => SHORT_EXIT,
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Long => Side::Short,
            Side::Short => Side::Long,
        }
    }

    /// Side owning `code`, entry or exit.
    pub fn of_code(code: i8) -> Option<Side> {
        match code.abs() {
            1 => Some(Side::Long),
            2 => Some(Side::Short),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Long => write!(f, "long"),
            Side::Short => write!(f, "short"),
        }
    }
}

/// Carry the last present value forward over gaps. Leading gaps stay empty.
pub fn forward_fill<T: Copy>(values: &[Option<T>]) -> Vec<Option<T>> {
    let mut last = None;
    values
        .iter()
        .map(|v| {
            if v.is_some() {
                last = *v;
            }
            last
        })
        .collect()
}

/// Drop every present value equal to the previous present value.
pub fn collapse_repeats(stream: &[Option<i8>]) -> SignalStream {
    let mut last = None;
    stream
        .iter()
        .map(|v| match *v {
            Some(code) if last == Some(code) => None,
            Some(code) => {
                last = Some(code);
                Some(code)
            }
            None => None,
        })
        .collect()
}

/// Drop every present value whose sign matches the previous present value,
/// leaving only position changes.
pub fn collapse_same_sign(stream: &[Option<i8>]) -> SignalStream {
    let mut last_sign = None;
    stream
        .iter()
        .map(|v| match *v {
            Some(code) if last_sign == Some(code.signum()) => None,
            Some(code) => {
                last_sign = Some(code.signum());
                Some(code)
            }
            None => None,
        })
        .collect()
}

pub fn count_code(stream: &[Option<i8>], code: i8) -> usize {
    stream.iter().filter(|v| **v == Some(code)).count()
}

/// Keep only the entry markers of `side`.
pub fn entry_markers(stream: &[Option<i8>], side: Side) -> SignalStream {
    stream
        .iter()
        .map(|v| v.filter(|code| *code == side.entry()))
        .collect()
}

/// Index of the first entry marker of `side`.
pub fn first_entry(stream: &[Option<i8>], side: Side) -> Option<usize> {
    stream.iter().position(|v| *v == Some(side.entry()))
}

/// True when consecutive present values never share a sign.
pub fn is_alternating(stream: &[Option<i8>]) -> bool {
    let present: Vec<i8> = stream.iter().flatten().copied().collect();
    present
        .windows(2)
        .all(|pair| pair[0].signum() != pair[1].signum())
}
