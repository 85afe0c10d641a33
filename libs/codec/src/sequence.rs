//! Datagram sequence counter
//!
//! Generic headers wrap from the field maximum back to zero before
//! incrementing, so the first value after a wrap is 1. The stream-id header
//! carries only 12 bits and never emits 0: it cycles 1..=4095.

use crate::header_type::HeaderType;
use crate::layout::HeaderLayout;

/// Largest sequence value the 12-bit stream-id field can carry
pub const STREAM_SEQUENCE_MAX: u64 = 0x0FFF;

/// What happens when the counter passes its maximum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rollover {
    /// At `max`, reset to 0 then increment (next value is 1)
    Wrapping { max: u64 },
    /// Past `max`, restart at 1
    SkipZero { max: u64 },
}

/// Monotonic per-datagram sequence counter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceCounter {
    value: u64,
    rollover: Rollover,
}

impl SequenceCounter {
    pub fn new(rollover: Rollover) -> Self {
        Self { value: 0, rollover }
    }

    /// Counter appropriate for `header_type` under `layout`
    pub fn for_header(header_type: HeaderType, layout: &HeaderLayout) -> Self {
        match header_type {
            HeaderType::StreamId => Self::new(Rollover::SkipZero {
                max: STREAM_SEQUENCE_MAX,
            }),
            _ => Self::new(Rollover::Wrapping {
                max: layout.sequence.max_value(),
            }),
        }
    }

    /// Resume from `value`; the next `advance()` yields the value after it
    pub fn starting_at(mut self, value: u64) -> Self {
        self.value = value;
        self
    }

    /// Value carried by the most recent datagram (0 before the first)
    pub fn current(&self) -> u64 {
        self.value
    }

    pub fn rollover(&self) -> Rollover {
        self.rollover
    }

    /// Step to the next sequence value and return it
    pub fn advance(&mut self) -> u64 {
        match self.rollover {
            Rollover::Wrapping { max } => {
                if self.value >= max {
                    self.value = 0;
                }
                self.value += 1;
            }
            Rollover::SkipZero { max } => {
                self.value += 1;
                if self.value > max {
                    self.value = 1;
                }
            }
        }
        self.value
    }
}
