/*
 * Copyright © 2026 the snowgen authors
 * Licensed under the Apache License, Version 2.0 (the "Licence");
 * you may not use this file except in compliance with the Licence.
 * You may obtain a copy of the Licence at
 *     https://www.apache.org/licenses/LICENSE-2.0
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the Licence is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the Licence for the specific language governing permissions and
 * limitations under the Licence.
 */

//! The bit layout shared by all IDs of a deployment.

use crate::{Error, Result};

/// The default epoch: the first millisecond of Thu, 04 Nov 2010 01:42:54 GMT.
///
/// This is the epoch introduced by Twitter's original snowflake implementation. With 41 timestamp bits it keeps the
/// default [`Layout`] usable until roughly 2079.
pub const DEFAULT_EPOCH: u64 = 1288834974657;

/// The composition of a snowflake ID: its epoch and the widths of its bit fields.
///
/// A layout dedicates the 63 bits below the constant `0` sign bit to four fields, in order: the timestamp
/// (milliseconds since the [epoch](Self::epoch)), the datacenter ID, the worker ID, and the sequence number. The
/// timestamp width isn't specified directly; it's whatever the other three fields leave behind. The sign bit is
/// reserved so that every ID remains a non-negative value when stored in a signed 64-bit column.
///
/// All generators of a deployment **must** share a single layout (including the epoch). IDs only sort by generation
/// time and only decode correctly if every node packs its fields the same way.
///
/// # Example
///
/// ```
/// use snowgen::Layout;
///
/// // The classic layout: 41 timestamp, 5 datacenter, 5 worker, and 12 sequence bits
/// let layout = Layout::classic();
/// assert_eq!(41, layout.timestamp_bits());
/// assert_eq!(31, layout.max_worker_id());
/// assert_eq!(4095, layout.sequence_mask());
///
/// // A custom layout for a deployment without datacenters that needs more workers
/// let layout = Layout::new(1672531200000, 0, 14, 8)?;
/// assert_eq!(41, layout.timestamp_bits());
/// assert_eq!(16383, layout.max_worker_id());
/// assert_eq!(0, layout.max_datacenter_id());
/// # Ok::<(), snowgen::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    epoch: u64,
    datacenter_id_bits: u32,
    worker_id_bits: u32,
    sequence_bits: u32,
}

impl Layout {
    const DEFAULT_DATACENTER_ID_BITS: u32 = 5;
    const DEFAULT_WORKER_ID_BITS: u32 = 5;
    const DEFAULT_SEQUENCE_BITS: u32 = 12;

    /// Returns the classic layout introduced by Twitter: 41 timestamp bits, 5 datacenter ID bits, 5 worker ID bits,
    /// and 12 sequence bits, with the [`DEFAULT_EPOCH`].
    ///
    /// This supports 32 datacenters with 32 workers each, 4096 IDs per worker per millisecond, and timestamps for
    /// about 69 years past the epoch.
    #[inline]
    pub const fn classic() -> Self {
        Self {
            epoch: DEFAULT_EPOCH,
            datacenter_id_bits: Self::DEFAULT_DATACENTER_ID_BITS,
            worker_id_bits: Self::DEFAULT_WORKER_ID_BITS,
            sequence_bits: Self::DEFAULT_SEQUENCE_BITS,
        }
    }

    /// Creates a layout with a custom epoch and custom field widths.
    ///
    /// `epoch` is the number of milliseconds since the Unix epoch that all timestamps are stored relative to. It must
    /// be in the past whenever a generator using this layout runs; [`Generator`](crate::Generator) constructors
    /// verify this against the clock they're given.
    ///
    /// The three widths must leave at least one timestamp bit below the sign bit. I.e.,
    /// `datacenter_id_bits + worker_id_bits + sequence_bits` must not exceed 62; otherwise this returns
    /// [`Error::InvalidLayout`]. A width of 0 is allowed and fixes the corresponding field to 0.
    pub fn new(epoch: u64, datacenter_id_bits: u32, worker_id_bits: u32, sequence_bits: u32) -> Result<Self> {
        let bits = datacenter_id_bits
            .saturating_add(worker_id_bits)
            .saturating_add(sequence_bits);
        if bits > 62 {
            return Err(Error::InvalidLayout { bits });
        }
        Ok(Self {
            epoch,
            datacenter_id_bits,
            worker_id_bits,
            sequence_bits,
        })
    }

    /// Returns this layout's epoch in milliseconds since the Unix epoch.
    #[inline]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Returns the number of bits dedicated to the timestamp.
    #[inline]
    pub const fn timestamp_bits(&self) -> u32 {
        63 - self.datacenter_id_bits - self.worker_id_bits - self.sequence_bits
    }

    /// Returns the number of bits dedicated to the datacenter ID.
    #[inline]
    pub const fn datacenter_id_bits(&self) -> u32 {
        self.datacenter_id_bits
    }

    /// Returns the number of bits dedicated to the worker ID.
    #[inline]
    pub const fn worker_id_bits(&self) -> u32 {
        self.worker_id_bits
    }

    /// Returns the number of bits dedicated to the sequence number.
    #[inline]
    pub const fn sequence_bits(&self) -> u32 {
        self.sequence_bits
    }

    /// Returns the largest datacenter ID this layout supports.
    #[inline]
    pub const fn max_datacenter_id(&self) -> u64 {
        (1 << self.datacenter_id_bits) - 1
    }

    /// Returns the largest worker ID this layout supports.
    #[inline]
    pub const fn max_worker_id(&self) -> u64 {
        (1 << self.worker_id_bits) - 1
    }

    /// Returns the mask covering the sequence field, which is also the largest sequence number.
    #[inline]
    pub const fn sequence_mask(&self) -> u64 {
        (1 << self.sequence_bits) - 1
    }

    #[inline]
    const fn worker_id_shift(&self) -> u32 {
        self.sequence_bits
    }

    #[inline]
    const fn datacenter_id_shift(&self) -> u32 {
        self.sequence_bits + self.worker_id_bits
    }

    #[inline]
    const fn timestamp_shift(&self) -> u32 {
        self.sequence_bits + self.worker_id_bits + self.datacenter_id_bits
    }

    /// Returns whether the given epoch-relative timestamp exceeds the bits this layout dedicates to timestamps.
    #[inline]
    pub const fn exceeds_timestamp(&self, timestamp: u64) -> bool {
        timestamp >= 1 << self.timestamp_bits()
    }

    /// Combines the given fields into the integer representation of an ID.
    ///
    /// `timestamp` is relative to this layout's epoch. Every field must fit its configured width. Generators verify
    /// the constant fields at construction and keep the sequence in range by masking, so an out-of-range value here
    /// indicates a bug rather than bad input; this asserts instead of returning an error.
    #[inline]
    pub(crate) fn compose(&self, timestamp: u64, datacenter_id: u64, worker_id: u64, sequence: u64) -> u64 {
        assert!(
            !self.exceeds_timestamp(timestamp)
                && datacenter_id <= self.max_datacenter_id()
                && worker_id <= self.max_worker_id()
                && sequence <= self.sequence_mask()
        );
        (timestamp << self.timestamp_shift())
            | (datacenter_id << self.datacenter_id_shift())
            | (worker_id << self.worker_id_shift())
            | sequence
    }

    /// Returns the timestamp stored in the given ID, in milliseconds since this layout's epoch.
    #[inline]
    pub const fn timestamp(&self, raw: u64) -> u64 {
        raw >> self.timestamp_shift()
    }

    /// Returns the datacenter ID stored in the given ID.
    #[inline]
    pub const fn datacenter_id(&self, raw: u64) -> u64 {
        (raw >> self.datacenter_id_shift()) & self.max_datacenter_id()
    }

    /// Returns the worker ID stored in the given ID.
    #[inline]
    pub const fn worker_id(&self, raw: u64) -> u64 {
        (raw >> self.worker_id_shift()) & self.max_worker_id()
    }

    /// Returns the sequence number stored in the given ID.
    #[inline]
    pub const fn sequence(&self, raw: u64) -> u64 {
        raw & self.sequence_mask()
    }
}

impl Default for Layout {
    /// Returns the [classic](Self::classic) layout.
    fn default() -> Self {
        Self::classic()
    }
}

// End skip coverage
