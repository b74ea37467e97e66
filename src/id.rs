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

//! The snowflake ID value type.

use crate::{Error, Result};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A snowflake ID.
///
/// IDs are 64-bit integers combining a timestamp, a datacenter ID, a worker ID, and a sequence number. They are
/// * unique (no two generators with distinct `(datacenter ID, worker ID)` pairs can produce the same ID, and a single
///   generator never repeats itself), and
/// * roughly time-ordered (an ID generated after another ID by the same generator is greater).
///
/// This type is a thin wrapper around the integer representation: it provides ordering, display, and (de)serialization
/// but deliberately no field access, since decoding requires knowing the [`Layout`](crate::Layout) the ID was
/// generated with. Use the layout's [`timestamp`](crate::Layout::timestamp),
/// [`datacenter_id`](crate::Layout::datacenter_id), [`worker_id`](crate::Layout::worker_id), and
/// [`sequence`](crate::Layout::sequence) methods on [`get`](Self::get)'s result to take an ID apart.
///
/// # Example
///
/// ```
/// use snowgen::{Generator, Layout, SnowflakeId};
///
/// let generator = Generator::new(3, 1)?;
/// let id = generator.next_id()?;
///
/// // IDs survive a trip through their decimal representation
/// let parsed: u64 = id.to_string().parse().unwrap();
/// assert_eq!(id, SnowflakeId::from_raw(parsed)?);
///
/// // The sign bit is guaranteed to be 0, so the signed conversion is lossless
/// assert!(id.get_i64() >= 0);
/// # Ok::<(), snowgen::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[repr(transparent)]
pub struct SnowflakeId(u64);

impl SnowflakeId {
    /// Wraps an integer representation produced by a generator.
    #[inline]
    pub(crate) const fn from_parts(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the ID for the given integer representation.
    ///
    /// Every layout reserves the most significant bit as a constant `0`, so this returns [`Error::InvalidId`] if the
    /// given integer has its sign bit set. No further validation is possible without the deployment's
    /// [`Layout`](crate::Layout).
    pub fn from_raw(raw: u64) -> Result<Self> {
        if raw >= 1 << 63 {
            return Err(Error::InvalidId);
        }
        Ok(Self(raw))
    }

    /// Returns the integer representation of this ID.
    #[inline]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Returns this ID as a positive signed integer.
    ///
    /// The constant `0` sign bit makes this conversion lossless, so IDs can be stored in signed 64-bit database
    /// columns without losing their ordering.
    #[inline]
    pub const fn get_i64(&self) -> i64 {
        self.0 as i64
    }
}

impl Display for SnowflakeId {
    /// Displays the ID as a decimal-encoded integer.
    ///
    /// You can losslessly convert this method's output back into the same ID.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<SnowflakeId> for u64 {
    fn from(id: SnowflakeId) -> Self {
        id.get()
    }
}

// End skip coverage
