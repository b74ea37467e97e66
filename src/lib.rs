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

//! This crate is an implementation of snowflake IDs - 64-bit identifiers that are unique across all nodes of a
//! cluster without requiring any coordination between the nodes at runtime.
//!
//! Every ID packs a millisecond timestamp (relative to a fixed [epoch](Layout::epoch)), a datacenter ID, a worker ID,
//! and a sequence number that distinguishes IDs generated within the same millisecond. With the default
//! [layout](Layout::classic), an ID consists of a constant `0` sign bit, 41 timestamp bits, 5 datacenter ID bits,
//! 5 worker ID bits, and 12 sequence bits. As long as every process in the deployment uses a distinct
//! `(datacenter ID, worker ID)` pair, the IDs it generates can't collide with IDs generated elsewhere - uniqueness is
//! burned into the constant bits rather than negotiated over the network.
//!
//! [`Generator`] is safe to share between threads: the comparison and update of its `(timestamp, sequence)` state
//! happen in a single critical section, so two concurrent callers never observe the same pair. IDs generated by one
//! instance are strictly increasing as long as the system clock doesn't move backwards. If it does move backwards,
//! [`Generator::next_id`] refuses to generate an ID and returns [`Error::ClockMovedBackwards`] instead of silently
//! waiting out the regression or handing out a duplicate.
//!
//! # Example
//!
//! ```
//! use snowgen::{Generator, Layout};
//!
//! let generator = Generator::new(1, 1)?;
//! let first = generator.next_id()?;
//! let second = generator.next_id()?;
//! assert!(first < second);
//!
//! // Every ID decodes back to the generator's configuration
//! let layout = Layout::classic();
//! assert_eq!(1, layout.worker_id(first.get()));
//! assert_eq!(1, layout.datacenter_id(first.get()));
//! # Ok::<(), snowgen::Error>(())
//! ```
//!
//! # Sharing a generator
//!
//! This crate deliberately doesn't provide a process-wide default instance. Hidden global state makes it impossible
//! to test code with a fresh generator and obscures which `(datacenter ID, worker ID)` pair a deployment actually
//! uses. If your application wants a single shared generator, construct it once at the application boundary and pass
//! it (or a clone - clones share their state) to the code that needs it:
//!
//! ```
//! use snowgen::Generator;
//! use std::sync::OnceLock;
//!
//! fn generator() -> &'static Generator {
//!     static GENERATOR: OnceLock<Generator> = OnceLock::new();
//!     // The IDs are constants well within the default layout's range, so this can't fail
//!     GENERATOR.get_or_init(|| Generator::new(0, 0).expect("valid generator configuration"))
//! }
//!
//! let id = generator().next_id()?;
//! # Ok::<(), snowgen::Error>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod clock;
mod generator;
mod id;
mod layout;

pub use clock::{Clock, SystemClock};
pub use generator::Generator;
pub use id::SnowflakeId;
pub use layout::{Layout, DEFAULT_EPOCH};

use std::fmt::{Display, Formatter};

/// Errors that can occur when configuring a generator or generating a [`SnowflakeId`].
///
/// The configuration variants ([`WorkerIdOutOfRange`](Self::WorkerIdOutOfRange),
/// [`DatacenterIdOutOfRange`](Self::DatacenterIdOutOfRange), [`InvalidLayout`](Self::InvalidLayout), and
/// [`EpochInFuture`](Self::EpochInFuture)) are reported when a [`Layout`] or [`Generator`] is constructed and
/// indicate that the configuration must be fixed - retrying won't help. The only runtime failure of
/// [`Generator::next_id`] is [`ClockMovedBackwards`](Self::ClockMovedBackwards); whether to retry after a delay,
/// alert, or abort is a caller decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The worker ID passed to a generator constructor doesn't fit the layout's worker ID bits.
    WorkerIdOutOfRange {
        /// The rejected worker ID.
        worker_id: u64,
        /// The largest worker ID the layout supports; the valid range is `0..=max`.
        max: u64,
    },
    /// The datacenter ID passed to a generator constructor doesn't fit the layout's datacenter ID bits.
    DatacenterIdOutOfRange {
        /// The rejected datacenter ID.
        datacenter_id: u64,
        /// The largest datacenter ID the layout supports; the valid range is `0..=max`.
        max: u64,
    },
    /// The requested bit widths don't leave any room for the timestamp.
    ///
    /// The datacenter ID, worker ID, and sequence bits must leave at least one timestamp bit after reserving the
    /// constant sign bit. I.e., their sum must not exceed 62.
    InvalidLayout {
        /// The combined width of the datacenter ID, worker ID, and sequence fields.
        bits: u32,
    },
    /// The layout's epoch is in the future.
    ///
    /// Timestamps are stored relative to the epoch, so the epoch preceding every moment the generator runs is a
    /// construction-time requirement.
    EpochInFuture {
        /// The layout's epoch in milliseconds since the Unix epoch.
        epoch: u64,
        /// The wall-clock time observed during construction in milliseconds since the Unix epoch.
        now: u64,
    },
    /// The system clock moved backwards.
    ///
    /// The generator refuses to generate an ID for a timestamp it has already issued IDs for, as that could produce
    /// duplicates. This error carries the magnitude of the regression; the generator doesn't wait out the regression
    /// itself, as that could block callers for an unbounded amount of time and mask a serious host-level problem.
    ClockMovedBackwards {
        /// The number of milliseconds the clock went backwards.
        millis: u64,
    },
    /// The integer representation passed to [`SnowflakeId::from_raw`] isn't a valid snowflake ID.
    ///
    /// Every layout reserves the sign bit as a constant `0`, so an integer with the most significant bit set can't
    /// have been produced by a generator.
    InvalidId,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::WorkerIdOutOfRange { worker_id, max } => {
                write!(f, "invalid worker ID {worker_id} - the valid range is 0..={max}")
            }
            Error::DatacenterIdOutOfRange { datacenter_id, max } => {
                write!(f, "invalid datacenter ID {datacenter_id} - the valid range is 0..={max}")
            }
            Error::InvalidLayout { bits } => {
                write!(
                    f,
                    "invalid layout - {bits} datacenter, worker, and sequence bits leave no room for the timestamp"
                )
            }
            Error::EpochInFuture { epoch, now } => {
                write!(f, "the epoch ({epoch} ms) is in the future (the clock reports {now} ms)")
            }
            Error::ClockMovedBackwards { millis } => {
                write!(f, "clock moved backwards - refusing to generate an ID for {millis} milliseconds")
            }
            Error::InvalidId => {
                write!(f, "the integer representation is not a valid snowflake ID")
            }
        }
    }
}

impl std::error::Error for Error {}

/// The primary result type of this crate.
pub type Result<T> = std::result::Result<T, Error>;

// End skip coverage
