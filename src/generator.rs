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

//! The thread-safe snowflake ID generator.

use crate::{Clock, Error, Layout, Result, SnowflakeId, SystemClock};
use std::hint;
use std::sync::{Arc, Mutex};

/// A thread-safe snowflake ID generator for a fixed `(datacenter ID, worker ID)` pair.
///
/// The generator owns the mutable `(timestamp, sequence)` state all IDs are derived from. Within one millisecond it
/// hands out ascending sequence numbers; when the clock advances it resets the sequence; and when the sequence space
/// of a millisecond is exhausted it briefly spins until the next millisecond begins. The whole decision runs in a
/// single critical section, so concurrent callers never receive the same ID.
///
/// Two generators with distinct `(datacenter ID, worker ID)` pairs never need to coordinate: their constant bits
/// already keep their ID sets disjoint. Constructors validate that both IDs fit the layout's bit widths and return a
/// configuration error otherwise, so an invalid deployment fails at startup rather than at request time.
///
/// Cloning a generator is cheap and yields another handle on the *same* instance (the state is shared), which makes
/// it easy to hand one generator to multiple threads.
///
/// # Example
///
/// ```
/// use snowgen::Generator;
/// use std::collections::HashSet;
/// use std::thread;
///
/// let generator = Generator::new(1, 0)?;
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let generator = generator.clone();
///         thread::spawn(move || (0..100).map(|_| generator.next_id().unwrap()).collect::<Vec<_>>())
///     })
///     .collect();
///
/// let mut seen = HashSet::new();
/// for handle in handles {
///     for id in handle.join().unwrap() {
///         assert!(seen.insert(id));
///     }
/// }
/// # Ok::<(), snowgen::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Generator<C = SystemClock>
where
    C: Clock,
{
    layout: Layout,
    datacenter_id: u64,
    worker_id: u64,
    // We use the regular `Mutex` from the standard library here, as the critical section is short and never held
    // across any suspension point
    state: Arc<Mutex<State>>,
    clock: C,
}

#[derive(Debug)]
struct State {
    /// The wall-clock milliseconds of the most recently issued ID, or 0 if no ID has been issued yet.
    ///
    /// 0 doubles as the never-issued sentinel because constructors verify that the layout's (positive) epoch has
    /// already passed, so every real timestamp is greater.
    last_timestamp: u64,
    sequence: u64,
}

impl Generator<SystemClock> {
    /// Creates a generator with the [classic](Layout::classic) layout and the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WorkerIdOutOfRange`] or [`Error::DatacenterIdOutOfRange`] if the respective ID doesn't fit
    /// the layout's 5-bit fields (the valid range for both is `0..=31`).
    pub fn new(worker_id: u64, datacenter_id: u64) -> Result<Self> {
        Self::with_layout(Layout::classic(), worker_id, datacenter_id)
    }

    /// Creates a generator with a custom layout and the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WorkerIdOutOfRange`] or [`Error::DatacenterIdOutOfRange`] if the respective ID doesn't fit
    /// the layout's bit widths, and [`Error::EpochInFuture`] if the layout's epoch hasn't passed yet.
    pub fn with_layout(layout: Layout, worker_id: u64, datacenter_id: u64) -> Result<Self> {
        Self::with_clock(layout, worker_id, datacenter_id, SystemClock)
    }
}

impl<C> Generator<C>
where
    C: Clock,
{
    /// Creates a generator with a custom layout and a custom [`Clock`] implementation.
    ///
    /// This constructor mainly exists for tests that need to script the clock. Production code should use
    /// [`Generator::new`] or [`Generator::with_layout`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::WorkerIdOutOfRange`] or [`Error::DatacenterIdOutOfRange`] if the respective ID doesn't fit
    /// the layout's bit widths, and [`Error::EpochInFuture`] if the layout's epoch hasn't passed according to the
    /// given clock.
    pub fn with_clock(layout: Layout, worker_id: u64, datacenter_id: u64, clock: C) -> Result<Self> {
        if worker_id > layout.max_worker_id() {
            return Err(Error::WorkerIdOutOfRange {
                worker_id,
                max: layout.max_worker_id(),
            });
        }
        if datacenter_id > layout.max_datacenter_id() {
            return Err(Error::DatacenterIdOutOfRange {
                datacenter_id,
                max: layout.max_datacenter_id(),
            });
        }
        let now = clock.current_millis();
        if layout.epoch() > now {
            return Err(Error::EpochInFuture {
                epoch: layout.epoch(),
                now,
            });
        }
        Ok(Self {
            layout,
            datacenter_id,
            worker_id,
            state: Arc::new(Mutex::new(State {
                last_timestamp: 0,
                sequence: 0,
            })),
            clock,
        })
    }

    /// Generates a new snowflake ID.
    ///
    /// The returned ID is guaranteed to be unique and greater than every ID this instance returned before, as long as
    /// the clock doesn't move backwards. If more IDs are requested within one millisecond than the layout's sequence
    /// bits can distinguish (4096 with the classic layout), this briefly spins until the next millisecond begins -
    /// sequence exhaustion is never an error.
    ///
    /// # Errors
    ///
    /// If the clock reports a time earlier than the timestamp of the last issued ID, the clock moved backwards
    /// (a clock adjustment, VM migration, or similar host-level event), and this returns
    /// [`Error::ClockMovedBackwards`] with the magnitude of the regression instead of handing out a potentially
    /// duplicate ID. The generator doesn't retry or wait internally; recovery policy belongs to the caller, who may
    /// retry once the clock has caught up.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip(self)))]
    pub fn next_id(&self) -> Result<SnowflakeId> {
        // We don't include any code in this critical section that could panic for in-range state (outside this
        // `unwrap`), so we can safely unwrap this lock
        let mut state = self.state.lock().unwrap();
        // Acquire the timestamp *after* we got the lock to be more accurate about our clock regression errors
        let mut now = self.clock.current_millis();
        if now < state.last_timestamp {
            let millis = state.last_timestamp - now;
            #[cfg(feature = "tracing")]
            tracing::warn!(millis, "clock moved backwards, refusing to generate an ID");
            return Err(Error::ClockMovedBackwards { millis });
        }
        if now == state.last_timestamp {
            // We've already issued an ID for this millisecond, so advance the sequence number. The mask makes the
            // increment wrap to 0 when the sequence space is exhausted.
            state.sequence = (state.sequence + 1) & self.layout.sequence_mask();
            if state.sequence == 0 {
                now = self.wait_until_next_millis(state.last_timestamp);
            }
        } else {
            // First ID of a fresh millisecond
            state.sequence = 0;
        }
        // The constructor verified that the epoch has passed, so this subtraction can only fail if the clock fell
        // behind the epoch again before the first ID was issued - a regression, just one that predates our state
        let timestamp = match now.checked_sub(self.layout.epoch()) {
            Some(timestamp) => timestamp,
            None => {
                return Err(Error::ClockMovedBackwards {
                    millis: self.layout.epoch() - now,
                })
            }
        };
        state.last_timestamp = now;
        Ok(SnowflakeId::from_parts(self.layout.compose(
            timestamp,
            self.datacenter_id,
            self.worker_id,
            state.sequence,
        )))
    }

    /// Spins until the clock advances past `last_timestamp` and returns the new reading.
    ///
    /// Under a functioning clock this loop terminates within a millisecond. A frozen clock keeps it spinning
    /// indefinitely; detecting that is a host-monitoring concern, not this generator's.
    fn wait_until_next_millis(&self, last_timestamp: u64) -> u64 {
        let mut now = self.clock.current_millis();
        while now <= last_timestamp {
            hint::spin_loop();
            now = self.clock.current_millis();
        }
        now
    }

    /// Returns the layout this generator packs its IDs with.
    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Returns the datacenter ID burned into every ID this generator produces.
    #[inline]
    pub fn datacenter_id(&self) -> u64 {
        self.datacenter_id
    }

    /// Returns the worker ID burned into every ID this generator produces.
    #[inline]
    pub fn worker_id(&self) -> u64 {
        self.worker_id
    }
}
