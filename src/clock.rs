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

//! The wall-clock source consumed by [`Generator`](crate::Generator).

use std::time::{SystemTime, UNIX_EPOCH};

/// A millisecond-precision wall-clock source.
///
/// The clock is a generator's only environmental input, so it's behind a trait: production code uses [`SystemClock`],
/// while tests can script clock regressions or freeze time to exhaust the sequence space deterministically. The
/// generator tolerates a non-monotonic implementation - that's exactly the condition
/// [`Error::ClockMovedBackwards`](crate::Error::ClockMovedBackwards) reports - but all uniqueness guarantees assume
/// that the clock eventually advances.
pub trait Clock {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> u64;
}

/// The [`Clock`] implementation backed by [`SystemTime`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_millis(&self) -> u64 {
        // A system time before the Unix epoch is reported as 0; generators surface it as a configuration error or
        // clock regression rather than panicking here.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis() as u64)
    }
}

// End skip coverage
