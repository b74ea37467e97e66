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

//! Behavioural tests for [`Generator`] - uniqueness, ordering, decoding, and the clock edge cases.

use snowgen::{Clock, Error, Generator, Layout};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

/// A clock that replays a scripted list of readings and then repeats the last one.
struct ScriptedClock {
    readings: Vec<u64>,
    next: AtomicUsize,
}

impl ScriptedClock {
    fn new(readings: impl Into<Vec<u64>>) -> Self {
        Self {
            readings: readings.into(),
            next: AtomicUsize::new(0),
        }
    }
}

impl Clock for ScriptedClock {
    fn current_millis(&self) -> u64 {
        let index = self.next.fetch_add(1, Ordering::Relaxed);
        self.readings[index.min(self.readings.len() - 1)]
    }
}

/// A clock that reports a fixed time for a bounded number of readings and then advances by one millisecond.
///
/// This simulates sequence exhaustion: the generator observes a frozen clock for `budget` readings, after which the
/// "next millisecond" begins and its spin-wait can make progress.
struct FrozenClock {
    millis: u64,
    budget: AtomicUsize,
}

impl FrozenClock {
    fn new(millis: u64, budget: usize) -> Self {
        Self {
            millis,
            budget: AtomicUsize::new(budget),
        }
    }
}

impl Clock for FrozenClock {
    fn current_millis(&self) -> u64 {
        let remaining = self.budget.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |remaining| {
            remaining.checked_sub(1)
        });
        match remaining {
            Ok(_) => self.millis,
            Err(_) => self.millis + 1,
        }
    }
}

/// A layout with the default field widths but an epoch of 0, so scripted clock readings map directly to timestamps.
fn test_layout() -> Layout {
    Layout::new(0, 5, 5, 12).unwrap()
}

#[test]
fn ids_are_unique_and_decode_to_the_configuration() {
    let generator = Generator::new(1, 1).unwrap();
    assert_eq!(1, generator.worker_id());
    assert_eq!(1, generator.datacenter_id());
    let layout = *generator.layout();

    let mut seen = HashSet::new();
    let mut last_timestamp = 0;
    for _ in 0..5000 {
        let id = generator.next_id().unwrap();
        assert!(seen.insert(id), "generator repeated {id}");
        assert_eq!(1, layout.worker_id(id.get()));
        assert_eq!(1, layout.datacenter_id(id.get()));
        let timestamp = layout.timestamp(id.get());
        assert!(timestamp >= last_timestamp, "timestamp component went backwards");
        last_timestamp = timestamp;
    }
    assert_eq!(5000, seen.len());
}

#[test]
fn successive_ids_are_strictly_increasing() {
    let generator = Generator::new(7, 3).unwrap();
    let mut previous = generator.next_id().unwrap();
    for _ in 0..1000 {
        let id = generator.next_id().unwrap();
        assert!(id > previous);
        previous = id;
    }
}

#[test]
fn concurrent_callers_share_one_instance() {
    let generator = Generator::new(2, 2).unwrap();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let generator = generator.clone();
            thread::spawn(move || (0..2000).map(|_| generator.next_id().unwrap()).collect::<Vec<_>>())
        })
        .collect();

    let mut seen = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(seen.insert(id), "two threads received {id}");
        }
    }
    assert_eq!(8000, seen.len());
}

#[test]
fn distinct_instances_never_collide() {
    // The worker/datacenter bits alone keep the ID sets disjoint - the two generators share no state and run
    // concurrently on purpose
    let first = Generator::new(1, 0).unwrap();
    let second = Generator::new(2, 0).unwrap();
    let worker = |generator: Generator| {
        thread::spawn(move || (0..2000).map(|_| generator.next_id().unwrap()).collect::<HashSet<_>>())
    };
    let first_ids = worker(first);
    let second_ids = worker(second);
    let first_ids = first_ids.join().unwrap();
    let second_ids = second_ids.join().unwrap();
    assert!(first_ids.is_disjoint(&second_ids));
}

#[test]
fn construction_validates_worker_id_bounds() {
    // One past the maximum fails, the maximum itself succeeds
    assert_eq!(
        Err(Error::WorkerIdOutOfRange { worker_id: 32, max: 31 }),
        Generator::new(32, 0).map(|_| ())
    );
    assert!(Generator::new(31, 0).is_ok());

    assert_eq!(
        Err(Error::DatacenterIdOutOfRange { datacenter_id: 32, max: 31 }),
        Generator::new(0, 32).map(|_| ())
    );
    assert!(Generator::new(0, 31).is_ok());
}

#[test]
fn construction_validates_custom_layout_bounds() {
    let layout = Layout::new(0, 2, 3, 12).unwrap();
    assert!(Generator::with_layout(layout, 7, 3).is_ok());
    assert_eq!(
        Err(Error::WorkerIdOutOfRange { worker_id: 8, max: 7 }),
        Generator::with_layout(layout, 8, 3).map(|_| ())
    );
    assert_eq!(
        Err(Error::DatacenterIdOutOfRange { datacenter_id: 4, max: 3 }),
        Generator::with_layout(layout, 7, 4).map(|_| ())
    );
}

#[test]
fn construction_rejects_future_epochs() {
    let clock = ScriptedClock::new([1000]);
    let layout = Layout::new(2000, 5, 5, 12).unwrap();
    assert_eq!(
        Err(Error::EpochInFuture { epoch: 2000, now: 1000 }),
        Generator::with_clock(layout, 0, 0, clock).map(|_| ())
    );
}

#[test]
fn clock_regression_is_an_error() {
    // One reading for the constructor's epoch check, one for the first ID, and a smaller one after that
    let clock = ScriptedClock::new([500, 500, 400]);
    let generator = Generator::with_clock(test_layout(), 1, 1, clock).unwrap();

    let id = generator.next_id().unwrap();
    assert_eq!(500, generator.layout().timestamp(id.get()));
    assert_eq!(
        Err(Error::ClockMovedBackwards { millis: 100 }),
        generator.next_id()
    );
}

#[test]
fn clock_recovery_after_regression() {
    let clock = ScriptedClock::new([500, 500, 400, 501]);
    let generator = Generator::with_clock(test_layout(), 1, 1, clock).unwrap();

    let first = generator.next_id().unwrap();
    assert!(generator.next_id().is_err());
    // Once the clock has caught up again, the caller's retry succeeds and ordering is preserved
    let second = generator.next_id().unwrap();
    assert!(second > first);
}

#[test]
fn same_millisecond_ids_share_the_timestamp() {
    // The constructor consumes the first reading; the next three are for IDs
    let clock = ScriptedClock::new([42, 42, 42, 42]);
    let generator = Generator::with_clock(test_layout(), 1, 1, clock).unwrap();
    let layout = *generator.layout();

    for expected_sequence in 0..3 {
        let id = generator.next_id().unwrap();
        assert_eq!(42, layout.timestamp(id.get()));
        assert_eq!(expected_sequence, layout.sequence(id.get()));
    }
}

#[test]
fn sequence_exhaustion_spins_into_the_next_millisecond() {
    // Readings: 1 for the constructor, 4096 for the IDs of the first millisecond, and 1 for the 4097th call's initial
    // reading (which observes the wrap). Every reading after that reports the next millisecond, so the spin-wait
    // terminates on its first retry.
    let clock = FrozenClock::new(1000, 1 + 4096 + 1);
    let generator = Generator::with_clock(test_layout(), 1, 1, clock).unwrap();
    let layout = *generator.layout();

    let mut seen = HashSet::new();
    for expected_sequence in 0..4096 {
        let id = generator.next_id().unwrap();
        assert_eq!(1000, layout.timestamp(id.get()));
        assert_eq!(expected_sequence, layout.sequence(id.get()));
        assert!(seen.insert(id));
    }

    // The 4097th ID must come from the next millisecond with a fresh sequence - never a repeated
    // (timestamp, sequence) pair
    let id = generator.next_id().unwrap();
    assert_eq!(1001, layout.timestamp(id.get()));
    assert_eq!(0, layout.sequence(id.get()));
    assert!(seen.insert(id));
}

#[test]
fn zero_width_fields_are_fixed_to_zero() {
    let layout = Layout::new(0, 0, 0, 12).unwrap();
    let generator = Generator::with_clock(layout, 0, 0, ScriptedClock::new([7, 7])).unwrap();
    let id = generator.next_id().unwrap();
    assert_eq!(7, layout.timestamp(id.get()));
    assert_eq!(0, layout.worker_id(id.get()));
    assert_eq!(0, layout.datacenter_id(id.get()));
}
