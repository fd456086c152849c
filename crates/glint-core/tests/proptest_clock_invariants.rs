//! Property-based invariant tests for the frame queue.
//!
//! ## Invariants
//!
//! 1. Every timer fires exactly once, on the first tick whose time reaches
//!    its deadline.
//! 2. Cancelled callbacks never fire.
//! 3. Timers fire in deadline order.

use std::time::Duration;

use glint_core::clock::{FrameClock, FrameQueue};
use proptest::prelude::*;

type Fired = Vec<(usize, Duration)>;

fn run(queue: &mut FrameQueue<Fired>, fired: &mut Fired, dt: Duration) {
    for (handle, callback) in queue.advance(dt) {
        if queue.begin(handle) {
            callback(fired);
        }
    }
}

fn arb_delays() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0u64..500, 0..40)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn timers_fire_once_at_or_after_deadline(
        delays in arb_delays(),
        step in 1u64..50,
    ) {
        let mut queue: FrameQueue<Fired> = FrameQueue::new();
        let mut fired = Fired::new();
        for (i, delay) in delays.iter().enumerate() {
            queue.request_timeout(
                Duration::from_millis(*delay),
                Box::new(move |f: &mut Fired| {
                    f.push((i, Duration::ZERO));
                }),
            );
        }

        let step = Duration::from_millis(step);
        let mut ticks = 0;
        while queue.pending() > 0 {
            let before = fired.len();
            run(&mut queue, &mut fired, step);
            let now = queue.now();
            for entry in &mut fired[before..] {
                entry.1 = now;
            }
            ticks += 1;
            prop_assert!(ticks < 1000);
        }

        prop_assert_eq!(fired.len(), delays.len());
        let mut seen = vec![false; delays.len()];
        for (i, at) in &fired {
            prop_assert!(!seen[*i], "timer {} fired twice", i);
            seen[*i] = true;
            let deadline = Duration::from_millis(delays[*i]);
            prop_assert!(*at >= deadline);
            prop_assert!(*at <= deadline + step);
        }
        let times: Vec<Duration> = fired.iter().map(|(i, _)| Duration::from_millis(delays[*i])).collect();
        prop_assert!(times.windows(2).all(|w| w[0] <= w[1]), "deadline order");
    }

    #[test]
    fn cancelled_timers_never_fire(
        delays in arb_delays(),
        mask in prop::collection::vec(any::<bool>(), 40),
    ) {
        let mut queue: FrameQueue<Fired> = FrameQueue::new();
        let mut fired = Fired::new();
        let mut cancelled = Vec::new();
        for (i, delay) in delays.iter().enumerate() {
            let handle = queue.request_timeout(
                Duration::from_millis(*delay),
                Box::new(move |f: &mut Fired| f.push((i, Duration::ZERO))),
            );
            if mask[i] {
                prop_assert!(queue.cancel_frame(handle));
                cancelled.push(i);
            }
        }
        run(&mut queue, &mut fired, Duration::from_secs(1));
        prop_assert_eq!(fired.len(), delays.len() - cancelled.len());
        for (i, _) in &fired {
            prop_assert!(!cancelled.contains(i));
        }
    }
}
