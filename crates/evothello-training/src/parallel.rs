//! Bounded worker pool with statically partitioned work.
//!
//! The match list of a generation is split round-robin by worker rank;
//! each worker owns its slots outright, so no locking is needed and the
//! scope join forms the synchronous generation boundary. Every worker
//! carries its own RNG stream, seeded once at startup, keeping random
//! draws independent across threads.

use std::thread;

use rand::SeedableRng as _;
use rand_pcg::Pcg64Mcg;

/// Runs `f(index, rng, task)` over every task, partitioned round-robin
/// across `worker_count` threads.
///
/// With `seed` set, worker `rank` gets the deterministic stream
/// `Pcg64Mcg::seed_from_u64(seed + rank)`; combined with the fixed
/// partition this makes the whole evaluation reproducible. Without a seed
/// each worker draws its stream from OS entropy.
///
/// Returns only after every worker finished.
///
/// # Panics
///
/// Panics if `worker_count` is zero, or if any worker panics.
pub fn for_each_partitioned<T, F>(worker_count: usize, seed: Option<u64>, tasks: &mut [T], f: F)
where
    T: Send,
    F: Fn(usize, &mut Pcg64Mcg, &mut T) + Sync,
{
    assert!(worker_count > 0, "worker pool needs at least one worker");

    let mut buckets: Vec<Vec<(usize, &mut T)>> =
        (0..worker_count).map(|_| Vec::new()).collect();
    for (index, task) in tasks.iter_mut().enumerate() {
        buckets[index % worker_count].push((index, task));
    }

    thread::scope(|scope| {
        for (rank, bucket) in buckets.into_iter().enumerate() {
            let f = &f;
            scope.spawn(move || {
                let mut rng = match seed {
                    Some(seed) => Pcg64Mcg::seed_from_u64(seed.wrapping_add(rank as u64)),
                    None => Pcg64Mcg::from_os_rng(),
                };
                for (index, task) in bucket {
                    f(index, &mut rng, task);
                }
            });
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_slot_is_visited_exactly_once() {
        let mut slots = vec![0_u32; 103];
        for_each_partitioned(4, Some(1), &mut slots, |_, _, slot| {
            *slot += 1;
        });
        assert!(slots.iter().all(|s| *s == 1));
    }

    #[test]
    fn test_index_matches_slot() {
        let mut slots: Vec<usize> = vec![usize::MAX; 57];
        for_each_partitioned(3, None, &mut slots, |index, _, slot| {
            *slot = index;
        });
        let expected: Vec<usize> = (0..57).collect();
        assert_eq!(slots, expected);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let run = || {
            let mut slots = vec![0_u64; 40];
            for_each_partitioned(5, Some(99), &mut slots, |_, rng, slot| {
                use rand::Rng as _;
                *slot = rng.random();
            });
            slots
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_worker_streams_differ() {
        let mut slots = vec![0_u64; 8];
        for_each_partitioned(8, Some(7), &mut slots, |_, rng, slot| {
            use rand::Rng as _;
            *slot = rng.random();
        });
        let mut unique = slots.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), slots.len());
    }

    #[test]
    fn test_more_workers_than_tasks() {
        let mut slots = vec![0_u32; 2];
        for_each_partitioned(16, Some(3), &mut slots, |_, _, slot| {
            *slot += 1;
        });
        assert_eq!(slots, vec![1, 1]);
    }
}
