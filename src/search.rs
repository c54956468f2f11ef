//! The search controller: drives candidates through the oracle and turns the
//! sweep into exactly one [`SearchResult`].

use std::time::{Duration, Instant, SystemTime};

use rayon::ThreadPool;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::error::{Error, Result};
use crate::generator::SearchSpace;
use crate::oracle::{Oracle, Verdict};
use crate::progress::ProgressSnapshot;

/// Terminal state of a search run.
#[derive(Debug)]
pub enum Outcome {
    /// The oracle confirmed this password.
    Found { password: String },
    /// Every candidate in the space was tested; none matched.
    Exhausted,
    /// The archive itself failed; the sweep did not complete.
    Aborted { cause: Error },
}

/// Summary of one completed search run. Produced exactly once per run.
#[derive(Debug)]
pub struct SearchResult {
    pub outcome: Outcome,
    pub attempts: u64,
    pub elapsed: Duration,
    pub started_at: SystemTime,
}

impl SearchResult {
    /// The recovered password, present only for [`Outcome::Found`].
    pub fn password(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Found { password } => Some(password),
            _ => None,
        }
    }
}

/// Drives a [`SearchSpace`] through an [`Oracle`] until the password is found,
/// the space is exhausted, or the archive fails structurally.
pub struct SearchController {
    space: SearchSpace,
    interval: u64,
}

impl SearchController {
    pub fn new(space: SearchSpace, interval: u64) -> Self {
        Self {
            space,
            // An interval of 0 would make the cadence check divide by zero.
            interval: interval.max(1),
        }
    }

    pub fn space(&self) -> &SearchSpace {
        &self.space
    }

    /// Sequential sweep: one candidate at a time, in enumeration order.
    ///
    /// `report` is invoked every `interval` attempts and never otherwise, so
    /// the hot loop stays free of formatting work. Attempts count oracle
    /// verdicts only; a structural failure aborts without counting.
    pub fn run<O: Oracle>(
        &self,
        oracle: &mut O,
        mut report: impl FnMut(&ProgressSnapshot),
    ) -> SearchResult {
        let started_at = SystemTime::now();
        let start = Instant::now();
        let total = self.space.total();

        let mut attempts: u64 = 0;
        let mut buffer = String::new();

        for index in 0..total {
            self.space.candidate_at(index, &mut buffer);
            match oracle.test(&buffer) {
                Ok(Verdict::Wrong) => {
                    attempts += 1;
                    if attempts % self.interval == 0 {
                        report(&ProgressSnapshot::new(
                            attempts,
                            total,
                            start.elapsed(),
                            &buffer,
                        ));
                    }
                }
                Ok(Verdict::Correct) => {
                    attempts += 1;
                    return SearchResult {
                        outcome: Outcome::Found { password: buffer },
                        attempts,
                        elapsed: start.elapsed(),
                        started_at,
                    };
                }
                Err(cause) => {
                    return SearchResult {
                        outcome: Outcome::Aborted { cause },
                        attempts,
                        elapsed: start.elapsed(),
                        started_at,
                    };
                }
            }
        }

        SearchResult {
            outcome: Outcome::Exhausted,
            attempts,
            elapsed: start.elapsed(),
            started_at,
        }
    }

    /// Sharded sweep over a rayon pool.
    ///
    /// The index space is split into contiguous chunks; each worker builds its
    /// own oracle via `make_oracle` (codec handles are not shareable across
    /// threads). The attempt counter is atomic, the FOUND transition is a
    /// compare-and-set so exactly one worker claims the result, and every
    /// worker checks the claim flag between candidates and stops issuing
    /// oracle calls once it is raised.
    pub fn run_sharded<O, F, R>(
        &self,
        pool: &ThreadPool,
        make_oracle: F,
        report: R,
    ) -> SearchResult
    where
        O: Oracle + Send,
        F: Fn() -> Result<O> + Sync,
        R: Fn(&ProgressSnapshot) + Sync,
    {
        let started_at = SystemTime::now();
        let start = Instant::now();
        let total = self.space.total();
        let interval = self.interval;

        // Chunk size balances worker utilization and keeps the claim flag
        // checked often enough for prompt cancellation.
        let chunk_size = std::cmp::max(1000, total / (pool.current_num_threads() as u64 * 4).max(1));
        let num_chunks = total.div_ceil(chunk_size);

        let attempts = AtomicU64::new(0);
        let claimed = AtomicBool::new(false);

        let search = pool.install(|| {
            (0..num_chunks).into_par_iter().find_map_any(|chunk_index| {
                if claimed.load(Ordering::Acquire) {
                    return None;
                }

                let mut oracle = match make_oracle() {
                    Ok(oracle) => oracle,
                    Err(cause) => {
                        claimed.store(true, Ordering::Release);
                        return Some(Err(cause));
                    }
                };

                let first = chunk_index * chunk_size;
                let last = std::cmp::min(first + chunk_size, total);
                let mut buffer = String::new();

                for index in first..last {
                    if claimed.load(Ordering::Acquire) {
                        return None;
                    }

                    self.space.candidate_at(index, &mut buffer);
                    match oracle.test(&buffer) {
                        Ok(Verdict::Wrong) => {
                            let tested = attempts.fetch_add(1, Ordering::Relaxed) + 1;
                            if tested % interval == 0 {
                                report(&ProgressSnapshot::new(
                                    tested,
                                    total,
                                    start.elapsed(),
                                    &buffer,
                                ));
                            }
                        }
                        Ok(Verdict::Correct) => {
                            if claimed
                                .compare_exchange(
                                    false,
                                    true,
                                    Ordering::AcqRel,
                                    Ordering::Acquire,
                                )
                                .is_ok()
                            {
                                attempts.fetch_add(1, Ordering::Relaxed);
                                return Some(Ok(buffer.clone()));
                            }
                            // Another worker already claimed the result.
                            return None;
                        }
                        Err(cause) => {
                            claimed.store(true, Ordering::Release);
                            return Some(Err(cause));
                        }
                    }
                }
                None
            })
        });

        let attempts = attempts.load(Ordering::Relaxed);
        let elapsed = start.elapsed();

        match search {
            Some(Ok(password)) => SearchResult {
                outcome: Outcome::Found { password },
                attempts,
                elapsed,
                started_at,
            },
            Some(Err(cause)) => SearchResult {
                outcome: Outcome::Aborted { cause },
                attempts,
                elapsed,
                started_at,
            },
            None => SearchResult {
                outcome: Outcome::Exhausted,
                attempts,
                elapsed,
                started_at,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Oracle scripted to accept exactly one designated password, or none.
    struct ScriptedOracle {
        target: Option<&'static str>,
    }

    impl Oracle for ScriptedOracle {
        fn test(&mut self, candidate: &str) -> Result<Verdict> {
            if self.target == Some(candidate) {
                Ok(Verdict::Correct)
            } else {
                Ok(Verdict::Wrong)
            }
        }
    }

    /// Oracle whose archive is broken from the first call.
    struct BrokenOracle;

    impl Oracle for BrokenOracle {
        fn test(&mut self, _candidate: &str) -> Result<Verdict> {
            Err(Error::EmptyArchive)
        }
    }

    fn controller(alphabet: &str, length: usize) -> SearchController {
        SearchController::new(SearchSpace::new(alphabet, length).unwrap(), 1000)
    }

    #[test]
    fn finds_target_at_its_enumeration_position() {
        // Order over {a,b} x 2 is [aa, ab, ba, bb]; "ba" sits third.
        let result = controller("ab", 2).run(&mut ScriptedOracle { target: Some("ba") }, |_| {});
        assert_eq!(result.password(), Some("ba"));
        assert_eq!(result.attempts, 3);
    }

    #[test]
    fn attempts_equal_one_based_index_of_target() {
        // "cb" = index 2*3 + 1 = 7 in {a,b,c} x 2, so the 8th attempt hits.
        let result = controller("abc", 2).run(&mut ScriptedOracle { target: Some("cb") }, |_| {});
        assert_eq!(result.password(), Some("cb"));
        assert_eq!(result.attempts, 8);
    }

    #[test]
    fn exhausts_the_space_when_nothing_matches() {
        let result = controller("ab", 2).run(&mut ScriptedOracle { target: None }, |_| {});
        assert!(matches!(result.outcome, Outcome::Exhausted));
        assert_eq!(result.attempts, 4);
    }

    #[test]
    fn aborts_without_counting_on_first_call_structural_failure() {
        let result = controller("ab", 2).run(&mut BrokenOracle, |_| {});
        assert!(matches!(
            result.outcome,
            Outcome::Aborted {
                cause: Error::EmptyArchive
            }
        ));
        assert_eq!(result.attempts, 0);
        assert_eq!(result.password(), None);
    }

    #[test]
    fn reports_on_cadence_and_only_on_cadence() {
        let space = SearchSpace::new("ab", 3).unwrap();
        let controller = SearchController::new(space, 3);

        let mut seen = Vec::new();
        let result = controller.run(&mut ScriptedOracle { target: None }, |snapshot| {
            seen.push((snapshot.attempts, snapshot.candidate.clone()));
        });

        assert_eq!(result.attempts, 8);
        // 8 attempts at interval 3: reports fire at attempts 3 and 6.
        assert_eq!(seen, vec![(3, "aba".to_owned()), (6, "bab".to_owned())]);
    }

    #[test]
    fn sharded_run_agrees_with_sequential_on_the_password() {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(2)
            .build()
            .unwrap();

        let controller = controller("ab", 4);
        let result = controller.run_sharded(
            &pool,
            || Ok(ScriptedOracle { target: Some("baba") }),
            |_| {},
        );

        assert_eq!(result.password(), Some("baba"));
        assert!(result.attempts >= 1);
        assert!(result.attempts <= controller.space().total());
    }

    #[test]
    fn sharded_exhaustion_counts_every_candidate_exactly_once() {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(2)
            .build()
            .unwrap();

        let controller = controller("ab", 4);
        let result =
            controller.run_sharded(&pool, || Ok(ScriptedOracle { target: None }), |_| {});

        assert!(matches!(result.outcome, Outcome::Exhausted));
        assert_eq!(result.attempts, 16);
    }

    #[test]
    fn sharded_run_aborts_when_a_worker_cannot_open_the_archive() {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(2)
            .build()
            .unwrap();

        let controller = controller("ab", 2);
        let result = controller.run_sharded(
            &pool,
            || -> Result<ScriptedOracle> { Err(Error::NotEncrypted) },
            |_| {},
        );

        assert!(matches!(
            result.outcome,
            Outcome::Aborted {
                cause: Error::NotEncrypted
            }
        ));
    }
}
