//! Probe sweep: every candidate URL for one surah, with bounded concurrency.
//!
//! Candidates move PENDING -> IN_FLIGHT -> DONE. At most `concurrency` probes
//! are in flight; each runs the blocking transport on the blocking pool.
//! Families are dispatched round-robin, one candidate per family per turn.
//! Within a mirror family the first `Found` wins: candidates of that family
//! not yet started are skipped. When the sweep deadline passes, in-flight
//! probes are abandoned and nothing new starts; both become `Unreachable`.

mod resolve;

pub use resolve::{resolve, ResolveRequest};

use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

use crate::candidate::Candidate;
use crate::probe::{probe, ProbeOptions, ProbeResult};
use crate::transport::{Transport, TransportErrorKind};

/// Stand-in deadline when `sweep_timeout` would overflow the clock.
const FAR_DEADLINE: Duration = Duration::from_secs(30 * 365 * 86_400);

/// Dispatch queue: families round-robin (first candidate of every family, then
/// the second, ...). Indices keep the caller's order for reporting.
fn dispatch_order(candidates: Vec<Candidate>) -> VecDeque<(usize, Candidate)> {
    let mut families: Vec<(String, VecDeque<(usize, Candidate)>)> = Vec::new();
    for (idx, candidate) in candidates.into_iter().enumerate() {
        match families.iter_mut().find(|(f, _)| *f == candidate.family) {
            Some((_, queue)) => queue.push_back((idx, candidate)),
            None => families.push((candidate.family.clone(), VecDeque::from([(idx, candidate)]))),
        }
    }
    let mut order = VecDeque::new();
    loop {
        let mut took = false;
        for (_, queue) in families.iter_mut() {
            if let Some(item) = queue.pop_front() {
                order.push_back(item);
                took = true;
            }
        }
        if !took {
            return order;
        }
    }
}

/// Sweep settings.
#[derive(Debug, Clone)]
pub struct SweepOptions {
    /// Maximum probes in flight.
    pub concurrency: usize,
    /// Deadline for the whole sweep.
    pub sweep_timeout: Duration,
    pub probe: ProbeOptions,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            concurrency: 8,
            sweep_timeout: Duration::from_secs(60),
            probe: ProbeOptions::default(),
        }
    }
}

/// A candidate and its terminal result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepEntry {
    pub candidate: Candidate,
    pub result: ProbeResult,
}

/// Everything a sweep produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepOutcome {
    /// One entry per probed (or abandoned) candidate, in candidate order.
    pub entries: Vec<SweepEntry>,
    /// Candidates not probed because their family was already found.
    pub skipped: Vec<Candidate>,
    /// True if the deadline cut the sweep short.
    pub timed_out: bool,
}

impl SweepOutcome {
    /// Entries whose URL answered Found.
    pub fn found(&self) -> impl Iterator<Item = &SweepEntry> {
        self.entries.iter().filter(|e| e.result.is_found())
    }
}

/// Probes `candidates` rendered for `surah`.
///
/// Never fails: transport errors, task failures and the deadline all end up as
/// `Unreachable` entries.
pub async fn sweep(
    transport: Arc<dyn Transport>,
    candidates: Vec<Candidate>,
    surah: u16,
    opts: &SweepOptions,
) -> SweepOutcome {
    let concurrency = opts.concurrency.max(1);
    let now = tokio::time::Instant::now();
    let deadline = now
        .checked_add(opts.sweep_timeout)
        .unwrap_or_else(|| now + FAR_DEADLINE);

    let mut pending = dispatch_order(candidates);
    let mut in_flight: HashMap<usize, Candidate> = HashMap::new();
    let mut found_families: HashSet<String> = HashSet::new();
    let mut done: Vec<(usize, SweepEntry)> = Vec::new();
    let mut skipped: Vec<Candidate> = Vec::new();
    let mut timed_out = false;
    let mut join_set = JoinSet::new();

    tracing::debug!(
        candidates = pending.len(),
        concurrency,
        surah,
        "sweep started"
    );

    loop {
        while join_set.len() < concurrency {
            let Some((idx, candidate)) = pending.pop_front() else {
                break;
            };
            if found_families.contains(&candidate.family) {
                tracing::debug!(template = %candidate.template, "skipped: family already found");
                skipped.push(candidate);
                continue;
            }
            let url = candidate.render(surah);
            let transport = Arc::clone(&transport);
            let probe_opts = opts.probe.clone();
            in_flight.insert(idx, candidate);
            join_set.spawn_blocking(move || (idx, probe(transport.as_ref(), &url, &probe_opts)));
        }

        if join_set.is_empty() {
            break;
        }

        match tokio::time::timeout_at(deadline, join_set.join_next()).await {
            Ok(Some(Ok((idx, result)))) => {
                let Some(candidate) = in_flight.remove(&idx) else {
                    continue;
                };
                if result.is_found() {
                    found_families.insert(candidate.family.clone());
                }
                done.push((idx, SweepEntry { candidate, result }));
            }
            Ok(Some(Err(e))) => {
                // The candidate stays in `in_flight` and is reported below.
                tracing::warn!("probe task failed: {}", e);
            }
            Ok(None) => break,
            Err(_) => {
                tracing::warn!(
                    in_flight = in_flight.len(),
                    pending = pending.len(),
                    "sweep deadline elapsed"
                );
                timed_out = true;
                break;
            }
        }
    }
    // Blocking probes cannot be cancelled; detach them and ignore their answers.
    join_set.detach_all();

    for (idx, candidate) in in_flight {
        let reason = if timed_out {
            "abandoned at sweep deadline"
        } else {
            "probe task failed"
        };
        let url = candidate.render(surah);
        done.push((
            idx,
            SweepEntry {
                result: ProbeResult::unreachable(url, TransportErrorKind::Timeout, reason),
                candidate,
            },
        ));
    }
    for (idx, candidate) in pending {
        if found_families.contains(&candidate.family) {
            skipped.push(candidate);
            continue;
        }
        let url = candidate.render(surah);
        done.push((
            idx,
            SweepEntry {
                result: ProbeResult::unreachable(
                    url,
                    TransportErrorKind::Timeout,
                    "not started before sweep deadline",
                ),
                candidate,
            },
        ));
    }

    done.sort_by_key(|(idx, _)| *idx);
    let outcome = SweepOutcome {
        entries: done.into_iter().map(|(_, e)| e).collect(),
        skipped,
        timed_out,
    };
    tracing::info!(
        probed = outcome.entries.len(),
        found = outcome.found().count(),
        skipped = outcome.skipped.len(),
        timed_out,
        "sweep finished"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ProbeOutcome;
    use crate::transport::{HttpRequest, HttpResponse, TransportError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// 200 for URLs containing `hit`, 404 otherwise; counts calls.
    struct HitOn {
        hit: &'static str,
        calls: Mutex<Vec<String>>,
    }

    impl Transport for HitOn {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.calls.lock().unwrap().push(request.url.clone());
            let status = if request.url.contains(self.hit) { 200 } else { 404 };
            Ok(HttpResponse {
                status,
                ..HttpResponse::default()
            })
        }
    }

    fn family(base: &str, slugs: &[&str]) -> Vec<Candidate> {
        slugs
            .iter()
            .map(|s| Candidate {
                family: base.to_string(),
                template: format!("{base}/{s}/{{n}}.mp3"),
            })
            .collect()
    }

    fn serial() -> SweepOptions {
        SweepOptions {
            concurrency: 1,
            ..SweepOptions::default()
        }
    }

    #[tokio::test]
    async fn first_found_stops_family() {
        let t = Arc::new(HitOn {
            hit: "/luhdan/",
            calls: Mutex::new(Vec::new()),
        });
        let candidates = family(
            "https://server6.mp3quran.net",
            &["lhdan", "luhdan", "al_luhaidan", "moh_alahidan"],
        );
        let out = sweep(t.clone(), candidates, 1, &serial()).await;

        assert_eq!(t.calls.lock().unwrap().len(), 2);
        assert_eq!(out.entries.len(), 2);
        assert_eq!(out.skipped.len(), 2);
        let found: Vec<&str> = out.found().map(|e| e.result.url.as_str()).collect();
        assert_eq!(found, vec!["https://server6.mp3quran.net/luhdan/001.mp3"]);
        assert!(!out.timed_out);
    }

    #[tokio::test]
    async fn other_families_keep_probing() {
        let t = Arc::new(HitOn {
            hit: "/lhdan/",
            calls: Mutex::new(Vec::new()),
        });
        let mut candidates = family("https://server6.mp3quran.net", &["lhdan", "luhdan"]);
        candidates.extend(family("https://server8.mp3quran.net", &["lhdan", "luhdan"]));
        let out = sweep(t.clone(), candidates, 1, &serial()).await;

        assert_eq!(t.calls.lock().unwrap().len(), 2);
        assert_eq!(out.found().count(), 2);
        assert_eq!(out.skipped.len(), 2);
    }

    #[tokio::test]
    async fn entries_keep_candidate_order_under_concurrency() {
        let t = Arc::new(HitOn {
            hit: "nothing-matches",
            calls: Mutex::new(Vec::new()),
        });
        let candidates = family("https://server6.mp3quran.net", &["a", "b", "c", "d", "e"]);
        let opts = SweepOptions {
            concurrency: 3,
            ..SweepOptions::default()
        };
        let out = sweep(t, candidates.clone(), 7, &opts).await;
        let got: Vec<&Candidate> = out.entries.iter().map(|e| &e.candidate).collect();
        let want: Vec<&Candidate> = candidates.iter().collect();
        assert_eq!(got, want);
        assert!(out
            .entries
            .iter()
            .all(|e| e.result.outcome == ProbeOutcome::Missing && e.result.url.ends_with("/007.mp3")));
    }

    /// Sleeps per call and records the peak number of concurrent calls.
    struct Gauge {
        current: AtomicUsize,
        peak: AtomicUsize,
        calls: AtomicUsize,
    }

    impl Transport for Gauge {
        fn send(&self, _request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(30));
            self.current.fetch_sub(1, Ordering::SeqCst);
            Ok(HttpResponse {
                status: 404,
                ..HttpResponse::default()
            })
        }
    }

    #[tokio::test]
    async fn in_flight_never_exceeds_concurrency() {
        let t = Arc::new(Gauge {
            current: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        });
        let slugs: Vec<String> = (0..10).map(|i| format!("s{i}")).collect();
        let slugs: Vec<&str> = slugs.iter().map(String::as_str).collect();
        let candidates = family("https://server6.mp3quran.net", &slugs);
        let opts = SweepOptions {
            concurrency: 3,
            ..SweepOptions::default()
        };
        let out = sweep(t.clone(), candidates, 1, &opts).await;

        assert_eq!(t.calls.load(Ordering::SeqCst), 10);
        assert_eq!(out.entries.len(), 10);
        let peak = t.peak.load(Ordering::SeqCst);
        assert!(peak <= 3, "peak in flight was {peak}");
    }

    #[tokio::test]
    async fn huge_sweep_timeout_does_not_overflow() {
        let t = Arc::new(HitOn {
            hit: "/lhdan/",
            calls: Mutex::new(Vec::new()),
        });
        let opts = SweepOptions {
            sweep_timeout: Duration::from_secs(u64::MAX),
            ..SweepOptions::default()
        };
        let out = sweep(t, family("https://server8.mp3quran.net", &["lhdan"]), 1, &opts).await;
        assert_eq!(out.found().count(), 1);
        assert!(!out.timed_out);
    }

    #[test]
    fn dispatch_interleaves_families() {
        let mut candidates = family("https://server6.mp3quran.net", &["a", "b", "c"]);
        candidates.extend(family("https://server8.mp3quran.net", &["a"]));
        candidates.extend(family("https://server9.mp3quran.net", &["a", "b"]));
        let order: Vec<usize> = dispatch_order(candidates).into_iter().map(|(i, _)| i).collect();
        assert_eq!(order, vec![0, 3, 4, 1, 5, 2]);
    }

    #[tokio::test]
    async fn round_robin_lets_first_found_skip_under_concurrency() {
        // Two families, concurrency 2: the first wave is one slug per family.
        let t = Arc::new(HitOn {
            hit: "/lhdan/",
            calls: Mutex::new(Vec::new()),
        });
        let mut candidates = family("https://server6.mp3quran.net", &["lhdan", "luhdan", "al_luhaidan"]);
        candidates.extend(family("https://server8.mp3quran.net", &["lhdan", "luhdan", "al_luhaidan"]));
        let opts = SweepOptions {
            concurrency: 2,
            ..SweepOptions::default()
        };
        let out = sweep(t.clone(), candidates, 1, &opts).await;

        assert_eq!(t.calls.lock().unwrap().len(), 2);
        assert_eq!(out.found().count(), 2);
        assert_eq!(out.skipped.len(), 4);
    }

    #[tokio::test]
    async fn empty_sweep_is_empty() {
        let t = Arc::new(HitOn {
            hit: "x",
            calls: Mutex::new(Vec::new()),
        });
        let out = sweep(t, Vec::new(), 1, &SweepOptions::default()).await;
        assert_eq!(out, SweepOutcome::default());
    }
}
