use crate::helpe::*;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Checks a set of processes before they enter a simulation.
/// A successfully returned set is guaranteed to be compliant
/// with all of `memsched`'s assumptions. These are:
/// - no process has zero burst time
/// - no process demands zero memory
/// - no process has already been scheduled
/// - no process has consumed any of its burst
/// - the latest arrival plus the total burst fits in a [Ticks]
///
/// The last point bounds the logical clock: it can never pass the
/// latest arrival by more than the sum of all bursts.
///
/// This function is the gatekeeper to the rest of the library.
pub fn init(mut in_elts: Vec<Process>) -> Result<Vec<Process>, ProcessError> {
    let verdict = in_elts.iter()
        .enumerate()
        .find_map(|(idx, p)| rejection(p).map(|m| (idx, m)))
        .or_else(|| clock_overflow(&in_elts).map(|idx| (idx, "Process set overflows the logical clock!")));
    if let Some((idx, message)) = verdict {
        return Err(ProcessError {
            message: String::from(message),
            culprit: in_elts.remove(idx),
        });
    }

    Ok(in_elts)
}

/// Index of the process whose burst first pushes the
/// clock's upper bound past [Ticks::MAX], if any.
fn clock_overflow(procs: &[Process]) -> Option<usize> {
    let mut horizon = procs.iter()
        .map(|p| p.arrival_time)
        .max()?;
    for (idx, p) in procs.iter().enumerate() {
        horizon = match horizon.checked_add(p.burst_time) {
            Some(h) => h,
            None    => return Some(idx),
        };
    }

    None
}

#[inline(always)]
fn rejection(p: &Process) -> Option<&'static str> {
    if p.burst_time == 0 {
        Some("Process with 0 burst time found!")
    } else if p.memory_required == 0 {
        Some("Process with 0 memory requirement found!")
    } else if p.start_time.is_some() || p.completion_time.is_some() {
        Some("Already scheduled process found!")
    } else if p.remaining_time != p.burst_time {
        Some("Process with remaining != burst time found!")
    } else { None }
}

/// Stable sort by arrival. Processes arriving together
/// keep their relative input order.
#[inline(always)]
pub fn by_arrival(procs: Vec<Process>) -> Vec<Process> {
    procs.into_iter()
        .sorted_by_key(|p| p.arrival_time)
        .collect()
}

#[inline(always)]
pub fn get_total_burst(procs: &[Process]) -> Ticks {
    procs.iter().fold(0, |sum, p| sum + p.burst_time)
}

/// Generates a workload over `ticks` logical time units. At every
/// tick a process arrives with probability `p_arrival`. Its burst
/// is `short_burst` with probability `p_short`, else `long_burst`.
/// Memory demand is uniform over `1..=max_mem`.
///
/// The same `seed` always produces the same workload. Zero bursts
/// or a zero `max_mem` make every process invalid, so they yield
/// an empty workload.
pub fn bernoulli(
    ticks:          Ticks,
    p_arrival:      f64,
    p_short:        f64,
    short_burst:    Ticks,
    long_burst:     Ticks,
    max_mem:        ByteSteps,
    seed:           u64,
) -> Vec<Process> {
    if short_burst == 0 || long_burst == 0 || max_mem == 0 {
        log::warn!("Degenerate workload requested, generating nothing");
        return vec![];
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut res = Vec::new();

    for t in 0..ticks {
        if rng.gen::<f64>() < p_arrival {
            let burst = if rng.gen::<f64>() < p_short {
                short_burst
            } else {
                long_burst
            };
            let mem = rng.gen_range(1..=max_mem);
            // Pids are 1-based, like the hand-written workloads.
            res.push(Process::new(res.len() as u32 + 1, t, burst, mem));
        }
    }

    res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gatekeeper_accepts_sane_input() {
        let procs = vec![Process::new(1, 0, 4, 50), Process::new(2, 1, 3, 30)];
        assert_eq!(init(procs.clone()).unwrap(), procs);
    }

    #[test]
    fn gatekeeper_rejects_zero_burst() {
        let err = init(vec![Process::new(1, 0, 4, 50), Process::new(2, 1, 0, 30)]).unwrap_err();
        assert_eq!(err.culprit.pid, 2);
        assert!(err.message.contains("burst"));
    }

    #[test]
    fn gatekeeper_rejects_zero_memory() {
        let err = init(vec![Process::new(7, 0, 4, 0)]).unwrap_err();
        assert_eq!(err.culprit.pid, 7);
        assert!(err.message.contains("memory"));
    }

    #[test]
    fn gatekeeper_rejects_scheduled_process() {
        let mut p = Process::new(1, 0, 4, 50);
        p.run_from(0);
        assert!(init(vec![p]).is_err());

        let mut q = Process::new(2, 0, 4, 50);
        q.remaining_time = 1;
        assert!(init(vec![q]).is_err());
    }

    #[test]
    fn arrival_sort_is_stable() {
        let procs = vec![
            Process::new(1, 3, 1, 1),
            Process::new(2, 1, 1, 1),
            Process::new(3, 3, 1, 1),
            Process::new(4, 1, 1, 1),
        ];
        let order = by_arrival(procs).iter().map(|p| p.pid).collect_vec();
        assert_eq!(order, vec![2, 4, 1, 3]);
    }

    #[test]
    fn bernoulli_is_seeded() {
        let a = bernoulli(200, 0.3, 0.5, 2, 6, 100, 42);
        let b = bernoulli(200, 0.3, 0.5, 2, 6, 100, 42);
        assert_eq!(a, b);
        assert!(!a.is_empty());
        assert!(a.iter().all(|p| p.burst_time == 2 || p.burst_time == 6));
        assert!(a.iter().all(|p| (1..=100).contains(&p.memory_required)));
        assert!(a.windows(2).all(|w| w[0].arrival_time < w[1].arrival_time));
        assert!(init(a).is_ok());
    }

    #[test]
    fn totals() {
        let procs = vec![Process::new(1, 0, 4, 50), Process::new(2, 1, 3, 30)];
        assert_eq!(get_total_burst(&procs), 7);
        assert_eq!(get_total_burst(&[]), 0);
    }

    #[test]
    fn gatekeeper_rejects_clock_overflow() {
        let err = init(vec![Process::new(1, usize::MAX, 1, 10)]).unwrap_err();
        assert_eq!(err.culprit.pid, 1);
        assert!(err.message.contains("clock"));

        // Each process is fine alone; together their bursts run past the end of time.
        let procs = vec![
            Process::new(1, 0, usize::MAX / 2, 10),
            Process::new(2, 5, usize::MAX / 2, 10),
            Process::new(3, 9, 3, 10),
        ];
        assert_eq!(init(procs).unwrap_err().culprit.pid, 2);
    }

    #[test]
    fn gatekeeper_accepts_clock_at_its_limit() {
        let procs = vec![
            Process::new(1, usize::MAX - 3, 1, 10),
            Process::new(2, 0, 2, 10),
        ];
        assert!(init(procs).is_ok());
    }

    #[test]
    fn degenerate_bernoulli_is_empty() {
        assert!(bernoulli(50, 1.0, 0.5, 2, 6, 0, 1).is_empty());
        assert!(bernoulli(50, 1.0, 0.5, 0, 6, 100, 1).is_empty());
        assert!(bernoulli(50, 1.0, 0.0, 2, 0, 100, 1).is_empty());
    }
}
