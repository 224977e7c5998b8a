use crate::helpe::*;

impl Scheduler {
    /// First-come, first-served.
    ///
    /// Processes are considered strictly in (stable) arrival order.
    /// One that does not fit when its turn comes is skipped for good,
    /// and the next one is considered right away.
    pub fn simulate_fcfs(&mut self, processes: Vec<Process>) -> Result<Outcome, ProcessError> {
        let processes = by_arrival(init(processes)?);
        let mut outcome = Outcome::default();
        let mut clock: Ticks = 0;

        for p in processes {
            if clock < p.arrival_time {
                // CPU idles until the next arrival.
                clock = p.arrival_time;
            }
            clock = self.admit_and_run(p, clock, &mut outcome);
        }

        Ok(outcome)
    }
}
