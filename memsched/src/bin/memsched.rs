use anyhow::{Context, bail};
use memsched::*;

/// CPU scheduling over contiguous memory partitions
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input format
    #[arg(value_enum)]
    format:     InpuType,

    /// Scheduling policy (ignored with --compare)
    #[arg(value_enum, required_unless_present = "compare")]
    policy:     Option<Policy>,

    /// Allocation strategy (ignored with --compare)
    #[arg(value_enum, required_unless_present = "compare")]
    strategy:   Option<Strategy>,

    /// Path to input (CSV format only)
    #[arg(short, long, value_parser = clap::value_parser!(PathBuf))]
    input:      Option<PathBuf>,

    /// Total memory
    #[arg(short, long, default_value_t = 1024)]
    #[arg(value_parser = clap::value_parser!(ByteSteps))]
    memory:     ByteSteps,

    /// Logical time span of a random workload
    #[arg(short, long, default_value_t = 100)]
    #[arg(value_parser = clap::value_parser!(Ticks))]
    ticks:      Ticks,

    /// Seed of a random workload
    #[arg(short, long, default_value_t = 0)]
    #[arg(value_parser = clap::value_parser!(u64))]
    seed:       u64,

    /// Run every policy/strategy pair and compare them
    #[arg(short, long, default_value_t = false)]
    compare:    bool,

    /// Log every admission
    #[arg(short, long, default_value_t = false)]
    verbose:    bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Args::parse();
    memsched::logger::init(cli.verbose)?;

    let set = match cli.format {
        InpuType::Csv   => {
            let Some(input_path) = cli.input else {
                bail!("CSV input needs --input");
            };
            if !(input_path.exists() && input_path.is_file()) {
                bail!("Invalid input path: {}", input_path.display());
            }
            read_from_path::<CsvParser, &[usize; CSV_FIELDS_NUM]>(input_path)
                .map_err(|e| anyhow::anyhow!("{e}"))
                .context("Reading processes failed")?
        },
        InpuType::Random    => {
            init(bernoulli(cli.ticks, 0.3, 0.3, 2, 6, (cli.memory / 2).max(1), cli.seed))?
        },
    };

    let total = Instant::now();
    if cli.compare {
        let pairs = [Policy::Fcfs, Policy::Sjf]
            .into_iter()
            .cartesian_product([Strategy::FirstFit, Strategy::BestFit])
            .collect_vec();
        // Each run gets its own scheduler; nothing is shared.
        let runs = pairs.into_par_iter()
            .map(|(policy, strategy)| -> anyhow::Result<(Policy, Strategy, Outcome)> {
                let mut sched = Scheduler::new(cli.memory, strategy)?;
                let outcome = sched.simulate(policy, set.clone())?;
                Ok((policy, strategy, outcome))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        println!("{:<6}{:<11}{:>6}{:>6}{:>10}{:>12}{:>10}", "", "", "done", "skip", "makespan", "turnaround", "waiting");
        for (policy, strategy, outcome) in &runs {
            let s = Summary::of(outcome);
            println!(
                "{:<6}{:<11}{:>6}{:>6}{:>10}{:>12.2}{:>10.2}",
                policy.to_string(), strategy.to_string(), s.completed, s.skipped, s.makespan, s.avg_turnaround, s.avg_waiting
            );
        }
    } else {
        let (Some(policy), Some(strategy)) = (cli.policy, cli.strategy) else {
            bail!("POLICY and STRATEGY are required unless --compare is given");
        };
        let mut sched = Scheduler::new(cli.memory, strategy)?;
        let outcome = sched.simulate(policy, set)?;
        report(policy, &sched, &outcome);
    }

    println!(
        "Total simulation time: {} μs",
        total.elapsed().as_micros()
    );

    Ok(())
}

fn report(policy: Policy, sched: &Scheduler, outcome: &Outcome) {
    println!("{policy} with {} over {} bytes", sched.strategy(), sched.memory().total());
    println!("{:>6}{:>9}{:>7}{:>7}{:>7}{:>12}{:>12}{:>9}", "pid", "arrival", "burst", "mem", "start", "completion", "turnaround", "waiting");
    for p in &outcome.completed {
        println!(
            "{:>6}{:>9}{:>7}{:>7}{:>7}{:>12}{:>12}{:>9}",
            p.pid,
            p.arrival_time,
            p.burst_time,
            p.memory_required,
            p.start_time.unwrap_or_default(),
            p.completion_time.unwrap_or_default(),
            p.turnaround_time().unwrap_or_default(),
            p.waiting_time().unwrap_or_default(),
        );
    }
    if !outcome.skipped.is_empty() {
        println!("Skipped:\t{}", outcome.skipped
            .iter()
            .map(|s| format!("P{} ({}, t={})", s.pid, s.reason, s.at))
            .join(", "));
    }

    let s = Summary::of(outcome);
    println!("Makespan:\t\t{} ticks\nAvg. turnaround:\t{:.2} ticks\nAvg. waiting:\t\t{:.2} ticks\nCPU utilization:\t{:.2}%",
        s.makespan,
        s.avg_turnaround,
        s.avg_waiting,
        s.cpu_utilization * 100.0
    );
}
