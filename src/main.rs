use cpu_sched_sim::{SchedError, SchedEvent, SchedulerConfig, Scheme, Sim, sim::bernoulli_jobs};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), SchedError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let jobs = bernoulli_jobs(500, 0.3, 0.3, 2, 6, 0);
    println!("{} jobs", jobs.len());

    for scheme in Scheme::ALL {
        let config = SchedulerConfig::new(scheme);
        let mut sim = Sim::new(jobs.clone(), &config)?;

        let mut context_switches = 0;
        while let Some(now) = sim.next_event_time() {
            for event in sim.step()? {
                tracing::trace!(t = now, ?event);
                if let SchedEvent::CpuCurrentChange { to: Some(_), .. } = event {
                    context_switches += 1;
                }
            }
        }

        let summary = sim.engine.summary()?;
        let longest_response = sim
            .engine
            .ledger()
            .iter()
            .filter_map(|job| job.response_time())
            .max()
            .unwrap_or(0);

        println!("{scheme:>5}: {summary}");
        println!(
            "       longest response {longest_response} ticks, {context_switches} dispatch changes"
        );
    }

    Ok(())
}
