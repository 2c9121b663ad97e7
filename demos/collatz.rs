use std::time::Instant;

use parallel_mapper::WorkerPool;

const NUMBER_OF_TASKS: u64 = 100_000;

fn main() -> parallel_mapper::Result<()> {
    let pool = WorkerPool::with_default_workers()?;
    println!(
        "Running {} tasks on {} workers",
        NUMBER_OF_TASKS,
        pool.worker_count()
    );

    let start = Instant::now();
    let lengths = pool.map(chain_length, 1..=NUMBER_OF_TASKS)?;
    let longest = lengths.iter().max().copied().unwrap_or(0);
    println!("Time taken: {:?}", start.elapsed());
    println!("Longest chain: {} steps", longest);

    // Baseline
    let baseline_start = Instant::now();
    let baseline = (1..=NUMBER_OF_TASKS).map(chain_length).max().unwrap_or(0);
    println!("Baseline time taken: {:?}", baseline_start.elapsed());
    println!("Baseline longest chain: {} steps", baseline);

    pool.close();
    Ok(())
}

fn chain_length(start: u64) -> u64 {
    let mut n = start;
    let mut steps = 0;
    while n != 1 {
        n = if n % 2 == 0 { n / 2 } else { 3 * n + 1 };
        steps += 1;
    }
    steps
}
