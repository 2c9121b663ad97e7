use parallel_mapper::{Aggregator, WorkerPool};

fn main() -> parallel_mapper::Result<()> {
    let readings: Vec<i64> = (0..50_000).map(|n: i64| (n * 7919) % 10_007 - 5_000).collect();

    let aggregator = Aggregator::new();
    let hottest = aggregator.maximum(8, readings.clone(), |a, b| a.cmp(b))?;
    let coldest = aggregator.minimum(8, readings.clone(), |a, b| a.cmp(b))?;
    let below_zero = aggregator.count(8, readings.clone(), |r| *r < 0)?;
    println!("hottest reading: {hottest}");
    println!("coldest reading: {coldest}");
    println!("readings below zero: {below_zero}");

    // The same reductions can share a pool instead of spawning fresh threads.
    let pool = WorkerPool::new(8)?;
    let pooled = Aggregator::with_executor(&pool);
    let all_in_range = pooled.all(8, readings.clone(), |r| r.abs() <= 5_100)?;
    let any_extreme = pooled.any(8, readings, |r| r.abs() > 4_990)?;
    println!("all readings in range: {all_in_range}");
    println!("any extreme reading: {any_extreme}");
    pool.close();

    Ok(())
}
