use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;

use anyhow::Context;
use exuber_rs::MonteCarloConfig;
use exuber_rs::RadfConfig;
use exuber_rs::WorkerPool;
use exuber_rs::mc_cv;
use exuber_rs::radf;
use exuber_rs::stats::report::DatestampConfig;
use exuber_rs::stats::report::datestamp;
use exuber_rs::stats::report::summary;
use exuber_rs::stochastic::bubble::PsyBubble;
use exuber_rs::traits::ProcessExt;
use ndarray::Array1;
use ndarray::Axis;
use tracing_subscriber::EnvFilter;

/// Runs the GSADF test on a series read from the file given as first
/// argument (one value per line), or on a simulated single-bubble path.
fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env().add_directive("exuber_rs=info".parse()?))
    .init();

  let y = match std::env::args().nth(1) {
    Some(path) => read_vector_from_file(&path).with_context(|| format!("reading series from {path}"))?,
    None => {
      let dgp = PsyBubble::new(200);
      tracing::info!(te = dgp.te, tf = dgp.tf, "simulating single-bubble series");
      dgp.sample_seeded(42)
    }
  };
  let n = y.len();

  let pool = WorkerPool::parallel(None).context("starting worker pool")?;
  let data = y.insert_axis(Axis(1));
  let res = radf(data.view(), &RadfConfig::default(), &pool).context("recursive ADF")?;

  let cfg = MonteCarloConfig {
    n,
    nrep: 1000,
    seed: Some(123),
    show_progress: true,
    ..MonteCarloConfig::default()
  };
  let cv = mc_cv(&cfg, &pool).context("Monte Carlo critical values")?;

  println!("{}", summary(&res, &cv)?);
  match datestamp(&res, &cv, &DatestampConfig::default()) {
    Ok(ds) => println!("{ds}"),
    Err(e) => println!("no explosive episodes: {e}"),
  }

  Ok(())
}

fn read_vector_from_file(filename: &str) -> anyhow::Result<Array1<f64>> {
  let file = File::open(filename)?;
  let reader = BufReader::new(file);
  let mut data = Vec::new();

  for line in reader.lines() {
    let line = line?;
    if line.trim().is_empty() {
      continue;
    }
    let value: f64 = line.trim().parse().with_context(|| format!("invalid value `{line}`"))?;
    data.push(value);
  }

  Ok(Array1::from(data))
}
