use clap::Parser;
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use popcode::error::PopcodeError;
use popcode::likelihood::LikelihoodCurve;
use popcode::sampler::{sample_spike_counts, sampling_rng};
use popcode::tuning::Population;
use popcode::utils::linspace;
use popcode::viz::{CurveSeries, ScatterSeries, TuningTable};

#[derive(Parser, Debug)]
struct Args {
    /// The seed for spike count sampling; omit for a free-running generator
    #[arg(long)]
    seed: Option<u64>,
    /// The number of neurons
    #[arg(short = 'N', long, default_value = "29")]
    num_neurons: usize,
    /// The lowest preferred stimulus
    #[arg(long, default_value = "-70.0")]
    min_preferred: f64,
    /// The highest preferred stimulus
    #[arg(long, default_value = "70.0")]
    max_preferred: f64,
    /// The tuning curve gain
    #[arg(short = 'G', long, default_value = "5.0")]
    gain: f64,
    /// The baseline firing rate
    #[arg(short = 'b', long, default_value = "1.0")]
    baseline: f64,
    /// The tuning width
    #[arg(long, default_value = "10.0")]
    width: f64,
    /// The true (hidden) stimulus
    #[arg(short = 's', long, default_value = "20.0")]
    stimulus: f64,
    /// The number of candidate stimuli on the decoding grid
    #[arg(long, default_value = "120")]
    num_candidates: usize,
    /// Directory to write the JSON series to; omit to skip writing
    #[arg(long)]
    out_dir: Option<String>,
}

fn main() -> Result<(), PopcodeError> {
    let args = Args::parse();

    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{l} - {m}\n")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info))
        .map_err(|e| PopcodeError::IOError(e.to_string()))?;
    log4rs::init_config(config).map_err(|e| PopcodeError::IOError(e.to_string()))?;

    log::info!("{:?}", args);

    // Build the population
    let population = Population::uniform(
        args.num_neurons,
        (args.min_preferred, args.max_preferred),
        args.gain,
        args.baseline,
        args.width,
    )?;
    log::info!("Population setup: done!");

    // Sample one spike count per neuron at the true stimulus
    let mut rng = sampling_rng(args.seed);
    let counts = sample_spike_counts(&population.rates_at(args.stimulus), &mut rng)?;
    log::info!(
        "Spike count sampling: done! {} spikes in total",
        counts.iter().sum::<u64>()
    );

    // Evaluate the population likelihood over the candidate grid
    let stimuli = linspace(args.min_preferred, args.max_preferred, args.num_candidates);
    let curve = LikelihoodCurve::population(&counts, &stimuli, &population)?;
    match curve.peak() {
        Some(estimate) => log::info!(
            "Decoding: done! True stimulus is {}, maximum likelihood estimate is {:.3}",
            args.stimulus,
            estimate
        ),
        None => log::info!("Decoding: done! Empty candidate grid, nothing to estimate"),
    }

    // Export the series for plotting
    if let Some(out_dir) = args.out_dir {
        let out_dir = std::path::Path::new(&out_dir);
        TuningTable::new(&population, &stimuli).save_to(out_dir.join("tuning.json"))?;
        ScatterSeries::spike_counts(&population, &counts)?
            .save_to(out_dir.join("counts.json"))?;
        CurveSeries::from_likelihood("population likelihood", &curve)
            .save_to(out_dir.join("likelihood.json"))?;
        log::info!("Series export: done! Saved to {}", out_dir.display());
    }

    Ok(())
}
