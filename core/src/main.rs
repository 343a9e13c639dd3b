use clap::Parser;
use wadocat_core::cli::report::SeriesReport;
use wadocat_core::cli::{Cli, FileRetrieveClient, OutputFormat, UnavailableSuvCalculator};
use wadocat_core::{ImageIdPipeline, Result, SeriesRequest};

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    if let Err(err) = run(&cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let client = FileRetrieveClient::new(&cli.file);
    let mut pipeline = ImageIdPipeline::new(client, UnavailableSuvCalculator);

    let request = SeriesRequest {
        study_instance_uid: cli.study_uid.clone(),
        series_instance_uid: cli.series_uid.clone(),
        sop_instance_uid: cli.sop_instance_uid.clone(),
        wado_rs_root: cli.wado_rs_root.clone(),
    };

    let image_ids = pipeline.create_image_ids(&request)?;
    let report = SeriesReport::new(&image_ids, &pipeline.calibration, &pipeline.scaling);

    match cli.format {
        OutputFormat::Text => print!("{report}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report.to_json())?),
    }

    Ok(())
}
