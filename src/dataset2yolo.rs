use clap::Parser;
use log::{error, info};
use std::process::ExitCode;

use dataset2yolo::{process_dataset, setup_output_directories, Args, DatasetProfile};

fn main() -> ExitCode {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let profile = DatasetProfile::from_args(&args);
    if let Err(e) = profile.validate() {
        error!("Invalid dataset_dir {}: {}", args.dataset_dir, e);
        return ExitCode::FAILURE;
    }

    let categories = match args.category_map() {
        Ok(categories) => categories,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Starting the conversion process...");

    match setup_output_directories(&args, &profile) {
        Ok(output_dirs) => match process_dataset(&output_dirs, &args, &profile, &categories) {
            Ok(_) => {
                info!(
                    "Conversion process completed successfully: {}",
                    output_dirs.output_root.display()
                );
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("Failed to process dataset: {}", e);
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            error!("Failed to set up output directories: {}", e);
            ExitCode::FAILURE
        }
    }
}
