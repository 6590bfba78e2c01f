use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dicom2nifti::{ConversionOptions, ValidationSettings, convert_directory};
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Convert every DICOM series below a directory to NIfTI.
#[derive(Parser, Debug)]
#[command(author, about, version, long_about)]
struct Args {
    /// directory that is searched recursively for DICOM files
    input_dir: PathBuf,

    /// directory receiving one NIfTI file per series
    output_dir: PathBuf,

    /// keep the voxel order of the DICOM files
    #[arg(long)]
    no_reorientation: bool,

    /// write .nii instead of .nii.gz
    #[arg(long)]
    no_compression: bool,

    /// accept volumes with fewer than 4 slices
    #[arg(long)]
    allow_few_slices: bool,

    /// accept slices whose orientation differs
    #[arg(long)]
    allow_inconsistent_orientation: bool,

    /// accept tilted (non orthogonal) volumes, the tilt ends up in the affine
    #[arg(long)]
    allow_gantry_tilt: bool,

    /// accept irregular distances between slices
    #[arg(long)]
    allow_inconsistent_slice_increment: bool,

    /// accept enhanced multiframe files with implicit VR
    #[arg(long)]
    allow_multiframe_implicit: bool,

    /// gdcmconv executable used for compressed files (default: search PATH)
    #[arg(long)]
    gdcmconv: Option<PathBuf>,

    /// more output, repeat for debug logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn options(&self) -> ConversionOptions {
        let validation = ValidationSettings::default()
            .with_slice_count(!self.allow_few_slices)
            .with_orientation(!self.allow_inconsistent_orientation)
            .with_orthogonal(!self.allow_gantry_tilt)
            .with_slice_increment(!self.allow_inconsistent_slice_increment)
            .with_multiframe_implicit(!self.allow_multiframe_implicit);
        let options = ConversionOptions::default()
            .with_validation(validation)
            .with_reorientation(!self.no_reorientation)
            .with_compression(!self.no_compression);
        match &self.gdcmconv {
            Some(program) => options.with_gdcmconv(program),
            None => options,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("setting default subscriber failed");
    }

    match convert_directory(&args.input_dir, &args.output_dir, &args.options()) {
        Ok(report) => {
            info!(
                "Converted {} series, {} failed",
                report.converted.len(),
                report.failed.len()
            );
            if report.converted.is_empty() && !report.failed.is_empty() {
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("Error! {}", e);
            ExitCode::FAILURE
        }
    }
}
