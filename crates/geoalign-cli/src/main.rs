use argh::FromArgs;
use std::path::PathBuf;

use geoalign::geodesy::GeodeticFrame;
use geoalign::linalg::fit_transformation;
use geoalign::ply::transform_ply;
use geoalign::trajectory::{build_trajectories, PositionIndex, TriggerIndex};

#[derive(FromArgs)]
/// Align a visual-odometry reconstruction with its GPS track and rewrite the
/// point cloud in geographic coordinates
struct Args {
    /// path of the synchronization index root directory
    #[argh(option, short = 'p')]
    path: PathBuf,

    /// path of the visual-odometry record directory
    #[argh(option, short = 'r')]
    records: PathBuf,

    /// path of the input point cloud
    #[argh(option, short = 'i')]
    input_ply: PathBuf,

    /// path of the output point cloud
    #[argh(option, short = 'o')]
    output_ply: PathBuf,

    /// camera device tag
    #[argh(option, short = 'c')]
    cam_tag: String,

    /// camera device module
    #[argh(option, short = 'm')]
    cam_mod: String,

    /// GPS device tag
    #[argh(option, short = 'g')]
    gps_tag: String,

    /// GPS device module
    #[argh(option, short = 'n')]
    gps_mod: String,

    /// camera timestamp delay correction in whole seconds
    #[argh(option, short = 'd', default = "0")]
    delay: i64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let trigger = TriggerIndex::open(&args.path, &args.cam_tag, &args.cam_mod)?;
    let position = PositionIndex::open(&args.path, &args.gps_tag, &args.gps_mod)?;

    let pair = build_trajectories(&args.records, args.delay, &trigger, &position)?;
    println!("Matched correspondences: #{} pairs", pair.len());

    let (odometry, mut geodetic) = pair.into_curves();

    // the frame must be fitted before the track is rewritten in place
    let frame = GeodeticFrame::fit(geodetic.points())?;
    frame.localize_in_place(geodetic.points_mut());

    let transform = fit_transformation(geodetic.points(), odometry.points())?;
    log::debug!("alignment rotation: {:?}", transform.rotation);
    log::debug!("alignment translation: {:?}", transform.translation);

    let count = transform_ply(&args.input_ply, &args.output_ply, &transform, &frame)?;
    println!("Georeferenced vertices: #{} points", count);

    Ok(())
}
