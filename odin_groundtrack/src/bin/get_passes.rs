/*
 * Copyright © 2025, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use std::time::Duration;
use anyhow::{anyhow,Result};
use chrono::{DateTime,Utc};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use odin_groundtrack::{
    load_config, save_ron, tle::load_tle_file,
    BoundingRegion, PassConfig, PassEvent, PassPredictor
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = "compute times at which objects given by TLEs pass over lat/lon regions")]
pub struct Args {
    /// RON file with PassConfig (if not set we use the default config)
    #[arg(short,long)]
    pub config: Option<String>,

    /// start datetime (RFC 3339, default is now)
    #[arg(short,long)]
    pub start: Option<DateTime<Utc>>,

    /// number of minutes to compute
    #[arg(short,long)]
    pub minutes: Option<u64>,

    /// time step in seconds
    #[arg(long)]
    pub step: Option<f64>,

    /// number of matching workers (0: number of cores)
    #[arg(short,long)]
    pub workers: Option<usize>,

    /// optional region "lat_min,lon_min,lat_max,lon_max" that replaces configured regions
    #[arg(short,long, allow_hyphen_values = true)]
    pub region: Option<String>,

    /// optional RON file to store pass events in
    #[arg(short,long)]
    pub output: Option<String>,

    /// TLE file with name line and two data lines per object
    pub tle_file: String,
}

fn main()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::from_default_env())  // use RUST_LOG to set max level
        .init();

    let args = Args::parse();
    let config = get_config( &args)?;

    let predictor = PassPredictor::with_thread_pool( config)?;

    let mut element_sets = Vec::new();
    for res in load_tle_file( &args.tle_file)? {
        match res {
            Ok(es) => element_sets.push( es),
            Err(e) => eprintln!("skipping TLE set: {e}")
        }
    }
    if element_sets.is_empty() {
        return Err( anyhow!("no valid TLE sets in {}", args.tle_file))
    }

    let report = predictor.predict( element_sets)?;
    println!("-- {} objects from {} to {} ({} samples)", report.n_objects, report.start, report.end, report.n_samples);

    for e in &report.events {
        println!("{e}");
    }
    for f in &report.failures {
        eprintln!("failed: {f}");
    }

    if let Some(path) = &args.output {
        let events: &Vec<PassEvent> = &report.events;
        save_ron( events, path)?;
        println!("{} pass events saved to {}", events.len(), path);
    }

    Ok(())
}

fn get_config (args: &Args)->Result<PassConfig> {
    let mut config: PassConfig = match &args.config {
        Some(path) => load_config( path)?,
        None => PassConfig::default()
    };

    if let Some(start) = args.start { config.start = Some(start) }
    if let Some(minutes) = args.minutes { config.horizon = Duration::from_secs( minutes * 60) }
    if let Some(step) = args.step { config.step = Duration::try_from_secs_f64( step)? }
    if let Some(workers) = args.workers { config.workers = workers }
    if let Some(spec) = &args.region { config.regions = vec![ parse_region( spec)?] }

    Ok(config)
}

fn parse_region (spec: &str)->Result<BoundingRegion> {
    let vs = spec.split(',').map( |s| s.trim().parse::<f64>()).collect::<std::result::Result<Vec<f64>,_>>()?;
    match vs.as_slice() {
        [lat_min,lon_min,lat_max,lon_max] => Ok( BoundingRegion::new( "cli", *lat_min, *lon_min, *lat_max, *lon_max)?),
        _ => Err( anyhow!("region has to be specified as lat_min,lon_min,lat_max,lon_max"))
    }
}
