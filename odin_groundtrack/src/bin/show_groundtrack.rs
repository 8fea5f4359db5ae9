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
    tle::load_tle_file, propagate, CoordinateTransform, OrbitalModel, TimeGrid, TransformConfig
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = "print the geodetic ground track of one object")]
pub struct Args {
    /// start datetime (RFC 3339, default is object epoch)
    #[arg(short,long)]
    pub start: Option<DateTime<Utc>>,

    /// number of samples
    #[arg(short,long, default_value_t = 10)]
    pub n_samples: usize,

    /// time step in seconds
    #[arg(long, default_value_t = 60)]
    pub step: u64,

    /// NORAD catalog number of object (default is first object in file)
    #[arg(long)]
    pub id: Option<u64>,

    /// TLE file
    pub tle_file: String,
}

fn main()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let es = load_tle_file( &args.tle_file)?.into_iter()
        .filter_map( |res| res.ok())
        .find( |es| args.id.is_none_or( |id| es.object_id() == id))
        .ok_or_else( || anyhow!("no matching TLE set in {}", args.tle_file))?;
    println!("{es}");

    let start = args.start.unwrap_or( es.epoch());
    let model = OrbitalModel::new( es)?;
    let grid = TimeGrid::new( start, Duration::from_secs( args.step), args.n_samples)?;
    let trajectory = propagate( &model, &grid)?;

    let transform = CoordinateTransform::new( TransformConfig::default());
    for (i,(p,res)) in trajectory.samples.iter().zip( transform.to_geodetic_batch( &trajectory.samples)).enumerate() {
        match res {
            Ok(gp) => println!("[{:3}]: {} = {:10.4} °,{:10.4} °,{:10.0} m", i, p.time.format("%H:%M:%S"), gp.latitude(), gp.longitude(), gp.altitude()),
            Err(e) => println!("[{:3}]: {} = {}", i, p.time.format("%H:%M:%S"), e)
        }
    }

    Ok(())
}
