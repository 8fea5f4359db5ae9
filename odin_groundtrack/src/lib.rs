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

//! ground track pass prediction: propagate TLE element sets with SGP4 over a regular time grid, convert
//! the positions into geodetic coordinates and report the samples that fall into configured lat/lon regions

use std::{fs, path::Path, time::Duration};
use serde::{Deserialize,Deserializer,Serialize,Serializer};

pub mod errors;
use errors::Result;

pub mod position;
pub mod elements;
pub mod model;
pub mod propagation;
pub mod geodetic;
pub mod region;
pub mod scheduler;
pub mod pipeline;
pub mod tle;

pub use position::{PositionVector,ReferenceFrame};
pub use elements::OrbitalElementSet;
pub use model::{Geopotential,OrbitalModel};
pub use propagation::{TimeGrid,Trajectory,propagate,propagate_all};
pub use geodetic::{CoordinateTransform,Ellipsoid,GeodeticPoint,TransformConfig};
pub use region::{BoundingRegion,in_region};
pub use scheduler::{BatchScheduler,BlockingTaskExecutor,Executor,PassEvent,SequentialExecutor,ThreadPoolExecutor,WorkItem};
pub use pipeline::{PassConfig,PassFailure,PassPredictor,PassReport,RegionAssociation};

//--- general utility functions

/// load a RON config file
pub fn load_config<C,P> (path: P) -> Result<C> where C: for <'a> Deserialize<'a>, P: AsRef<Path> {
    let data = fs::read( path.as_ref())?;
    Ok( ron::de::from_bytes( data.as_slice())? )
}

/// store a serializable value as pretty printed RON
pub fn save_ron<T,P> (value: &T, path: P) -> Result<()> where T: Serialize, P: AsRef<Path> {
    let s = ron::ser::to_string_pretty( value, ron::ser::PrettyConfig::default().compact_structs(true))?;
    fs::write( path.as_ref(), s.as_bytes())?;
    Ok(())
}

pub fn ser_duration_as_fractional_secs<S: Serializer> (dur: &Duration, s: S) -> std::result::Result<S::Ok, S::Error>  {
    s.serialize_f64( dur.as_secs_f64())
}

pub fn de_duration_from_fractional_secs <'a,D>(deserializer: D) -> std::result::Result<Duration,D::Error> where D: Deserializer<'a> {
    let secs: f64 = f64::deserialize(deserializer)?;
    Duration::try_from_secs_f64( secs).map_err( serde::de::Error::custom)
}

pub fn ser_optional_duration_as_fractional_secs<S: Serializer> (dur: &Option<Duration>, s: S) -> std::result::Result<S::Ok, S::Error>  {
    dur.map( |d| d.as_secs_f64()).serialize(s)
}

pub fn de_optional_duration_from_fractional_secs <'a,D>(deserializer: D) -> std::result::Result<Option<Duration>,D::Error> where D: Deserializer<'a> {
    match Option::<f64>::deserialize(deserializer)? {
        Some(secs) => Duration::try_from_secs_f64( secs).map( Some).map_err( serde::de::Error::custom),
        None => Ok(None)
    }
}
