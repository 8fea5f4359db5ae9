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

use std::fmt;
use chrono::{DateTime,Utc};
use nalgebra::Vector3;
use serde::{Serialize,Deserialize};

/// the earth-centered reference frame a [`PositionVector`] is expressed in
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize)]
pub enum ReferenceFrame {
    /// True Equator Mean Equinox - the inertial frame SGP4 produces
    Teme,
    /// earth-centered earth-fixed
    Ecef,
}

impl fmt::Display for ReferenceFrame {
    fn fmt (&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceFrame::Teme => write!(f, "TEME"),
            ReferenceFrame::Ecef => write!(f, "ECEF"),
        }
    }
}

/// cartesian position in meters within an explicit earth-centered frame, paired with the time it refers to
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct PositionVector {
    pub time: DateTime<Utc>,
    pub frame: ReferenceFrame,
    pub x: f64,
    pub y: f64,
    pub z: f64
}

impl PositionVector {
    pub fn new (time: DateTime<Utc>, frame: ReferenceFrame, x: f64, y: f64, z: f64)->Self {
        PositionVector { time, frame, x, y, z }
    }

    pub fn from_vector (time: DateTime<Utc>, frame: ReferenceFrame, v: &Vector3<f64>)->Self {
        PositionVector { time, frame, x: v[0], y: v[1], z: v[2] }
    }

    /// SGP4 predictions are in km
    pub fn from_km (time: DateTime<Utc>, frame: ReferenceFrame, p: &[f64;3])->Self {
        PositionVector { time, frame, x: p[0] * 1000.0, y: p[1] * 1000.0, z: p[2] * 1000.0 }
    }

    pub fn to_vector (&self)->Vector3<f64> {
        Vector3::new( self.x, self.y, self.z)
    }

    pub fn length (&self)->f64 {
        ((self.x * self.x) + (self.y * self.y) + (self.z * self.z)).sqrt()
    }

    pub fn is_finite (&self)->bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// euclidian distance, regardless of frame and time
    pub fn distance (&self, other: &PositionVector)->f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx*dx + dy*dy + dz*dz).sqrt()
    }
}

impl fmt::Display for PositionVector {
    fn fmt (&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}[ {:.0}, {:.0}, {:.0} ]", self.time.format("%Y-%m-%dT%H:%M:%S"), self.frame, self.x, self.y, self.z)
    }
}
