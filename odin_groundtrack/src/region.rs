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
use serde::{Serialize,Deserialize};
use crate::{errors::{config_error,Result}, geodetic::GeodeticPoint};

/// inclusive rectangular latitude/longitude window (degrees).
/// We do not support regions that cross the antimeridian - those have to be split into two regions
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct BoundingRegion {
    pub id: String,
    pub lat_min: f64,
    pub lon_min: f64,
    pub lat_max: f64,
    pub lon_max: f64,
}

impl BoundingRegion {
    pub fn new (id: impl ToString, lat_min: f64, lon_min: f64, lat_max: f64, lon_max: f64)->Result<Self> {
        let region = BoundingRegion { id: id.to_string(), lat_min, lon_min, lat_max, lon_max };
        region.validate()?;
        Ok(region)
    }

    /// a region of given half extent (degrees) around a center point
    pub fn around (id: impl ToString, lat: f64, lon: f64, half_extent: f64)->Result<Self> {
        Self::new( id, lat - half_extent, lon - half_extent, lat + half_extent, lon + half_extent)
    }

    /// check bounds. Needs to be called for regions that were deserialized
    pub fn validate (&self)->Result<()> {
        let bounds = [self.lat_min, self.lon_min, self.lat_max, self.lon_max];
        if bounds.iter().any( |v| !v.is_finite()) {
            return Err( config_error!("region '{}' has non-finite bounds", self.id))
        }
        if self.lat_min < -90.0 || self.lat_max > 90.0 {
            return Err( config_error!("region '{}' latitude bounds outside [-90,90]", self.id))
        }
        if self.lon_min < -180.0 || self.lon_max > 180.0 {
            return Err( config_error!("region '{}' longitude bounds outside [-180,180]", self.id))
        }
        if self.lat_min > self.lat_max {
            return Err( config_error!("region '{}' has lat_min {} > lat_max {}", self.id, self.lat_min, self.lat_max))
        }
        if self.lon_min > self.lon_max {
            return Err( config_error!("region '{}' has lon_min {} > lon_max {} (antimeridian crossing not supported)", 
                                      self.id, self.lon_min, self.lon_max))
        }
        Ok(())
    }

    #[inline]
    pub fn contains (&self, p: &GeodeticPoint)->bool {
        in_region( p, self)
    }
}

impl fmt::Display for BoundingRegion {
    fn fmt (&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: [{}°,{}° .. {}°,{}°]", self.id, self.lat_min, self.lon_min, self.lat_max, self.lon_max)
    }
}

/// the region matcher - inclusive on all four bounds
#[inline]
pub fn in_region (p: &GeodeticPoint, region: &BoundingRegion)->bool {
    region.lat_min <= p.latitude() && p.latitude() <= region.lat_max &&
    region.lon_min <= p.longitude() && p.longitude() <= region.lon_max
}
