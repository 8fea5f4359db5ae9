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
use crate::errors::{element_error,Result};

/// the orbital elements of one tracked object as they come out of the TLE parser, plus the
/// identifiers of the bounding regions this object should be checked against (empty means
/// the [`crate::pipeline::RegionAssociation`] of the run decides).
/// OrbitalElementSets are immutable once constructed
#[derive(Debug,Clone)]
pub struct OrbitalElementSet {
    elements: sgp4::Elements,
    region_ids: Vec<String>,
}

impl OrbitalElementSet {
    pub fn new (elements: sgp4::Elements, region_ids: Vec<String>)->Self {
        OrbitalElementSet { elements, region_ids }
    }

    /// parse from the two TLE data lines and an optional name line
    pub fn from_tle (name: Option<&str>, line1: &str, line2: &str)->Result<Self> {
        let object_name = name.map( |s| s.trim().to_string()).filter( |s| !s.is_empty());
        let elements = sgp4::Elements::from_tle( object_name, line1.as_bytes(), line2.as_bytes())
            .map_err( |e| element_error!("TLE import failed: {}", e))?;
        Ok( OrbitalElementSet::new( elements, Vec::new()) )
    }

    /// return a copy that is tested against the given regions
    pub fn with_region_ids (&self, region_ids: Vec<String>)->Self {
        OrbitalElementSet { elements: self.elements.clone(), region_ids }
    }

    pub fn elements (&self)->&sgp4::Elements { &self.elements }

    pub fn region_ids (&self)->&[String] { &self.region_ids }

    /// the NORAD catalog number
    pub fn object_id (&self)->u64 { self.elements.norad_id }

    pub fn object_name (&self)->Option<&str> { self.elements.object_name.as_deref() }

    pub fn epoch (&self)->DateTime<Utc> { self.elements.datetime.and_utc() }

    /// inclination in degrees
    pub fn inclination (&self)->f64 { self.elements.inclination }

    pub fn eccentricity (&self)->f64 { self.elements.eccentricity }

    /// mean motion in revolutions per day
    pub fn mean_motion (&self)->f64 { self.elements.mean_motion }

    /// check the physical consistency of the elements. This does not replace the SGP4 initialization
    /// checks but catches the obvious cases before we get there
    pub fn validate (&self)->Result<()> {
        let e = &self.elements;
        if !(e.eccentricity.is_finite() && (0.0..1.0).contains( &e.eccentricity)) {
            return Err( element_error!("object {}: eccentricity {} not in [0,1)", e.norad_id, e.eccentricity))
        }
        if !(e.inclination.is_finite() && (0.0..=180.0).contains( &e.inclination)) {
            return Err( element_error!("object {}: inclination {}° not in [0,180]", e.norad_id, e.inclination))
        }
        if !(e.mean_motion.is_finite() && e.mean_motion > 0.0) {
            return Err( element_error!("object {}: non-physical mean motion {}", e.norad_id, e.mean_motion))
        }
        Ok(())
    }
}

impl fmt::Display for OrbitalElementSet {
    fn fmt (&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OrbitalElementSet( id:{}, name:{}, epoch:{}, incl:{:.4}°, ecc:{:.7}, rev/day:{:.8})",
            self.object_id(), self.object_name().unwrap_or("?"), self.epoch(),
            self.inclination(), self.eccentricity(), self.mean_motion())
    }
}
