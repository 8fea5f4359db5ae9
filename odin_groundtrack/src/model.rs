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
use chrono::{DateTime,Utc};
use serde::{Serialize,Deserialize};
use tracing::debug;
use crate::{
    elements::OrbitalElementSet,
    errors::{element_error,OdinGroundTrackError,Result},
    position::{PositionVector,ReferenceFrame}
};

/// max time difference between element set epoch and propagation time we consider stable.
/// SGP4 accuracy degrades by km/day - going beyond a month does not produce meaningful ground tracks
pub const DEFAULT_MAX_EPOCH_OFFSET: Duration = Duration::from_secs( 30 * 24 * 3600);

/// the gravity model SGP4 is initialized with
#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize,Default)]
pub enum Geopotential {
    /// WGS72 in AFSPC compatibility mode. This is what published TLE sets are generated with
    #[default]
    Wgs72,
    Wgs84,
}

/// the propagation model of one tracked object: its element set plus initialized SGP4 constants.
/// OrbitalModels are read-only after construction and can be shared between threads
pub struct OrbitalModel {
    element_set: OrbitalElementSet,
    constants: sgp4::Constants,
    max_epoch_offset: Duration,
    geopotential: Geopotential,
}

impl OrbitalModel {
    pub fn new (element_set: OrbitalElementSet)->Result<Self> {
        Self::with_max_epoch_offset( element_set, DEFAULT_MAX_EPOCH_OFFSET)
    }

    pub fn with_max_epoch_offset (element_set: OrbitalElementSet, max_epoch_offset: Duration)->Result<Self> {
        Self::with_settings( element_set, max_epoch_offset, Geopotential::default())
    }

    pub fn with_settings (element_set: OrbitalElementSet, max_epoch_offset: Duration, geopotential: Geopotential)->Result<Self> {
        element_set.validate()?;

        let constants = match geopotential {
            Geopotential::Wgs72 => sgp4::Constants::from_elements_afspc_compatibility_mode( element_set.elements()),
            Geopotential::Wgs84 => sgp4::Constants::from_elements( element_set.elements()),
        }.map_err( |e| element_error!("object {}: SGP4 initialization failed: {}", element_set.object_id(), e))?;
        debug!("initialized {:?} orbital model for {}", geopotential, element_set);

        Ok( OrbitalModel { element_set, constants, max_epoch_offset, geopotential } )
    }

    pub fn element_set (&self)->&OrbitalElementSet { &self.element_set }

    pub fn object_id (&self)->u64 { self.element_set.object_id() }

    pub fn epoch (&self)->DateTime<Utc> { self.element_set.epoch() }

    pub fn max_epoch_offset (&self)->Duration { self.max_epoch_offset }

    pub fn geopotential (&self)->Geopotential { self.geopotential }

    /// the TEME position (in meters) of this object at the given time
    pub fn position_at (&self, t: DateTime<Utc>)->Result<PositionVector> {
        let dt = (t - self.epoch()).abs();
        let in_range = dt.to_std().map( |d| d <= self.max_epoch_offset).unwrap_or(false);
        if !in_range {
            return Err( self.propagation_error( t, format!("{} days from epoch exceeds stable range of {} days",
                dt.num_seconds() as f64 / 86400.0, self.max_epoch_offset.as_secs_f64() / 86400.0)))
        }

        let minutes = self.element_set.elements().datetime_to_minutes_since_epoch( &t.naive_utc())
            .map_err( |e| self.propagation_error( t, format!("{e:?}")))?;
        let prediction = match self.geopotential {
            Geopotential::Wgs72 => self.constants.propagate_afspc_compatibility_mode( minutes),
            Geopotential::Wgs84 => self.constants.propagate( minutes),
        }.map_err( |e| self.propagation_error( t, e.to_string()))?;

        let p = PositionVector::from_km( t, ReferenceFrame::Teme, &prediction.position);
        if !p.is_finite() {
            return Err( self.propagation_error( t, "non-finite position".to_string()))
        }

        Ok(p)
    }

    fn propagation_error (&self, time: DateTime<Utc>, reason: String)->OdinGroundTrackError {
        OdinGroundTrackError::PropagationError { object_id: self.object_id(), index: None, time, reason }
    }
}
