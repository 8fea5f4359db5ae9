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
use chrono::{DateTime,TimeDelta,Utc};
use tracing::{debug,warn};
use crate::{
    errors::{config_error,Result},
    model::OrbitalModel,
    position::PositionVector
};

/// regular time series of sample instants: start, start+step, .. start+(n_samples-1)*step
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct TimeGrid {
    start: DateTime<Utc>,
    step: TimeDelta,
    n_samples: usize,
}

impl TimeGrid {
    pub fn new (start: DateTime<Utc>, step: Duration, n_samples: usize)->Result<Self> {
        if step.is_zero() {
            return Err( config_error!("time step has to be positive"))
        }
        if n_samples == 0 {
            return Err( config_error!("number of samples has to be positive"))
        }
        let step = TimeDelta::from_std( step).map_err( |e| config_error!("time step out of range: {}", e))?;

        let span = i32::try_from( n_samples - 1).ok().and_then( |n| step.checked_mul( n));
        if span.and_then( |span| start.checked_add_signed( span)).is_none() {
            return Err( config_error!("time grid of {} samples exceeds representable time range", n_samples))
        }

        Ok( TimeGrid { start, step, n_samples } )
    }

    /// a grid that covers the given horizon, i.e. ceil(horizon/step) samples starting at `start`
    pub fn for_horizon (start: DateTime<Utc>, horizon: Duration, step: Duration)->Result<Self> {
        if step.is_zero() {
            return Err( config_error!("time step has to be positive"))
        }
        let n_samples = (horizon.as_secs_f64() / step.as_secs_f64()).ceil() as usize;
        Self::new( start, step, n_samples)
    }

    pub fn start (&self)->DateTime<Utc> { self.start }

    pub fn step (&self)->TimeDelta { self.step }

    pub fn n_samples (&self)->usize { self.n_samples }

    pub fn end (&self)->DateTime<Utc> { self.instant(self.n_samples - 1) }

    /// the i-th sample instant. Computed from start so that we don't accumulate rounding errors
    pub fn instant (&self, i: usize)->DateTime<Utc> {
        self.start + self.step * (i as i32)
    }

    pub fn instants (&self)->impl Iterator<Item=DateTime<Utc>> + '_ {
        (0..self.n_samples).map( |i| self.instant(i))
    }
}

/// the time ordered propagation result for one object
#[derive(Debug,Clone)]
pub struct Trajectory {
    pub object_id: u64,
    pub object_name: Option<String>,
    pub samples: Vec<PositionVector>,
}

impl Trajectory {
    pub fn len (&self)->usize { self.samples.len() }

    pub fn is_empty (&self)->bool { self.samples.is_empty() }

    pub fn times (&self)->impl Iterator<Item=DateTime<Utc>> + '_ {
        self.samples.iter().map( |p| p.time)
    }
}

/// propagate one model over all grid instants. This is all-or-nothing - the first failing sample
/// aborts the trajectory and the error is tagged with the sample index
pub fn propagate (model: &OrbitalModel, grid: &TimeGrid)->Result<Trajectory> {
    let samples = grid.instants().enumerate()
        .map( |(i,t)| model.position_at(t).map_err( |e| e.at_sample(i)))
        .collect::<Result<Vec<PositionVector>>>()?;

    let es = model.element_set();
    Ok( Trajectory { object_id: es.object_id(), object_name: es.object_name().map( |s| s.to_string()), samples } )
}

/// propagate a number of models over the same grid. Each model gets its own result so that
/// failures of one object do not affect any other
pub fn propagate_all (models: &[OrbitalModel], grid: &TimeGrid)->Vec<Result<Trajectory>> {
    models.iter().map( |model| {
        let res = propagate( model, grid);
        match &res {
            Ok(traj) => debug!("propagated {} samples for object {}", traj.len(), traj.object_id),
            Err(e) => warn!("failed to propagate object {}: {}", model.object_id(), e)
        }
        res
    }).collect()
}
