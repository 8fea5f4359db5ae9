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

use std::{collections::{HashMap,HashSet}, fmt, sync::Arc, time::Duration};
use chrono::{DateTime,Utc};
use serde::{Serialize,Deserialize};
use tracing::{debug,info,warn};
use crate::{
    de_duration_from_fractional_secs, ser_duration_as_fractional_secs,
    de_optional_duration_from_fractional_secs, ser_optional_duration_as_fractional_secs,
    elements::OrbitalElementSet,
    errors::{config_error,OdinGroundTrackError,Result},
    geodetic::{CoordinateTransform,GeodeticPoint,TransformConfig},
    model::{Geopotential,OrbitalModel,DEFAULT_MAX_EPOCH_OFFSET},
    propagation::{propagate,TimeGrid},
    region::BoundingRegion,
    scheduler::{BatchOutcome,BatchScheduler,Executor,PassEvent,ThreadPoolExecutor,WorkItem},
};

/* #region configuration data **************************************************************************************/

/// which regions an object is tested against if its element set does not declare any
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize,Default)]
pub enum RegionAssociation {
    /// every object against every region
    #[default]
    AllRegions,

    /// NORAD catalog number -> region ids. Objects not in the map are not tested
    ByObject( HashMap<u64,Vec<String>> ),
}

/// configuration of a pass prediction run, usually loaded from a RON file
#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct PassConfig {
    /// first sample time. If not set we use the time the predictor is created
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,

    #[serde(serialize_with="ser_duration_as_fractional_secs", deserialize_with="de_duration_from_fractional_secs")]
    pub horizon: Duration,

    #[serde(serialize_with="ser_duration_as_fractional_secs", deserialize_with="de_duration_from_fractional_secs")]
    pub step: Duration,

    #[serde(default)]
    pub transform: TransformConfig,

    /// worker pool size for region matching (0 = number of available cores)
    #[serde(default)]
    pub workers: usize,

    /// upper bound for the objects x samples x regions cross product
    #[serde(default="default_max_items")]
    pub max_items: usize,

    /// optional wall clock limit for the matching stage
    #[serde(default, serialize_with="ser_optional_duration_as_fractional_secs", deserialize_with="de_optional_duration_from_fractional_secs")]
    pub max_runtime: Option<Duration>,

    /// max distance of sample times from element set epochs
    #[serde(default="default_max_epoch_offset", serialize_with="ser_duration_as_fractional_secs", deserialize_with="de_duration_from_fractional_secs")]
    pub max_epoch_offset: Duration,

    /// SGP4 gravity model
    #[serde(default)]
    pub geopotential: Geopotential,

    pub regions: Vec<BoundingRegion>,

    #[serde(default)]
    pub association: RegionAssociation,
}

fn default_max_items()->usize { 50_000_000 }

fn default_max_epoch_offset()->Duration { DEFAULT_MAX_EPOCH_OFFSET }

impl Default for PassConfig {
    /// one day in one minute steps, starting now
    fn default()->Self {
        PassConfig {
            start: None,
            horizon: Duration::from_secs( 24 * 3600),
            step: Duration::from_secs( 60),
            transform: TransformConfig::default(),
            workers: 0,
            max_items: default_max_items(),
            max_runtime: None,
            max_epoch_offset: DEFAULT_MAX_EPOCH_OFFSET,
            geopotential: Geopotential::default(),
            regions: vec![
                BoundingRegion { id: "default".to_string(), lat_min: 16.56673, lon_min: 103.48196, lat_max: 16.76673, lon_max: 103.68196 }
            ],
            association: RegionAssociation::AllRegions,
        }
    }
}

impl PassConfig {
    /// everything we can check before we start computing
    pub fn validate (&self)->Result<()> {
        if self.step.is_zero() {
            return Err( config_error!("time step has to be positive"))
        }
        if self.horizon.is_zero() {
            return Err( config_error!("time horizon has to be positive"))
        }
        if self.max_epoch_offset.is_zero() {
            return Err( config_error!("max epoch offset has to be positive"))
        }
        if self.regions.is_empty() {
            return Err( config_error!("no regions configured"))
        }

        let mut ids: HashSet<&str> = HashSet::with_capacity( self.regions.len());
        for r in &self.regions {
            r.validate()?;
            if !ids.insert( r.id.as_str()) {
                return Err( config_error!("duplicate region id '{}'", r.id))
            }
        }

        if let RegionAssociation::ByObject(map) = &self.association {
            for (object_id, region_ids) in map {
                if let Some(unknown) = region_ids.iter().find( |id| !ids.contains( id.as_str())) {
                    return Err( config_error!("unknown region '{}' associated with object {}", unknown, object_id))
                }
            }
        }

        Ok(())
    }
}

/* #endregion configuration data */

/// a failure that is confined to one object (or one of its samples)
#[derive(Debug)]
pub struct PassFailure {
    pub object_id: u64,
    pub error: OdinGroundTrackError,
}

impl fmt::Display for PassFailure {
    fn fmt (&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object {}: {}", self.object_id, self.error)
    }
}

/// the annotated result of a run: pass events in object/time/region order plus all isolated failures
#[derive(Debug)]
pub struct PassReport {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub n_samples: usize,
    pub n_objects: usize,
    pub events: Vec<PassEvent>,
    pub failures: Vec<PassFailure>,
}

impl PassReport {
    pub fn events_for (&self, object_id: u64)->impl Iterator<Item=&PassEvent> {
        self.events.iter().filter( move |e| e.object_id == object_id)
    }

    pub fn failures_for (&self, object_id: u64)->impl Iterator<Item=&PassFailure> {
        self.failures.iter().filter( move |f| f.object_id == object_id)
    }
}

/// the geodetic samples of one successfully propagated object
struct ObjectTrack {
    object_id: u64,
    object_name: Option<Arc<str>>,
    regions: Vec<Arc<BoundingRegion>>,
    samples: Vec<(DateTime<Utc>,GeodeticPoint)>,
}

impl ObjectTrack {
    /// time-major, then region order
    fn work_items (&self)->Vec<WorkItem> {
        self.samples.iter().flat_map( |(time,point)| {
            self.regions.iter().map( move |region| WorkItem {
                object_id: self.object_id,
                object_name: self.object_name.clone(),
                time: *time,
                point: *point,
                region: region.clone()
            })
        }).collect()
    }
}

/// the object that wires propagation, coordinate transform, region matching and scheduling together
pub struct PassPredictor<E: Executor> {
    config: PassConfig,
    grid: TimeGrid,
    transform: CoordinateTransform,
    regions: HashMap<String,Arc<BoundingRegion>>,
    region_order: Vec<String>,
    scheduler: BatchScheduler<E>,
}

impl PassPredictor<ThreadPoolExecutor> {
    /// predictor that uses a rayon pool with the configured number of workers
    pub fn with_thread_pool (config: PassConfig)->Result<Self> {
        config.validate()?;
        let executor = ThreadPoolExecutor::new( config.workers)?;
        Self::new( config, executor)
    }
}

impl <E: Executor> PassPredictor<E> {
    pub fn new (config: PassConfig, executor: E)->Result<Self> {
        config.validate()?;

        let start = config.start.unwrap_or_else( Utc::now);
        let grid = TimeGrid::for_horizon( start, config.horizon, config.step)?;
        let transform = CoordinateTransform::new( config.transform);
        let region_order: Vec<String> = config.regions.iter().map( |r| r.id.clone()).collect();
        let regions: HashMap<String,Arc<BoundingRegion>> = config.regions.iter().map( |r| (r.id.clone(), Arc::new(r.clone()))).collect();
        let scheduler = BatchScheduler::new( executor, config.max_items, config.max_runtime);

        Ok( PassPredictor { config, grid, transform, regions, region_order, scheduler } )
    }

    pub fn config (&self)->&PassConfig { &self.config }

    pub fn grid (&self)->&TimeGrid { &self.grid }

    pub fn transform (&self)->&CoordinateTransform { &self.transform }

    /// the regions an element set is tested against, in configuration order
    pub fn regions_for (&self, es: &OrbitalElementSet)->Result<Vec<Arc<BoundingRegion>>> {
        let ids: Vec<&String> = if !es.region_ids().is_empty() {
            es.region_ids().iter().collect()
        } else {
            match &self.config.association {
                RegionAssociation::AllRegions => self.region_order.iter().collect(),
                RegionAssociation::ByObject(map) => map.get( &es.object_id()).map( |ids| ids.iter().collect()).unwrap_or_default()
            }
        };

        ids.into_iter().map( |id| {
            self.regions.get( id).cloned().ok_or_else( || config_error!("unknown region '{}' for object {}", id, es.object_id()))
        }).collect()
    }

    /// compute pass events for all provided element sets. Configuration errors (unknown region ids, too many
    /// work items) are returned before any propagation starts, all other errors are confined to their objects
    /// and reported in the result.
    /// Objects are processed one at a time so that we never hold more than one object's samples and work items.
    /// Item indices of failures are global across the run
    pub fn predict (&self, element_sets: Vec<OrbitalElementSet>)->Result<PassReport> {
        let n_objects = element_sets.len();
        let n_samples = self.grid.n_samples();

        let associated = element_sets.into_iter()
            .map( |es| self.regions_for(&es).map( |regions| (es, regions)))
            .collect::<Result<Vec<_>>>()?;

        let n_items: usize = associated.iter().map( |(_,regions)| regions.len() * n_samples).sum();
        self.scheduler.check_item_count( n_items)?;

        let deadline = self.scheduler.deadline();
        let mut events: Vec<PassEvent> = Vec::new();
        let mut failures: Vec<PassFailure> = Vec::new();
        let mut next_index = 0;

        for (es,regions) in associated.into_iter().filter( |(_,regions)| !regions.is_empty()) {
            let object_id = es.object_id();

            let (track, transform_failures) = match self.track( es, regions) {
                Ok(res) => res,
                Err(error) => {
                    warn!("object {} skipped: {}", object_id, error);
                    failures.push( PassFailure { object_id, error });
                    continue
                }
            };
            failures.extend( transform_failures.into_iter().map( |error| PassFailure { object_id, error }));

            let items = track.work_items();
            drop( track);
            let n = items.len();

            let BatchOutcome { events: object_events, failures: item_failures, .. } = self.scheduler.run_chunk( items, next_index, deadline)?;
            debug!("object {}: {} pass events", object_id, object_events.len());
            events.extend( object_events);
            failures.extend( item_failures.into_iter().map( |error| PassFailure { object_id, error }));
            next_index += n;
        }

        info!("{} pass events for {} objects over {} samples ({} failures)", events.len(), n_objects, n_samples, failures.len());

        Ok( PassReport {
            start: self.grid.start(),
            end: self.grid.end(),
            n_samples,
            n_objects,
            events,
            failures
        })
    }

    /// propagate and transform one object. Samples that fail to transform are returned as errors and
    /// left out of the track
    fn track (&self, es: OrbitalElementSet, regions: Vec<Arc<BoundingRegion>>)->Result<(ObjectTrack,Vec<OdinGroundTrackError>)> {
        let model = OrbitalModel::with_settings( es, self.config.max_epoch_offset, self.config.geopotential)?;
        let trajectory = propagate( &model, &self.grid)?;
        let points = self.transform.to_geodetic_batch( &trajectory.samples);

        let (samples, errors) = trajectory.samples.iter().zip( points).fold( (Vec::with_capacity( trajectory.len()), Vec::new()),
            |(mut samples, mut errors), (p,res)| {
                match res {
                    Ok(gp) => samples.push( (p.time, gp)),
                    Err(e) => errors.push( e)
                }
                (samples, errors)
            });

        let track = ObjectTrack { object_id: trajectory.object_id, object_name: trajectory.object_name.map( Arc::from), regions, samples };
        Ok( (track, errors) )
    }
}
