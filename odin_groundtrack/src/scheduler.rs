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

use std::{fmt, panic, sync::Arc, time::{Duration,Instant}};
use chrono::{DateTime,Utc};
use rayon::{ThreadPool,ThreadPoolBuilder,prelude::*};
use serde::{Serialize,Deserialize};
use tokio::{runtime::Handle,task::JoinSet};
use tracing::{debug,warn};
use crate::{
    errors::{config_error,transform_error,OdinGroundTrackError,Result},
    geodetic::GeodeticPoint,
    region::{in_region,BoundingRegion}
};

/* #region executors ********************************************************************************************/

/// abstraction of "apply this pure function to all items, possibly in parallel".
/// Implementors have to return results in input order, regardless of completion order
pub trait Executor {
    fn map_ordered<T,R,F> (&self, items: Vec<T>, f: F)->Vec<R>
        where T: Send + 'static, R: Send + 'static, F: Fn(T)->R + Send + Sync + 'static;

    /// number of concurrent workers
    fn concurrency (&self)->usize;
}

/// runs everything in the calling thread
#[derive(Debug,Clone,Copy,Default)]
pub struct SequentialExecutor;

impl Executor for SequentialExecutor {
    fn map_ordered<T,R,F> (&self, items: Vec<T>, f: F)->Vec<R>
        where T: Send + 'static, R: Send + 'static, F: Fn(T)->R + Send + Sync + 'static
    {
        items.into_iter().map(f).collect()
    }

    fn concurrency (&self)->usize { 1 }
}

/// dedicated rayon thread pool. Rayon's indexed collect keeps input order
pub struct ThreadPoolExecutor {
    pool: ThreadPool,
}

impl ThreadPoolExecutor {
    /// create a pool with the given number of threads (0 means number of available cores)
    pub fn new (n_threads: usize)->Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads( n_threads)
            .thread_name( |i| format!("groundtrack-{i}"))
            .build()
            .map_err( |e| config_error!("failed to create thread pool: {}", e))?;
        Ok( ThreadPoolExecutor { pool } )
    }
}

impl Executor for ThreadPoolExecutor {
    fn map_ordered<T,R,F> (&self, items: Vec<T>, f: F)->Vec<R>
        where T: Send + 'static, R: Send + 'static, F: Fn(T)->R + Send + Sync + 'static
    {
        self.pool.install( || items.into_par_iter().map(f).collect())
    }

    fn concurrency (&self)->usize { self.pool.current_num_threads() }
}

/// runs chunks of items as tokio blocking tasks on the provided runtime and joins them by chunk index.
/// Note that `map_ordered` blocks the caller and hence must not be called from within an async context
pub struct BlockingTaskExecutor {
    handle: Handle,
    n_tasks: usize,
}

impl BlockingTaskExecutor {
    pub fn new (handle: Handle, n_tasks: usize)->Self {
        BlockingTaskExecutor { handle, n_tasks: n_tasks.max(1) }
    }
}

impl Executor for BlockingTaskExecutor {
    fn map_ordered<T,R,F> (&self, items: Vec<T>, f: F)->Vec<R>
        where T: Send + 'static, R: Send + 'static, F: Fn(T)->R + Send + Sync + 'static
    {
        let chunk_len = items.len().div_ceil( self.n_tasks).max(1);
        let mut chunks: Vec<Vec<T>> = Vec::with_capacity( self.n_tasks);
        let mut it = items.into_iter().peekable();
        while it.peek().is_some() {
            chunks.push( it.by_ref().take( chunk_len).collect());
        }
        let n_chunks = chunks.len();
        let f = Arc::new(f);

        self.handle.block_on( async move {
            let mut join_set = JoinSet::new();
            for (ci,chunk) in chunks.into_iter().enumerate() {
                let f = f.clone();
                join_set.spawn_blocking( move || (ci, chunk.into_iter().map( |t| (*f)(t)).collect::<Vec<R>>()));
            }

            let mut results: Vec<Option<Vec<R>>> = (0..n_chunks).map( |_| None).collect();
            while let Some(res) = join_set.join_next().await {
                match res {
                    Ok((ci,rs)) => results[ci] = Some(rs),
                    Err(e) if e.is_panic() => panic::resume_unwind( e.into_panic()),
                    Err(e) => panic!("blocking map task did not complete: {e}")
                }
            }
            results.into_iter().flatten().flatten().collect()
        })
    }

    fn concurrency (&self)->usize { self.n_tasks }
}

/* #endregion executors */

/// the result record of the region matching
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct PassEvent {
    pub object_id: u64,
    pub object_name: Option<String>,
    pub region_id: String,
    pub time: DateTime<Utc>,
    pub point: GeodeticPoint,
}

impl fmt::Display for PassEvent {
    fn fmt (&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Time: {}, Object: {} ({}), Region: {}, Latitude: {:.5}, Longitude: {:.5}, Altitude: {:.0} m",
            self.time.format("%Y-%m-%d %H:%M:%S"), self.object_id, self.object_name.as_deref().unwrap_or("?"),
            self.region_id, self.point.latitude(), self.point.longitude(), self.point.altitude())
    }
}

/// one independent unit of region matching work. Object name and region are shared between all
/// items of an object so that an item does not own any heap data
#[derive(Debug,Clone)]
pub struct WorkItem {
    pub object_id: u64,
    pub object_name: Option<Arc<str>>,
    pub time: DateTime<Utc>,
    pub point: GeodeticPoint,
    pub region: Arc<BoundingRegion>,
}

/// matches in input order plus per-item failures (tagged with the item index)
#[derive(Debug,Default)]
pub struct BatchOutcome {
    pub n_items: usize,
    pub events: Vec<PassEvent>,
    pub failures: Vec<OdinGroundTrackError>,
}

/// fans region matching out over an [`Executor`]
pub struct BatchScheduler<E: Executor> {
    executor: E,
    max_items: usize,
    max_runtime: Option<Duration>,
}

impl <E: Executor> BatchScheduler<E> {
    pub fn new (executor: E, max_items: usize, max_runtime: Option<Duration>)->Self {
        BatchScheduler { executor, max_items, max_runtime }
    }

    pub fn max_items (&self)->usize { self.max_items }

    /// checked before we start any matching
    pub fn check_item_count (&self, n_items: usize)->Result<()> {
        if n_items > self.max_items {
            Err( config_error!("{} work items exceed the limit of {}", n_items, self.max_items))
        } else {
            Ok(())
        }
    }

    /// the wall clock deadline for a run that starts now
    pub fn deadline (&self)->Option<Instant> {
        self.max_runtime.map( |d| Instant::now() + d)
    }

    pub fn run (&self, items: Vec<WorkItem>)->Result<BatchOutcome> {
        self.run_chunk( items, 0, self.deadline())
    }

    /// match one chunk of a larger run. Failures are tagged with `first_index` + position within the chunk,
    /// the deadline is the one of the whole run
    pub fn run_chunk (&self, items: Vec<WorkItem>, first_index: usize, deadline: Option<Instant>)->Result<BatchOutcome> {
        let n_items = items.len();
        self.check_item_count( n_items)?;
        debug!("matching {} items starting at {} with {} workers", n_items, first_index, self.executor.concurrency());

        let indexed: Vec<(usize,WorkItem)> = items.into_iter().enumerate().map( |(i,item)| (first_index + i, item)).collect();
        let results = self.executor.map_ordered( indexed, move |(i,item)| evaluate( i, item, deadline));

        let outcome = results.into_iter().fold( BatchOutcome{ n_items, ..Default::default() }, |mut acc, res| {
            match res {
                Ok(Some(event)) => acc.events.push( event),
                Ok(None) => {}
                Err(e) => acc.failures.push( e)
            }
            acc
        });

        if !outcome.failures.is_empty() {
            warn!("{} of {} work items failed", outcome.failures.len(), n_items);
        }
        debug!("{} pass events in {} work items", outcome.events.len(), n_items);

        Ok(outcome)
    }
}

/// the per-item work function. Only depends on its own inputs
fn evaluate (index: usize, item: WorkItem, deadline: Option<Instant>)->Result<Option<PassEvent>> {
    if deadline.is_some_and( |d| Instant::now() >= d) {
        return Err( OdinGroundTrackError::DeadlineExceeded { index })
    }
    if let Some(reason) = item.point.invalid_reason() {
        return Err( transform_error!( index, "{}", reason))
    }

    if in_region( &item.point, &item.region) {
        let WorkItem { object_id, object_name, time, point, region } = item;
        let object_name = object_name.map( |s| s.to_string());
        Ok( Some( PassEvent { object_id, object_name, region_id: region.id.clone(), time, point }))
    } else {
        Ok( None)
    }
}
