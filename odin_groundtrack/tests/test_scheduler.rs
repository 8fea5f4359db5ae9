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
#![allow(unused)]

use std::{sync::Arc, thread, time::{Duration,Instant}};
use chrono::{DateTime,TimeDelta,TimeZone,Utc};
use tokio::runtime::Runtime;
use odin_groundtrack::{
    errors::OdinGroundTrackError,
    BatchScheduler, BlockingTaskExecutor, BoundingRegion, Executor, GeodeticPoint, SequentialExecutor, ThreadPoolExecutor, WorkItem
};

/// unit tests for executors and batch scheduler
/// run with "cargo test --test test_scheduler -- --nocapture"

fn t0 ()->DateTime<Utc> {
    Utc.with_ymd_and_hms( 2025, 3, 18, 6, 30, 0).unwrap()
}

fn items (points: &[(f64,f64)], region: &Arc<BoundingRegion>)->Vec<WorkItem> {
    let name: Arc<str> = Arc::from("TEST");
    points.iter().enumerate().map( |(i,(lat,lon))| WorkItem {
        object_id: 42,
        object_name: Some( name.clone()),
        time: t0() + TimeDelta::minutes( i as i64),
        point: GeodeticPoint::new( *lat, *lon, 500_000.0),
        region: region.clone()
    }).collect()
}

/// later items finish first
fn check_order<E: Executor> (executor: &E) {
    let input: Vec<usize> = (0..32).collect();
    let output = executor.map_ordered( input.clone(), |i| {
        thread::sleep( Duration::from_millis( (32 - i as u64) / 4));
        i * 2
    });
    let expected: Vec<usize> = input.iter().map( |i| i * 2).collect();
    assert_eq!( output, expected);
}

#[test]
fn test_executor_order () {
    check_order( &SequentialExecutor);
    check_order( &ThreadPoolExecutor::new(4).unwrap());

    let rt = Runtime::new().unwrap();
    check_order( &BlockingTaskExecutor::new( rt.handle().clone(), 5));
}

#[test]
fn test_empty_batch () {
    let executor = ThreadPoolExecutor::new(2).unwrap();
    let output: Vec<u32> = executor.map_ordered( Vec::<u32>::new(), |i| i);
    assert!( output.is_empty());

    let rt = Runtime::new().unwrap();
    let executor = BlockingTaskExecutor::new( rt.handle().clone(), 3);
    let output: Vec<u32> = executor.map_ordered( Vec::<u32>::new(), |i| i);
    assert!( output.is_empty());
}

#[test]
fn test_order_preservation () {
    let region = Arc::new( BoundingRegion::new( "r", 0.0, 0.0, 1.0, 1.0).unwrap());
    let points: Vec<(f64,f64)> = (0..1000).map( |i| if i % 3 == 0 { (0.5, 0.5) } else { (2.0, 0.5) }).collect();

    let scheduler = BatchScheduler::new( ThreadPoolExecutor::new(8).unwrap(), 10_000, None);
    let outcome = scheduler.run( items( &points, &region)).unwrap();

    assert_eq!( outcome.n_items, 1000);
    assert!( outcome.failures.is_empty());
    assert_eq!( outcome.events.len(), 334);
    for i in 1..outcome.events.len() {
        assert!( outcome.events[i-1].time < outcome.events[i].time);
    }
    assert_eq!( outcome.events[1].time, t0() + TimeDelta::minutes(3));
}

#[test]
fn test_failure_isolation () {
    let region = Arc::new( BoundingRegion::new( "r", 0.0, 0.0, 1.0, 1.0).unwrap());
    let points = [ (0.1, 0.1), (0.2, 0.2), (f64::NAN, 0.3), (0.4, 0.4), (0.5, 0.5) ];

    let scheduler = BatchScheduler::new( ThreadPoolExecutor::new(4).unwrap(), 100, None);
    let outcome = scheduler.run( items( &points, &region)).unwrap();

    assert_eq!( outcome.events.len(), 4);
    let lats: Vec<f64> = outcome.events.iter().map( |e| e.point.latitude()).collect();
    assert_eq!( lats, vec![0.1, 0.2, 0.4, 0.5]);

    assert_eq!( outcome.failures.len(), 1);
    let e = &outcome.failures[0];
    println!("{e}");
    assert!( matches!( e, OdinGroundTrackError::TransformError{..}));
    assert_eq!( e.index(), Some(2));
}

#[test]
fn test_item_limit () {
    let region = Arc::new( BoundingRegion::new( "r", 0.0, 0.0, 1.0, 1.0).unwrap());
    let points = [ (0.1, 0.1); 5];

    let scheduler = BatchScheduler::new( SequentialExecutor, 3, None);
    assert!( matches!( scheduler.run( items( &points, &region)), Err(OdinGroundTrackError::ConfigurationError(_))));
}

#[test]
fn test_deadline () {
    let region = Arc::new( BoundingRegion::new( "r", 0.0, 0.0, 1.0, 1.0).unwrap());
    let points = [ (0.1, 0.1); 5];

    let scheduler = BatchScheduler::new( SequentialExecutor, 10, Some(Duration::ZERO));
    let outcome = scheduler.run( items( &points, &region)).unwrap();

    assert!( outcome.events.is_empty());
    assert_eq!( outcome.failures.len(), 5);
    for (i,e) in outcome.failures.iter().enumerate() {
        assert!( matches!( e, OdinGroundTrackError::DeadlineExceeded{ index } if *index == i));
    }
}

#[test]
fn test_chunk_indices () {
    let region = Arc::new( BoundingRegion::new( "r", 0.0, 0.0, 1.0, 1.0).unwrap());
    let points = [ (0.1, 0.1), (f64::NAN, 0.2), (0.3, 0.3)];
    let scheduler = BatchScheduler::new( SequentialExecutor, 10, None);

    let outcome = scheduler.run_chunk( items( &points, &region), 100, None).unwrap();
    assert_eq!( outcome.events.len(), 2);
    assert_eq!( outcome.failures.len(), 1);
    assert_eq!( outcome.failures[0].index(), Some(101));

    // a deadline that already passed (e.g. during a previous chunk of the same run)
    let outcome = scheduler.run_chunk( items( &points, &region), 100, Some( Instant::now())).unwrap();
    assert!( outcome.events.is_empty());
    let indices: Vec<Option<usize>> = outcome.failures.iter().map( |e| e.index()).collect();
    assert_eq!( indices, vec![Some(100), Some(101), Some(102)]);
}

#[test]
fn test_shared_object_name () {
    let region = Arc::new( BoundingRegion::new( "r", 0.0, 0.0, 1.0, 1.0).unwrap());
    let work = items( &[ (0.1, 0.1); 3], &region);

    let name = work[0].object_name.as_ref().unwrap();
    assert!( work.iter().all( |item| item.object_name.as_ref().is_some_and( |n| Arc::ptr_eq( n, name))));
    println!("size of WorkItem: {} bytes", std::mem::size_of::<WorkItem>());

    let outcome = BatchScheduler::new( SequentialExecutor, 10, None).run( work.clone()).unwrap();
    assert!( outcome.events.iter().all( |e| e.object_name.as_deref() == Some("TEST")));
}

#[test]
fn test_executors_agree () {
    let region = Arc::new( BoundingRegion::new( "r", -10.0, -10.0, 10.0, 10.0).unwrap());
    let points: Vec<(f64,f64)> = (0..200).map( |i| ((i as f64 * 0.37).sin() * 20.0, (i as f64 * 0.11).cos() * 20.0)).collect();

    let seq = BatchScheduler::new( SequentialExecutor, 1000, None).run( items( &points, &region)).unwrap();
    let par = BatchScheduler::new( ThreadPoolExecutor::new(0).unwrap(), 1000, None).run( items( &points, &region)).unwrap();

    let rt = Runtime::new().unwrap();
    let blk = BatchScheduler::new( BlockingTaskExecutor::new( rt.handle().clone(), 7), 1000, None).run( items( &points, &region)).unwrap();

    assert!( !seq.events.is_empty());
    assert_eq!( seq.events, par.events);
    assert_eq!( seq.events, blk.events);
}
