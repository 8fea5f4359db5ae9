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

use odin_groundtrack::{errors::OdinGroundTrackError, tle::{load_tle_file, parse_tle_sets}};

/// unit tests for the TLE reader
/// run with "cargo test --test test_tle -- --nocapture"

const LINE1: &str = "1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992";
const LINE2: &str = "2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008";

#[test]
fn test_three_line_sets () {
    let path = concat!( env!("CARGO_MANIFEST_DIR"), "/configs/stations.tle");
    let sets = load_tle_file( path).unwrap();
    assert_eq!( sets.len(), 2);

    let iss = sets[0].as_ref().unwrap();
    println!("{iss}");
    assert_eq!( iss.object_id(), 25544);
    assert_eq!( iss.object_name(), Some("ISS (ZARYA)"));

    let noaa = sets[1].as_ref().unwrap();
    println!("{noaa}");
    assert_eq!( noaa.object_id(), 54234);
    assert_eq!( noaa.object_name(), Some("NOAA 21")); // "0 " prefix stripped
}

#[test]
fn test_two_line_set () {
    let text = format!("{LINE1}\n{LINE2}\n");
    let sets = parse_tle_sets( &text);
    assert_eq!( sets.len(), 1);

    let es = sets[0].as_ref().unwrap();
    assert_eq!( es.object_id(), 25544);
    assert_eq!( es.object_name(), None);
}

#[test]
fn test_broken_sets () {
    // first set is missing its second data line, second set has a corrupted inclination field
    let corrupted = LINE2.replace( "51.6461", "5x.6461");
    let text = format!("BROKEN\n{LINE1}\nCORRUPTED\n{LINE1}\n{corrupted}\nISS (ZARYA)\n{LINE1}\n{LINE2}\n");
    let sets = parse_tle_sets( &text);

    for s in &sets {
        match s {
            Ok(es) => println!("ok: {es}"),
            Err(e) => println!("failed: {e}")
        }
    }

    assert_eq!( sets.len(), 3);
    assert!( matches!( sets[0], Err(OdinGroundTrackError::ElementSetError(_))));
    assert!( matches!( sets[1], Err(OdinGroundTrackError::ElementSetError(_))));
    assert_eq!( sets[2].as_ref().unwrap().object_name(), Some("ISS (ZARYA)"));
}
