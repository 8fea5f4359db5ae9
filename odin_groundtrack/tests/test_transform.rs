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

use chrono::{DateTime,TimeZone,Utc};
use nalgebra::Vector3;
use odin_groundtrack::{
    errors::OdinGroundTrackError,
    geodetic::{ecef_to_geodetic, ecef_to_teme, geodetic_to_ecef, gmst, teme_to_ecef},
    CoordinateTransform, Ellipsoid, GeodeticPoint, PositionVector, ReferenceFrame, TransformConfig
};

/// unit tests for the coordinate transform
/// run with "cargo test --test test_transform -- --nocapture"

fn t0 ()->DateTime<Utc> {
    Utc.with_ymd_and_hms( 2025, 3, 18, 6, 30, 0).unwrap()
}

fn ecef_transform ()->CoordinateTransform {
    CoordinateTransform::new( TransformConfig { source_frame: ReferenceFrame::Ecef, ellipsoid: Ellipsoid::Wgs84 })
}

#[test]
fn test_equator_point () {
    let a = Ellipsoid::Wgs84.semi_major_axis();
    let v = geodetic_to_ecef( &GeodeticPoint::new( 0.0, 0.0, 0.0), &Ellipsoid::Wgs84);
    assert!( (v[0] - a).abs() < 1e-6 && v[1].abs() < 1e-6 && v[2].abs() < 1e-6);

    let gp = ecef_to_geodetic( &Vector3::new( a + 500_000.0, 0.0, 0.0), &Ellipsoid::Wgs84);
    println!("{gp}");
    assert!( gp.latitude().abs() < 1e-9);
    assert!( gp.longitude().abs() < 1e-9);
    assert!( (gp.altitude() - 500_000.0).abs() < 1e-3);
}

#[test]
fn test_geodetic_roundtrip () {
    let points = [
        (16.66673, 103.58196, 0.0),
        (-33.8688, 151.2093, 830_000.0),
        (37.30877, -122.44855, 420_000.0),
        (89.5, -45.0, 1_200_000.0),
        (-89.9, 179.9, 500_000.0),
    ];

    for ellipsoid in [Ellipsoid::Wgs84, Ellipsoid::Wgs72, Ellipsoid::Grs80] {
        for (lat,lon,alt) in points {
            let gp = GeodeticPoint::new( lat, lon, alt);
            let v = geodetic_to_ecef( &gp, &ellipsoid);
            let gp1 = ecef_to_geodetic( &v, &ellipsoid);

            assert!( (gp1.latitude() - lat).abs() < 1e-7, "{gp} -> {gp1}");
            assert!( (gp1.longitude() - lon).abs() < 1e-7, "{gp} -> {gp1}");
            assert!( (gp1.altitude() - alt).abs() < 1e-2, "{gp} -> {gp1}");
        }
    }
}

#[test]
fn test_position_roundtrip () {
    let transform = ecef_transform();
    let p = PositionVector::new( t0(), ReferenceFrame::Ecef, -2458250.0, -5262107.0, 4259973.0);
    let gp = transform.to_geodetic( &p).unwrap();
    let q = transform.to_position( &gp, p.time);
    println!("{p} -> {gp} -> {q}");
    assert!( p.distance(&q) < 1e-3);

    let teme = CoordinateTransform::new( TransformConfig::default());
    let p = PositionVector::new( t0(), ReferenceFrame::Teme, 4_000_000.0, -3_500_000.0, 4_200_000.0);
    let gp = teme.to_geodetic( &p).unwrap();
    let q = teme.to_position( &gp, p.time);
    println!("{p} -> {gp} -> {q}");
    assert_eq!( q.frame, ReferenceFrame::Teme);
    assert!( p.distance(&q) < 1e-3);
}

#[test]
fn test_gmst () {
    let j2000 = Utc.with_ymd_and_hms( 2000, 1, 1, 12, 0, 0).unwrap();
    let theta = gmst( &j2000);
    println!("GMST(J2000) = {} °", theta.to_degrees());
    assert!( (theta.to_degrees() - 280.46061837).abs() < 1e-6);

    // sidereal day is ~3m56s shorter than solar day
    let theta1 = gmst( &(j2000 + chrono::TimeDelta::hours(24)));
    let diff = (theta1 - theta).to_degrees();
    assert!( (diff - 0.9856).abs() < 1e-3);
}

#[test]
fn test_frame_rotation () {
    let t = t0();
    let v = Vector3::new( 4_000_000.0, -3_500_000.0, 4_200_000.0);
    let e = teme_to_ecef( &t, &v);
    assert!( (e.norm() - v.norm()).abs() < 1e-6);
    assert!( (e[2] - v[2]).abs() < 1e-9);

    let w = ecef_to_teme( &t, &e);
    assert!( (w - v).norm() < 1e-6);
}

#[test]
fn test_batch_isolation () {
    let transform = ecef_transform();
    let t = t0();
    let ps = vec![
        PositionVector::new( t, ReferenceFrame::Ecef, 6_778_137.0, 0.0, 0.0),
        PositionVector::new( t, ReferenceFrame::Ecef, 0.0, 6_778_137.0, 0.0),
        PositionVector::new( t, ReferenceFrame::Ecef, 0.0, 0.0, 0.0),   // degenerate
        PositionVector::new( t, ReferenceFrame::Ecef, 0.0, 0.0, 6_778_137.0),
        PositionVector::new( t, ReferenceFrame::Ecef, -6_778_137.0, 0.0, 0.0),
    ];

    let results = transform.to_geodetic_batch( &ps);
    assert_eq!( results.len(), 5);

    for (i,res) in results.iter().enumerate() {
        match res {
            Ok(gp) => { println!("[{i}] {gp}"); assert!( i != 2) }
            Err(e) => { println!("[{i}] {e}"); assert_eq!( e.index(), Some(2)) }
        }
    }

    let gp = results[1].as_ref().unwrap();
    assert!( (gp.longitude() - 90.0).abs() < 1e-9);
    let gp = results[3].as_ref().unwrap();
    assert!( (gp.latitude() - 90.0).abs() < 1e-9);
    let gp = results[4].as_ref().unwrap();
    assert!( (gp.longitude().abs() - 180.0).abs() < 1e-9);
}

#[test]
fn test_malformed_input () {
    let transform = ecef_transform();
    let t = t0();

    // wrong frame
    let p = PositionVector::new( t, ReferenceFrame::Teme, 6_778_137.0, 0.0, 0.0);
    assert!( matches!( transform.to_geodetic(&p), Err(OdinGroundTrackError::TransformError{..})));

    // non-finite
    let p = PositionVector::new( t, ReferenceFrame::Ecef, f64::NAN, 0.0, 0.0);
    assert!( matches!( transform.to_geodetic(&p), Err(OdinGroundTrackError::TransformError{..})));

    // wrong component count
    let rows = vec![
        (t, vec![ 6_778_137.0, 0.0, 0.0]),
        (t, vec![ 6_778_137.0, 0.0]),
        (t, vec![ 0.0, 6_778_137.0, 0.0]),
    ];
    let ps = transform.positions_from_rows( &rows);
    assert!( ps[0].is_ok() && ps[2].is_ok());
    assert_eq!( ps[1].as_ref().err().and_then( |e| e.index()), Some(1));
}

#[test]
fn test_ellipsoids () {
    let v = Vector3::new( -2458250.0, -5262107.0, 4259973.0);
    let gp84 = ecef_to_geodetic( &v, &Ellipsoid::Wgs84);
    let gp72 = ecef_to_geodetic( &v, &Ellipsoid::Wgs72);
    println!("WGS84: {gp84}\nWGS72: {gp72}");

    assert!( (gp84.longitude() - gp72.longitude()).abs() < 1e-12); // longitude does not depend on ellipsoid
    assert!( (gp84.altitude() - gp72.altitude()).abs() > 0.1);
    assert!( (gp84.altitude() - gp72.altitude()).abs() < 10.0);
}
