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

//! conversion of earth-centered position vectors into geodetic coordinates.
//! TEME positions are first rotated into a pseudo earth-fixed frame using the IAU-82 Greenwich mean
//! sidereal time (no polar motion, UT1 ≈ UTC), then converted with Olson's closed form ECEF->geodetic
//! method parameterized by the configured reference ellipsoid

use std::{f64::consts::{FRAC_PI_2,PI,TAU},fmt};
use chrono::{DateTime,Utc};
use nalgebra::{Rotation3,Vector3};
use serde::{Serialize,Deserialize};
use crate::{
    errors::{transform_error,Result},
    position::{PositionVector,ReferenceFrame}
};

/// below this radius (in meters) we consider a position vector to be degenerate
pub const MIN_RADIUS: f64 = 100_000.0;

const JD_UNIX_EPOCH: f64 = 2440587.5;
const JD_J2000: f64 = 2451545.0;

/* #region ellipsoids *********************************************************************************/

/// supported reference ellipsoids
#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
pub enum Ellipsoid {
    Wgs84,
    Wgs72,
    Grs80,
}

impl Ellipsoid {
    /// semi major axis in meters
    pub fn semi_major_axis (&self)->f64 {
        match self {
            Ellipsoid::Wgs84 => 6378137.0,
            Ellipsoid::Wgs72 => 6378135.0,
            Ellipsoid::Grs80 => 6378137.0,
        }
    }

    pub fn inverse_flattening (&self)->f64 {
        match self {
            Ellipsoid::Wgs84 => 298.257223563,
            Ellipsoid::Wgs72 => 298.26,
            Ellipsoid::Grs80 => 298.257222101,
        }
    }

    pub fn flattening (&self)->f64 { 1.0 / self.inverse_flattening() }

    /// first eccentricity squared
    pub fn e2 (&self)->f64 {
        let f = self.flattening();
        f * (2.0 - f)
    }
}

impl Default for Ellipsoid {
    fn default()->Self { Ellipsoid::Wgs84 }
}

/* #endregion ellipsoids */

/// latitude/longitude in degrees, altitude in meters above the ellipsoid.
/// GeodeticPoints produced by [`CoordinateTransform`] are always within canonical ranges
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct GeodeticPoint {
    latitude: f64,
    longitude: f64,
    altitude: f64,
}

impl GeodeticPoint {
    /// note this does not check ranges - use [`GeodeticPoint::invalid_reason`] for points from untrusted sources
    pub fn new (latitude: f64, longitude: f64, altitude: f64)->Self {
        GeodeticPoint { latitude, longitude, altitude }
    }

    pub fn from_radians (latitude: f64, longitude: f64, altitude: f64)->Self {
        GeodeticPoint { latitude: latitude.to_degrees(), longitude: longitude.to_degrees(), altitude }
    }

    pub fn latitude (&self)->f64 { self.latitude }
    pub fn longitude (&self)->f64 { self.longitude }
    pub fn altitude (&self)->f64 { self.altitude }

    pub fn latitude_rad (&self)->f64 { self.latitude.to_radians() }
    pub fn longitude_rad (&self)->f64 { self.longitude.to_radians() }

    /// None if this is a valid point, otherwise the reason why it is not
    pub fn invalid_reason (&self)->Option<String> {
        if !(self.latitude.is_finite() && self.longitude.is_finite() && self.altitude.is_finite()) {
            Some( format!("non-finite coordinates {self}"))
        } else if !(-90.0..=90.0).contains( &self.latitude) {
            Some( format!("latitude {} outside [-90,90]", self.latitude))
        } else if !(-180.0..=180.0).contains( &self.longitude) {
            Some( format!("longitude {} outside [-180,180]", self.longitude))
        } else {
            None
        }
    }
}

impl fmt::Display for GeodeticPoint {
    fn fmt (&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ latitude: {:.5}°, longitude: {:.5}°, altitude: {:.0} m }}", self.latitude, self.longitude, self.altitude)
    }
}

/// fixed, read-only configuration of the coordinate transform
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct TransformConfig {
    pub source_frame: ReferenceFrame,
    pub ellipsoid: Ellipsoid,
}

impl Default for TransformConfig {
    fn default()->Self {
        TransformConfig { source_frame: ReferenceFrame::Teme, ellipsoid: Ellipsoid::Wgs84 }
    }
}

/// stateless converter between earth-centered position vectors and geodetic points
#[derive(Debug,Clone,Copy)]
pub struct CoordinateTransform {
    config: TransformConfig,
}

impl CoordinateTransform {
    pub fn new (config: TransformConfig)->Self {
        CoordinateTransform { config }
    }

    pub fn config (&self)->&TransformConfig { &self.config }

    /// build position vectors in our source frame from raw component rows. Rows that don't have
    /// exactly 3 components are reported with their index
    pub fn positions_from_rows (&self, rows: &[(DateTime<Utc>,Vec<f64>)])->Vec<Result<PositionVector>> {
        rows.iter().enumerate().map( |(i,(t,cs))| {
            match cs.as_slice() {
                [x,y,z] => Ok( PositionVector::new( *t, self.config.source_frame, *x, *y, *z)),
                _ => Err( transform_error!( i, "expected 3 components, got {}", cs.len()))
            }
        }).collect()
    }

    /// convert a batch of position vectors. The result has one entry per input (in the same order),
    /// failures are tagged with the index of the offending vector
    pub fn to_geodetic_batch (&self, positions: &[PositionVector])->Vec<Result<GeodeticPoint>> {
        positions.iter().enumerate().map( |(i,p)| self.to_geodetic_at( i, p)).collect()
    }

    pub fn to_geodetic (&self, p: &PositionVector)->Result<GeodeticPoint> {
        self.to_geodetic_at( 0, p)
    }

    fn to_geodetic_at (&self, index: usize, p: &PositionVector)->Result<GeodeticPoint> {
        if p.frame != self.config.source_frame {
            return Err( transform_error!( index, "vector in {} frame but transform expects {}", p.frame, self.config.source_frame))
        }
        if !p.is_finite() {
            return Err( transform_error!( index, "non-finite position {}", p))
        }
        let r = p.length();
        if r < MIN_RADIUS {
            return Err( transform_error!( index, "degenerate position vector with radius {:.1} m", r))
        }

        let ecef = match p.frame {
            ReferenceFrame::Teme => teme_to_ecef( &p.time, &p.to_vector()),
            ReferenceFrame::Ecef => p.to_vector()
        };

        let gp = ecef_to_geodetic( &ecef, &self.config.ellipsoid);
        match gp.invalid_reason() {
            None => Ok(gp),
            Some(reason) => Err( transform_error!( index, "{}", reason))
        }
    }

    /// the inverse transform: geodetic point at time t to a position vector in our source frame
    pub fn to_position (&self, gp: &GeodeticPoint, t: DateTime<Utc>)->PositionVector {
        let ecef = geodetic_to_ecef( gp, &self.config.ellipsoid);
        match self.config.source_frame {
            ReferenceFrame::Teme => PositionVector::from_vector( t, ReferenceFrame::Teme, &ecef_to_teme( &t, &ecef)),
            ReferenceFrame::Ecef => PositionVector::from_vector( t, ReferenceFrame::Ecef, &ecef)
        }
    }
}

/* #region helper functions *****************************************************************************************/

pub fn julian_date (t: &DateTime<Utc>)->f64 {
    (t.timestamp_millis() as f64 / 86_400_000.0) + JD_UNIX_EPOCH
}

/// IAU-82 Greenwich mean sidereal time in radians [0..2π)
pub fn gmst (t: &DateTime<Utc>)->f64 {
    let tut1 = (julian_date(t) - JD_J2000) / 36525.0;
    let secs = -6.2e-6 * tut1 * tut1 * tut1
        + 0.093104 * tut1 * tut1
        + (876600.0 * 3600.0 + 8640184.812866) * tut1
        + 67310.54841;

    let theta = (secs * PI / 43200.0) % TAU; // 240 sec per degree
    if theta < 0.0 { theta + TAU } else { theta }
}

pub fn teme_to_ecef (t: &DateTime<Utc>, v: &Vector3<f64>)->Vector3<f64> {
    Rotation3::from_axis_angle( &Vector3::z_axis(), -gmst(t)) * v
}

pub fn ecef_to_teme (t: &DateTime<Utc>, v: &Vector3<f64>)->Vector3<f64> {
    Rotation3::from_axis_angle( &Vector3::z_axis(), gmst(t)) * v
}

/// convert cartesian ECEF coordinates (meters) to geodetic coordinates on the given ellipsoid
/// see
///    Olson, D. K. (1996).
///    Converting Earth-Centered, Earth-Fixed Coordinates to Geodetic Coordinates.
///    IEEE Transactions on Aerospace and Electronic Systems, 32(1), 473–476. https://doi.org/10.1109/7.481290
///
/// callers have to make sure the vector is not degenerate (radius >= MIN_RADIUS)
pub fn ecef_to_geodetic (p: &Vector3<f64>, ellipsoid: &Ellipsoid)->GeodeticPoint {
    let a  = ellipsoid.semi_major_axis();
    let e2 = ellipsoid.e2();
    let a1 = a * e2;
    let a2 = a1 * a1;
    let a3 = a1 * e2 / 2.0;
    let a4 = 2.5 * a2;
    let a5 = a1 + a3;
    let a6 = 1.0 - e2;

    let (x, y, z) = (p[0], p[1], p[2]);

    let zp = z.abs();
    let w2 = x*x + y*y;
    let w = w2.sqrt();
    let z2 = z*z;
    let r2 = w2 + z2;
    let r = r2.sqrt();

    let lon = y.atan2(x);
    let s2 = z2 / r2;
    let c2 = w2 / r2;
    let mut u = a2 / r;
    let mut v = a3 - a4 / r;

    let (mut lat, s, c, ss) = if c2 > 0.3 {
        let s = (zp/r)*(1.0 + c2*(a1 + u + s2*v)/r);
        let ss = s*s;
        (s.asin(), s, (1.0 - ss).sqrt(), ss)
    } else {
        let c = (w/r)*(1.0 - s2*(a5 - u - c2*v)/r);
        let ss = 1.0 - c*c;
        (c.acos(), ss.sqrt(), c, ss)
    };

    let g = 1.0 - e2*ss;
    let rg = a / g.sqrt();
    let rf = a6 * rg;
    u = w - rg * c;
    v = zp - rf * s;
    let f = c * u + s * v;
    let m = c * v - s * u;
    let p = m / (rf / g + f);

    lat = (lat + p).min( FRAC_PI_2); // rounding near the poles
    let alt = f + m*p/2.0;
    if z < 0.0 { lat = -lat; }

    GeodeticPoint::from_radians( lat, lon, alt)
}

pub fn geodetic_to_ecef (gp: &GeodeticPoint, ellipsoid: &Ellipsoid)->Vector3<f64> {
    let a = ellipsoid.semi_major_axis();
    let e2 = ellipsoid.e2();
    let (sin_lat, cos_lat) = gp.latitude_rad().sin_cos();
    let (sin_lon, cos_lon) = gp.longitude_rad().sin_cos();
    let h = gp.altitude();

    let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt(); // prime vertical radius of curvature

    Vector3::new(
        (n + h) * cos_lat * cos_lon,
        (n + h) * cos_lat * sin_lon,
        (n * (1.0 - e2) + h) * sin_lat
    )
}

/* #endregion helper functions */
