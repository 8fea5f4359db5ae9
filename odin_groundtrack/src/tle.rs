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

use std::{fs, path::Path};
use tracing::{debug,warn};
use crate::{elements::OrbitalElementSet, errors::{element_error,Result}};

/// parse TLE text that consists of (optional) name lines followed by the two data lines of each object.
/// Name lines can carry the "0 " prefix used by space-track. Each set gets its own result so that
/// malformed sets do not affect the others
pub fn parse_tle_sets (text: &str)->Vec<Result<OrbitalElementSet>> {
    let lines: Vec<&str> = text.lines().map( |l| l.trim_end()).filter( |l| !l.trim().is_empty()).collect();
    let mut sets: Vec<Result<OrbitalElementSet>> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let (name, i1) = if is_data_line( lines[i], '1') { (None, i) } else { (Some( strip_name_prefix( lines[i])), i+1) };

        if i1 + 1 < lines.len() && is_data_line( lines[i1], '1') && is_data_line( lines[i1+1], '2') {
            sets.push( OrbitalElementSet::from_tle( name, lines[i1], lines[i1+1]));
            i = i1 + 2;
        } else {
            warn!("incomplete TLE set at line {}", i+1);
            sets.push( Err( element_error!("incomplete TLE set starting at '{}'", lines[i])));
            // skip whatever data lines belong to the broken set
            i = i1;
            if i < lines.len() && is_data_line( lines[i], '1') { i += 1 }
            if i < lines.len() && is_data_line( lines[i], '2') { i += 1 }
        }
    }

    debug!("parsed {} TLE sets", sets.len());
    sets
}

pub fn load_tle_file (path: impl AsRef<Path>)->Result<Vec<Result<OrbitalElementSet>>> {
    let text = fs::read_to_string( path.as_ref())?;
    Ok( parse_tle_sets( &text) )
}

fn is_data_line (line: &str, line_no: char)->bool {
    let mut cs = line.chars();
    cs.next() == Some(line_no) && cs.next() == Some(' ') && line.len() >= 69
}

fn strip_name_prefix (line: &str)->&str {
    line.strip_prefix("0 ").unwrap_or(line).trim()
}
