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

use chrono::{DateTime,Utc};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, OdinGroundTrackError>;

#[derive(Error,Debug)]
pub enum OdinGroundTrackError {

    #[error("element set error {0}")]
    ElementSetError( String ),

    #[error("propagation error for object {object_id} at {time}{}: {reason}", index_suffix(.index))]
    PropagationError { object_id: u64, index: Option<usize>, time: DateTime<Utc>, reason: String },

    #[error("transform error at index {index}: {reason}")]
    TransformError { index: usize, reason: String },

    #[error("configuration error {0}")]
    ConfigurationError( String ),

    #[error("deadline exceeded before item {index} was evaluated")]
    DeadlineExceeded { index: usize },

    #[error("IO error {0}")]
    IOError( #[from] std::io::Error),

    #[error("RON error {0}")]
    RonError( #[from] ron::error::SpannedError),

    #[error("RON serialization error {0}")]
    RonSerError( #[from] ron::Error),
}

fn index_suffix (index: &Option<usize>)->String {
    match index {
        Some(i) => format!(" (sample {i})"),
        None => String::new()
    }
}

impl OdinGroundTrackError {
    /// the sample or item index this error is tagged with, if any
    pub fn index (&self)->Option<usize> {
        match self {
            OdinGroundTrackError::PropagationError { index, .. } => *index,
            OdinGroundTrackError::TransformError { index, .. } => Some(*index),
            OdinGroundTrackError::DeadlineExceeded { index } => Some(*index),
            _ => None
        }
    }

    /// tag a propagation error with the sample index it occurred at. Other errors are returned unchanged
    pub fn at_sample (self, i: usize)->Self {
        match self {
            OdinGroundTrackError::PropagationError { object_id, time, reason, .. } => {
                OdinGroundTrackError::PropagationError { object_id, index: Some(i), time, reason }
            }
            e => e
        }
    }
}

macro_rules! element_error {
    ($fmt:literal $(, $arg:expr )* ) => {
        $crate::errors::OdinGroundTrackError::ElementSetError( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use element_error;

macro_rules! config_error {
    ($fmt:literal $(, $arg:expr )* ) => {
        $crate::errors::OdinGroundTrackError::ConfigurationError( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use config_error;

macro_rules! transform_error {
    ($idx:expr, $fmt:literal $(, $arg:expr )* ) => {
        $crate::errors::OdinGroundTrackError::TransformError{ index: $idx, reason: format!( $fmt $(, $arg)* ) }
    };
}
pub (crate) use transform_error;
