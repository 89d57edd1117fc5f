// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coordinate list decoding (`gml:pos` / `gml:posList` text)

use crate::{ModelError, Result, Ring};
use nalgebra::Point3;

/// Decoded coordinate list
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PosList {
    /// Complete points, in document order
    pub points: Vec<Point3<f64>>,
    /// Trailing coordinates that did not form a full triple
    pub dropped: usize,
}

impl PosList {
    /// Convert into a ring
    pub fn into_ring(self) -> Ring {
        Ring::new(self.points)
    }
}

fn parse_values(text: &str) -> Result<Vec<f64>> {
    text.split_ascii_whitespace()
        .enumerate()
        .map(|(position, token)| {
            lexical_core::parse::<f64>(token.as_bytes())
                .map_err(|_| ModelError::invalid_number(position, token))
        })
        .collect()
}

/// Decode whitespace-separated coordinates into points, three at a time
///
/// A trailing incomplete triple is dropped and reported in
/// [`PosList::dropped`]; the complete points are kept.
pub fn decode_pos_list(text: &str) -> Result<PosList> {
    let values = parse_values(text)?;
    let dropped = values.len() % 3;
    if dropped != 0 {
        log::warn!(
            "Wrong number of coordinates: {} not divisible by 3, dropping last {}",
            values.len(),
            dropped
        );
    }

    let points = values
        .chunks_exact(3)
        .map(|c| Point3::new(c[0], c[1], c[2]))
        .collect();

    Ok(PosList { points, dropped })
}

/// Decode coordinates, failing if the count is not a multiple of three
pub fn decode_pos_list_strict(text: &str) -> Result<Vec<Point3<f64>>> {
    let values = parse_values(text)?;
    if values.len() % 3 != 0 {
        return Err(ModelError::IncompleteCoordinates {
            count: values.len(),
        });
    }

    Ok(values
        .chunks_exact(3)
        .map(|c| Point3::new(c[0], c[1], c[2]))
        .collect())
}
