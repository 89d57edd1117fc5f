// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for CityGML feature classification

use crate::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Top-level CityGML feature class
///
/// The numeric codes are stable and shared with renderers that key colors
/// or visibility toggles on them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[repr(u32)]
pub enum ObjectType {
    Building = 1,
    Road = 2,
    WaterBody = 3,
    ReliefFeature = 4,
    PlantCover = 5,
    GenericCityObject = 6,
    Bridge = 7,
    LandUse = 8,
}

impl ObjectType {
    /// All object types in code order
    pub const ALL: [ObjectType; 8] = [
        ObjectType::Building,
        ObjectType::Road,
        ObjectType::WaterBody,
        ObjectType::ReliefFeature,
        ObjectType::PlantCover,
        ObjectType::GenericCityObject,
        ObjectType::Bridge,
        ObjectType::LandUse,
    ];

    /// Look up a type by its numeric code
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.code() == code)
    }

    /// Numeric code of this type
    #[inline]
    pub fn code(self) -> u32 {
        self as u32
    }

    /// CityGML class name
    pub fn name(self) -> &'static str {
        match self {
            ObjectType::Building => "Building",
            ObjectType::Road => "Road",
            ObjectType::WaterBody => "WaterBody",
            ObjectType::ReliefFeature => "ReliefFeature",
            ObjectType::PlantCover => "PlantCover",
            ObjectType::GenericCityObject => "GenericCityObject",
            ObjectType::Bridge => "Bridge",
            ObjectType::LandUse => "LandUse",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u32> for ObjectType {
    type Error = ModelError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(ModelError::UnknownObjectType(code))
    }
}

impl FromStr for ObjectType {
    type Err = ();

    /// Parse a class name, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

/// Sub-surface classification code
///
/// Polygons of one object are grouped by this code, and each group gets its
/// own triangle buffer. Code 0 is the catch-all and always valid; any other
/// integer is carried through untouched.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SurfaceType(pub i32);

impl SurfaceType {
    /// Unclassified surface
    pub const UNCLASSIFIED: SurfaceType = SurfaceType(0);
    /// Roof surface (`bldg:RoofSurface`)
    pub const ROOF: SurfaceType = SurfaceType(1);

    /// Check if this is the catch-all code
    #[inline]
    pub fn is_unclassified(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for SurfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            SurfaceType::UNCLASSIFIED => f.write_str("unclassified"),
            SurfaceType::ROOF => f.write_str("roof"),
            SurfaceType(code) => write!(f, "surface type {}", code),
        }
    }
}

impl From<i32> for SurfaceType {
    fn from(code: i32) -> Self {
        SurfaceType(code)
    }
}

impl From<SurfaceType> for i32 {
    fn from(surface: SurfaceType) -> Self {
        surface.0
    }
}
