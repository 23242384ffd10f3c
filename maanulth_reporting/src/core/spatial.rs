// @file: maanulth_reporting/src/core/spatial.rs
// @description: WKT decoding and BC Albers reprojection for exported geometries.
// @author: LAS.

use crate::core::errors::{ReportError, ReportResult};
use geo::MapCoords;
use geo_types::{Coord, Geometry};
use proj4rs::proj::Proj;
use wkt::TryFromWkt;

//
// CONSTANTS
//

// EPSG:3005, NAD83 / BC Albers
const BC_ALBERS: &str = "+proj=aea +lat_0=45 +lon_0=-126 +lat_1=50 +lat_2=58.5 +x_0=1000000 +y_0=0 +datum=NAD83 +units=m +no_defs";
const GEOGRAPHIC: &str = "+proj=longlat +datum=NAD83 +no_defs";

// Spherical radius used by EPSG:3857.
const WEB_MERCATOR_RADIUS: f64 = 6_378_137.0;


//
// WKT
//

pub fn parse_wkt(map_label: &str, text: &str) -> ReportResult<Geometry<f64>> {
    Geometry::<f64>::try_from_wkt_str(text.trim()).map_err(|e| ReportError::Geometry {
        map_label: map_label.to_string(),
        message: e.to_string(),
    })
}


//
// REPROJECTION
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputCrs {
    Wgs84,
    WebMercator,
}

impl OutputCrs {
    pub fn from_epsg(epsg: u32) -> ReportResult<Self> {
        match epsg {
            4326 => Ok(OutputCrs::Wgs84),
            3857 => Ok(OutputCrs::WebMercator),
            other => Err(ReportError::InvalidInput(format!(
                "unsupported output EPSG {} (expected 3857 or 4326)",
                other
            ))),
        }
    }

    pub fn epsg(&self) -> u32 {
        match self {
            OutputCrs::Wgs84 => 4326,
            OutputCrs::WebMercator => 3857,
        }
    }

    pub fn urn(&self) -> String {
        format!("urn:ogc:def:crs:EPSG::{}", self.epsg())
    }
}

/// Reprojects BC Albers coordinates; NAD83 is taken as equal to WGS84.
pub struct Reprojector {
    albers: Proj,
    geographic: Proj,
    target: OutputCrs,
}

impl Reprojector {
    pub fn new(target: OutputCrs) -> ReportResult<Self> {
        let albers = Proj::from_proj_string(BC_ALBERS)
            .map_err(|e| ReportError::Projection(e.to_string()))?;
        let geographic = Proj::from_proj_string(GEOGRAPHIC)
            .map_err(|e| ReportError::Projection(e.to_string()))?;
        Ok(Self { albers, geographic, target })
    }

    pub fn target(&self) -> OutputCrs {
        self.target
    }

    pub fn project_coord(&self, coord: Coord<f64>) -> ReportResult<Coord<f64>> {
        // #1. Albers -> lon/lat (radians)
        let mut point = (coord.x, coord.y, 0.0);
        proj4rs::transform::transform(&self.albers, &self.geographic, &mut point)
            .map_err(|e| ReportError::Projection(e.to_string()))?;
        let (lon, lat) = (point.0, point.1);

        // #2. lon/lat -> target
        Ok(match self.target {
            OutputCrs::Wgs84 => Coord { x: lon.to_degrees(), y: lat.to_degrees() },
            OutputCrs::WebMercator => Coord {
                x: WEB_MERCATOR_RADIUS * lon,
                y: WEB_MERCATOR_RADIUS * (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln(),
            },
        })
    }

    pub fn project(&self, geometry: &Geometry<f64>) -> ReportResult<Geometry<f64>> {
        geometry.try_map_coords(|c| self.project_coord(c))
    }
}
