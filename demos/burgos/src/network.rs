//! Synthetic walking network around the old town of Burgos.
//!
//! A 5 × 5 street grid (~110 m north-south, ~80 m east-west blocks) with a
//! riverside park along the southern edge and a dog park in the north-east
//! block.  Zones are defined as CSV so the demo also exercises the zone
//! loader.

use std::io::Cursor;

use anyhow::Result;

use walk_core::{GeoPoint, NodeId};
use walk_spatial::{load_zones_reader, GreenZone, WalkNetwork, WalkNetworkBuilder};

const ROWS: usize = 5;
const COLS: usize = 5;

const SOUTH_LAT: f64 = 42.3420;
const WEST_LON:  f64 = -3.7000;
const DLAT:      f64 = 0.0010;
const DLON:      f64 = 0.0010;

const ZONES_CSV: &str = "\
name,leisure,landuse,natural,ring\n\
Paseo del Espolón,park,,,42.34185 -3.70010;42.34215 -3.70010;42.34215 -3.69590;42.34185 -3.69590\n\
Parque canino de San Esteban,dog_park,,,42.34560 -3.69660;42.34590 -3.69660;42.34590 -3.69610;42.34560 -3.69610\n\
Pradera del Castillo,,grass,,42.34420 -3.69920;42.34450 -3.69920;42.34450 -3.69880;42.34420 -3.69880\n\
Aparcamiento,,parking,,42.34300 -3.69800;42.34310 -3.69800;42.34310 -3.69790\n\
";

/// Build the grid.  Node `r * COLS + c` sits in row `r` (south to north),
/// column `c` (west to east).  Edge lengths are haversine distances.
pub fn build_network() -> Result<WalkNetwork> {
    let mut b = WalkNetworkBuilder::with_capacity(ROWS * COLS, 2 * ROWS * COLS);

    let mut nodes = Vec::with_capacity(ROWS * COLS);
    for r in 0..ROWS {
        for c in 0..COLS {
            let pos = GeoPoint::new(SOUTH_LAT + r as f64 * DLAT, WEST_LON + c as f64 * DLON);
            nodes.push(b.add_node(pos));
        }
    }

    for r in 0..ROWS {
        for c in 0..COLS {
            let here = nodes[r * COLS + c];
            let mut neighbours: Vec<NodeId> = Vec::with_capacity(2);
            if c + 1 < COLS {
                neighbours.push(nodes[r * COLS + c + 1]);
            }
            if r + 1 < ROWS {
                neighbours.push(nodes[(r + 1) * COLS + c]);
            }
            for there in neighbours {
                let length_m = b.node_pos(here).distance_m(b.node_pos(there));
                b.add_edge(here, there, length_m)?;
            }
        }
    }

    Ok(b.build())
}

/// Green zones; the parking row is not green and is skipped by the loader.
pub fn green_zones() -> Result<Vec<GreenZone>> {
    Ok(load_zones_reader(Cursor::new(ZONES_CSV))?)
}
