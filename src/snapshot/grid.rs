//! Planet surface placement grid

use serde::{Deserialize, Serialize};

/// Occupancy grid for building placement on a planet surface
///
/// Only answers the question planners need: does a free rectangular
/// footprint of a given size exist anywhere on the surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementGrid {
    width: u32,
    height: u32,
    occupied: Vec<bool>,
}

impl PlacementGrid {
    /// Create a fully free grid
    pub fn open(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            occupied: vec![false; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn cell(&self, x: u32, y: u32) -> bool {
        self.occupied[(y * self.width + x) as usize]
    }

    /// Mark a rectangle as occupied; out-of-bounds cells are ignored
    pub fn occupy(&mut self, x: u32, y: u32, size: (u32, u32)) {
        for dy in 0..size.1 {
            for dx in 0..size.0 {
                let (cx, cy) = (x + dx, y + dy);
                if cx < self.width && cy < self.height {
                    self.occupied[(cy * self.width + cx) as usize] = true;
                }
            }
        }
    }

    /// True if a free footprint of `size` exists anywhere on the grid
    pub fn has_free_area(&self, size: (u32, u32)) -> bool {
        let (w, h) = size;
        if w == 0 || h == 0 || w > self.width || h > self.height {
            return false;
        }
        for y in 0..=(self.height - h) {
            'origin: for x in 0..=(self.width - w) {
                for dy in 0..h {
                    for dx in 0..w {
                        if self.cell(x + dx, y + dy) {
                            continue 'origin;
                        }
                    }
                }
                return true;
            }
        }
        false
    }
}
