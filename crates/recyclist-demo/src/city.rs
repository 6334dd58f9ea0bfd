#![forbid(unsafe_code)]

//! City features as shown in the list.

use recyclist::{Point, Record};
use serde::Deserialize;

/// Column headers, in display order.
pub const COLUMNS: [&str; 6] = ["ID", "Name", "Class", "ST", "Capital", "Pop 2000"];

/// One city feature with its attributes and point location.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct City {
    pub objectid: u32,
    pub areaname: String,
    pub class: String,
    pub st: String,
    pub capital: String,
    pub pop2000: u64,
    /// Longitude.
    pub x: f64,
    /// Latitude.
    pub y: f64,
}

impl City {
    #[inline]
    #[must_use]
    pub fn location(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Display values, one per entry of [`COLUMNS`].
    #[must_use]
    pub fn cells(&self) -> [String; 6] {
        [
            self.objectid.to_string(),
            self.areaname.clone(),
            self.class.clone(),
            self.st.clone(),
            self.capital.clone(),
            self.pop2000.to_string(),
        ]
    }
}

impl Record for City {
    fn key(&self) -> u64 {
        u64::from(self.objectid)
    }
}
