//! JSON linework files: `{ "lines": [ [[x, y], [x, y, z], ...], ... ] }`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use noding::api::Coord;
use serde::{Deserialize, Serialize};

/// One point: two ordinates, or three with Z.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonPoint {
    Xy(f64, f64),
    Xyz(f64, f64, f64),
}

impl From<JsonPoint> for Coord {
    fn from(p: JsonPoint) -> Self {
        match p {
            JsonPoint::Xy(x, y) => Coord::new(x, y),
            JsonPoint::Xyz(x, y, z) => Coord::with_z(x, y, z),
        }
    }
}

impl From<&Coord> for JsonPoint {
    fn from(c: &Coord) -> Self {
        match c.z {
            Some(z) => JsonPoint::Xyz(c.x, c.y, z),
            None => JsonPoint::Xy(c.x, c.y),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LineworkFile {
    pub lines: Vec<Vec<JsonPoint>>,
}

impl LineworkFile {
    pub fn from_lines<L: AsRef<[Coord]>>(lines: &[L]) -> Self {
        Self {
            lines: lines
                .iter()
                .map(|l| l.as_ref().iter().map(JsonPoint::from).collect())
                .collect(),
        }
    }

    pub fn to_lines(&self) -> Vec<Vec<Coord>> {
        self.lines
            .iter()
            .map(|l| l.iter().map(|&p| Coord::from(p)).collect())
            .collect()
    }

    pub fn read(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_slice(&bytes).with_context(|| format!("parsing linework {}", path.display()))
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating output dir {}", parent.display()))?;
            }
        }
        fs::write(path, serde_json::to_vec(self)?).with_context(|| format!("writing {}", path.display()))
    }
}
