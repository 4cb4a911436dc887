//! Snapshot files. A path ending in `.gz` is gzip-compressed JSON; anything
//! else is pretty-printed JSON.

use crate::error::{IoError, Result};
use crate::serialization::{from_json, read_json_file, to_json, write_json_file};
use crystallite_data::WorldSnapshot;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Trait for adding persistence capabilities to WorldSnapshot
pub trait SnapshotPersistence: Sized {
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()>;
    fn load<P: AsRef<Path>>(path: P) -> Result<Self>;
}

impl SnapshotPersistence for WorldSnapshot {
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        save_snapshot(self, path)
    }

    fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        load_snapshot(path)
    }
}

fn is_compressed(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

pub fn save_snapshot<P: AsRef<Path>>(snapshot: &WorldSnapshot, path: P) -> Result<()> {
    let path = path.as_ref();
    let context = || format!("writing snapshot to {:?}", path);

    if is_compressed(path) {
        let json = to_json(snapshot)?;
        let file = File::create(path).map_err(|e| IoError::from(e).with_context(context()))?;
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        encoder
            .write_all(json.as_bytes())
            .map_err(|e| IoError::from(e).with_context(context()))?;
        encoder
            .finish()
            .map_err(|e| IoError::from(e).with_context(context()))?;
    } else {
        write_json_file(snapshot, path)?;
    }
    Ok(())
}

/// Reads and validates a snapshot written by [`save_snapshot`].
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<WorldSnapshot> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(IoError::not_found(path.display().to_string()));
    }
    let context = || format!("reading snapshot from {:?}", path);

    let snapshot: WorldSnapshot = if is_compressed(path) {
        let file = File::open(path).map_err(|e| IoError::from(e).with_context(context()))?;
        let mut json = String::new();
        GzDecoder::new(BufReader::new(file))
            .read_to_string(&mut json)
            .map_err(|e| IoError::from(e).with_context(context()))?;
        from_json(&json).map_err(|e| e.with_context(context()))?
    } else {
        read_json_file(path).map_err(|e| e.with_context(context()))?
    };
    validate(&snapshot)?;
    Ok(snapshot)
}

/// Structural checks only; lattice connectivity is checked by the caller.
pub fn validate(snapshot: &WorldSnapshot) -> Result<()> {
    if !(snapshot.width.is_finite() && snapshot.width > 0.0)
        || !(snapshot.height.is_finite() && snapshot.height > 0.0)
    {
        return Err(IoError::validation(format!(
            "domain {}x{} is not positive",
            snapshot.width, snapshot.height
        )));
    }
    for (idx, p) in snapshot.particles.iter().enumerate() {
        if !(p.x.is_finite() && p.y.is_finite() && p.radius.is_finite()) {
            return Err(IoError::validation(format!("particle {} has non-finite state", idx)));
        }
    }
    let mut ids = HashSet::new();
    for c in &snapshot.clusters {
        if !ids.insert(c.id) {
            return Err(IoError::validation(format!("duplicate cluster id {}", c.id)));
        }
        if !(c.spacing > 0.0 && c.spacing2 > 0.0) {
            return Err(IoError::validation(format!("cluster {} has non-positive spacing", c.id)));
        }
        if c.sites.is_empty() {
            return Err(IoError::validation(format!("cluster {} has no sites", c.id)));
        }
        let unique: HashSet<&(i32, i32)> = c.sites.iter().collect();
        if unique.len() != c.sites.len() {
            return Err(IoError::validation(format!("cluster {} repeats a site", c.id)));
        }
    }
    Ok(())
}
