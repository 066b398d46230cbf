//! `StreetMap::load`/`close` — the two-database load/rollback lifecycle,
//! carried as an explicit handle rather than implicit global state.

use std::path::{Path, PathBuf};

use streetcore_db::{CsvStreetDatabase, CsvTagDatabase};
use streetcore_graph::MapIndex;

use crate::error::StreetCoreResult;

/// A loaded street map, ready for queries and the courier planner.
///
/// Empty (no map loaded) until [`Self::load`] succeeds. Queries on an
/// unloaded or closed map panic — query misuse is undefined behavior by
/// contract; this implementation chooses to fail loudly rather than carry
/// silent UB.
pub struct StreetMap {
    index: Option<MapIndex>,
}

impl Default for StreetMap {
    fn default() -> Self {
        Self::new()
    }
}

impl StreetMap {
    pub fn new() -> Self {
        Self { index: None }
    }

    /// Load the street database at `map_path`, plus its companion OSM-tag
    /// database derived from the same stem (replacing the extension after
    /// the first `.` with `.osm.bin`).
    ///
    /// `map_path` names the intersections CSV; the sibling `streets`,
    /// `segments`, and `pois` CSVs are expected alongside it under the same
    /// stem (`<stem>.streets.csv`, etc).
    ///
    /// On any failure — either file missing or malformed — releases
    /// anything already allocated and returns `false`, leaving the map in
    /// the "not loaded" state. On success, builds the index and
    /// returns `true`.
    pub fn load(&mut self, map_path: &Path) -> bool {
        match Self::try_load(map_path) {
            Ok(index) => {
                log::info!(
                    "streetcore: loaded {} intersections, {} segments, {} streets from {}",
                    index.num_intersections(),
                    index.num_street_segments(),
                    index.num_streets(),
                    map_path.display(),
                );
                self.index = Some(index);
                true
            }
            Err(e) => {
                log::warn!("streetcore: load failed for {}: {e}", map_path.display());
                self.index = None;
                false
            }
        }
    }

    fn try_load(map_path: &Path) -> StreetCoreResult<MapIndex> {
        let stem = stem_of(map_path);
        let streets_path = sibling(map_path, &stem, "streets.csv");
        let segments_path = sibling(map_path, &stem, "segments.csv");
        let pois_path = sibling(map_path, &stem, "pois.csv");

        let street_db = CsvStreetDatabase::load_from_paths(map_path, &streets_path, &segments_path, &pois_path)?;

        // Companion OSM-tag database: both collaborators are required for a
        // successful load. It is not retained past this point —
        // `MapIndex::build` copies every field it needs out of `street_db`
        // and never consults tags.
        let companion_path = companion_path_for(map_path);
        let _tag_db = CsvTagDatabase::load_from_path(&companion_path)?;

        let index = MapIndex::build(&street_db)?;
        Ok(index)
    }

    /// Release the index and the (already-dropped) backing databases.
    /// Idempotent: closing an already-closed or never-loaded map is a no-op.
    pub fn close(&mut self) {
        if self.index.take().is_some() {
            log::info!("streetcore: map closed");
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.index.is_some()
    }

    pub(crate) fn index(&self) -> &MapIndex {
        self.index.as_ref().expect("StreetMap query called before a successful load")
    }
}

fn stem_of(path: &Path) -> String {
    let file_name = path.file_name().and_then(|s| s.to_str()).unwrap_or_default();
    file_name.split('.').next().unwrap_or(file_name).to_string()
}

fn sibling(map_path: &Path, stem: &str, suffix: &str) -> PathBuf {
    map_path.with_file_name(format!("{stem}.{suffix}"))
}

fn companion_path_for(map_path: &Path) -> PathBuf {
    let stem = stem_of(map_path);
    map_path.with_file_name(format!("{stem}.osm.bin"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write(dir: &Path, name: &str, contents: &str) {
        let mut f = std::fs::File::create(dir.join(name)).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
    }

    fn write_fixture(dir: &Path) {
        write(
            dir,
            "city.csv",
            "id,lat,lon,name\n0,43.6600,-79.4000,A\n1,43.6610,-79.4000,B\n",
        );
        write(dir, "city.streets.csv", "id,name\n0,Main St\n");
        write(
            dir,
            "city.segments.csv",
            "id,from,to,one_way,speed_limit_kmh,street_id,curve_points\n0,0,1,false,50.0,0,\n",
        );
        write(dir, "city.pois.csv", "id,lat,lon,name,poi_type\n");
    }

    #[test]
    fn load_fails_without_a_tag_companion() {
        let dir = std::env::temp_dir().join("streetcore_test_no_companion");
        std::fs::create_dir_all(&dir).unwrap();
        write_fixture(&dir);

        let mut map = StreetMap::new();
        assert!(!map.load(&dir.join("city.csv")));
        assert!(!map.is_loaded());
    }

    #[test]
    fn load_succeeds_with_a_tag_companion_and_close_resets() {
        let dir = std::env::temp_dir().join("streetcore_test_with_companion");
        std::fs::create_dir_all(&dir).unwrap();
        write_fixture(&dir);
        write(&dir, "city.osm.bin", "entity_id,key,value\n0,highway,residential\n");

        let mut map = StreetMap::new();
        assert!(map.load(&dir.join("city.csv")));
        assert!(map.is_loaded());

        map.close();
        assert!(!map.is_loaded());
    }
}
