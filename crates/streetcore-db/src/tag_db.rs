//! A minimal CSV-backed [`OsmTagDatabase`], used by `streetcore`'s `load`
//! lifecycle as the companion collaborator alongside a [`crate::CsvStreetDatabase`].
//! Real OSM tag semantics are out of scope; this exists so the coupling
//! contract — both collaborators must load successfully, or the whole load
//! rolls back — is exercisable without a real `.osm.bin` binary format.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::DbResult;
use crate::traits::OsmTagDatabase;

#[derive(Deserialize)]
struct TagRow {
    entity_id: u64,
    key: String,
    value: String,
}

pub struct CsvTagDatabase {
    tags: HashMap<u64, Vec<(String, String)>>,
}

impl CsvTagDatabase {
    pub fn load_from_path(path: &Path) -> DbResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::load_from_reader(file)
    }

    pub fn load_from_reader<R: Read>(reader: R) -> DbResult<Self> {
        let rows: Vec<TagRow> = csv::Reader::from_reader(reader)
            .deserialize()
            .collect::<Result<_, _>>()
            .map_err(|e| crate::error::DbError::Parse(e.to_string()))?;

        let mut tags: HashMap<u64, Vec<(String, String)>> = HashMap::new();
        for row in rows {
            tags.entry(row.entity_id).or_default().push((row.key, row.value));
        }
        Ok(Self { tags })
    }
}

impl OsmTagDatabase for CsvTagDatabase {
    fn tag_count(&self, entity_id: u64) -> usize {
        self.tags.get(&entity_id).map_or(0, Vec::len)
    }

    fn tag(&self, entity_id: u64, index: usize) -> (&str, &str) {
        let (k, v) = &self.tags[&entity_id][index];
        (k.as_str(), v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn loads_and_groups_tags_by_entity() {
        let csv = "entity_id,key,value\n1,highway,residential\n1,name,Main St\n2,amenity,cafe\n";
        let db = CsvTagDatabase::load_from_reader(Cursor::new(csv)).unwrap();
        assert_eq!(db.tag_count(1), 2);
        assert_eq!(db.tag_count(2), 1);
        assert_eq!(db.tag(1, 0), ("highway", "residential"));
        assert_eq!(db.tag_count(3), 0);
    }
}
