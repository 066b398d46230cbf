//! OSM PBF loader — enabled with the `osm` Cargo feature.
//!
//! # What is loaded
//!
//! Only drivable `highway=*` ways become street segments (see
//! [`car_speed_kmh`]). Ways that share a `name` tag are grouped into one
//! logical street, same as the CSV loader's `streets.csv` grouping. Nodes
//! tagged `amenity=*` or `shop=*` become points of interest. Everything
//! else (footways, buildings, relations) is ignored.
//!
//! # Memory note
//!
//! The loader buffers all OSM nodes in a `HashMap<i64, GeoPoint>` for the
//! first pass (needed because ways reference node IDs by OSM integer ID).
//! The map is freed before adjacency is built.

use std::collections::HashMap;
use std::path::Path;

use osmpbf::{Element, ElementReader};

use streetcore_core::{GeoPoint, IntersectionId, PoiId, SegmentId, StreetId};

use crate::error::{DbError, DbResult};
use crate::records::StreetSegmentInfo;
use crate::traits::{OsmTagDatabase, StreetDatabase};

struct OsmWay {
    refs: Vec<i64>,
    name: Option<String>,
    speed_kmh: f64,
    oneway: bool,
    tags: Vec<(String, String)>,
}

struct OsmPoi {
    pos: GeoPoint,
    name: String,
    poi_type: String,
}

/// A [`StreetDatabase`] populated directly from an OpenStreetMap PBF extract.
pub struct OsmStreetDatabase {
    positions: Vec<GeoPoint>,
    adjacency: Vec<Vec<SegmentId>>,
    segments: Vec<(StreetSegmentInfo, Vec<GeoPoint>)>,
    street_names: Vec<String>,
    pois: Vec<OsmPoi>,
    tags_by_way: HashMap<u64, Vec<(String, String)>>,
}

impl OsmStreetDatabase {
    pub fn load_from_pbf(path: &Path) -> DbResult<Self> {
        let reader = ElementReader::from_path(path).map_err(|e| DbError::Osm(e.to_string()))?;

        let mut all_nodes: HashMap<i64, GeoPoint> = HashMap::new();
        let mut pois: Vec<OsmPoi> = Vec::new();
        let mut road_ways: Vec<OsmWay> = Vec::new();

        reader
            .for_each(|elem| match elem {
                Element::Node(n) => {
                    let pos = GeoPoint::new(n.lat(), n.lon());
                    all_nodes.insert(n.id(), pos);
                    if let Some(poi) = poi_from_tags(pos, n.tags()) {
                        pois.push(poi);
                    }
                }
                Element::DenseNode(n) => {
                    let pos = GeoPoint::new(n.lat(), n.lon());
                    all_nodes.insert(n.id(), pos);
                    if let Some(poi) = poi_from_tags(pos, n.tags()) {
                        pois.push(poi);
                    }
                }
                Element::Way(w) => {
                    let tags: Vec<(String, String)> = w
                        .tags()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect();
                    let highway = tags.iter().find(|(k, _)| k == "highway").map(|(_, v)| v.as_str());
                    if let Some(speed_kmh) = highway.and_then(car_speed_kmh) {
                        let name = tags.iter().find(|(k, _)| k == "name").map(|(_, v)| v.clone());
                        let oneway = is_oneway(highway.unwrap_or(""), &tags);
                        road_ways.push(OsmWay {
                            refs: w.refs().collect(),
                            name,
                            speed_kmh,
                            oneway,
                            tags,
                        });
                    }
                }
                _ => {}
            })
            .map_err(|e| DbError::Osm(e.to_string()))?;

        // ── Assign intersection ids to every node referenced by a road way ──
        let mut osm_to_intersection: HashMap<i64, IntersectionId> = HashMap::new();
        let mut positions: Vec<GeoPoint> = Vec::new();
        for way in &road_ways {
            for &osm_id in &way.refs {
                if osm_to_intersection.contains_key(&osm_id) {
                    continue;
                }
                if let Some(&pos) = all_nodes.get(&osm_id) {
                    let id = IntersectionId(positions.len() as u32);
                    positions.push(pos);
                    osm_to_intersection.insert(osm_id, id);
                }
            }
        }
        drop(all_nodes);

        // ── Group ways by street name ────────────────────────────────────
        let mut street_index: HashMap<String, StreetId> = HashMap::new();
        let mut street_names: Vec<String> = Vec::new();
        let mut street_id_for = |name: &Option<String>| -> StreetId {
            let key = name.clone().unwrap_or_default();
            *street_index.entry(key.clone()).or_insert_with(|| {
                let id = StreetId(street_names.len() as u32);
                street_names.push(key);
                id
            })
        };

        // ── Build segments + adjacency (one per consecutive node pair) ───
        let mut adjacency: Vec<Vec<SegmentId>> = vec![Vec::new(); positions.len()];
        let mut segments: Vec<(StreetSegmentInfo, Vec<GeoPoint>)> = Vec::new();
        let mut tags_by_way: HashMap<u64, Vec<(String, String)>> = HashMap::new();

        for (way_idx, way) in road_ways.iter().enumerate() {
            let street_id = street_id_for(&way.name);
            tags_by_way.insert(way_idx as u64, way.tags.clone());

            for window in way.refs.windows(2) {
                let (Some(&from), Some(&to)) = (
                    osm_to_intersection.get(&window[0]),
                    osm_to_intersection.get(&window[1]),
                ) else {
                    continue;
                };
                let seg_id = SegmentId(segments.len() as u32);
                segments.push((
                    StreetSegmentInfo {
                        from,
                        to,
                        one_way: way.oneway,
                        speed_limit_kmh: way.speed_kmh,
                        street_id,
                        num_curve_points: 0,
                    },
                    Vec::new(),
                ));
                adjacency[from.index()].push(seg_id);
                if !way.oneway {
                    adjacency[to.index()].push(seg_id);
                }
            }
        }

        Ok(Self {
            positions,
            adjacency,
            segments,
            street_names,
            pois,
            tags_by_way,
        })
    }
}

fn poi_from_tags<'a>(pos: GeoPoint, tags: impl Iterator<Item = (&'a str, &'a str)>) -> Option<OsmPoi> {
    let tags: Vec<(&str, &str)> = tags.collect();
    let poi_type = tags
        .iter()
        .find(|(k, _)| *k == "amenity" || *k == "shop")
        .map(|(_, v)| v.to_string())?;
    let name = tags
        .iter()
        .find(|(k, _)| *k == "name")
        .map(|(_, v)| v.to_string())
        .unwrap_or_default();
    Some(OsmPoi { pos, name, poi_type })
}

/// Assumed car speed (km/h) for a road class, or `None` if this `highway`
/// value is not drivable by car. Conservative urban defaults — callers
/// needing `maxspeed`-accurate figures should parse that tag themselves.
fn car_speed_kmh(highway: &str) -> Option<f64> {
    match highway {
        "motorway" | "motorway_link" => Some(105.0),
        "trunk" | "trunk_link" => Some(90.0),
        "primary" | "primary_link" => Some(72.0),
        "secondary" | "secondary_link" => Some(65.0),
        "tertiary" | "tertiary_link" => Some(50.0),
        "residential" | "living_street" => Some(32.0),
        "service" | "unclassified" => Some(24.0),
        "footway" | "path" | "cycleway" | "pedestrian" | "steps" | "track" => None,
        _ => Some(32.0),
    }
}

fn is_oneway(highway: &str, tags: &[(String, String)]) -> bool {
    let explicit = tags
        .iter()
        .any(|(k, v)| k == "oneway" && matches!(v.as_str(), "yes" | "1" | "true"));
    let implicit = matches!(highway, "motorway" | "motorway_link");
    explicit || implicit
}

impl StreetDatabase for OsmStreetDatabase {
    fn num_intersections(&self) -> usize {
        self.positions.len()
    }

    fn num_street_segments(&self) -> usize {
        self.segments.len()
    }

    fn num_streets(&self) -> usize {
        self.street_names.len()
    }

    fn num_points_of_interest(&self) -> usize {
        self.pois.len()
    }

    fn num_features(&self) -> usize {
        self.tags_by_way.len()
    }

    fn intersection_position(&self, id: IntersectionId) -> GeoPoint {
        self.positions[id.index()]
    }

    fn intersection_name(&self, _id: IntersectionId) -> &str {
        // OSM has no native concept of an intersection name; unlike streets
        // these aren't tagged entities.
        ""
    }

    fn intersection_street_segment_count(&self, id: IntersectionId) -> usize {
        self.adjacency[id.index()].len()
    }

    fn intersection_street_segment(&self, id: IntersectionId, index: usize) -> SegmentId {
        self.adjacency[id.index()][index]
    }

    fn info_street_segment(&self, id: SegmentId) -> StreetSegmentInfo {
        self.segments[id.index()].0
    }

    fn street_segment_curve_point(&self, id: SegmentId, index: usize) -> GeoPoint {
        self.segments[id.index()].1[index]
    }

    fn street_name(&self, id: StreetId) -> &str {
        &self.street_names[id.index()]
    }

    fn point_of_interest_position(&self, id: PoiId) -> GeoPoint {
        self.pois[id.index()].pos
    }

    fn point_of_interest_name(&self, id: PoiId) -> &str {
        &self.pois[id.index()].name
    }

    fn point_of_interest_type(&self, id: PoiId) -> &str {
        &self.pois[id.index()].poi_type
    }
}

impl OsmTagDatabase for OsmStreetDatabase {
    fn tag_count(&self, entity_id: u64) -> usize {
        self.tags_by_way.get(&entity_id).map_or(0, Vec::len)
    }

    fn tag(&self, entity_id: u64, index: usize) -> (&str, &str) {
        let (k, v) = &self.tags_by_way[&entity_id][index];
        (k.as_str(), v.as_str())
    }
}
