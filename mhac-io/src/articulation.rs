use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, JsonValue, Value};
use mhac_core::math::Extent;

/// A single tile of an articulation index
#[derive(Debug, Clone, PartialEq)]
pub struct ArticulationEntry {
    pub tile_id: String,
    /// XY bounds of the tile geometry
    pub footprint: Extent,
}

/// Mapping of tile identifiers to tile footprints for one survey campaign. Tiles are stored as GeoJSON features
/// whose `id_field` property holds the tile identifier
#[derive(Debug, Clone)]
pub struct ArticulationIndex {
    id_field: String,
    entries: Vec<ArticulationEntry>,
}

/// Textual form of a tile identifier property. Strings are trimmed, numbers use their JSON representation
fn property_as_tile_id(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.trim().to_owned()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn positions_of(value: &Value) -> Vec<(f64, f64)> {
    let ring_positions = |rings: &Vec<Vec<Vec<f64>>>| -> Vec<(f64, f64)> {
        rings
            .iter()
            .flatten()
            .filter(|position| position.len() >= 2)
            .map(|position| (position[0], position[1]))
            .collect()
    };
    match value {
        Value::Polygon(rings) => ring_positions(rings),
        Value::MultiPolygon(polygons) => polygons.iter().flat_map(ring_positions).collect(),
        Value::GeometryCollection(geometries) => geometries
            .iter()
            .flat_map(|geometry| positions_of(&geometry.value))
            .collect(),
        _ => vec![],
    }
}

impl ArticulationIndex {
    pub fn new<S: Into<String>>(id_field: S, entries: Vec<ArticulationEntry>) -> Self {
        Self {
            id_field: id_field.into(),
            entries,
        }
    }

    /// Parses an articulation index from a GeoJSON FeatureCollection. Features without a usable `id_field`
    /// property or without a polygonal geometry are skipped
    pub fn from_geojson_str(geojson: &str, id_field: &str) -> Result<Self> {
        let collection = match geojson.parse::<GeoJson>()? {
            GeoJson::FeatureCollection(collection) => collection,
            _ => bail!("Articulation index must be a GeoJSON FeatureCollection"),
        };

        let mut entries = Vec::with_capacity(collection.features.len());
        let mut features_without_id = 0;
        for feature in &collection.features {
            let tile_id = match feature.property(id_field).and_then(property_as_tile_id) {
                Some(id) if !id.is_empty() => id,
                _ => {
                    features_without_id += 1;
                    continue;
                }
            };
            let footprint = feature
                .geometry
                .as_ref()
                .and_then(|geometry| Extent::from_points(positions_of(&geometry.value)));
            match footprint {
                Some(footprint) => entries.push(ArticulationEntry { tile_id, footprint }),
                None => log::warn!("Tile {} has no polygon geometry, skipping it", tile_id),
            }
        }

        if entries.is_empty() && !collection.features.is_empty() {
            bail!(
                "Field '{}' not found in any feature of the articulation index",
                id_field
            );
        }
        if features_without_id > 0 {
            log::warn!(
                "{} features of the articulation index have no '{}' value",
                features_without_id,
                id_field
            );
        }

        Ok(Self::new(id_field, entries))
    }

    /// Reads the articulation index stored as GeoJSON at `path`
    pub fn from_path<P: AsRef<Path>>(path: P, id_field: &str) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).with_context(|| {
            format!(
                "Could not read articulation index {}",
                path.as_ref().display()
            )
        })?;
        Self::from_geojson_str(&contents, id_field).with_context(|| {
            format!(
                "Invalid articulation index {}",
                path.as_ref().display()
            )
        })
    }

    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    pub fn entries(&self) -> &[ArticulationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the first entry with the given tile identifier
    pub fn find(&self, tile_id: &str) -> Option<&ArticulationEntry> {
        let tile_id = tile_id.trim();
        self.entries.iter().find(|entry| entry.tile_id == tile_id)
    }

    /// Unique tile identifiers in index order
    pub fn tile_ids(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.entries
            .iter()
            .map(|entry| entry.tile_id.as_str())
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Converts this index into a GeoJSON FeatureCollection with one rectangular polygon per tile
    pub fn to_geojson(&self) -> GeoJson {
        let features = self
            .entries
            .iter()
            .map(|entry| {
                let (min, max) = (entry.footprint.min(), entry.footprint.max());
                let ring = vec![
                    vec![min.x, min.y],
                    vec![max.x, min.y],
                    vec![max.x, max.y],
                    vec![min.x, max.y],
                    vec![min.x, min.y],
                ];
                let mut properties = JsonObject::new();
                properties.insert(
                    self.id_field.clone(),
                    JsonValue::String(entry.tile_id.clone()),
                );
                Feature {
                    bbox: None,
                    geometry: Some(Geometry::new(Value::Polygon(vec![ring]))),
                    id: None,
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();
        GeoJson::FeatureCollection(FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        })
    }

    /// Writes this index as GeoJSON to `path`, creating parent directories as needed
    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Could not create directory {}", parent.display()))?;
        }
        fs::write(path, self.to_geojson().to_string())
            .with_context(|| format!("Could not write articulation index {}", path.display()))
    }
}
