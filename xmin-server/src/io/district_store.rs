use geojson::{Feature, FeatureCollection, GeoJson};
use serde_json::{json, Map};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DistrictError {
    #[error("failure reading districts file {0}: {1}")]
    IoError(String, std::io::Error),
    #[error("failure decoding districts file {0}: {1}")]
    DecodeError(String, String),
    #[error("districts file {0} is not a FeatureCollection")]
    NotAFeatureCollection(String),
}

/// the administrative district polygons, loaded once and served verbatim.
/// properties are reduced to `district_id` plus an optional `name`.
#[derive(Debug)]
pub struct DistrictStore {
    collection: FeatureCollection,
}

impl Default for DistrictStore {
    fn default() -> Self {
        DistrictStore {
            collection: FeatureCollection {
                bbox: None,
                features: Vec::new(),
                foreign_members: None,
            },
        }
    }
}

impl DistrictStore {
    pub fn feature_collection(&self) -> &FeatureCollection {
        &self.collection
    }

    pub fn len(&self) -> usize {
        self.collection.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.features.is_empty()
    }
}

pub fn load_districts(path: &str) -> Result<DistrictStore, DistrictError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| DistrictError::IoError(String::from(path), e))?;
    let geojson = text
        .parse::<GeoJson>()
        .map_err(|e| DistrictError::DecodeError(String::from(path), e.to_string()))?;
    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => return Err(DistrictError::NotAFeatureCollection(String::from(path))),
    };
    Ok(reduce(collection))
}

/// keeps only features with a geometry and a numeric district id, reducing
/// the property set. features failing either check are dropped and logged.
fn reduce(collection: FeatureCollection) -> DistrictStore {
    let features = collection
        .features
        .into_iter()
        .filter_map(|feature| {
            let geometry = match &feature.geometry {
                Some(g) => g.clone(),
                None => {
                    log::warn!("dropping district feature without geometry");
                    return None;
                }
            };
            let district_id = feature
                .properties
                .as_ref()
                .and_then(|p| p.get("district_id"))
                .and_then(|v| v.as_i64());
            let district_id = match district_id {
                Some(id) => id,
                None => {
                    log::warn!(
                        "dropping district feature without numeric district_id: {:?}",
                        feature.properties
                    );
                    return None;
                }
            };
            let mut properties = Map::new();
            properties.insert(String::from("district_id"), json!(district_id));
            if let Some(name) = feature
                .properties
                .as_ref()
                .and_then(|p| p.get("name"))
                .and_then(|v| v.as_str())
            {
                properties.insert(String::from("name"), json!(name));
            }
            Some(Feature {
                bbox: None,
                geometry: Some(geometry),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            })
        })
        .collect();
    DistrictStore {
        collection: FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        },
    }
}
