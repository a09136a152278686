use geojson::feature::Id;
use geojson::FeatureCollection;
use geopackage_types::Geometry;

use super::FeatureStore;
use crate::error::Result;
use crate::index::FeatureId;

impl FeatureStore {
    /// Exports all features of the table as a GeoJSON feature collection.
    ///
    /// Feature ids become numeric GeoJSON ids. Z values are kept; M values are not representable in GeoJSON and
    /// are exported as the fourth position value.
    pub fn to_geojson(&self, table: &str) -> Result<FeatureCollection> {
        let features = self
            .features(table)?
            .into_iter()
            .map(|feature| geojson::Feature {
                bbox: None,
                geometry: feature.geometry.as_ref().map(geojson::Geometry::from),
                id: Some(Id::Number(feature.id.into())),
                properties: Some(feature.properties),
                foreign_members: None,
            })
            .collect();

        Ok(FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        })
    }

    /// Adds a GeoJSON feature to the table. The id of the GeoJSON feature is ignored.
    pub fn insert_geojson(&mut self, table: &str, feature: &geojson::Feature) -> Result<FeatureId> {
        let geometry = feature
            .geometry
            .as_ref()
            .map(Geometry::try_from)
            .transpose()?;

        self.insert(
            table,
            geometry.as_ref(),
            feature.properties.clone().unwrap_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use geopackage_types::{Coord, GeometryType};
    use serde_json::json;

    use super::*;
    use crate::column::GeometryColumn;
    use crate::store::Properties;

    #[test]
    fn export_and_import() {
        let mut store = FeatureStore::new();
        store
            .create_feature_table(GeometryColumn::new("places", "geom", GeometryType::Point, 4326))
            .expect("created");

        let mut properties = Properties::new();
        properties.insert("name".into(), json!("Berlin"));
        let id = store
            .insert("places", Some(&Geometry::Point(Coord::xy(13.4, 52.5))), properties)
            .expect("inserted");
        store.insert("places", None, Properties::new()).expect("inserted");

        let collection = store.to_geojson("places").expect("exported");
        let value = serde_json::to_value(&collection).expect("serialize");
        assert_eq!(value["features"][0]["id"], json!(id));
        assert_eq!(
            value["features"][0]["geometry"],
            json!({"type": "Point", "coordinates": [13.4, 52.5]})
        );
        assert_eq!(value["features"][0]["properties"]["name"], json!("Berlin"));
        assert_eq!(value["features"][1]["geometry"], serde_json::Value::Null);

        let mut copy = FeatureStore::new();
        copy.create_feature_table(GeometryColumn::new("places", "geom", GeometryType::Point, 4326))
            .expect("created");
        for feature in &collection.features {
            copy.insert_geojson("places", feature).expect("imported");
        }
        assert_eq!(copy.features("places"), store.features("places"));
    }
}
