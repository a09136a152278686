use std::collections::BTreeSet;

use geopackage::geopackage_types::{BoundingRect, Coord, Geometry, GeometryType, LineString, Polygon};
use geopackage::{
    extract_envelope, EnvelopeMode, FeatureId, FeatureStore, FeatureStoreBuilder, GeometryColumn,
    Properties,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn point(x: f64, y: f64) -> Geometry {
    Geometry::Point(Coord::xy(x, y))
}

/// Linear congruential generator, so that the sequence of operations is the same on every run.
struct Lcg(u64);

impl Lcg {
    fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn coord(&mut self) -> f64 {
        self.below(2000) as f64 / 10.0 - 100.0
    }
}

fn random_geometry(rng: &mut Lcg) -> Option<Geometry> {
    let geometry = match rng.below(6) {
        0 => return None,
        1 => point(rng.coord(), rng.coord()),
        2 => Geometry::LineString(
            (0..2 + rng.below(4))
                .map(|_| Coord::xy(rng.coord(), rng.coord()))
                .collect(),
        ),
        3 => {
            let (x, y) = (rng.coord(), rng.coord());
            let size = rng.below(30) as f64;
            Geometry::Polygon(Polygon::new(vec![LineString::new(vec![
                Coord::xy(x, y),
                Coord::xy(x + size, y),
                Coord::xy(x + size, y + size),
                Coord::xy(x, y),
            ])]))
        }
        4 => Geometry::MultiPoint(
            (0..1 + rng.below(3))
                .map(|_| Coord::xy(rng.coord(), rng.coord()))
                .collect(),
        ),
        _ => Geometry::GeometryCollection(
            vec![point(rng.coord(), rng.coord()), point(rng.coord(), rng.coord())].into(),
        ),
    };

    Some(geometry)
}

fn random_rect(rng: &mut Lcg) -> BoundingRect {
    let (x, y) = (rng.coord(), rng.coord());
    BoundingRect::new(x, y, x + rng.below(80) as f64, y + rng.below(80) as f64)
}

fn full_scan(store: &FeatureStore, table: &str, bounds: &BoundingRect) -> BTreeSet<FeatureId> {
    store
        .features(table)
        .expect("table exists")
        .into_iter()
        .filter(|feature| {
            let raw = store
                .raw_geometry(table, feature.id)
                .expect("feature exists");
            raw.and_then(|bytes| extract_envelope(bytes).expect("valid geometry"))
                .is_some_and(|rect| rect.intersects(bounds))
        })
        .map(|feature| feature.id)
        .collect()
}

#[test]
fn three_points_scenario() {
    init_logger();

    let mut store = FeatureStore::new();
    store
        .create_feature_table(GeometryColumn::new("points", "geom", GeometryType::Point, 4326))
        .expect("created");

    let ids: Vec<_> = [(0.0, 0.0), (10.0, 10.0), (20.0, 20.0)]
        .into_iter()
        .map(|(x, y)| {
            store
                .insert("points", Some(&point(x, y)), Properties::new())
                .expect("inserted")
        })
        .collect();
    assert_eq!(store.create_spatial_index("points"), Ok(3));

    let near_origin = BoundingRect::new(-5.0, -5.0, 5.0, 5.0);
    let far = BoundingRect::new(95.0, 95.0, 105.0, 105.0);
    assert_eq!(store.query_bounds("points", &near_origin), Ok(BTreeSet::from([ids[0]])));

    store
        .update("points", ids[0], Some(&point(100.0, 100.0)))
        .expect("updated");
    assert_eq!(store.query_bounds("points", &near_origin), Ok(BTreeSet::new()));
    assert_eq!(store.query_bounds("points", &far), Ok(BTreeSet::from([ids[0]])));
}

#[test]
fn index_matches_full_scan_after_random_writes() {
    init_logger();

    for envelope_mode in [EnvelopeMode::None, EnvelopeMode::Xy] {
        let mut store = FeatureStoreBuilder::new()
            .with_envelope_mode(envelope_mode)
            .with_auto_index(true)
            .build();
        store
            .create_feature_table(GeometryColumn::new("shapes", "geom", GeometryType::Geometry, 0))
            .expect("created");

        let mut rng = Lcg(42);
        let mut ids: Vec<FeatureId> = vec![];

        for step in 0..400 {
            match rng.below(10) {
                0..=3 => {
                    let geometry = random_geometry(&mut rng);
                    let id = store
                        .insert("shapes", geometry.as_ref(), Properties::new())
                        .expect("inserted");
                    ids.push(id);
                }
                4..=7 if !ids.is_empty() => {
                    let id = ids[rng.below(ids.len() as u64) as usize];
                    let geometry = random_geometry(&mut rng);
                    store
                        .update("shapes", id, geometry.as_ref())
                        .expect("updated");
                }
                8..=9 if !ids.is_empty() => {
                    let id = ids.swap_remove(rng.below(ids.len() as u64) as usize);
                    store.delete("shapes", id).expect("deleted");
                }
                _ => {}
            }

            let bounds = random_rect(&mut rng);
            let indexed = store.query_bounds("shapes", &bounds).expect("indexed");
            assert_eq!(indexed, full_scan(&store, "shapes", &bounds), "step {step}");
        }

        // Rebuilding from scratch gives the same index.
        let before: Vec<_> = ids
            .iter()
            .map(|id| store.spatial_index().entry("shapes", *id))
            .collect();
        store.rebuild_spatial_index("shapes").expect("rebuilt");
        let after: Vec<_> = ids
            .iter()
            .map(|id| store.spatial_index().entry("shapes", *id))
            .collect();
        assert_eq!(before, after);

        // Without the index the store scans and returns the same ids.
        let bounds = BoundingRect::new(-50.0, -50.0, 50.0, 50.0);
        let indexed = store.query_bounds("shapes", &bounds).expect("indexed");
        store.drop_spatial_index("shapes").expect("dropped");
        assert_eq!(store.query_bounds("shapes", &bounds), Ok(indexed));
    }
}

#[test]
fn query_is_superset_of_overlapping_features() {
    let mut store = FeatureStoreBuilder::new().with_auto_index(true).build();
    store
        .create_feature_table(GeometryColumn::new("shapes", "geom", GeometryType::Geometry, 0))
        .expect("created");

    let mut rng = Lcg(7);
    let mut geometries = vec![];
    for _ in 0..100 {
        let geometry = random_geometry(&mut rng);
        let id = store
            .insert("shapes", geometry.as_ref(), Properties::new())
            .expect("inserted");
        geometries.push((id, geometry));
    }

    for _ in 0..50 {
        let bounds = random_rect(&mut rng);
        let found = store.query_bounds("shapes", &bounds).expect("indexed");

        for (id, geometry) in &geometries {
            let true_rect = geometry.as_ref().and_then(Geometry::bounding_rect);
            let stored_rect = store.spatial_index().entry("shapes", *id);

            assert_eq!(stored_rect, true_rect);
            assert_eq!(
                found.contains(id),
                true_rect.is_some_and(|rect| rect.intersects(&bounds))
            );
        }
    }
}
