use crate::data_types::{
    common::Coordinate,
    route::Bounds,
};

pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const KM_PER_MILE: f64 = 1.609344;

/// Where a map opens when there is no route to show (New York City).
pub const DEFAULT_CENTER: Coordinate = Coordinate {
    lat: 40.7128,
    lng: -74.0060,
};

pub struct GeoUtils;

impl GeoUtils {
    /// Great-circle distance in kilometers.
    pub fn distance(p1: Coordinate, p2: Coordinate) -> f64 {
        let lat1 = GeoUtils::deg2rad(p1.lat);
        let lat2 = GeoUtils::deg2rad(p2.lat);
        let dlat = lat2 - lat1;
        let dlng = GeoUtils::deg2rad(p2.lng - p1.lng);

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }

    pub fn deg2rad(deg: f64) -> f64 {
        deg * std::f64::consts::PI / 180.0
    }

    pub fn path_length(path: &[Coordinate]) -> f64 {
        path.windows(2)
            .map(|pair| GeoUtils::distance(pair[0], pair[1]))
            .sum()
    }

    pub fn get_bounding_box(path: &[Coordinate]) -> Option<Bounds> {
        let first = path.first()?;
        let mut southwest = *first;
        let mut northeast = *first;

        path.iter().for_each(|coord| {
            southwest.lat = coord.lat.min(southwest.lat);
            southwest.lng = coord.lng.min(southwest.lng);

            northeast.lat = coord.lat.max(northeast.lat);
            northeast.lng = coord.lng.max(northeast.lng);
        });

        Some(Bounds { northeast, southwest })
    }

    pub fn get_center_of_bbox(bounds: &Bounds) -> Coordinate {
        Coordinate::new(
            (bounds.southwest.lat + bounds.northeast.lat) / 2.,
            (bounds.southwest.lng + bounds.northeast.lng) / 2.,
        )
    }

    /// The map opens on the start of the route.
    pub fn map_center(path: &[Coordinate]) -> Coordinate {
        path.first().copied().unwrap_or(DEFAULT_CENTER)
    }

    /// The point reached after travelling `fraction` (0..=1) of the path length.
    pub fn point_at_fraction(path: &[Coordinate], fraction: f64) -> Option<Coordinate> {
        let first = *path.first()?;
        let total = GeoUtils::path_length(path);

        if total <= 0. || fraction <= 0. {
            return Some(first);
        }

        GeoUtils::point_at_distance(path, total * fraction.min(1.))
    }

    fn point_at_distance(path: &[Coordinate], target_km: f64) -> Option<Coordinate> {
        let mut travelled = 0.;

        for pair in path.windows(2) {
            let leg = GeoUtils::distance(pair[0], pair[1]);

            if leg > 0. && travelled + leg >= target_km {
                let t = (target_km - travelled) / leg;
                return Some(Coordinate::new(
                    pair[0].lat + (pair[1].lat - pair[0].lat) * t,
                    pair[0].lng + (pair[1].lng - pair[0].lng) * t,
                ));
            }

            travelled += leg;
        }

        path.last().copied()
    }

    /// Points spaced `interval_km` apart along the path, the start excluded.
    pub fn sample_every(path: &[Coordinate], interval_km: f64) -> Vec<Coordinate> {
        if interval_km <= 0. {
            return Vec::new();
        }

        let total = GeoUtils::path_length(path);
        let mut samples = Vec::new();
        let mut next = interval_km;

        while next < total {
            if let Some(point) = GeoUtils::point_at_distance(path, next) {
                samples.push(point);
            }
            next += interval_km;
        }

        samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn equator_path() -> Vec<Coordinate> {
        vec![
            Coordinate::new(0., 0.),
            Coordinate::new(0., 1.),
            Coordinate::new(0., 2.),
        ]
    }

    #[test]
    fn one_degree_of_longitude_on_the_equator() {
        let km = GeoUtils::distance(Coordinate::new(0., 0.), Coordinate::new(0., 1.));

        assert!((km - 111.195).abs() < 0.01, "{}", km);
    }

    #[test]
    fn bounding_box_and_center() {
        let path = vec![
            Coordinate::new(38.5, -120.2),
            Coordinate::new(40.7, -120.95),
            Coordinate::new(43.252, -126.453),
        ];
        let bounds = GeoUtils::get_bounding_box(&path).unwrap();

        assert_eq!(bounds.southwest, Coordinate::new(38.5, -126.453));
        assert_eq!(bounds.northeast, Coordinate::new(43.252, -120.2));

        let center = GeoUtils::get_center_of_bbox(&bounds);
        assert!((center.lat - 40.876).abs() < 1e-9);
        assert!(GeoUtils::get_bounding_box(&[]).is_none());
    }

    #[test]
    fn map_center_falls_back_when_there_is_no_path() {
        assert_eq!(GeoUtils::map_center(&[]), DEFAULT_CENTER);
        assert_eq!(GeoUtils::map_center(&equator_path()), Coordinate::new(0., 0.));
    }

    #[test]
    fn halfway_along_the_path() {
        let middle = GeoUtils::point_at_fraction(&equator_path(), 0.5).unwrap();

        assert!(middle.lat.abs() < 1e-9);
        assert!((middle.lng - 1.).abs() < 1e-6);
        assert_eq!(GeoUtils::point_at_fraction(&equator_path(), 2.), Some(Coordinate::new(0., 2.)));
        assert_eq!(GeoUtils::point_at_fraction(&[], 0.5), None);
    }

    #[test]
    fn samples_are_evenly_spaced() {
        let samples = GeoUtils::sample_every(&equator_path(), 50.);

        // about 222 km long
        assert_eq!(samples.len(), 4);
        assert!((GeoUtils::distance(Coordinate::new(0., 0.), samples[0]) - 50.).abs() < 0.01);
        assert!(GeoUtils::sample_every(&equator_path(), 0.).is_empty());
    }
}
