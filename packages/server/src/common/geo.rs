//! Great-circle distance and proximity search over located records.
//!
//! Both functions here are pure: they hold no state and may be called
//! concurrently from any number of request handlers.

/// A WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A record that may carry a registered coordinate.
///
/// Records without a coordinate are excluded from proximity results.
pub trait Located {
    fn coordinate(&self) -> Option<GeoPoint>;
}

/// Calculate distance between two coordinates in kilometers
///
/// Uses Haversine formula (spherical Earth, R = 6371 km). No ellipsoid
/// correction; the flat-sphere approximation is accepted error.
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;

    let dlat = (b.latitude - a.latitude).to_radians();
    let dlng = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos()
            * b.latitude.to_radians().cos()
            * (dlng / 2.0).sin().powi(2);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Filter candidates to those within `radius_km` of `origin`, annotated
/// with their distance and sorted ascending by it.
///
/// Candidates without a coordinate are excluded. An empty candidate list
/// yields an empty result.
pub fn nearby<T: Located>(origin: GeoPoint, candidates: Vec<T>, radius_km: f64) -> Vec<(T, f64)> {
    let mut matches: Vec<(T, f64)> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let point = candidate.coordinate()?;
            let distance = distance_km(origin, point);
            (distance <= radius_km).then_some((candidate, distance))
        })
        .collect();

    matches.sort_by(|a, b| a.1.total_cmp(&b.1));
    matches
}

/// Fallback when nothing is within the radius: the `n` closest candidates
/// from the full set, sorted ascending by distance.
///
/// Degrades "nearby" to "closest available" rather than returning empty.
pub fn closest<T: Located>(origin: GeoPoint, candidates: Vec<T>, n: usize) -> Vec<(T, f64)> {
    let mut all: Vec<(T, f64)> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let point = candidate.coordinate()?;
            Some((candidate, distance_km(origin, point)))
        })
        .collect();

    all.sort_by(|a, b| a.1.total_cmp(&b.1));
    all.truncate(n);
    all
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELHI: GeoPoint = GeoPoint {
        latitude: 28.6139,
        longitude: 77.2090,
    };
    const MUMBAI: GeoPoint = GeoPoint {
        latitude: 19.0760,
        longitude: 72.8777,
    };

    #[derive(Debug, PartialEq)]
    struct Site {
        name: &'static str,
        point: Option<GeoPoint>,
    }

    impl Located for Site {
        fn coordinate(&self) -> Option<GeoPoint> {
            self.point
        }
    }

    #[test]
    fn test_distance_delhi_mumbai() {
        // ~1150 km by great circle
        let d = distance_km(DELHI, MUMBAI);
        assert!(d > 1130.0 && d < 1170.0, "got {}", d);
    }

    #[test]
    fn test_distance_symmetric() {
        let forward = distance_km(DELHI, MUMBAI);
        let backward = distance_km(MUMBAI, DELHI);
        assert!((forward - backward).abs() < 1e-9);
    }

    #[test]
    fn test_distance_same_point_is_zero() {
        assert!(distance_km(DELHI, DELHI).abs() < 1e-9);
    }

    #[test]
    fn test_nearby_filters_by_radius() {
        let sites = vec![Site {
            name: "mumbai",
            point: Some(MUMBAI),
        }];
        assert!(nearby(DELHI, sites, 100.0).is_empty());

        let sites = vec![Site {
            name: "mumbai",
            point: Some(MUMBAI),
        }];
        let within = nearby(DELHI, sites, 1200.0);
        assert_eq!(within.len(), 1);
        assert!((within[0].1 - 1150.0).abs() < 20.0);
    }

    #[test]
    fn test_nearby_zero_radius_matches_exact_point() {
        let sites = vec![Site {
            name: "here",
            point: Some(DELHI),
        }];
        let results = nearby(DELHI, sites, 0.0);
        assert_eq!(results.len(), 1);
        assert!(results[0].1.abs() < 1e-9);
    }

    #[test]
    fn test_nearby_sorts_ascending() {
        let origin = GeoPoint::new(28.6139, 77.2090);
        let sites = vec![
            Site {
                name: "far",
                point: Some(GeoPoint::new(28.9, 77.6)),
            },
            Site {
                name: "near",
                point: Some(GeoPoint::new(28.62, 77.21)),
            },
            Site {
                name: "mid",
                point: Some(GeoPoint::new(28.7, 77.3)),
            },
        ];
        let results = nearby(origin, sites, 500.0);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0.name, "near");
        assert_eq!(results[1].0.name, "mid");
        assert_eq!(results[2].0.name, "far");
        assert!(results[0].1 <= results[1].1 && results[1].1 <= results[2].1);
    }

    #[test]
    fn test_nearby_excludes_unlocated() {
        let sites = vec![
            Site {
                name: "unknown",
                point: None,
            },
            Site {
                name: "here",
                point: Some(DELHI),
            },
        ];
        let results = nearby(DELHI, sites, 50.0);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0.name, "here");
    }

    #[test]
    fn test_nearby_empty_input() {
        let results = nearby(DELHI, Vec::<Site>::new(), 50.0);
        assert!(results.is_empty());
    }

    #[test]
    fn test_closest_fallback() {
        let sites = vec![
            Site {
                name: "mumbai",
                point: Some(MUMBAI),
            },
            Site {
                name: "unknown",
                point: None,
            },
            Site {
                name: "delhi",
                point: Some(DELHI),
            },
        ];
        // Nothing within 1 km, but closest still returns ordered results
        let results = closest(DELHI, sites, 2);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0.name, "delhi");
        assert_eq!(results[1].0.name, "mumbai");
    }

    #[test]
    fn test_closest_truncates() {
        let sites = vec![
            Site {
                name: "a",
                point: Some(GeoPoint::new(28.62, 77.21)),
            },
            Site {
                name: "b",
                point: Some(GeoPoint::new(28.7, 77.3)),
            },
        ];
        let results = closest(DELHI, sites, 1);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0.name, "a");
    }

    #[test]
    fn test_idempotent() {
        let first = distance_km(DELHI, MUMBAI);
        let second = distance_km(DELHI, MUMBAI);
        assert_eq!(first, second);
    }
}
