// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Planar and great-circle helpers over `[lon, lat]` pairs.

use geoprompt_nlp::Coordinates;
use std::cmp::Ordering;

const EARTH_RADIUS_KM: f64 = 6371.0;
pub const ARC_SEGMENTS: usize = 64;

pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let (lat1, lat2) = (a[1].to_radians(), b[1].to_radians());
    let d_lat = lat2 - lat1;
    let d_lon = (b[0] - a[0]).to_radians();
    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

fn cross(o: Coordinates, a: Coordinates, b: Coordinates) -> f64 {
    (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
}

fn dist2(a: Coordinates, b: Coordinates) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)
}

/// Graham scan. The pivot is the lowest latitude, then the leftmost
/// longitude; collinear points are dropped. Fewer than three distinct
/// points are returned unchanged.
pub fn convex_hull(points: &[Coordinates]) -> Vec<Coordinates> {
    let mut pts: Vec<Coordinates> = Vec::with_capacity(points.len());
    for p in points {
        if !pts.contains(p) {
            pts.push(*p);
        }
    }
    if pts.len() < 3 {
        return pts;
    }

    let pivot_idx = pts
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            a[1].partial_cmp(&b[1])
                .unwrap_or(Ordering::Equal)
                .then(a[0].partial_cmp(&b[0]).unwrap_or(Ordering::Equal))
        })
        .map(|(i, _)| i)
        .unwrap_or(0);
    let pivot = pts.swap_remove(pivot_idx);

    pts.sort_by(|a, b| {
        let angle_a = (a[1] - pivot[1]).atan2(a[0] - pivot[0]);
        let angle_b = (b[1] - pivot[1]).atan2(b[0] - pivot[0]);
        angle_a
            .partial_cmp(&angle_b)
            .unwrap_or(Ordering::Equal)
            .then(
                dist2(pivot, *a)
                    .partial_cmp(&dist2(pivot, *b))
                    .unwrap_or(Ordering::Equal),
            )
    });

    let mut hull = vec![pivot];
    for p in pts {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }
    hull
}

pub fn centroid(points: &[Coordinates]) -> Option<Coordinates> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p[0], sy + p[1]));
    Some([sx / n, sy / n])
}

/// Pushes every vertex `degrees` further from the hull centroid.
pub fn buffer_hull(hull: &[Coordinates], degrees: f64) -> Vec<Coordinates> {
    let Some(c) = centroid(hull) else {
        return Vec::new();
    };
    hull.iter()
        .map(|p| {
            let (dx, dy) = (p[0] - c[0], p[1] - c[1]);
            let len = (dx * dx + dy * dy).sqrt();
            if len == 0.0 {
                *p
            } else {
                [p[0] + dx / len * degrees, p[1] + dy / len * degrees]
            }
        })
        .collect()
}

/// GeoJSON polygon rings repeat their first vertex.
pub fn close_ring(mut ring: Vec<Coordinates>) -> Vec<Coordinates> {
    if let (Some(first), Some(last)) = (ring.first().copied(), ring.last().copied()) {
        if first != last {
            ring.push(first);
        }
    }
    ring
}

/// Inclusive point-in-convex-polygon test. `hull` must be counter-clockwise,
/// which is what `convex_hull` produces.
pub fn hull_contains(hull: &[Coordinates], p: Coordinates) -> bool {
    const EPS: f64 = 1e-9;
    match hull.len() {
        0 => false,
        1 => dist2(hull[0], p) < EPS,
        2 => {
            cross(hull[0], hull[1], p).abs() < EPS
                && p[0] >= hull[0][0].min(hull[1][0]) - EPS
                && p[0] <= hull[0][0].max(hull[1][0]) + EPS
                && p[1] >= hull[0][1].min(hull[1][1]) - EPS
                && p[1] <= hull[0][1].max(hull[1][1]) + EPS
        }
        n => (0..n).all(|i| cross(hull[i], hull[(i + 1) % n], p) >= -EPS),
    }
}

/// Quadratic Bézier from `a` to `b` bowed to the left of travel, used for
/// flight legs. Longitudes are unwrapped so the arc takes the short way
/// across the antimeridian.
pub fn bezier_arc(a: Coordinates, b: Coordinates) -> Vec<Coordinates> {
    let mut end = b;
    if end[0] - a[0] > 180.0 {
        end[0] -= 360.0;
    } else if a[0] - end[0] > 180.0 {
        end[0] += 360.0;
    }
    let (dx, dy) = (end[0] - a[0], end[1] - a[1]);
    let mid = [(a[0] + end[0]) / 2.0, (a[1] + end[1]) / 2.0];
    let control = [mid[0] - dy * 0.2, mid[1] + dx * 0.2];

    (0..=ARC_SEGMENTS)
        .map(|i| {
            let t = i as f64 / ARC_SEGMENTS as f64;
            let u = 1.0 - t;
            let lon = u * u * a[0] + 2.0 * u * t * control[0] + t * t * end[0];
            let lat = u * u * a[1] + 2.0 * u * t * control[1] + t * t * end[1];
            [lon, lat.clamp(-89.9, 89.9)]
        })
        .collect()
}

/// Straight interpolation with `segments` pieces, used for sea legs and as
/// the fallback for failed directions.
pub fn interpolate_line(a: Coordinates, b: Coordinates, segments: usize) -> Vec<Coordinates> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| {
            let t = i as f64 / segments as f64;
            [a[0] + (b[0] - a[0]) * t, a[1] + (b[1] - a[1]) * t]
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Coordinates,
    pub max: Coordinates,
}

impl Bounds {
    pub fn from_points(points: &[Coordinates]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bounds = Bounds {
            min: *first,
            max: *first,
        };
        for p in rest {
            bounds.extend(*p);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, p: Coordinates) {
        self.min = [self.min[0].min(p[0]), self.min[1].min(p[1])];
        self.max = [self.max[0].max(p[0]), self.max[1].max(p[1])];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_paris_london() {
        let d = haversine_km([2.3522, 48.8566], [-0.1278, 51.5074]);
        assert!((d - 343.5).abs() < 2.0, "got {}", d);
        assert_eq!(haversine_km([1.0, 1.0], [1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_hull_drops_interior_points() {
        let pts = [
            [0.0, 0.0],
            [4.0, 0.0],
            [4.0, 4.0],
            [0.0, 4.0],
            [2.0, 2.0],
            [1.0, 3.0],
            [2.0, 0.0],
        ];
        let hull = convex_hull(&pts);
        assert_eq!(hull, vec![[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0]]);
        for p in pts {
            assert!(hull_contains(&hull, p), "{:?} outside", p);
        }
        assert!(!hull_contains(&hull, [5.0, 1.0]));
    }

    #[test]
    fn test_hull_of_two_points_is_unchanged() {
        assert_eq!(
            convex_hull(&[[1.0, 1.0], [2.0, 2.0], [1.0, 1.0]]),
            vec![[1.0, 1.0], [2.0, 2.0]]
        );
    }

    #[test]
    fn test_buffer_moves_vertices_outward() {
        let hull = vec![[0.0, 0.0], [2.0, 0.0], [1.0, 2.0]];
        let buffered = buffer_hull(&hull, 0.5);
        let c = centroid(&hull).unwrap();
        for (before, after) in hull.iter().zip(&buffered) {
            let d0 = dist2(c, *before).sqrt();
            let d1 = dist2(c, *after).sqrt();
            assert!((d1 - d0 - 0.5).abs() < 1e-9);
        }
        let ring = close_ring(buffered);
        assert_eq!(ring.first(), ring.last());
        assert_eq!(ring.len(), 4);
    }

    #[test]
    fn test_arc_endpoints_and_bow() {
        let a = [-74.006, 40.7128];
        let b = [2.3522, 48.8566];
        let arc = bezier_arc(a, b);
        assert_eq!(arc.len(), ARC_SEGMENTS + 1);
        assert_eq!(arc[0], a);
        let last = arc[ARC_SEGMENTS];
        assert!((last[0] - b[0]).abs() < 1e-9 && (last[1] - b[1]).abs() < 1e-9);
        let straight_mid_lat = (a[1] + b[1]) / 2.0;
        assert!(arc[ARC_SEGMENTS / 2][1] > straight_mid_lat);
    }

    #[test]
    fn test_arc_crosses_antimeridian_the_short_way() {
        let arc = bezier_arc([170.0, 0.0], [-170.0, 0.0]);
        assert!(arc.iter().all(|p| p[0] >= 170.0 - 1e-9));
    }

    #[test]
    fn test_bounds() {
        let b = Bounds::from_points(&[[1.0, 5.0], [-3.0, 2.0], [4.0, -1.0]]).unwrap();
        assert_eq!(b.min, [-3.0, -1.0]);
        assert_eq!(b.max, [4.0, 5.0]);
        assert!(Bounds::from_points(&[]).is_none());
    }
}
