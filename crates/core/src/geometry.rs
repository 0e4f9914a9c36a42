//! Geometry helpers for spatial units
//!
//! Small self-contained routines over `geo-types` geometries: centroids
//! for point/areal geometries and boundary vertex/edge extraction used by
//! the contiguity builders. No external geometry engine is pulled in; the
//! shoelace centroid is all the data model needs.

use geo_types::{Geometry, LineString, Polygon};

/// A 2D coordinate pair.
pub type Coord2 = (f64, f64);

/// An undirected boundary edge between two vertices.
pub type Edge = (Coord2, Coord2);

/// Centroid of a geometry, if defined.
///
/// - `Point`: the point itself.
/// - `MultiPoint`: arithmetic mean of the points.
/// - `Polygon` / `MultiPolygon`: area-weighted centroid (shoelace formula),
///   holes subtracted; degenerate zero-area rings fall back to the vertex
///   mean.
/// - Other geometry kinds: `None`.
pub fn centroid(geom: &Geometry<f64>) -> Option<Coord2> {
    match geom {
        Geometry::Point(p) => Some((p.x(), p.y())),
        Geometry::MultiPoint(mp) => {
            if mp.0.is_empty() {
                return None;
            }
            let n = mp.0.len() as f64;
            let (sx, sy) = mp
                .0
                .iter()
                .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x(), sy + p.y()));
            Some((sx / n, sy / n))
        }
        Geometry::Polygon(poly) => polygon_centroid(poly),
        Geometry::MultiPolygon(mp) => {
            // Area-weighted combination of part centroids
            let mut total_area = 0.0;
            let mut cx = 0.0;
            let mut cy = 0.0;
            let mut fallback = Vec::new();
            for poly in &mp.0 {
                let area = polygon_area(poly);
                if let Some((px, py)) = polygon_centroid(poly) {
                    cx += px * area;
                    cy += py * area;
                    total_area += area;
                    fallback.push((px, py));
                }
            }
            if fallback.is_empty() {
                None
            } else if total_area.abs() < f64::EPSILON {
                let n = fallback.len() as f64;
                let (sx, sy) = fallback
                    .iter()
                    .fold((0.0, 0.0), |(sx, sy), (x, y)| (sx + x, sy + y));
                Some((sx / n, sy / n))
            } else {
                Some((cx / total_area, cy / total_area))
            }
        }
        _ => None,
    }
}

/// Unsigned area of a polygon (exterior minus holes).
pub fn polygon_area(poly: &Polygon<f64>) -> f64 {
    let mut area = ring_signed_area(poly.exterior()).abs();
    for hole in poly.interiors() {
        area -= ring_signed_area(hole).abs();
    }
    area.max(0.0)
}

/// Boundary vertices of an areal geometry.
///
/// Returns `None` for non-areal geometries (points, lines). The closing
/// vertex of each ring is not repeated.
pub fn boundary_vertices(geom: &Geometry<f64>) -> Option<Vec<Coord2>> {
    let mut out = Vec::new();
    match geom {
        Geometry::Polygon(poly) => collect_polygon_vertices(poly, &mut out),
        Geometry::MultiPolygon(mp) => {
            for poly in &mp.0 {
                collect_polygon_vertices(poly, &mut out);
            }
        }
        _ => return None,
    }
    Some(out)
}

/// Boundary edges of an areal geometry as undirected vertex pairs.
///
/// Returns `None` for non-areal geometries. Each ring contributes its
/// consecutive vertex pairs, including the closing edge.
pub fn boundary_edges(geom: &Geometry<f64>) -> Option<Vec<Edge>> {
    let mut out = Vec::new();
    match geom {
        Geometry::Polygon(poly) => collect_polygon_edges(poly, &mut out),
        Geometry::MultiPolygon(mp) => {
            for poly in &mp.0 {
                collect_polygon_edges(poly, &mut out);
            }
        }
        _ => return None,
    }
    Some(out)
}

fn polygon_centroid(poly: &Polygon<f64>) -> Option<Coord2> {
    match ring_area_centroid(poly.exterior()) {
        Some((exterior_area, (ex, ey))) => {
            // Holes subtract their |area|-weighted centroids, whatever
            // their winding
            let mut area = exterior_area;
            let mut cx = ex * exterior_area;
            let mut cy = ey * exterior_area;
            for hole in poly.interiors() {
                if let Some((hole_area, (hx, hy))) = ring_area_centroid(hole) {
                    area -= hole_area;
                    cx -= hx * hole_area;
                    cy -= hy * hole_area;
                }
            }
            if area.abs() < f64::EPSILON {
                vertex_mean(poly.exterior())
            } else {
                Some((cx / area, cy / area))
            }
        }
        // Degenerate exterior: fall back to the vertex mean
        None => vertex_mean(poly.exterior()),
    }
}

/// Absolute area and centroid of a single ring, `None` if degenerate.
fn ring_area_centroid(ring: &LineString<f64>) -> Option<(f64, Coord2)> {
    let signed = ring_signed_area(ring);
    if signed.abs() < f64::EPSILON {
        return None;
    }
    let (nx, ny) = ring_centroid_numerator(ring);
    Some((signed.abs(), (nx / (3.0 * signed), ny / (3.0 * signed))))
}

/// Mean of the ring vertices, for degenerate rings.
fn vertex_mean(ring: &LineString<f64>) -> Option<Coord2> {
    let pts = ring_vertices(ring);
    if pts.is_empty() {
        return None;
    }
    let n = pts.len() as f64;
    let (sx, sy) = pts
        .iter()
        .fold((0.0, 0.0), |(sx, sy), (x, y)| (sx + x, sy + y));
    Some((sx / n, sy / n))
}

/// Signed shoelace area of a ring (half the cross-product sum).
fn ring_signed_area(ring: &LineString<f64>) -> f64 {
    let pts = &ring.0;
    if pts.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..pts.len() {
        let a = pts[i];
        let b = pts[(i + 1) % pts.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

/// Numerator terms of the shoelace centroid (divide by 3 * signed area).
fn ring_centroid_numerator(ring: &LineString<f64>) -> Coord2 {
    let pts = &ring.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..pts.len() {
        let a = pts[i];
        let b = pts[(i + 1) % pts.len()];
        let cross = a.x * b.y - b.x * a.y;
        cx += (a.x + b.x) * cross;
        cy += (a.y + b.y) * cross;
    }
    (cx / 2.0, cy / 2.0)
}

/// Ring vertices without the repeated closing point.
fn ring_vertices(ring: &LineString<f64>) -> Vec<Coord2> {
    let pts = &ring.0;
    if pts.is_empty() {
        return Vec::new();
    }
    let mut end = pts.len();
    if end > 1 && pts[0] == pts[end - 1] {
        end -= 1;
    }
    pts[..end].iter().map(|c| (c.x, c.y)).collect()
}

fn collect_polygon_vertices(poly: &Polygon<f64>, out: &mut Vec<Coord2>) {
    out.extend(ring_vertices(poly.exterior()));
    for hole in poly.interiors() {
        out.extend(ring_vertices(hole));
    }
}

fn collect_polygon_edges(poly: &Polygon<f64>, out: &mut Vec<Edge>) {
    collect_ring_edges(poly.exterior(), out);
    for hole in poly.interiors() {
        collect_ring_edges(hole, out);
    }
}

fn collect_ring_edges(ring: &LineString<f64>, out: &mut Vec<Edge>) {
    let pts = ring_vertices(ring);
    if pts.len() < 2 {
        return;
    }
    for i in 0..pts.len() {
        let a = pts[i];
        let b = pts[(i + 1) % pts.len()];
        out.push((a, b));
    }
}
