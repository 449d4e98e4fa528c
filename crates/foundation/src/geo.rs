use crate::bounds::Aabb2;

/// A position in lon/lat degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }
}

/// A country boundary. Rings are lists of lon/lat points; the first ring
/// of a polygon is the exterior, the rest are holes.
#[derive(Debug, Clone, PartialEq)]
pub enum Boundary {
    Polygon(Vec<Vec<GeoPoint>>),
    MultiPolygon(Vec<Vec<Vec<GeoPoint>>>),
}

impl Boundary {
    pub fn polygons(&self) -> &[Vec<Vec<GeoPoint>>] {
        match self {
            Boundary::Polygon(rings) => std::slice::from_ref(rings),
            Boundary::MultiPolygon(polys) => polys,
        }
    }

    /// Planar area-weighted centroid of the boundary. Holes subtract
    /// from their polygon's contribution. Degenerate (zero-area)
    /// boundaries fall back to the vertex mean.
    pub fn centroid(&self) -> GeoPoint {
        let mut area_sum = 0.0;
        let mut cx = 0.0;
        let mut cy = 0.0;

        for rings in self.polygons() {
            for (ring_i, ring) in rings.iter().enumerate() {
                let Some((a, c)) = ring_area_centroid(ring) else {
                    continue;
                };
                // Exterior ring adds, holes subtract.
                let w = if ring_i == 0 { a.abs() } else { -a.abs() };
                area_sum += w;
                cx += c.lon_deg * w;
                cy += c.lat_deg * w;
            }
        }

        if area_sum.abs() > f64::EPSILON {
            return GeoPoint::new(cx / area_sum, cy / area_sum);
        }

        vertex_mean(self.polygons()).unwrap_or(GeoPoint::new(0.0, 0.0))
    }

    pub fn bounds(&self) -> Option<Aabb2> {
        Aabb2::from_points(
            self.polygons()
                .iter()
                .flat_map(|rings| rings.iter())
                .flat_map(|ring| ring.iter())
                .map(|p| [p.lon_deg, p.lat_deg]),
        )
    }
}

/// Shoelace area and centroid of a single ring. Returns None for rings
/// with fewer than 3 distinct vertices or zero area.
fn ring_area_centroid(ring: &[GeoPoint]) -> Option<(f64, GeoPoint)> {
    if ring.len() < 3 {
        return None;
    }

    let mut twice_area = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;

    for i in 0..ring.len() {
        let p = ring[i];
        let q = ring[(i + 1) % ring.len()];
        let cross = p.lon_deg * q.lat_deg - q.lon_deg * p.lat_deg;
        twice_area += cross;
        cx += (p.lon_deg + q.lon_deg) * cross;
        cy += (p.lat_deg + q.lat_deg) * cross;
    }

    if twice_area.abs() <= f64::EPSILON {
        return None;
    }

    let area = twice_area / 2.0;
    let centroid = GeoPoint::new(cx / (3.0 * twice_area), cy / (3.0 * twice_area));
    Some((area, centroid))
}

fn vertex_mean(polygons: &[Vec<Vec<GeoPoint>>]) -> Option<GeoPoint> {
    let mut n = 0usize;
    let mut lon = 0.0;
    let mut lat = 0.0;
    for rings in polygons {
        for ring in rings {
            for p in ring {
                n += 1;
                lon += p.lon_deg;
                lat += p.lat_deg;
            }
        }
    }
    if n == 0 {
        return None;
    }
    Some(GeoPoint::new(lon / n as f64, lat / n as f64))
}
