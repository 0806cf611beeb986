//! Spatial index over the celestial sphere for region queries.
//!
//! `SpatialIndex` bins record handles in a HEALPix-style grid: latitude is
//! split into `3 * nside` bands equal in `z = sin(dec)`, longitude into
//! `4 * nside` bands in right ascension, for `12 * nside^2` cells in total.
//!
//! Query flow:
//! 1. Bound the query region by a spherical cap.
//! 2. Enumerate the cells that can intersect that cap.
//! 3. Test every entry in those cells against the region's edge half-spaces.
//!
//! Entries carry their direction, so step 3 never touches the object store.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use nalgebra::Vector3;

use crate::store::RecordRef;

/// Default number of cells requested from [`SpatialIndex::new`].
pub const DEFAULT_CELL_COUNT: u32 = 200;

#[derive(Debug, Clone, Copy)]
struct Entry {
    handle: RecordRef,
    direction: Vector3<f64>,
}

/// Grid of record handles keyed by sky position.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    nside: u32,
    n_lat: u32,
    n_lon: u32,
    cells: Vec<Vec<Entry>>,
    len: usize,
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_COUNT)
    }
}

impl SpatialIndex {
    /// Build an empty index with roughly `cell_count` cells.
    ///
    /// The grid always has `12 * nside^2` cells; `nside` is picked so the
    /// total is as close as possible to the request, with a minimum of 12.
    pub fn new(cell_count: u32) -> Self {
        let nside = ((cell_count as f64 / 12.0).sqrt().round() as u32).max(1);
        Self::with_nside(nside)
    }

    /// Build an empty index with an explicit resolution. `nside` of zero is
    /// treated as one.
    pub fn with_nside(nside: u32) -> Self {
        let nside = nside.max(1);
        let n_lat = 3 * nside;
        let n_lon = 4 * nside;
        Self {
            nside,
            n_lat,
            n_lon,
            cells: vec![Vec::new(); (n_lat * n_lon) as usize],
            len: 0,
        }
    }

    pub fn nside(&self) -> u32 {
        self.nside
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of indexed handles.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// File `handle` under the cell containing `direction`, which must be a
    /// unit vector.
    pub fn insert(&mut self, handle: RecordRef, direction: Vector3<f64>) {
        let cell = self.cell_for_uvec(&direction);
        self.cells[cell].push(Entry { handle, direction });
        self.len += 1;
    }

    /// Remove every entry, keeping the grid.
    pub fn clear(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.clear();
        }
        self.len = 0;
    }

    /// Lazily yield every handle whose direction lies in `region`.
    ///
    /// Each call rescans the candidate cells; nothing is cached between
    /// queries and nothing is allocated.
    pub fn query_region<'a>(&'a self, region: &'a ConvexRegion) -> RegionQuery<'a> {
        let (center, radius) = region.bounding_cap();
        let plan = self.plan_cells(&center, radius);
        RegionQuery {
            index: self,
            region,
            plan,
            lat: plan.lat_first,
            lon_step: 0,
            entry: 0,
        }
    }

    /// Handles within `radius_rad` of `direction`.
    pub fn query_cone(&self, direction: Vector3<f64>, radius_rad: f64) -> Vec<RecordRef> {
        let region = ConvexRegion::cap(direction, radius_rad);
        self.query_region(&region).collect()
    }

    fn plan_cells(&self, center: &Vector3<f64>, radius: f64) -> CellPlan {
        let full_ring = LonSpan {
            first: 0,
            count: self.n_lon,
        };
        if radius >= FRAC_PI_2 {
            return CellPlan {
                lat_first: 0,
                lat_last: self.n_lat - 1,
                lon: full_ring,
            };
        }

        let dec_c = center.z.clamp(-1.0, 1.0).asin();
        let dec_min = dec_c - radius;
        let dec_max = dec_c + radius;
        let z_min = dec_min.max(-FRAC_PI_2).sin() - 1e-9;
        let z_max = dec_max.min(FRAC_PI_2).sin() + 1e-9;
        let lat_first = z_to_lat_bin(self.n_lat, z_min);
        let lat_last = z_to_lat_bin(self.n_lat, z_max);

        let contains_pole = dec_max >= FRAC_PI_2 || dec_min <= -FRAC_PI_2;
        let ratio = radius.sin() / dec_c.cos();
        let lon = if contains_pole || ratio >= 1.0 {
            full_ring
        } else {
            let half_span = ratio.asin() + 1e-9;
            let phi = wrap_angle(center.y.atan2(center.x));
            self.lon_span(phi - half_span, phi + half_span)
        };

        CellPlan {
            lat_first,
            lat_last,
            lon,
        }
    }

    /// Longitude bins covering `[lon_min, lon_max]`, walking east from the
    /// first bin and wrapping through zero.
    fn lon_span(&self, lon_min: f64, lon_max: f64) -> LonSpan {
        let lon_step = TAU / self.n_lon as f64;
        if lon_max - lon_min >= TAU - lon_step {
            return LonSpan {
                first: 0,
                count: self.n_lon,
            };
        }
        let first = phi_to_lon_bin(self.n_lon, wrap_angle(lon_min));
        let last = phi_to_lon_bin(self.n_lon, wrap_angle(lon_max));
        let count = ((last as i64 - first as i64).rem_euclid(self.n_lon as i64) + 1) as u32;
        LonSpan {
            first,
            count: count.min(self.n_lon),
        }
    }

    fn cell_for_uvec(&self, dir: &Vector3<f64>) -> usize {
        let phi = wrap_angle(dir.y.atan2(dir.x));
        let lat_bin = z_to_lat_bin(self.n_lat, dir.z);
        let lon_bin = phi_to_lon_bin(self.n_lon, phi);
        (lat_bin * self.n_lon + lon_bin) as usize
    }
}

#[derive(Debug, Clone, Copy)]
struct LonSpan {
    first: u32,
    count: u32,
}

#[derive(Debug, Clone, Copy)]
struct CellPlan {
    lat_first: u32,
    lat_last: u32,
    lon: LonSpan,
}

/// Iterator returned by [`SpatialIndex::query_region`].
#[derive(Debug, Clone)]
pub struct RegionQuery<'a> {
    index: &'a SpatialIndex,
    region: &'a ConvexRegion,
    plan: CellPlan,
    lat: u32,
    lon_step: u32,
    entry: usize,
}

impl Iterator for RegionQuery<'_> {
    type Item = RecordRef;

    fn next(&mut self) -> Option<RecordRef> {
        let n_lon = self.index.n_lon;
        loop {
            if self.lat > self.plan.lat_last {
                return None;
            }
            let lon_bin = (self.plan.lon.first + self.lon_step) % n_lon;
            let cell = &self.index.cells[(self.lat * n_lon + lon_bin) as usize];
            while let Some(entry) = cell.get(self.entry) {
                self.entry += 1;
                if self.region.contains(&entry.direction) {
                    return Some(entry.handle);
                }
            }
            self.entry = 0;
            self.lon_step += 1;
            if self.lon_step >= self.plan.lon.count {
                self.lon_step = 0;
                self.lat += 1;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Shape {
    /// Inward unit normals of the polygon's edges. Without a usable centre
    /// (`bounded` false) the bounding cap is the whole sphere.
    Polygon {
        normals: Vec<Vector3<f64>>,
        bounded: bool,
    },
    Cap { center: Vector3<f64>, radius: f64 },
}

/// Convex region on the unit sphere: a spherical polygon or a cap.
///
/// Membership is relaxed by an angular margin, so points slightly outside
/// an edge still count as inside.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexRegion {
    shape: Shape,
    margin: f64,
    bound_center: Vector3<f64>,
    bound_radius: f64,
}

impl ConvexRegion {
    /// Polygon through `vertices`, given counter-clockwise as seen from the
    /// centre of the sphere. Clockwise input is accepted and reoriented.
    ///
    /// Returns `None` for fewer than three distinct vertices. The polygon
    /// must fit in a hemisphere.
    pub fn polygon(vertices: &[Vector3<f64>], margin_rad: f64) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        let verts: Vec<Vector3<f64>> = vertices.iter().map(|v| normalize_or_fallback(*v)).collect();

        let mut normals = Vec::with_capacity(verts.len());
        for (i, a) in verts.iter().enumerate() {
            let b = &verts[(i + 1) % verts.len()];
            let n = a.cross(b);
            let norm = n.norm();
            if norm > 1e-15 {
                normals.push(n / norm);
            }
        }
        if normals.len() < 3 {
            return None;
        }

        let sum = verts.iter().fold(Vector3::zeros(), |acc, v| acc + v);
        let sum_norm = sum.norm();
        let bound_center = if sum_norm > 1e-12 {
            sum / sum_norm
        } else {
            Vector3::new(1.0, 0.0, 0.0)
        };

        let orientation: f64 = normals.iter().map(|n| n.dot(&bound_center)).sum();
        if orientation < 0.0 {
            for n in normals.iter_mut() {
                *n = -*n;
            }
        }

        let bounded = sum_norm > 1e-12;
        let margin = margin_rad.max(0.0);
        let bound_radius = if bounded {
            polygon_bound(&normals, &bound_center, margin)
        } else {
            PI
        };
        Some(Self {
            shape: Shape::Polygon { normals, bounded },
            margin,
            bound_center,
            bound_radius,
        })
    }

    /// All points within `radius_rad` of `center`.
    pub fn cap(center: Vector3<f64>, radius_rad: f64) -> Self {
        let center = normalize_or_fallback(center);
        let radius = radius_rad.clamp(0.0, PI);
        Self {
            shape: Shape::Cap { center, radius },
            margin: 0.0,
            bound_center: center,
            bound_radius: radius,
        }
    }

    /// Same region with a different angular margin.
    pub fn with_margin(mut self, margin_rad: f64) -> Self {
        let margin = margin_rad.max(0.0);
        self.bound_radius = match &self.shape {
            Shape::Polygon { normals, bounded: true } => {
                polygon_bound(normals, &self.bound_center, margin)
            }
            Shape::Polygon { bounded: false, .. } => PI,
            Shape::Cap { radius, .. } => (radius + margin).min(PI),
        };
        self.margin = margin;
        self
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Cap enclosing the region and its margin, as `(center, radius)`.
    pub fn bounding_cap(&self) -> (Vector3<f64>, f64) {
        (self.bound_center, self.bound_radius)
    }

    /// Whether the unit vector `p` lies in the region, margin included.
    pub fn contains(&self, p: &Vector3<f64>) -> bool {
        match &self.shape {
            Shape::Polygon { normals, .. } => {
                let slack = -self.margin.sin();
                normals.iter().all(|n| n.dot(p) >= slack)
            }
            Shape::Cap { center, radius } => {
                center.dot(p) >= (radius + self.margin).min(PI).cos()
            }
        }
    }
}

/// Angular radius around `center` that encloses the polygon once every edge
/// is pushed outward by `margin`.
///
/// The relaxed edges of a corner with interior angle `a` cross roughly
/// `margin / sin(a / 2)` beyond it, so thin wedges reach much further than
/// the margin alone.
fn polygon_bound(
    normals: &[Vector3<f64>],
    center: &Vector3<f64>,
    margin: f64,
) -> f64 {
    let slack = margin.min(FRAC_PI_2).sin();
    let mut radius = 0.0_f64;
    for (i, a) in normals.iter().enumerate() {
        let b = &normals[(i + 1) % normals.len()];
        let d = a.cross(b);
        let norm = d.norm();
        // collinear edges meet in no real corner
        if norm <= 1e-12 {
            continue;
        }
        let d = d / norm;
        let d = if d.dot(center) < 0.0 { -d } else { d };

        // w with a.w = b.w = -slack on the unit sphere, on the corner's side
        let cos_ab = a.dot(b);
        if 1.0 + cos_ab <= 1e-12 {
            return PI;
        }
        let along = 1.0 - 2.0 * slack * slack / (1.0 + cos_ab);
        if along <= 0.0 {
            return PI;
        }
        let w = (a + b) * (-slack / (1.0 + cos_ab)) + d * along.sqrt();
        let angle = center.dot(&w).clamp(-1.0, 1.0).acos();
        if angle > FRAC_PI_2 {
            return PI;
        }
        radius = radius.max(angle);
    }
    // a little extra for rounding in the corner solve
    (radius + 1e-9).min(PI)
}

fn z_to_lat_bin(n_lat: u32, z: f64) -> u32 {
    let u = ((z.clamp(-1.0, 1.0) + 1.0) * 0.5).clamp(0.0, 1.0);
    let idx = (u * n_lat as f64).floor() as u32;
    idx.min(n_lat - 1)
}

fn phi_to_lon_bin(n_lon: u32, phi: f64) -> u32 {
    let u = (phi / TAU).clamp(0.0, 1.0);
    let idx = (u * n_lon as f64).floor() as u32;
    idx.min(n_lon - 1)
}

fn wrap_angle(theta_rad: f64) -> f64 {
    let wrapped = theta_rad.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

fn normalize_or_fallback(v: Vector3<f64>) -> Vector3<f64> {
    let n = v.norm();
    if n > 0.0 {
        v / n
    } else {
        Vector3::new(1.0, 0.0, 0.0)
    }
}
