//! Bounding spheres and the three fitting algorithms.
//!
//! All three fitters share the same contract: the seed selection only affects
//! how tight the sphere starts out, while the final grow pass over every
//! vertex guarantees containment regardless of seed quality.

use nalgebra::{Matrix3, Point3, Vector3};
use rand::seq::SliceRandom;

/// Cap on the number of points sampled for sphere seeding.
///
/// Ritter's distant-pair search and the PCA covariance accumulation run on a
/// shuffled subsample of at most this many points; the grow pass still visits
/// every vertex.
const SEED_SAMPLE_CAP: usize = 1500;

/// How many extremal direction pairs Larsson's algorithm projects onto.
///
/// The variants correspond to EPOS-6/14/26/98: k direction pairs yield 2k
/// extremal candidate points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EposMode {
    /// 3 directions (the coordinate axes)
    Epos6,
    /// 7 directions (axes + cube corners)
    Epos14,
    /// 13 directions (axes + corners + cube edges)
    #[default]
    Epos26,
    /// 49 directions
    Epos98,
}

impl EposMode {
    fn direction_count(self) -> usize {
        match self {
            Self::Epos6 => 3,
            Self::Epos14 => 7,
            Self::Epos26 => 13,
            Self::Epos98 => 49,
        }
    }
}

/// A bounding sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: Point3<f32>,
    radius: f32,
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            center: Point3::origin(),
            radius: 0.0,
        }
    }
}

impl Sphere {
    pub fn new(center: Point3<f32>, radius: f32) -> Self {
        Self { center, radius }
    }

    /// The smallest sphere through two points (centered at their midpoint).
    pub fn from_two_points(a: Point3<f32>, b: Point3<f32>) -> Self {
        let center = nalgebra::center(&a, &b);
        Self {
            center,
            radius: (b - a).norm() / 2.0,
        }
    }

    #[inline]
    pub fn center(&self) -> Point3<f32> {
        self.center
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn volume(&self) -> f32 {
        (4.0 / 3.0) * core::f32::consts::PI * self.radius.powi(3)
    }

    /// Containment check with a small tolerance for accumulated float error.
    pub fn contains_point(&self, point: Point3<f32>) -> bool {
        (point - self.center).norm() <= self.radius + 1e-4
    }

    /// Returns `true` if `other` lies entirely inside this sphere.
    pub fn contains_sphere(&self, other: &Self) -> bool {
        (other.center - self.center).norm() + other.radius <= self.radius + 1e-4
    }

    /// Grows the sphere minimally to contain a point: the new diameter spans
    /// from the far side of the current sphere to the point.
    pub fn grow_to_include(&mut self, point: Point3<f32>) {
        let offset = point - self.center;
        let distance = offset.norm();
        if distance <= self.radius {
            return;
        }

        let new_radius = (self.radius + distance) / 2.0;
        self.center += offset * ((distance - new_radius) / distance);
        self.radius = new_radius;
    }

    /// The smallest sphere containing both inputs.
    pub fn union(&self, other: &Self) -> Self {
        let offset = other.center - self.center;
        let distance = offset.norm();

        // One sphere already contains the other.
        if distance + other.radius <= self.radius {
            return *self;
        }
        if distance + self.radius <= other.radius {
            return *other;
        }

        let radius = (distance + self.radius + other.radius) / 2.0;
        let center = self.center + offset * ((radius - self.radius) / distance);
        Self { center, radius }
    }
}

/// Fits a sphere with Ritter's algorithm: seed from two mutually distant
/// points found in a shuffled subsample, then grow over all vertices.
pub fn fit_ritter(points: &[Point3<f32>]) -> Sphere {
    let Some(seed) = seed_from_sample(points) else {
        return degenerate(points);
    };

    grow_over(seed, points)
}

/// Fits a sphere with Larsson's EPOS heuristic: keep the min/max vertex along
/// each fixed direction, seed from the farthest pair among those extremal
/// points, then grow over all vertices.
pub fn fit_larsson(points: &[Point3<f32>], mode: EposMode) -> Sphere {
    if points.len() < 2 {
        return degenerate(points);
    }

    let directions = &EPOS_DIRECTIONS[..mode.direction_count()];
    let mut extremals = Vec::with_capacity(directions.len() * 2);

    for dir in directions {
        let direction = Vector3::new(dir[0], dir[1], dir[2]);
        let mut min_proj = f32::INFINITY;
        let mut max_proj = f32::NEG_INFINITY;
        let mut min_point = points[0];
        let mut max_point = points[0];

        for point in points {
            let proj = direction.dot(&point.coords);
            if proj < min_proj {
                min_proj = proj;
                min_point = *point;
            }
            if proj > max_proj {
                max_proj = proj;
                max_point = *point;
            }
        }

        extremals.push(min_point);
        extremals.push(max_point);
    }

    let (a, b) = farthest_pair(&extremals);
    grow_over(Sphere::from_two_points(a, b), points)
}

/// Fits a sphere by principal component analysis: diagonalize the covariance
/// matrix of a sampled subset with cyclic Jacobi rotations, seed from the
/// extreme points along the dominant eigenvector, then grow over all vertices.
pub fn fit_pca(points: &[Point3<f32>]) -> Sphere {
    if points.len() < 2 {
        return degenerate(points);
    }

    let sample = sample_points(points);
    let covariance = covariance_matrix(&sample);
    let (eigenvectors, eigenvalues) = jacobi_eigen(covariance);

    // Dominant eigenvector = largest spread.
    let mut dominant = 0;
    for axis in 1..3 {
        if eigenvalues[axis] > eigenvalues[dominant] {
            dominant = axis;
        }
    }
    let direction = eigenvectors.column(dominant).into_owned();

    let mut min_proj = f32::INFINITY;
    let mut max_proj = f32::NEG_INFINITY;
    let mut min_point = points[0];
    let mut max_point = points[0];
    for point in points {
        let proj = direction.dot(&point.coords);
        if proj < min_proj {
            min_proj = proj;
            min_point = *point;
        }
        if proj > max_proj {
            max_proj = proj;
            max_point = *point;
        }
    }

    grow_over(Sphere::from_two_points(min_point, max_point), points)
}

/// Zero-sized sphere for empty input, point sphere for a single vertex.
fn degenerate(points: &[Point3<f32>]) -> Sphere {
    match points {
        [] => Sphere::default(),
        [only, ..] => Sphere::new(*only, 0.0),
    }
}

/// One linear pass absorbing every outlier. This is what makes all fitters
/// conservative.
fn grow_over(mut sphere: Sphere, points: &[Point3<f32>]) -> Sphere {
    for point in points {
        sphere.grow_to_include(*point);
    }
    sphere
}

/// Shuffled subsample capped at `SEED_SAMPLE_CAP` points.
fn sample_points(points: &[Point3<f32>]) -> Vec<Point3<f32>> {
    let mut sample: Vec<Point3<f32>> = points.to_vec();
    if sample.len() > SEED_SAMPLE_CAP {
        let mut rng = rand::rng();
        sample.shuffle(&mut rng);
        sample.truncate(SEED_SAMPLE_CAP);
    }
    sample
}

/// Ritter's seed: start anywhere in the sample, walk to the farthest point,
/// then to the farthest point from there; those two span the seed diameter.
fn seed_from_sample(points: &[Point3<f32>]) -> Option<Sphere> {
    if points.len() < 2 {
        return None;
    }

    let sample = sample_points(points);
    let start = sample[0];
    let a = farthest_from(start, &sample);
    let b = farthest_from(a, &sample);

    Some(Sphere::from_two_points(a, b))
}

fn farthest_from(origin: Point3<f32>, points: &[Point3<f32>]) -> Point3<f32> {
    let mut best = origin;
    let mut best_dist = f32::NEG_INFINITY;
    for point in points {
        let dist = (point - origin).norm_squared();
        if dist > best_dist {
            best_dist = dist;
            best = *point;
        }
    }
    best
}

/// Farthest pair by exhaustive search; only ever called on the small set of
/// extremal candidates (at most 2k points).
fn farthest_pair(points: &[Point3<f32>]) -> (Point3<f32>, Point3<f32>) {
    let mut best = (points[0], points[0]);
    let mut best_dist = f32::NEG_INFINITY;

    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            let dist = (points[j] - points[i]).norm_squared();
            if dist > best_dist {
                best_dist = dist;
                best = (points[i], points[j]);
            }
        }
    }

    best
}

/// The 3x3 covariance matrix of a point set around its centroid.
fn covariance_matrix(points: &[Point3<f32>]) -> Matrix3<f32> {
    let n = points.len() as f32;
    let centroid: Vector3<f32> = points.iter().map(|p| p.coords).sum::<Vector3<f32>>() / n;

    let mut cov = Matrix3::zeros();
    for point in points {
        let d = point.coords - centroid;
        cov += d * d.transpose();
    }
    cov / n
}

/// Diagonalizes a symmetric 3x3 matrix with cyclic Jacobi rotations.
///
/// Returns `(eigenvectors, eigenvalues)` where eigenvector `i` is column `i`.
/// Sweeps rotate away each off-diagonal element in turn until they vanish
/// (or a fixed sweep limit is hit, which for well-formed covariance matrices
/// is never reached).
fn jacobi_eigen(mut a: Matrix3<f32>) -> (Matrix3<f32>, Vector3<f32>) {
    const MAX_SWEEPS: usize = 50;
    const OFF_DIAGONAL_EPSILON: f32 = 1e-10;

    let mut v = Matrix3::identity();

    for _ in 0..MAX_SWEEPS {
        let off = a[(0, 1)].powi(2) + a[(0, 2)].powi(2) + a[(1, 2)].powi(2);
        if off < OFF_DIAGONAL_EPSILON {
            break;
        }

        for (p, q) in [(0, 1), (0, 2), (1, 2)] {
            if a[(p, q)].abs() < f32::EPSILON {
                continue;
            }

            // Rotation angle that zeroes a[(p, q)].
            let theta = (a[(q, q)] - a[(p, p)]) / (2.0 * a[(p, q)]);
            let t = if theta >= 0.0 {
                1.0 / (theta + (1.0 + theta * theta).sqrt())
            } else {
                -1.0 / (-theta + (1.0 + theta * theta).sqrt())
            };
            let c = 1.0 / (1.0 + t * t).sqrt();
            let s = t * c;

            let mut rotation = Matrix3::identity();
            rotation[(p, p)] = c;
            rotation[(q, q)] = c;
            rotation[(p, q)] = s;
            rotation[(q, p)] = -s;

            a = rotation.transpose() * a * rotation;
            v *= rotation;
        }
    }

    (v, Vector3::new(a[(0, 0)], a[(1, 1)], a[(2, 2)]))
}

/// Fixed projection directions for Larsson's EPOS variants, coarsest first:
/// the first 3 serve EPOS-6, the first 7 EPOS-14, the first 13 EPOS-26 and
/// all 49 EPOS-98. Directions need not be normalized for extremal-point
/// selection.
#[rustfmt::skip]
const EPOS_DIRECTIONS: [[f32; 3]; 49] = [
    // Axes (EPOS-6)
    [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0],
    // Cube corners (EPOS-14)
    [1.0, 1.0, 1.0], [1.0, 1.0, -1.0], [1.0, -1.0, 1.0], [1.0, -1.0, -1.0],
    // Cube edges (EPOS-26)
    [1.0, 1.0, 0.0], [1.0, -1.0, 0.0], [1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0], [0.0, 1.0, 1.0], [0.0, 1.0, -1.0],
    // (0, 1, 2) family (EPOS-98)
    [0.0, 1.0, 2.0], [0.0, 2.0, 1.0], [1.0, 0.0, 2.0],
    [2.0, 0.0, 1.0], [1.0, 2.0, 0.0], [2.0, 1.0, 0.0],
    [0.0, 1.0, -2.0], [0.0, 2.0, -1.0], [1.0, 0.0, -2.0],
    [2.0, 0.0, -1.0], [1.0, -2.0, 0.0], [2.0, -1.0, 0.0],
    // (1, 1, 2) family
    [1.0, 1.0, 2.0], [2.0, 1.0, 1.0], [1.0, 2.0, 1.0],
    [1.0, -1.0, 2.0], [1.0, 1.0, -2.0], [1.0, -1.0, -2.0],
    [2.0, -1.0, 1.0], [2.0, 1.0, -1.0], [2.0, -1.0, -1.0],
    [1.0, -2.0, 1.0], [1.0, 2.0, -1.0], [1.0, -2.0, -1.0],
    // (2, 2, 1) family
    [2.0, 2.0, 1.0], [1.0, 2.0, 2.0], [2.0, 1.0, 2.0],
    [2.0, -2.0, 1.0], [2.0, 2.0, -1.0], [2.0, -2.0, -1.0],
    [1.0, -2.0, 2.0], [1.0, 2.0, -2.0], [1.0, -2.0, -2.0],
    [2.0, -1.0, 2.0], [2.0, 1.0, -2.0], [2.0, -1.0, -2.0],
];
