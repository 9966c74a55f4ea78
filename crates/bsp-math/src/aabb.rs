use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box of points with a runtime dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AabbN {
    pub min: Vec<f64>,
    pub max: Vec<f64>,
}

impl AabbN {
    pub fn new(min: Vec<f64>, max: Vec<f64>) -> Self {
        debug_assert_eq!(min.len(), max.len());
        Self { min, max }
    }

    /// Box around the points of a flat buffer of `dimension`-tuples.
    pub fn from_points(points: &[f64], dimension: usize) -> Option<Self> {
        if dimension == 0 || points.len() < dimension {
            return None;
        }
        let mut min = points[..dimension].to_vec();
        let mut max = min.clone();
        for p in points.chunks_exact(dimension).skip(1) {
            for (d, &v) in p.iter().enumerate() {
                min[d] = min[d].min(v);
                max[d] = max[d].max(v);
            }
        }
        Some(Self { min, max })
    }

    pub fn dimension(&self) -> usize {
        self.min.len()
    }

    /// Containment test, inflated by `eps` on each side.
    pub fn contains_point(&self, p: &[f64], eps: f64) -> bool {
        p.len() == self.dimension()
            && p.iter()
                .zip(self.min.iter().zip(&self.max))
                .all(|(&v, (&lo, &hi))| v >= lo - eps && v <= hi + eps)
    }
}
