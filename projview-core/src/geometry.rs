/// Line-segment geometry for the wireframe letter
use nalgebra::Point3;

use crate::error::{Error, Result};

/// Vertex table of the letter shape: three stacked pairs of horizontal slabs.
pub const SHAPE_VERTICES: [[f32; 3]; 24] = [
    // Upper slabs
    [-0.5, 2.0, 1.0],
    [1.0, 2.0, 1.0],
    [1.0, 2.0, -1.0],
    [-0.5, 2.0, -1.0],
    [-1.0, 2.5, 1.0],
    [1.0, 2.5, 1.0],
    [1.0, 2.5, -1.0],
    [-1.0, 2.5, -1.0],
    // Middle slabs
    [-0.5, 0.25, 1.0],
    [1.0, 0.25, 1.0],
    [1.0, 0.25, -1.0],
    [-0.5, 0.25, -1.0],
    [-1.0, -0.25, 1.0],
    [0.5, -0.25, 1.0],
    [0.5, -0.25, -1.0],
    [-1.0, -0.25, -1.0],
    // Lower slabs
    [-1.0, -2.0, 1.0],
    [0.5, -2.0, 1.0],
    [0.5, -2.0, -1.0],
    [-1.0, -2.0, -1.0],
    [-1.0, -2.5, 1.0],
    [1.0, -2.5, 1.0],
    [1.0, -2.5, -1.0],
    [-1.0, -2.5, -1.0],
];

/// Edge table: one rectangle per slab, then the vertical connectors.
#[rustfmt::skip]
pub const SHAPE_EDGES: [[usize; 2]; 36] = [
    [0, 1], [1, 2], [2, 3], [3, 0],
    [4, 5], [5, 6], [6, 7], [7, 4],
    [8, 9], [9, 10], [10, 11], [11, 8],
    [12, 13], [13, 14], [14, 15], [15, 12],
    [16, 17], [17, 18], [18, 19], [19, 16],
    [20, 21], [21, 22], [22, 23], [23, 20],
    // Connectors
    [16, 20], [19, 23], [13, 17], [14, 18],
    [4, 12], [7, 15], [9, 21], [10, 22],
    [0, 8], [3, 11], [1, 5], [2, 6],
];

/// A line segment between two model-space points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point3<f32>,
    pub end: Point3<f32>,
}

impl Segment {
    pub fn new(start: Point3<f32>, end: Point3<f32>) -> Self {
        Self { start, end }
    }
}

/// An immutable list of line segments
#[derive(Debug, Clone, PartialEq)]
pub struct LineMesh {
    segments: Vec<Segment>,
}

impl LineMesh {
    /// Resolve an edge index table against a vertex table.
    ///
    /// Fails on the first edge that points past the end of `vertices`.
    pub fn from_tables(vertices: &[[f32; 3]], edges: &[[usize; 2]]) -> Result<Self> {
        let point = |edge: usize, index: usize| -> Result<Point3<f32>> {
            vertices
                .get(index)
                .map(|v| Point3::new(v[0], v[1], v[2]))
                .ok_or(Error::EdgeOutOfRange {
                    edge,
                    index,
                    vertex_count: vertices.len(),
                })
        };

        let segments = edges
            .iter()
            .enumerate()
            .map(|(i, &[a, b])| Ok(Segment::new(point(i, a)?, point(i, b)?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Axis-aligned bounding box as (min, max), or `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let mut points = self.segments.iter().flat_map(|s| [s.start, s.end]);
        let first = points.next()?;
        Some(points.fold((first, first), |(min, max), p| {
            (min.inf(&p), max.sup(&p))
        }))
    }
}

/// Build the letter shape from the fixed tables
pub fn build_shape() -> Result<LineMesh> {
    let mesh = LineMesh::from_tables(&SHAPE_VERTICES, &SHAPE_EDGES)?;
    log::debug!("built shape with {} segments", mesh.len());
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_shape() {
        let mesh = build_shape().unwrap();
        assert_eq!(mesh.len(), SHAPE_EDGES.len());
        assert_eq!(mesh.segments()[0].start, Point3::new(-0.5, 2.0, 1.0));
        assert_eq!(mesh.segments()[0].end, Point3::new(1.0, 2.0, 1.0));
    }

    #[test]
    fn test_build_shape_is_deterministic() {
        assert_eq!(build_shape().unwrap(), build_shape().unwrap());
    }

    #[test]
    fn test_edges_reference_existing_vertices() {
        for edge in SHAPE_EDGES.iter() {
            assert!(edge[0] < SHAPE_VERTICES.len());
            assert!(edge[1] < SHAPE_VERTICES.len());
        }
    }

    #[test]
    fn test_bad_edge_index() {
        let vertices = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]];
        let edges = [[0, 1], [1, 2]];
        let err = LineMesh::from_tables(&vertices, &edges).unwrap_err();
        assert_eq!(
            err,
            Error::EdgeOutOfRange {
                edge: 1,
                index: 2,
                vertex_count: 2
            }
        );
    }

    #[test]
    fn test_bounds() {
        let (min, max) = build_shape().unwrap().bounds().unwrap();
        assert_eq!(min, Point3::new(-1.0, -2.5, -1.0));
        assert_eq!(max, Point3::new(1.0, 2.5, 1.0));

        let empty = LineMesh::from_tables(&[], &[]).unwrap();
        assert!(empty.is_empty());
        assert!(empty.bounds().is_none());
    }
}
