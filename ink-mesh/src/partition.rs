//! Mesh partitioning
//!
//! Splits a triangle list into consecutive partitions, each referencing at
//! most a given number of distinct vertices, so that each one fits a 16-bit
//! packed index buffer. A vertex referenced from two partitions is duplicated
//! into both and renumbered independently.

use hashbrown::HashMap;

use crate::error::PackingError;
use crate::packing::triangles::{read_triangle_indices, triangle_count};

/// One partition of a mesh
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PartitionInfo {
    /// Original vertex indices; the partition-local index of a vertex is its
    /// position in this list (first-seen order)
    pub vertex_indices: Vec<u32>,
    /// Triangles in partition-local indices, in original order
    pub triangles: Vec<[u32; 3]>,
}

impl PartitionInfo {
    /// Map a partition-local triangle back to original vertex indices
    pub fn original_triangle(&self, triangle: usize) -> [u32; 3] {
        self.triangles[triangle].map(|local| self.vertex_indices[local as usize])
    }
}

/// Split triangles into partitions of at most `max_vertices_per_partition`
/// distinct vertices
///
/// Single pass in triangle order: a triangle whose *new* vertices would
/// overflow the current partition closes it and starts the next. An empty
/// index buffer yields no partitions.
///
/// # Panics
///
/// Panics if `max_vertices_per_partition < 3`, which could never hold a
/// triangle.
pub fn partition_triangles(
    index_data: &[u8],
    index_stride: usize,
    max_vertices_per_partition: usize,
) -> Result<Vec<PartitionInfo>, PackingError> {
    assert!(
        max_vertices_per_partition >= 3,
        "partition must hold at least one triangle"
    );

    let mut partitions = Vec::new();
    let mut current = PartitionInfo::default();
    let mut local_index: HashMap<u32, u32> = HashMap::new();

    for triangle in 0..triangle_count(index_stride, index_data) {
        let indices = read_triangle_indices(triangle, index_stride, index_data)?;

        let mut new_vertices = 0;
        for (k, index) in indices.iter().enumerate() {
            if !local_index.contains_key(index) && !indices[..k].contains(index) {
                new_vertices += 1;
            }
        }
        if current.vertex_indices.len() + new_vertices > max_vertices_per_partition {
            partitions.push(std::mem::take(&mut current));
            local_index.clear();
        }

        let local = indices.map(|index| {
            *local_index.entry(index).or_insert_with(|| {
                current.vertex_indices.push(index);
                (current.vertex_indices.len() - 1) as u32
            })
        });
        current.triangles.push(local);
    }

    if !current.triangles.is_empty() {
        partitions.push(current);
    }
    Ok(partitions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_bytes(triangles: &[[u32; 3]]) -> Vec<u8> {
        triangles
            .iter()
            .flatten()
            .flat_map(|&i| i.to_le_bytes())
            .collect()
    }

    #[test]
    fn test_two_partitions_of_six() {
        let data = index_bytes(&[[0, 1, 2], [3, 4, 5], [6, 7, 8], [9, 10, 11]]);
        let partitions = partition_triangles(&data, 4, 6).unwrap();
        assert_eq!(partitions.len(), 2);
        assert_eq!(partitions[0].vertex_indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(partitions[0].triangles, vec![[0, 1, 2], [3, 4, 5]]);
        assert_eq!(partitions[1].vertex_indices, vec![6, 7, 8, 9, 10, 11]);
        assert_eq!(partitions[1].triangles, vec![[0, 1, 2], [3, 4, 5]]);
    }

    #[test]
    fn test_shared_vertices_count_once() {
        // A fan around vertex 0: each triangle adds one new vertex
        let data = index_bytes(&[[0, 1, 2], [0, 2, 3], [0, 3, 4], [0, 4, 5]]);
        let partitions = partition_triangles(&data, 4, 5).unwrap();
        assert_eq!(partitions.len(), 2);
        assert_eq!(partitions[0].vertex_indices, vec![0, 1, 2, 3, 4]);
        assert_eq!(partitions[0].triangles.len(), 3);
        // Vertices 0 and 4 are duplicated into the second partition
        assert_eq!(partitions[1].vertex_indices, vec![0, 4, 5]);
        assert_eq!(partitions[1].triangles, vec![[0, 1, 2]]);
        assert_eq!(partitions[1].original_triangle(0), [0, 4, 5]);
    }

    #[test]
    fn test_first_seen_order() {
        let data = index_bytes(&[[5, 3, 9], [9, 3, 1]]);
        let partitions = partition_triangles(&data, 4, 100).unwrap();
        assert_eq!(partitions.len(), 1);
        assert_eq!(partitions[0].vertex_indices, vec![5, 3, 9, 1]);
        assert_eq!(partitions[0].triangles, vec![[0, 1, 2], [2, 1, 3]]);
    }

    #[test]
    fn test_16_bit_indices() {
        let data: Vec<u8> = [0u16, 1, 2, 2, 1, 3]
            .iter()
            .flat_map(|i| i.to_le_bytes())
            .collect();
        let partitions = partition_triangles(&data, 2, 3).unwrap();
        assert_eq!(partitions.len(), 2);
        assert_eq!(partitions[1].vertex_indices, vec![2, 1, 3]);
    }

    #[test]
    fn test_empty_index_data() {
        assert!(partition_triangles(&[], 4, 3).unwrap().is_empty());
    }

    #[test]
    #[should_panic]
    fn test_partition_too_small() {
        let _ = partition_triangles(&[], 2, 2);
    }
}
