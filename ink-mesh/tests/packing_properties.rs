//! Property tests for the attribute codecs, the partitioner and flipped
//! triangle correction.

use glam::{DVec2, Vec2};
use ink_mesh::attribute::{
    AttributeType, ComponentCodingParams, MeshAttributeBounds, MeshAttributeCodingParams,
};
use ink_mesh::correction::correct_flipped_triangles;
use ink_mesh::packing::{
    compute_coding_params, max_value_for_bits, pack_integers, pack_single_float,
    unpack_integers, unpack_single_float,
};
use ink_mesh::partition::partition_triangles;
use proptest::prelude::*;

fn packed_types() -> Vec<AttributeType> {
    AttributeType::ALL
        .into_iter()
        .filter(|t| t.is_packed())
        .collect()
}

fn signed_area(a: Vec2, b: Vec2, c: Vec2) -> f64 {
    let a = a.as_dvec2();
    DVec2::perp_dot(b.as_dvec2() - a, c.as_dvec2() - a)
}

fn index_bytes(triangles: &[[u32; 3]]) -> Vec<u8> {
    triangles
        .iter()
        .flatten()
        .flat_map(|&i| i.to_le_bytes())
        .collect()
}

proptest! {
    #[test]
    fn prop_integer_codec_round_trips(type_index in 0usize..10, raw in any::<[u32; 4]>()) {
        let attribute_type = packed_types()[type_index];
        let codes: Vec<u32> = attribute_type
            .bits_per_component()
            .iter()
            .zip(raw)
            .map(|(&bits, r)| r & max_value_for_bits(bits))
            .collect();

        let mut bytes = vec![0u8; attribute_type.packed_byte_width()];
        pack_integers(attribute_type, &codes, &mut bytes).unwrap();
        let unpacked = unpack_integers(attribute_type, &bytes).unwrap();
        prop_assert_eq!(unpacked.as_slice(), codes.as_slice());
    }

    #[test]
    fn prop_linear_transform_round_trips(
        offset in -1000.0f32..1000.0,
        scale in 0.001f32..10.0,
        bits in 8u8..=16,
        code_fraction in 0.0f64..=1.0,
    ) {
        let params = ComponentCodingParams::new(offset, scale);
        let code = (code_fraction * max_value_for_bits(bits) as f64) as u32;
        let value = unpack_single_float(&params, code);
        prop_assert_eq!(pack_single_float(&params, bits, value), Some(code));
    }

    #[test]
    fn prop_degenerate_range_has_unit_scale(value in -1.0e30f32..1.0e30) {
        let bounds = MeshAttributeBounds::new(&[value, value], &[value, value]);
        let params = compute_coding_params(AttributeType::Float2PackedInOneFloat, &bounds).unwrap();
        for component in &params.components {
            prop_assert_eq!(component.scale, 1.0);
            prop_assert_eq!(component.offset, value);
        }
    }

    #[test]
    fn prop_coding_params_fail_iff_range_overflows(
        a in -f32::MAX..f32::MAX,
        b in -f32::MAX..f32::MAX,
    ) {
        let (minimum, maximum) = if a <= b { (a, b) } else { (b, a) };
        let bounds = MeshAttributeBounds::new(&[minimum], &[maximum]);
        let result = compute_coding_params(AttributeType::Float1PackedInOneUnsignedByte, &bounds);
        prop_assert_eq!(result.is_err(), !(maximum - minimum).is_finite());
        if let Ok(params) = result {
            prop_assert!(params.components[0].scale > 0.0);
        }
    }

    #[test]
    fn prop_partitions_are_bounded_and_ordered(
        triangles in prop::collection::vec(
            (0u32..40, 0u32..40, 0u32..40).prop_map(|(a, b, c)| [a, b, c]),
            0..60,
        ),
        max_vertices in 3usize..16,
    ) {
        let partitions = partition_triangles(&index_bytes(&triangles), 4, max_vertices).unwrap();

        let mut rebuilt = Vec::new();
        for partition in &partitions {
            prop_assert!(partition.vertex_indices.len() <= max_vertices);
            prop_assert!(!partition.triangles.is_empty());
            for t in 0..partition.triangles.len() {
                rebuilt.push(partition.original_triangle(t));
            }
        }
        prop_assert_eq!(rebuilt, triangles);
    }

    #[test]
    fn prop_correction_leaves_no_flipped_triangle(
        points in prop::collection::vec((0u32..60, 0u32..60), 10),
        picks in prop::collection::vec((0u32..10, 0u32..10, 0u32..10), 1..16),
    ) {
        // Tenths on a small grid so rounding flips thin triangles often
        let positions: Vec<Vec2> = points
            .iter()
            .map(|&(x, y)| Vec2::new(x as f32 / 10.0, y as f32 / 10.0))
            .collect();
        let triangles: Vec<[u32; 3]> = picks
            .iter()
            .filter(|&&(a, b, c)| a != b && b != c && a != c)
            .map(|&(a, b, c)| {
                let [pa, pb, pc] = [a, b, c].map(|v| positions[v as usize]);
                if signed_area(pa, pb, pc) < 0.0 { [a, c, b] } else { [a, b, c] }
            })
            .collect();

        let params = MeshAttributeCodingParams::identity(AttributeType::Float2PackedInOneFloat);
        let corrected = correct_flipped_triangles(
            &positions,
            &triangles,
            AttributeType::Float2PackedInOneFloat,
            &params,
        );
        if corrected.is_empty() {
            return Ok(());
        }

        let code = |v: u32| -> [i64; 2] {
            match corrected.get(&v) {
                Some(c) => c.map(i64::from),
                None => [0, 1].map(|axis| {
                    let value = positions[v as usize][axis];
                    pack_single_float(&params.components[axis], 12, value).unwrap() as i64
                }),
            }
        };
        for tri in &triangles {
            let [a, b, c] = tri.map(&code);
            let area = (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0]);
            prop_assert!(area >= 0, "triangle {:?} has area {}", tri, area);
        }
    }
}
