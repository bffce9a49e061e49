//! Per-mesh coding params
//!
//! Computes one [`MeshAttributeCodingParams`] per attribute across a whole
//! mesh. Params are derived from the union of attribute bounds over every
//! vertex, so a vertex duplicated into several partitions packs to the same
//! bytes in each.

use crate::attribute::{AttributeId, MeshAttributeBounds, MeshAttributeCodingParams};
use crate::error::MeshError;
use crate::format::MeshFormat;
use crate::packing::coding::{can_represent, compute_coding_params};
use crate::packing::read_unpacked_attribute;

/// Bounds of the retained attributes of `format` over the vertices of an
/// unpacked vertex buffer
///
/// One entry per attribute not listed in `omit_attributes`, in format order;
/// `None` when there are no vertices. Fails on the first non-finite value of a
/// retained attribute (the error carries the attribute's index in `format`).
pub fn compute_attribute_bounds(
    format: &MeshFormat,
    unpacked_vertex_data: &[u8],
    omit_attributes: &[AttributeId],
) -> Result<Vec<Option<MeshAttributeBounds>>, MeshError> {
    let stride = format.unpacked_vertex_stride();
    let vertex_count = unpacked_vertex_data.len() / stride;

    let mut all_bounds = Vec::with_capacity(format.attribute_count());
    for (attribute_index, attribute) in format.attributes().iter().enumerate() {
        if omit_attributes.contains(&attribute.id) {
            continue;
        }
        let mut bounds: Option<MeshAttributeBounds> = None;
        for vertex in 0..vertex_count {
            let values = read_unpacked_attribute(unpacked_vertex_data, stride, vertex, attribute);
            if !values.iter().all(|v| v.is_finite()) {
                return Err(MeshError::NonFiniteValue {
                    attribute: attribute_index,
                    vertex,
                });
            }
            match bounds.as_mut() {
                Some(b) => b.include(&values),
                None => bounds = Some(MeshAttributeBounds::from_point(&values)),
            }
        }
        all_bounds.push(bounds);
    }
    Ok(all_bounds)
}

/// Validate a caller-supplied override against the attribute and its bounds
fn validate_custom_params(
    format: &MeshFormat,
    attribute_index: usize,
    params: &MeshAttributeCodingParams,
    bounds: Option<&MeshAttributeBounds>,
) -> Result<(), MeshError> {
    let attribute_type = format.attributes()[attribute_index].attribute_type;
    if !attribute_type.is_packed() {
        return Err(MeshError::CodingParamsForUnpackedAttribute {
            attribute: attribute_index,
        });
    }
    if params.components.len() != attribute_type.component_count() {
        return Err(MeshError::InvalidCodingParams {
            attribute: attribute_index,
            reason: format!(
                "expected {} components, got {}",
                attribute_type.component_count(),
                params.components.len()
            ),
        });
    }
    if let Some(component) = params.components.iter().position(|c| !c.is_valid()) {
        return Err(MeshError::InvalidCodingParams {
            attribute: attribute_index,
            reason: format!(
                "component {component} must have finite offset and finite positive scale"
            ),
        });
    }

    let Some(bounds) = bounds else {
        return Ok(());
    };
    for (component, (c, &bits)) in params
        .components
        .iter()
        .zip(attribute_type.bits_per_component())
        .enumerate()
    {
        let minimum = bounds.minimum[component];
        let maximum = bounds.maximum[component];
        if !can_represent(c, bits, minimum, maximum) {
            return Err(MeshError::UnrepresentableValues {
                attribute: attribute_index,
                component,
                minimum,
                maximum,
            });
        }
    }
    Ok(())
}

/// Compute coding params for every attribute of `format`
///
/// `bounds` has one entry per attribute (`None` for an empty mesh).
/// `custom_params` is either empty or has one entry per attribute; a `Some`
/// entry overrides derivation for that (packed) attribute after validation.
/// Attributes without bounds and without an override get identity params.
pub fn compute_coding_params_array(
    format: &MeshFormat,
    bounds: &[Option<MeshAttributeBounds>],
    custom_params: &[Option<MeshAttributeCodingParams>],
) -> Result<Vec<MeshAttributeCodingParams>, MeshError> {
    let attribute_count = format.attribute_count();
    if bounds.len() != attribute_count {
        return Err(MeshError::BoundsCountMismatch {
            expected: attribute_count,
            actual: bounds.len(),
        });
    }
    if !custom_params.is_empty() && custom_params.len() != attribute_count {
        return Err(MeshError::CodingParamsCountMismatch {
            expected: attribute_count,
            actual: custom_params.len(),
        });
    }

    let mut params_array = Vec::with_capacity(attribute_count);
    for (attribute_index, attribute) in format.attributes().iter().enumerate() {
        let attribute_bounds = bounds[attribute_index].as_ref();
        if let Some(Some(custom)) = custom_params.get(attribute_index) {
            validate_custom_params(format, attribute_index, custom, attribute_bounds)?;
            params_array.push(custom.clone());
            continue;
        }

        let params = match attribute_bounds {
            Some(b) => compute_coding_params(attribute.attribute_type, b).map_err(|e| {
                MeshError::RangeExceedsPrecision {
                    attribute: attribute_index,
                    component: e.component,
                    minimum: e.minimum,
                    maximum: e.maximum,
                }
            })?,
            None => MeshAttributeCodingParams::identity(attribute.attribute_type),
        };
        params_array.push(params);
    }
    Ok(params_array)
}
