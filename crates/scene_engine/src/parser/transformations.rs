//! `<transformations>` blocks

use crate::document::Element;
use crate::foundation::math::{utils, Axis, Mat4, Mat4Ext, Vec3};

use super::values::{parse_coordinates_3d, parse_float};

/// Compose a `<transformations>` block, in document order, into one matrix
///
/// A missing block is the identity.
pub fn parse_transformations(block: Option<&Element>, owner: &str) -> Result<Mat4, String> {
    let mut matrix = Mat4::identity();
    let Some(block) = block else {
        return Ok(matrix);
    };

    let context = format!("<transformations>, node {owner}");
    for step in block.children() {
        let local = match step.name() {
            "translation" => Mat4::new_translation(&parse_coordinates_3d(step, &context)?),
            "rotation" => {
                let angle = utils::deg_to_rad(parse_float(step, "angle", &context)?);
                let axis_name = step
                    .attr("axis")
                    .ok_or_else(|| format!("rotation of node {owner} is missing axis"))?;
                let axis = Axis::from_name(axis_name)
                    .ok_or_else(|| format!("no such rotation axis \"{axis_name}\""))?;
                Mat4::rotation_about(axis, angle)
            }
            "scale" => {
                let sx = parse_float(step, "sx", &context)?;
                let sy = parse_float(step, "sy", &context)?;
                let sz = parse_float(step, "sz", &context)?;
                Mat4::new_nonuniform_scaling(&Vec3::new(sx, sy, sz))
            }
            other => return Err(format!("no such transformation \"{other}\"")),
        };
        matrix = matrix * local;
    }
    Ok(matrix)
}
