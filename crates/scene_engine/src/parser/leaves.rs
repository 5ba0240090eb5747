//! `<leaf type="...">` primitives

use crate::animation::SpriteAnimation;
use crate::document::Element;
use crate::foundation::collections::SpriteSheetKey;
use crate::scene::{
    Amplification, BarrelShape, CylinderShape, Leaf, ObjShape, PatchShape, PlaneShape, Primitive,
    RectangleShape, SphereShape, SpriteAnimShape, SpriteTextShape, TorusShape, TriangleShape,
    VertexShape,
};

use super::values::{parse_coordinates_3d, parse_count, parse_float, parse_string};
use super::SceneParser;

impl SceneParser {
    /// Build one leaf; `amplification` comes from the owning node's texture
    pub(super) fn parse_leaf(
        &self,
        leaf: &Element,
        amplification: Amplification,
        owner: &str,
    ) -> Result<Leaf, String> {
        let kind = leaf
            .attr("type")
            .ok_or_else(|| format!("leaf without type in node \"{owner}\""))?;
        let primitive = match kind {
            "rectangle" => Primitive::Rectangle(RectangleShape {
                x1: parse_float(leaf, "x1", owner)?,
                y1: parse_float(leaf, "y1", owner)?,
                x2: parse_float(leaf, "x2", owner)?,
                y2: parse_float(leaf, "y2", owner)?,
                amplification,
            }),
            "triangle" => {
                let mut vertices = [(0.0, 0.0); 3];
                for (index, vertex) in vertices.iter_mut().enumerate() {
                    let n = index + 1;
                    *vertex = (
                        parse_float(leaf, &format!("x{n}"), owner)?,
                        parse_float(leaf, &format!("y{n}"), owner)?,
                    );
                }
                Primitive::Triangle(TriangleShape {
                    vertices,
                    amplification,
                })
            }
            "cylinder" => Primitive::Cylinder(CylinderShape {
                bottom_radius: parse_float(leaf, "bottomRadius", owner)?,
                top_radius: parse_float(leaf, "topRadius", owner)?,
                height: parse_float(leaf, "height", owner)?,
                slices: parse_count(leaf, "slices", owner)?,
                stacks: parse_count(leaf, "stacks", owner)?,
            }),
            "sphere" => Primitive::Sphere(SphereShape {
                radius: parse_float(leaf, "radius", owner)?,
                slices: parse_count(leaf, "slices", owner)?,
                stacks: parse_count(leaf, "stacks", owner)?,
            }),
            "torus" => Primitive::Torus(TorusShape {
                inner: parse_float(leaf, "inner", owner)?,
                outer: parse_float(leaf, "outer", owner)?,
                slices: parse_count(leaf, "slices", owner)?,
                loops: parse_count(leaf, "loops", owner)?,
            }),
            "plane" => Primitive::Plane(PlaneShape {
                parts_u: parse_count(leaf, "npartsU", owner)?,
                parts_v: parse_count(leaf, "npartsV", owner)?,
            }),
            "patch" => Primitive::Patch(parse_patch(leaf, amplification, owner)?),
            "defbarrel" => Primitive::Barrel(BarrelShape {
                base: parse_float(leaf, "base", owner)?,
                middle: parse_float(leaf, "middle", owner)?,
                height: parse_float(leaf, "height", owner)?,
                slices: parse_count(leaf, "slices", owner)?,
                stacks: parse_count(leaf, "stacks", owner)?,
                angle: if leaf.has_attr("angle") {
                    Some(parse_float(leaf, "angle", owner)?)
                } else {
                    None
                },
            }),
            "spritetext" => Primitive::SpriteText(SpriteTextShape {
                font: self.sprite_sheet(&parse_string(leaf, "font", owner)?)?,
                text: parse_string(leaf, "text", owner)?,
                source: leaf.attr("source").or_else(|| leaf.attr("eval")).map(str::to_string),
                format: leaf.attr("format").map(str::to_string),
            }),
            "spriteanim" => {
                let sheet = self.sprite_sheet(&parse_string(leaf, "ssid", owner)?)?;
                let start = parse_count(leaf, "startCell", owner)?;
                let end = parse_count(leaf, "endCell", owner)?;
                if end < start {
                    return Err(format!("endCell before startCell in node \"{owner}\""));
                }
                let duration = parse_float(leaf, "duration", owner)?;
                Primitive::SpriteAnim(SpriteAnimShape {
                    sheet,
                    animation: SpriteAnimation::new(start, end, duration),
                })
            }
            "vertex" => Primitive::Vertex(VertexShape {
                id: parse_string(leaf, "id", owner)?,
                position: parse_coordinates_3d(leaf, owner)?,
            }),
            "obj" => Primitive::Obj(ObjShape {
                url: parse_string(leaf, "url", owner)?,
            }),
            other => return Err(format!("no such leaf type \"{other}\"")),
        };
        Ok(Leaf::new(leaf.id().map(str::to_string), primitive))
    }

    fn sprite_sheet(&self, id: &str) -> Result<SpriteSheetKey, String> {
        self.sprite_sheets
            .key(id)
            .ok_or_else(|| format!("no such sprite sheet \"{id}\""))
    }
}

/// Control points are listed u-major: point `(u, v)` is child `u * npointsV + v`
fn parse_patch(leaf: &Element, amplification: Amplification, owner: &str) -> Result<PatchShape, String> {
    let parts_u = parse_count(leaf, "npartsU", owner)?;
    let parts_v = parse_count(leaf, "npartsV", owner)?;
    let points_u = parse_count(leaf, "npointsU", owner)?;
    let points_v = parse_count(leaf, "npointsV", owner)?;
    if points_u == 0 || points_v == 0 {
        return Err(format!("patch needs at least one control point (node \"{owner}\")"));
    }

    let expected = usize::try_from(points_u)
        .ok()
        .zip(usize::try_from(points_v).ok())
        .and_then(|(u, v)| u.checked_mul(v))
        .ok_or_else(|| {
            format!("patch in node \"{owner}\" declares too many control points ({points_u} x {points_v})")
        })?;
    let found = leaf.children().len();
    if found != expected {
        return Err(format!(
            "patch in node \"{owner}\" declares {expected} control points but has {found}"
        ));
    }

    let control_points = leaf
        .children()
        .iter()
        .map(|point| parse_coordinates_3d(point, owner))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PatchShape {
        parts_u,
        parts_v,
        points_u,
        points_v,
        control_points,
        amplification,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::parser::ParseOptions;
    use crate::scene::SpriteSheet;

    fn leaf(kind: &str) -> Element {
        Element::new("leaf").with_attr("type", kind)
    }

    fn point(x: &str) -> Element {
        Element::new("controlpoint")
            .with_attr("x", x)
            .with_attr("y", "0")
            .with_attr("z", "0")
    }

    fn parser_with_font() -> SceneParser {
        let mut p = SceneParser::new(ParseOptions::default());
        p.sprite_sheets
            .insert(
                "font",
                SpriteSheet {
                    path: "font.png".into(),
                    size_m: 16,
                    size_n: 16,
                },
            )
            .unwrap();
        p
    }

    #[test]
    fn test_rectangle_keeps_amplification() {
        let p = parser_with_font();
        let rect = leaf("rectangle")
            .with_attr("x1", "0")
            .with_attr("y1", "0")
            .with_attr("x2", "2")
            .with_attr("y2", "1");
        let amplification = Amplification { afs: 2.0, aft: 1.0 };
        let parsed = p.parse_leaf(&rect, amplification, "table").unwrap();
        match parsed.primitive {
            Primitive::Rectangle(shape) => {
                assert_eq!(shape.x2, 2.0);
                assert_eq!(shape.amplification, amplification);
            }
            other => panic!("unexpected primitive {other:?}"),
        }
    }

    #[test]
    fn test_patch_point_count_must_match() {
        let p = parser_with_font();
        let patch = leaf("patch")
            .with_attr("npartsU", "4")
            .with_attr("npartsV", "4")
            .with_attr("npointsU", "2")
            .with_attr("npointsV", "2")
            .with_child(point("0"))
            .with_child(point("1"))
            .with_child(point("2"));
        let err = p.parse_leaf(&patch, Amplification::default(), "flag").unwrap_err();
        assert!(err.contains("declares 4 control points but has 3"));

        let patch = patch.with_child(point("3"));
        let parsed = p.parse_leaf(&patch, Amplification::default(), "flag").unwrap();
        match parsed.primitive {
            Primitive::Patch(shape) => {
                assert_eq!(shape.control_point(1, 0), Some(&Vec3::new(2.0, 0.0, 0.0)));
            }
            other => panic!("unexpected primitive {other:?}"),
        }
    }

    #[test]
    fn test_sprite_text_resolves_font_and_source() {
        let p = parser_with_font();
        let text = leaf("spritetext")
            .with_attr("font", "font")
            .with_attr("text", "0")
            .with_attr("eval", "score")
            .with_attr("format", "Score: {}");
        let parsed = p.parse_leaf(&text, Amplification::default(), "hud").unwrap();
        match parsed.primitive {
            Primitive::SpriteText(shape) => {
                assert_eq!(shape.source.as_deref(), Some("score"));
                assert_eq!(shape.format.as_deref(), Some("Score: {}"));
            }
            other => panic!("unexpected primitive {other:?}"),
        }

        let unknown = leaf("spritetext").with_attr("font", "comic").with_attr("text", "x");
        assert_eq!(
            p.parse_leaf(&unknown, Amplification::default(), "hud"),
            Err("no such sprite sheet \"comic\"".to_string())
        );
    }

    #[test]
    fn test_barrel_angle_is_optional() {
        let p = parser_with_font();
        let barrel = leaf("defbarrel")
            .with_attr("base", "1")
            .with_attr("middle", "1.5")
            .with_attr("height", "3")
            .with_attr("slices", "10")
            .with_attr("stacks", "10");
        match p.parse_leaf(&barrel, Amplification::default(), "b").unwrap().primitive {
            Primitive::Barrel(shape) => assert_eq!(shape.angle, None),
            other => panic!("unexpected primitive {other:?}"),
        }
    }

    #[test]
    fn test_oversized_patch_is_an_error() {
        let p = parser_with_font();
        let patch = leaf("patch")
            .with_attr("npartsU", "4")
            .with_attr("npartsV", "4")
            .with_attr("npointsU", "100000")
            .with_attr("npointsV", "100000")
            .with_child(point("0"));
        assert!(p.parse_leaf(&patch, Amplification::default(), "lid").is_err());

        let negative = leaf("patch")
            .with_attr("npartsU", "4")
            .with_attr("npartsV", "4")
            .with_attr("npointsU", "-1")
            .with_attr("npointsV", "2");
        assert!(p.parse_leaf(&negative, Amplification::default(), "lid").is_err());
    }

    #[test]
    fn test_unknown_leaf_type_is_fatal() {
        let p = parser_with_font();
        assert_eq!(
            p.parse_leaf(&leaf("teapot"), Amplification::default(), "n"),
            Err("no such leaf type \"teapot\"".to_string())
        );
    }
}
