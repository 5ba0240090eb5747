//! `<animations>` and `<bindings>`

use crate::animation::{Easing, KeyframeAnimation, Pose};
use crate::document::Element;
use crate::foundation::math::{utils, Axis, Vec3};
use crate::scene::Binding;

use super::values::{parse_bool_or, parse_float, require_id};
use super::SceneParser;

impl SceneParser {
    pub(super) fn parse_animations(&mut self, element: &Element) -> Result<(), String> {
        for node in element.children() {
            let id = require_id(node, "animation")?;
            let looping = parse_bool_or(node, "loop", &id, false);
            let mut animation = KeyframeAnimation::new(looping);

            if let Some(name) = node.attr("easing") {
                match Easing::from_name(name) {
                    Some(easing) => animation.set_easing(easing),
                    None => self.diagnostics.warn(format!(
                        "unknown easing \"{name}\" for animation {id}; using linear"
                    )),
                }
            }

            for keyframe in node.children() {
                let instant = parse_float(keyframe, "instant", &id)?;
                if instant < 0.0 {
                    return Err(format!("negative keyframe instant in animation {id}"));
                }
                animation.add_keyframe(instant, parse_keyframe_pose(keyframe)?);
            }

            animation.set_time_update(parse_bool_or(node, "timeupdate", &id, true));
            animation.set_on_update(node.attr("onupdate").map(str::to_string));

            self.animations.insert(&id, animation)?;
        }
        Ok(())
    }

    pub(super) fn parse_bindings(&mut self, element: &Element) -> Result<(), String> {
        for node in element.children() {
            let id = require_id(node, "binding")?;
            let binding = match node.child("representation") {
                Some(representation) => {
                    let animation_id = representation
                        .attr("animationref")
                        .ok_or_else(|| format!("unable to parse animationref: {id}"))?;
                    let animation = self
                        .animations
                        .key(animation_id)
                        .ok_or_else(|| format!("no such animation \"{animation_id}\""))?;
                    let t = parse_float(representation, "t", &id)?;
                    Binding::with_representation(animation, t)
                }
                None => Binding::default(),
            };
            self.bindings.insert(&id, binding)?;
        }
        Ok(())
    }
}

/// Pose of one `<keyframe>`; absent components stay at identity
fn parse_keyframe_pose(keyframe: &Element) -> Result<Pose, String> {
    let mut translation: Option<Vec3> = None;
    let mut rotation: [Option<f32>; 3] = [None; 3];
    let mut scale: Option<Vec3> = None;

    for component in keyframe.children() {
        match component.name() {
            "translation" => {
                if translation.is_some() {
                    return Err("translation already defined for this keyframe".to_string());
                }
                translation = Some(Vec3::new(
                    parse_float(component, "x", "keyframe translation")?,
                    parse_float(component, "y", "keyframe translation")?,
                    parse_float(component, "z", "keyframe translation")?,
                ));
            }
            "rotation" => {
                let name = component
                    .attr("axis")
                    .ok_or_else(|| "undefined axis in keyframe rotation".to_string())?;
                let angle = parse_float(component, "angle", "keyframe rotation")?;
                let axis =
                    Axis::from_name(name).ok_or_else(|| format!("no such axis \"{name}\""))?;
                let slot = &mut rotation[axis as usize];
                if slot.is_some() {
                    return Err(format!(
                        "rotation in axis {name} already defined for this keyframe"
                    ));
                }
                *slot = Some(utils::deg_to_rad(angle));
            }
            "scale" => {
                if scale.is_some() {
                    return Err("scale already defined for this keyframe".to_string());
                }
                scale = Some(Vec3::new(
                    parse_float(component, "sx", "keyframe scale")?,
                    parse_float(component, "sy", "keyframe scale")?,
                    parse_float(component, "sz", "keyframe scale")?,
                ));
            }
            other => return Err(format!("no such transformation type \"{other}\"")),
        }
    }

    let [rx, ry, rz] = rotation.map(|angle| angle.unwrap_or(0.0));
    let identity = Pose::identity();
    Ok(Pose {
        translation: translation.unwrap_or(identity.translation),
        rotation: Vec3::new(rx, ry, rz),
        scale: scale.unwrap_or(identity.scale),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParseOptions;
    use approx::assert_relative_eq;

    fn translation(x: &str) -> Element {
        Element::new("translation")
            .with_attr("x", x)
            .with_attr("y", "0")
            .with_attr("z", "0")
    }

    fn keyframe(instant: &str) -> Element {
        Element::new("keyframe").with_attr("instant", instant)
    }

    #[test]
    fn test_missing_components_default_to_identity() {
        let pose = parse_keyframe_pose(
            &keyframe("1").with_child(
                Element::new("rotation")
                    .with_attr("axis", "y")
                    .with_attr("angle", "90"),
            ),
        )
        .unwrap();
        assert_eq!(pose.translation, Vec3::zeros());
        assert_eq!(pose.scale, Vec3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(pose.rotation.y, std::f32::consts::FRAC_PI_2, epsilon = 1e-6);
    }

    #[test]
    fn test_duplicate_components_are_fatal() {
        let doubled = keyframe("0").with_child(translation("1")).with_child(translation("2"));
        assert_eq!(
            parse_keyframe_pose(&doubled),
            Err("translation already defined for this keyframe".to_string())
        );

        let rotation = || {
            Element::new("rotation")
                .with_attr("axis", "x")
                .with_attr("angle", "10")
        };
        let doubled = keyframe("0").with_child(rotation()).with_child(rotation());
        assert_eq!(
            parse_keyframe_pose(&doubled),
            Err("rotation in axis x already defined for this keyframe".to_string())
        );
    }

    #[test]
    fn test_unknown_component_and_axis() {
        let bad = keyframe("0").with_child(Element::new("shear"));
        assert_eq!(
            parse_keyframe_pose(&bad),
            Err("no such transformation type \"shear\"".to_string())
        );
        let bad = keyframe("0").with_child(
            Element::new("rotation")
                .with_attr("axis", "w")
                .with_attr("angle", "10"),
        );
        assert_eq!(parse_keyframe_pose(&bad), Err("no such axis \"w\"".to_string()));
    }

    #[test]
    fn test_animation_and_binding_tables() {
        let animations = Element::new("animations").with_child(
            Element::new("animation")
                .with_attr("id", "open")
                .with_attr("loop", "1")
                .with_attr("easing", "bounce")
                .with_attr("timeupdate", "0")
                .with_attr("onupdate", "scoreChanged")
                .with_child(keyframe("0"))
                .with_child(keyframe("2").with_child(translation("10"))),
        );
        let bindings = Element::new("bindings")
            .with_child(
                Element::new("binding").with_attr("id", "lid").with_child(
                    Element::new("representation")
                        .with_attr("animationref", "open")
                        .with_attr("t", "2"),
                ),
            )
            .with_child(Element::new("binding").with_attr("id", "lamp"));

        let mut p = SceneParser::new(ParseOptions::default());
        p.parse_animations(&animations).unwrap();
        p.parse_bindings(&bindings).unwrap();

        let open = p.animations.get_by_id("open").unwrap();
        assert!(open.is_looping());
        assert!(!open.time_update());
        assert_eq!(open.easing(), Easing::Linear);
        assert_eq!(open.on_update(), Some("scoreChanged"));
        assert_eq!(open.keyframes().len(), 2);
        assert!(p.diagnostics.warnings()[0].contains("bounce"));

        let lid = p.bindings.get_by_id("lid").unwrap();
        assert_eq!(lid.representation.map(|r| r.t), Some(2.0));
        assert!(p.bindings.get_by_id("lamp").unwrap().representation.is_none());
    }

    #[test]
    fn test_binding_to_unknown_animation_is_fatal() {
        let bindings = Element::new("bindings").with_child(
            Element::new("binding").with_attr("id", "lid").with_child(
                Element::new("representation")
                    .with_attr("animationref", "ghost")
                    .with_attr("t", "1"),
            ),
        );
        let mut p = SceneParser::new(ParseOptions::default());
        assert_eq!(
            p.parse_bindings(&bindings),
            Err("no such animation \"ghost\"".to_string())
        );
    }

    #[test]
    fn test_duplicate_animation_id_is_fatal() {
        let animations = Element::new("animations")
            .with_child(Element::new("animation").with_attr("id", "a"))
            .with_child(Element::new("animation").with_attr("id", "a"));
        let mut p = SceneParser::new(ParseOptions::default());
        assert_eq!(
            p.parse_animations(&animations),
            Err("ID must be unique for each animation (conflict: ID = a)".to_string())
        );
    }
}
