//! `<illumination>` and `<lights>`

use crate::document::Element;
use crate::foundation::collections::{LightKey, Registry};
use crate::foundation::math::Color;
use crate::scene::{BindingTarget, BindingValue, Illumination, Light};

use super::values::{parse_bool_or, parse_color, parse_coordinates_4d, require_id};
use super::SceneParser;

impl SceneParser {
    pub(super) fn parse_illumination(&mut self, element: &Element) -> Result<(), String> {
        let mut illumination = Illumination::default();
        for (tag, slot) in [
            ("ambient", &mut illumination.ambient),
            ("background", &mut illumination.background),
        ] {
            match element.child(tag) {
                Some(color) => *slot = parse_color(color, tag)?,
                None => self
                    .diagnostics
                    .warn(format!("no {tag} color; using default {:?}", Color::WHITE.to_array())),
            }
        }
        self.illumination = illumination;
        Ok(())
    }

    pub(super) fn parse_lights(&mut self, element: &Element) -> Result<(), String> {
        for (index, node) in element.children().iter().enumerate() {
            if index >= self.options.max_lights {
                self.diagnostics.warn(format!(
                    "too many lights defined; only {} light slots available",
                    self.options.max_lights
                ));
                break;
            }
            if node.name() != "light" {
                self.diagnostics
                    .warn(format!("unknown tag <{}>", node.name()));
                continue;
            }

            let id = require_id(node, "light")?;
            let component = |name: &str| {
                node.child(name)
                    .ok_or_else(|| format!("light {name} undefined for ID = {id}"))
            };

            let enable = component("enable")?;
            let position = component("position")?;
            let light = Light {
                slot: self.lights.len(),
                enabled: parse_bool_or(enable, "value", &id, true),
                position: parse_coordinates_4d(position, &format!("light position for ID {id}"))?,
                ambient: parse_color(component("ambient")?, &format!("ambient illumination for ID {id}"))?,
                diffuse: parse_color(component("diffuse")?, &format!("diffuse illumination for ID {id}"))?,
                specular: parse_color(
                    component("specular")?,
                    &format!("specular illumination for ID {id}"),
                )?,
            };
            let key = self.lights.insert(&id, light)?;

            if let Some(binding) = enable.attr("bind") {
                self.bind_light(binding, BindingTarget::LightEnabled(key));
            }
            if let Some(binding) = position.attr("bind") {
                self.bind_light(binding, BindingTarget::LightPosition(key));
            }
        }

        if self.lights.is_empty() {
            self.lights.insert("default", Light::fallback(0))?;
            self.diagnostics
                .warn("at least one light must be defined; using default light");
        }
        Ok(())
    }

    fn bind_light(&mut self, binding_id: &str, target: BindingTarget) {
        let lights = &self.lights;
        match self.bindings.get_by_id_mut(binding_id) {
            Some(binding) => {
                binding.value = match target {
                    BindingTarget::LightEnabled(key) => light_value(lights, key, true),
                    BindingTarget::LightPosition(key) => light_value(lights, key, false),
                    BindingTarget::Unbound => None,
                };
                binding.target = target;
            }
            None => self
                .diagnostics
                .warn(format!("Unknown binding '{binding_id}'")),
        }
    }
}

/// Current light state as seen through a binding
fn light_value(lights: &Registry<LightKey, Light>, key: LightKey, enabled: bool) -> Option<BindingValue> {
    let light = lights.get(key)?;
    Some(if enabled {
        BindingValue::Bool(light.enabled)
    } else {
        BindingValue::Vector(light.position.xyz())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec4;
    use crate::parser::ParseOptions;
    use crate::scene::Binding;

    fn color(tag: &str) -> Element {
        Element::new(tag)
            .with_attr("r", "0.5")
            .with_attr("g", "0.5")
            .with_attr("b", "0.5")
            .with_attr("a", "1")
    }

    fn light(id: &str) -> Element {
        Element::new("light")
            .with_attr("id", id)
            .with_child(Element::new("enable").with_attr("value", "0").with_attr("bind", "lamp"))
            .with_child(
                Element::new("position")
                    .with_attr("x", "1")
                    .with_attr("y", "2")
                    .with_attr("z", "3")
                    .with_attr("w", "1"),
            )
            .with_child(color("ambient"))
            .with_child(color("diffuse"))
            .with_child(color("specular"))
    }

    #[test]
    fn test_missing_illumination_colors_default_to_white() {
        let mut p = SceneParser::new(ParseOptions::default());
        p.parse_illumination(&Element::new("illumination").with_child(color("ambient")))
            .unwrap();
        assert_eq!(p.illumination.ambient, Color::new(0.5, 0.5, 0.5, 1.0));
        assert_eq!(p.illumination.background, Color::WHITE);
        assert_eq!(p.diagnostics.warnings().len(), 1);
    }

    #[test]
    fn test_no_lights_uses_default_light() {
        let mut p = SceneParser::new(ParseOptions::default());
        p.parse_lights(&Element::new("lights")).unwrap();
        let light = p.lights.get_by_id("default").unwrap();
        assert!(light.enabled);
        assert_eq!(light.position, Vec4::new(0.0, 1.0, 0.0, 1.0));
        assert!(p.diagnostics.warnings()[0].contains("at least one light"));
    }

    #[test]
    fn test_light_components_and_binding() {
        let mut p = SceneParser::new(ParseOptions::default());
        p.bindings.insert("lamp", Binding::default()).unwrap();
        p.parse_lights(&Element::new("lights").with_child(light("sun")))
            .unwrap();

        let key = p.lights.key("sun").unwrap();
        let sun = p.lights.get(key).unwrap();
        assert!(!sun.enabled);
        assert_eq!(sun.slot, 0);

        let lamp = p.bindings.get_by_id("lamp").unwrap();
        assert_eq!(lamp.target, BindingTarget::LightEnabled(key));
        assert_eq!(lamp.value, Some(BindingValue::Bool(false)));
    }

    #[test]
    fn test_unknown_binding_and_tag_warn() {
        let mut p = SceneParser::new(ParseOptions::default());
        p.parse_lights(
            &Element::new("lights")
                .with_child(Element::new("spot"))
                .with_child(light("sun")),
        )
        .unwrap();
        let warnings = p.diagnostics.warnings();
        assert!(warnings.iter().any(|w| w == "unknown tag <spot>"));
        assert!(warnings.iter().any(|w| w == "Unknown binding 'lamp'"));
        assert_eq!(p.lights.len(), 1);
    }

    #[test]
    fn test_missing_component_is_fatal() {
        let mut p = SceneParser::new(ParseOptions::default());
        let broken = Element::new("lights").with_child(
            Element::new("light")
                .with_attr("id", "sun")
                .with_child(Element::new("enable").with_attr("value", "1")),
        );
        assert_eq!(
            p.parse_lights(&broken),
            Err("light position undefined for ID = sun".to_string())
        );
    }

    #[test]
    fn test_lights_beyond_slot_limit_are_ignored() {
        let mut p = SceneParser::new(ParseOptions {
            max_lights: 2,
            ..ParseOptions::default()
        });
        let mut lights = Element::new("lights");
        for id in ["a", "b", "c"] {
            lights.push_child(light(id));
        }
        p.parse_lights(&lights).unwrap();
        assert_eq!(p.lights.len(), 2);
        assert!(p.diagnostics.warnings().iter().any(|w| w.contains("too many lights")));
    }
}
