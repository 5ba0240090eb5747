//! `<textures>`, `<spritesheets>` and `<materials>`

use crate::document::Element;
use crate::scene::{Material, SpriteSheet, Texture};

use super::values::{parse_color, parse_count, parse_float, parse_string, require_id};
use super::SceneParser;

impl SceneParser {
    pub(super) fn parse_textures(&mut self, element: &Element) -> Result<(), String> {
        for node in element.children() {
            let id = require_id(node, "texture")?;
            let path = parse_string(node, "path", &id)?;
            self.textures.insert(&id, Texture { path })?;
        }
        Ok(())
    }

    pub(super) fn parse_sprite_sheets(&mut self, element: &Element) -> Result<(), String> {
        for node in element.children() {
            let id = require_id(node, "sprite sheet")?;
            let sheet = SpriteSheet {
                path: parse_string(node, "path", &id)?,
                size_m: parse_count(node, "sizeM", &id)?,
                size_n: parse_count(node, "sizeN", &id)?,
            };
            if sheet.cell_count() == 0 {
                return Err(format!("sprite sheet {id} has no cells"));
            }
            self.sprite_sheets.insert(&id, sheet)?;
        }
        Ok(())
    }

    pub(super) fn parse_materials(&mut self, element: &Element) -> Result<(), String> {
        for node in element.children() {
            if node.name() != "material" {
                self.diagnostics
                    .warn(format!("unknown tag <{}>", node.name()));
                continue;
            }
            let id = require_id(node, "material")?;

            let shininess = node
                .child("shininess")
                .ok_or_else(|| format!("<shininess> is mandatory (material \"{id}\")"))?;
            let mut material = Material::with_shininess(parse_float(shininess, "value", &id)?);

            for (tag, slot) in [
                ("ambient", &mut material.ambient),
                ("diffuse", &mut material.diffuse),
                ("emissive", &mut material.emissive),
                ("specular", &mut material.specular),
            ] {
                match node.child(tag) {
                    Some(color) => *slot = parse_color(color, tag)?,
                    None => self
                        .diagnostics
                        .warn(format!("missing {tag} component, using default value")),
                }
            }

            self.materials.insert(&id, material)?;
        }
        Ok(())
    }
}
