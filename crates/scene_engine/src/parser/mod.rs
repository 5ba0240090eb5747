//! Descriptor parser
//!
//! Turns an `<lsf>` document tree into a [`SceneDescription`]. Sections are
//! parsed in canonical order regardless of where they sit in the document:
//!
//! ```text
//! initials, animations, bindings, views, illumination,
//! lights, textures, spritesheets, materials, nodes
//! ```
//!
//! Later sections look up ids declared by earlier ones, so this order is
//! also the dependency order. Every section parser returns `Err(String)` on
//! a fatal error and the first one aborts the whole parse. Minor errors go
//! through [`Diagnostics::warn`] and parsing continues with a default.

mod animations;
mod initials;
mod leaves;
mod lights;
mod nodes;
mod resources;
mod transformations;
mod values;
mod views;

pub use transformations::parse_transformations;
pub use values::{
    parse_bool, parse_bool_or, parse_color, parse_coordinates_3d, parse_coordinates_4d,
    parse_count, parse_float, parse_int, parse_string, require_id,
};

use bitflags::bitflags;

use crate::animation::KeyframeAnimation;
use crate::config::MAX_SUPPORTED_LIGHTS;
use crate::document::Element;
use crate::foundation::collections::{
    AnimationKey, BindingKey, LightKey, MaterialKey, Registry, SpriteSheetKey, TextureKey,
};
use crate::scene::{
    Binding, Illumination, Light, Material, SceneDescription, SceneError, SceneGraph, SceneSetup,
    SpriteSheet, Texture, Views,
};

bitflags! {
    /// Set of top-level sections
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Sections: u16 {
        const INITIALS = 1 << 0;
        const ANIMATIONS = 1 << 1;
        const BINDINGS = 1 << 2;
        const VIEWS = 1 << 3;
        const ILLUMINATION = 1 << 4;
        const LIGHTS = 1 << 5;
        const TEXTURES = 1 << 6;
        const SPRITESHEETS = 1 << 7;
        const MATERIALS = 1 << 8;
        const NODES = 1 << 9;

        /// Sections whose absence is fatal
        const REQUIRED = Self::INITIALS.bits()
            | Self::BINDINGS.bits()
            | Self::VIEWS.bits()
            | Self::ILLUMINATION.bits()
            | Self::LIGHTS.bits()
            | Self::TEXTURES.bits()
            | Self::SPRITESHEETS.bits()
            | Self::MATERIALS.bits()
            | Self::NODES.bits();
    }
}

/// Top-level sections in canonical order
const SECTION_ORDER: [(Sections, &str); 10] = [
    (Sections::INITIALS, "initials"),
    (Sections::ANIMATIONS, "animations"),
    (Sections::BINDINGS, "bindings"),
    (Sections::VIEWS, "views"),
    (Sections::ILLUMINATION, "illumination"),
    (Sections::LIGHTS, "lights"),
    (Sections::TEXTURES, "textures"),
    (Sections::SPRITESHEETS, "spritesheets"),
    (Sections::MATERIALS, "materials"),
    (Sections::NODES, "nodes"),
];

/// Settings that influence parsing
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Player whose camera is current after loading (1 or 2)
    pub starting_player: u8,
    /// Light slots available; extra lights are ignored
    pub max_lights: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            starting_player: 1,
            max_lights: MAX_SUPPORTED_LIGHTS,
        }
    }
}

/// Minor errors collected during a parse
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    warnings: Vec<String>,
}

impl Diagnostics {
    /// Record and log a minor error
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("Warning: {}", message);
        self.warnings.push(message);
    }

    /// Minor errors so far
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Take the collected minor errors
    pub fn into_warnings(self) -> Vec<String> {
        self.warnings
    }
}

/// Parser state: one table per section, filled in canonical order
pub struct SceneParser {
    options: ParseOptions,
    diagnostics: Diagnostics,
    sections: Sections,
    setup: Option<SceneSetup>,
    animations: Registry<AnimationKey, KeyframeAnimation>,
    bindings: Registry<BindingKey, Binding>,
    views: Option<Views>,
    illumination: Illumination,
    lights: Registry<LightKey, Light>,
    textures: Registry<TextureKey, Texture>,
    sprite_sheets: Registry<SpriteSheetKey, SpriteSheet>,
    materials: Registry<MaterialKey, Material>,
    graph: SceneGraph,
}

impl SceneParser {
    /// Fresh parser
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            diagnostics: Diagnostics::default(),
            sections: Sections::empty(),
            setup: None,
            animations: Registry::new("animation"),
            bindings: Registry::new("binding"),
            views: None,
            illumination: Illumination::default(),
            lights: Registry::new("light"),
            textures: Registry::new("texture"),
            sprite_sheets: Registry::new("sprite sheet"),
            materials: Registry::new("material"),
            graph: SceneGraph::new(),
        }
    }

    /// Parse a document rooted at `<lsf>`
    pub fn parse(mut self, root: &Element) -> Result<SceneDescription, SceneError> {
        let outcome = self.parse_sections(root);
        let result = outcome.and_then(|()| self.take_parts());
        match result {
            Ok(parts) => Ok(parts.into_description(self.sections, self.diagnostics.into_warnings())),
            Err(message) => {
                log::error!("Scene loading error: {}", message);
                Err(SceneError::Fatal {
                    message,
                    warnings: self.diagnostics.into_warnings(),
                })
            }
        }
    }

    fn parse_sections(&mut self, root: &Element) -> Result<(), String> {
        if root.name() != "lsf" {
            return Err("root tag <lsf> missing".to_string());
        }

        for (_, name) in SECTION_ORDER {
            if root.children_named(name).count() > 1 {
                return Err(format!("tag <{name}> appears more than once"));
            }
        }

        let mut expected = 0;
        for (section, name) in SECTION_ORDER {
            let Some(index) = root.position(name) else {
                if Sections::REQUIRED.contains(section) {
                    return Err(format!("tag <{name}> missing"));
                }
                self.diagnostics.warn(format!("tag <{name}> missing"));
                continue;
            };
            if index != expected {
                self.diagnostics.warn(format!("tag <{name}> out of order {index}"));
            }
            expected += 1;

            let element = &root.children()[index];
            self.parse_section(section, element)?;
            self.sections |= section;
            log::info!("Parsed {}", name);
        }
        Ok(())
    }

    fn parse_section(&mut self, section: Sections, element: &Element) -> Result<(), String> {
        if section == Sections::INITIALS {
            self.parse_initials(element)
        } else if section == Sections::ANIMATIONS {
            self.parse_animations(element)
        } else if section == Sections::BINDINGS {
            self.parse_bindings(element)
        } else if section == Sections::VIEWS {
            self.parse_views(element)
        } else if section == Sections::ILLUMINATION {
            self.parse_illumination(element)
        } else if section == Sections::LIGHTS {
            self.parse_lights(element)
        } else if section == Sections::TEXTURES {
            self.parse_textures(element)
        } else if section == Sections::SPRITESHEETS {
            self.parse_sprite_sheets(element)
        } else if section == Sections::MATERIALS {
            self.parse_materials(element)
        } else {
            self.parse_nodes(element)
        }
    }

    fn take_parts(&mut self) -> Result<Parts, String> {
        let setup = self
            .setup
            .take()
            .ok_or_else(|| "tag <initials> missing".to_string())?;
        let views = self
            .views
            .take()
            .ok_or_else(|| "tag <views> missing".to_string())?;
        Ok(Parts {
            setup,
            views,
            animations: std::mem::replace(&mut self.animations, Registry::new("animation")),
            bindings: std::mem::replace(&mut self.bindings, Registry::new("binding")),
            illumination: self.illumination,
            lights: std::mem::replace(&mut self.lights, Registry::new("light")),
            textures: std::mem::replace(&mut self.textures, Registry::new("texture")),
            sprite_sheets: std::mem::replace(&mut self.sprite_sheets, Registry::new("sprite sheet")),
            materials: std::mem::replace(&mut self.materials, Registry::new("material")),
            graph: std::mem::take(&mut self.graph),
        })
    }
}

struct Parts {
    setup: SceneSetup,
    views: Views,
    animations: Registry<AnimationKey, KeyframeAnimation>,
    bindings: Registry<BindingKey, Binding>,
    illumination: Illumination,
    lights: Registry<LightKey, Light>,
    textures: Registry<TextureKey, Texture>,
    sprite_sheets: Registry<SpriteSheetKey, SpriteSheet>,
    materials: Registry<MaterialKey, Material>,
    graph: SceneGraph,
}

impl Parts {
    fn into_description(self, sections: Sections, warnings: Vec<String>) -> SceneDescription {
        SceneDescription {
            setup: self.setup,
            animations: self.animations,
            bindings: self.bindings,
            views: self.views,
            illumination: self.illumination,
            lights: self.lights,
            textures: self.textures,
            sprite_sheets: self.sprite_sheets,
            materials: self.materials,
            graph: self.graph,
            sections,
            warnings,
        }
    }
}

/// Parse a scene document with default options
pub fn parse_scene(root: &Element) -> Result<SceneDescription, SceneError> {
    SceneParser::new(ParseOptions::default()).parse(root)
}

/// Parse a scene document
pub fn parse_scene_with(root: &Element, options: ParseOptions) -> Result<SceneDescription, SceneError> {
    SceneParser::new(options).parse(root)
}
