//! `<views>`

use crate::document::Element;
use crate::foundation::collections::{Registry, ViewKey};
use crate::foundation::math::{utils, Vec3};
use crate::scene::{Projection, View, ViewRole, Views};

use super::values::{parse_coordinates_3d, parse_float, require_id};
use super::SceneParser;

impl SceneParser {
    pub(super) fn parse_views(&mut self, element: &Element) -> Result<(), String> {
        let mut list: Registry<ViewKey, View> = Registry::new("view");

        for camera in element.children() {
            let role = match camera.name() {
                "perspective" | "ortho" => ViewRole::Free,
                "player1" => ViewRole::Player1,
                "player2" => ViewRole::Player2,
                "movecamera" => ViewRole::MoveCamera,
                other => {
                    self.diagnostics
                        .warn(format!("no such camera type \"{other}\"; ignored"));
                    continue;
                }
            };
            let id = require_id(camera, "view")?;
            let mut view = if camera.name() == "ortho" {
                parse_ortho(camera, &id)?
            } else {
                parse_perspective(camera, &id)?
            };
            view.role = role;
            list.insert(&id, view)?;
        }

        if list.is_empty() {
            list.insert("default", View::fallback())?;
            self.diagnostics
                .warn("no views were read; default view being used");
        }

        let requested = element.attr("default").unwrap_or_default();
        let default = match list.key(requested) {
            Some(key) => key,
            None => {
                let first = list
                    .first_key()
                    .ok_or_else(|| "no views available".to_string())?;
                let first_id = list.id_of(first).unwrap_or_default();
                self.diagnostics.warn(format!(
                    "no such view \"{requested}\" to use as default; using \"{first_id}\""
                ));
                first
            }
        };

        let mut views = Views::new(list, default);
        if views.has_player_cameras() {
            let player = views.player_camera(self.options.starting_player);
            let start = player.or_else(|| views.player_camera(1));
            if let Some(start) = start {
                views.set_current(start);
                let pose = views.get(start).map(View::pose);
                let move_camera = views.move_camera().and_then(|key| views.get_mut(key));
                if let (Some(pose), Some(move_camera)) = (pose, move_camera) {
                    move_camera.set_pose(&pose);
                }
            }
        } else {
            self.diagnostics.warn("Players cameras not defined properly");
        }

        self.views = Some(views);
        Ok(())
    }
}

fn endpoint(camera: &Element, tag: &str, id: &str) -> Result<Vec3, String> {
    let node = camera
        .child(tag)
        .ok_or_else(|| format!("does not have {tag}: {id}"))?;
    parse_coordinates_3d(node, id)
}

fn parse_perspective(camera: &Element, id: &str) -> Result<View, String> {
    let eye = endpoint(camera, "from", id)?;
    let target = endpoint(camera, "to", id)?;
    let angle = parse_float(camera, "angle", id)?;
    let near = parse_float(camera, "near", id)?;
    let far = parse_float(camera, "far", id)?;
    Ok(View::perspective(utils::deg_to_rad(angle), near, far, eye, target))
}

fn parse_ortho(camera: &Element, id: &str) -> Result<View, String> {
    let eye = endpoint(camera, "from", id)?;
    let target = endpoint(camera, "to", id)?;
    let up = endpoint(camera, "up", id)?;
    let projection = Projection::Orthographic {
        left: parse_float(camera, "left", id)?,
        right: parse_float(camera, "right", id)?,
        bottom: parse_float(camera, "bottom", id)?,
        top: parse_float(camera, "top", id)?,
        near: parse_float(camera, "near", id)?,
        far: parse_float(camera, "far", id)?,
    };
    Ok(View {
        projection,
        eye,
        target,
        up,
        role: ViewRole::Free,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParseOptions;
    use approx::assert_relative_eq;

    fn point(tag: &str, x: &str, y: &str, z: &str) -> Element {
        Element::new(tag).with_attr("x", x).with_attr("y", y).with_attr("z", z)
    }

    fn camera(kind: &str, id: &str, eye_z: &str) -> Element {
        Element::new(kind)
            .with_attr("id", id)
            .with_attr("angle", "60")
            .with_attr("near", "0.1")
            .with_attr("far", "100")
            .with_child(point("from", "0", "10", eye_z))
            .with_child(point("to", "0", "0", "0"))
    }

    fn parse(views: Element, starting_player: u8) -> SceneParser {
        let mut p = SceneParser::new(ParseOptions {
            starting_player,
            ..ParseOptions::default()
        });
        p.parse_views(&views).unwrap();
        p
    }

    #[test]
    fn test_empty_views_use_fallback() {
        let p = parse(Element::new("views").with_attr("default", "top"), 1);
        let views = p.views.unwrap();
        assert_eq!(views.ids().collect::<Vec<_>>(), vec!["default"]);
        assert_eq!(views.current(), Some(&View::fallback()));
        let warnings = p.diagnostics.warnings();
        assert!(warnings.iter().any(|w| w.contains("no views were read")));
        assert!(warnings.iter().any(|w| w == "Players cameras not defined properly"));
    }

    #[test]
    fn test_unknown_default_falls_back_to_first() {
        let p = parse(
            Element::new("views")
                .with_attr("default", "missing")
                .with_child(camera("perspective", "front", "10"))
                .with_child(camera("perspective", "back", "-10")),
            1,
        );
        let views = p.views.unwrap();
        assert_eq!(views.id_of(views.default_key()), Some("front"));
        assert!(p.diagnostics.warnings()[0].contains("using \"front\""));
    }

    #[test]
    fn test_unknown_camera_kind_is_skipped() {
        let p = parse(
            Element::new("views")
                .with_attr("default", "front")
                .with_child(Element::new("fisheye").with_attr("id", "odd"))
                .with_child(camera("perspective", "front", "10")),
            1,
        );
        assert_eq!(p.views.unwrap().len(), 1);
        assert!(p.diagnostics.warnings()[0].contains("fisheye"));
    }

    #[test]
    fn test_player_cameras_select_starting_player() {
        let p = parse(
            Element::new("views")
                .with_attr("default", "front")
                .with_child(camera("perspective", "front", "1"))
                .with_child(camera("player1", "p1", "10"))
                .with_child(camera("player2", "p2", "-10"))
                .with_child(camera("movecamera", "move", "0")),
            2,
        );
        let views = p.views.unwrap();
        assert_eq!(views.id_of(views.current_key()), Some("p2"));
        let move_camera = views.get_by_id("move").unwrap();
        assert_relative_eq!(move_camera.eye.z, -10.0);
        match views.get_by_id("p1").unwrap().projection {
            Projection::Perspective { fov, .. } => {
                assert_relative_eq!(fov, std::f32::consts::FRAC_PI_3, epsilon = 1e-6)
            }
            other => panic!("unexpected projection {other:?}"),
        }
    }

    #[test]
    fn test_ortho_needs_up() {
        let ortho = Element::new("ortho")
            .with_attr("id", "top")
            .with_child(point("from", "0", "10", "0"))
            .with_child(point("to", "0", "0", "0"));
        assert_eq!(
            parse_ortho(&ortho, "top"),
            Err("does not have up: top".to_string())
        );
    }
}
