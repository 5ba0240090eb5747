//! `<initials>`: root id, reference length, user data and game setup

use crate::animation::CameraPose;
use crate::document::Element;
use crate::foundation::math::Vec3;
use crate::scene::{
    AudioEntry, CellPosition, Gameboard, PiecesBox, PiecesSetup, SceneSetup, TransitionSetup,
    UserInterface, UserValue,
};

use super::transformations::parse_transformations;
use super::values::{parse_float, parse_int, parse_string, require_id};
use super::SceneParser;

impl SceneParser {
    pub(super) fn parse_initials(&mut self, element: &Element) -> Result<(), String> {
        let root_id = element
            .child("root")
            .and_then(Element::id)
            .ok_or_else(|| "No root id defined for scene.".to_string())?;
        let mut setup = SceneSetup::new(root_id);

        if let Some(data) = element.child("data") {
            self.parse_userdata(data, &mut setup);
        }

        setup.reference_length = match element
            .child("reference")
            .map(|r| parse_float(r, "length", "<initials>"))
        {
            Some(Ok(length)) => length,
            _ => {
                self.diagnostics
                    .warn("no axis_length defined for scene; assuming 'length = 1'");
                1.0
            }
        };

        match element.child("gameboard") {
            Some(board) => setup.gameboard = Some(parse_gameboard(board)?),
            None => self.diagnostics.warn("No gameboard defined for scene."),
        }

        match element.child("piece") {
            Some(piece) => {
                let view = element
                    .child("pieceview")
                    .map(|v| parse_string(v, "classname", "pieceview"))
                    .transpose()?;
                setup.pieces = Some(PiecesSetup {
                    node_id: parse_string(piece, "id", "piece")?,
                    node: None,
                    height: parse_float(piece, "height", "piece")?,
                    view,
                });
            }
            None => self.diagnostics.warn("No pieces defined for scene."),
        }

        match element.child("piecesboxanim") {
            Some(pieces_box) => {
                setup.pieces_box = Some(PiecesBox {
                    node_id: parse_string(pieces_box, "id", "piecesboxanim")?,
                    node: None,
                    animation_id: parse_string(pieces_box, "animationref", "piecesboxanim")?,
                    animation: None,
                });
            }
            None => self.diagnostics.warn("No piece box defined for scene."),
        }

        match element.child("newpiecepos") {
            Some(pos) => {
                let x = parse_float(pos, "x", "newpiecepos")?;
                let y = parse_float(pos, "y", "newpiecepos")?;
                let z = parse_float(pos, "z", "newpiecepos")?;
                setup.new_piece_pos = Some(Vec3::new(x, y, z));
            }
            None => self.diagnostics.warn("No new piece pos defined for scene."),
        }

        match element.child("uis") {
            Some(uis) => setup.uis = parse_uis(uis)?,
            None => self.diagnostics.warn("No uis defined for scene."),
        }

        match element.child("audios") {
            Some(audios) => setup.audios = self.parse_audios(audios)?,
            None => self.diagnostics.warn("No audios defined for scene"),
        }

        for (player, tag) in [(1, "p1transition"), (2, "p2transition")] {
            let transition = match element.child(tag) {
                Some(node) => Some(parse_transition(node, tag)?),
                None => {
                    self.diagnostics
                        .warn(format!("No player {player} transition defined for scene."));
                    None
                }
            };
            if player == 1 {
                setup.p1_transition = transition;
            } else {
                setup.p2_transition = transition;
            }
        }

        self.setup = Some(setup);
        Ok(())
    }

    fn parse_userdata(&mut self, data: &Element, setup: &mut SceneSetup) {
        for var in data.children() {
            if var.name() != "var" {
                self.diagnostics
                    .warn(format!("Unknown data tag '{}'", var.name()));
                continue;
            }
            let id = var.id().unwrap_or_default().to_string();
            match var.attr("value") {
                Some(raw) => setup.userdata.push((id, UserValue::from_raw(raw))),
                None => self
                    .diagnostics
                    .warn(format!("Data var '{id}' does not have value; ignored")),
            }
        }
    }

    fn parse_audios(&mut self, audios: &Element) -> Result<Vec<AudioEntry>, String> {
        let mut entries = Vec::new();
        for audio in audios.children() {
            if audio.name() != "audio" {
                self.diagnostics
                    .warn(format!("Unknown node name '{}' in <audios>", audio.name()));
                continue;
            }
            let Some(url) = audio.attr("url") else {
                self.diagnostics.warn("Audio does not have URL, ignoring");
                continue;
            };
            let volume = if audio.has_attr("volume") {
                Some(parse_float(audio, "volume", "<audio>")?)
            } else {
                None
            };
            entries.push(AudioEntry {
                url: url.to_string(),
                volume,
            });
        }
        Ok(entries)
    }
}

fn parse_gameboard(board: &Element) -> Result<Gameboard, String> {
    let node_id = board
        .id()
        .ok_or_else(|| "No gameboard ID defined for scene.".to_string())?
        .to_string();
    let transform = parse_transformations(board.child("transformations"), "gameboard")?;

    let cells = board
        .child("cells")
        .ok_or_else(|| "<cells> block is mandatory (gameboard)".to_string())?;
    let cell_node_id = parse_string(cells, "id", "cells")?;

    let mut positions = Vec::new();
    for cell in cells.children_named("cell") {
        let i = parse_int(cell, "i", "gameboard")?;
        let j = parse_int(cell, "j", "gameboard")?;
        let x = parse_float(cell, "x", "gameboard")?;
        let y = parse_float(cell, "y", "gameboard")?;
        let z = parse_float(cell, "z", "gameboard")?;
        positions.push(CellPosition {
            i,
            j,
            position: Vec3::new(x, y, z),
        });
    }

    Ok(Gameboard {
        node_id,
        node: None,
        transform,
        cell_node_id,
        cell_node: None,
        cells: positions,
    })
}

fn parse_uis(uis: &Element) -> Result<Vec<UserInterface>, String> {
    let mut parsed: Vec<UserInterface> = Vec::new();
    for ui in uis.children() {
        let id = ui
            .id()
            .ok_or_else(|| "No UI ID defined for scene.".to_string())?
            .to_string();
        if parsed.iter().any(|other| other.id == id) {
            return Err(format!("ID must be unique for each ui (conflict: ID = {id})"));
        }

        let transform = parse_transformations(ui.child("transformations"), "ui")?;
        let panel = ui
            .child("panel")
            .ok_or_else(|| format!("<panel> block is mandatory (ui \"{id}\")"))?;
        let value = ui
            .child("value")
            .ok_or_else(|| format!("<value> block is mandatory (ui \"{id}\")"))?;

        let mut button_ids = Vec::new();
        if let Some(buttons) = ui.child("buttons") {
            for button in buttons.children_named("button") {
                button_ids.push(require_id(button, "button")?);
            }
        }

        parsed.push(UserInterface {
            transform,
            panel_id: parse_string(panel, "id", "ui")?,
            panel: None,
            value_id: parse_string(value, "id", "ui")?,
            value_node: None,
            value_leaf: None,
            button_ids,
            buttons: Vec::new(),
            id,
        });
    }
    Ok(parsed)
}

fn parse_transition(node: &Element, tag: &str) -> Result<TransitionSetup, String> {
    let last_instant = parse_float(node, "lastinstant", tag)?;
    let mut keyframes = Vec::new();
    for keyframe in node.children_named("keyframe") {
        let instant = parse_float(keyframe, "instant", tag)?;
        let eye = Vec3::new(
            parse_float(keyframe, "fx", tag)?,
            parse_float(keyframe, "fy", tag)?,
            parse_float(keyframe, "fz", tag)?,
        );
        let target = Vec3::new(
            parse_float(keyframe, "tx", tag)?,
            parse_float(keyframe, "ty", tag)?,
            parse_float(keyframe, "tz", tag)?,
        );
        keyframes.push((instant, CameraPose::new(eye, target)));
    }
    keyframes.sort_by(|a, b| a.0.total_cmp(&b.0));
    Ok(TransitionSetup {
        last_instant,
        keyframes,
    })
}
