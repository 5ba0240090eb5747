//! Game setup records declared in `<initials>`
//!
//! These records carry node and animation ids as written in the document.
//! The parser fills in the matching keys once the node section is parsed.

use crate::animation::CameraPose;
use crate::foundation::collections::{AnimationKey, NodeKey};
use crate::foundation::math::{Mat4, Vec3};

/// Raw value of a `<data><var>` entry; never evaluated
#[derive(Debug, Clone, PartialEq)]
pub enum UserValue {
    /// Value that parses as a number
    Number(f64),
    /// Anything else, kept verbatim
    Text(String),
}

impl UserValue {
    /// Classify a raw attribute value
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(n) => Self::Number(n),
            Err(_) => Self::Text(raw.to_string()),
        }
    }
}

/// Position of one board cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellPosition {
    pub i: i32,
    pub j: i32,
    pub position: Vec3,
}

/// Game board placement
#[derive(Debug, Clone, PartialEq)]
pub struct Gameboard {
    /// Board node id
    pub node_id: String,
    /// Board node, once resolved
    pub node: Option<NodeKey>,
    /// Board placement
    pub transform: Mat4,
    /// Node drawn for each cell
    pub cell_node_id: String,
    /// Cell node, once resolved
    pub cell_node: Option<NodeKey>,
    /// Cell positions in document order
    pub cells: Vec<CellPosition>,
}

impl Gameboard {
    /// Position of cell `(i, j)`
    pub fn cell(&self, i: i32, j: i32) -> Option<Vec3> {
        self.cells
            .iter()
            .find(|c| c.i == i && c.j == j)
            .map(|c| c.position)
    }
}

/// Piece node and how pieces are presented
#[derive(Debug, Clone, PartialEq)]
pub struct PiecesSetup {
    /// Piece node id
    pub node_id: String,
    /// Piece node, once resolved
    pub node: Option<NodeKey>,
    /// Stacking height of one piece
    pub height: f32,
    /// Name of the piece presentation, as written in `<pieceview>`
    pub view: Option<String>,
}

/// Box the new pieces come out of
#[derive(Debug, Clone, PartialEq)]
pub struct PiecesBox {
    /// Box node id
    pub node_id: String,
    /// Box node, once resolved
    pub node: Option<NodeKey>,
    /// Opening animation id
    pub animation_id: String,
    /// Opening animation, once resolved
    pub animation: Option<AnimationKey>,
}

/// In-scene user interface panel
#[derive(Debug, Clone, PartialEq)]
pub struct UserInterface {
    pub id: String,
    pub transform: Mat4,
    pub panel_id: String,
    pub panel: Option<NodeKey>,
    pub value_id: String,
    pub value_node: Option<NodeKey>,
    /// Index, among the value node's children, of the sprite text showing the value
    pub value_leaf: Option<usize>,
    pub button_ids: Vec<String>,
    pub buttons: Vec<NodeKey>,
}

/// Looping background audio entry
#[derive(Debug, Clone, PartialEq)]
pub struct AudioEntry {
    /// Audio file location
    pub url: String,
    /// Gain, when given
    pub volume: Option<f32>,
}

/// Camera move played when the turn passes to a player
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransitionSetup {
    /// Duration in seconds
    pub last_instant: f32,
    /// Explicit camera keyframes, in instant order
    pub keyframes: Vec<(f32, CameraPose)>,
}

impl TransitionSetup {
    /// Endpoints from the earliest and latest keyframes, if there are two
    pub fn endpoints(&self) -> Option<(CameraPose, CameraPose)> {
        if self.keyframes.len() < 2 {
            return None;
        }
        let first = self.keyframes.first()?.1;
        let last = self.keyframes.last()?.1;
        Some((first, last))
    }
}

/// Everything `<initials>` declares
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSetup {
    /// Root node id
    pub root_id: String,
    /// Axis length
    pub reference_length: f32,
    /// Raw user data, document order
    pub userdata: Vec<(String, UserValue)>,
    pub gameboard: Option<Gameboard>,
    pub pieces: Option<PiecesSetup>,
    pub pieces_box: Option<PiecesBox>,
    pub new_piece_pos: Option<Vec3>,
    pub uis: Vec<UserInterface>,
    pub audios: Vec<AudioEntry>,
    pub p1_transition: Option<TransitionSetup>,
    pub p2_transition: Option<TransitionSetup>,
}

impl SceneSetup {
    /// Setup with only a root id
    pub fn new(root_id: impl Into<String>) -> Self {
        Self {
            root_id: root_id.into(),
            reference_length: 1.0,
            userdata: Vec::new(),
            gameboard: None,
            pieces: None,
            pieces_box: None,
            new_piece_pos: None,
            uis: Vec::new(),
            audios: Vec::new(),
            p1_transition: None,
            p2_transition: None,
        }
    }

    /// Raw user data value
    pub fn data(&self, id: &str) -> Option<&UserValue> {
        self.userdata.iter().find(|(k, _)| k == id).map(|(_, v)| v)
    }

    /// Transition played when the turn passes to `player`
    pub fn transition_to(&self, player: u8) -> Option<&TransitionSetup> {
        match player {
            1 => self.p1_transition.as_ref(),
            2 => self.p2_transition.as_ref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_values_are_not_evaluated() {
        assert_eq!(UserValue::from_raw("3.5"), UserValue::Number(3.5));
        assert_eq!(
            UserValue::from_raw("1 + 2"),
            UserValue::Text("1 + 2".into())
        );
    }

    #[test]
    fn test_transition_endpoints_need_two_keyframes() {
        let pose = CameraPose::new(Vec3::zeros(), Vec3::x());
        let mut setup = TransitionSetup {
            last_instant: 2.0,
            keyframes: vec![(0.0, pose)],
        };
        assert!(setup.endpoints().is_none());
        setup.keyframes.push((2.0, CameraPose::new(Vec3::y(), Vec3::x())));
        assert_eq!(setup.endpoints().map(|(_, to)| to.eye), Some(Vec3::y()));
    }
}
