//! Cameras declared in `<views>`

use crate::animation::CameraPose;
use crate::foundation::collections::{Registry, ViewKey};
use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};

/// Camera projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Perspective projection
    Perspective {
        /// Vertical field of view in radians
        fov: f32,
        /// Near plane distance
        near: f32,
        /// Far plane distance
        far: f32,
    },
    /// Orthographic projection
    Orthographic {
        /// Left plane
        left: f32,
        /// Right plane
        right: f32,
        /// Bottom plane
        bottom: f32,
        /// Top plane
        top: f32,
        /// Near plane distance
        near: f32,
        /// Far plane distance
        far: f32,
    },
}

/// What a view is used for in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewRole {
    /// Ordinary selectable view
    #[default]
    Free,
    /// Player one's camera
    Player1,
    /// Player two's camera
    Player2,
    /// Camera animated during player transitions
    MoveCamera,
}

/// One camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    /// Projection parameters
    pub projection: Projection,
    /// Camera position
    pub eye: Vec3,
    /// Look-at point
    pub target: Vec3,
    /// Up vector
    pub up: Vec3,
    /// Game role
    pub role: ViewRole,
}

impl View {
    /// Perspective camera with `fov` in radians
    pub fn perspective(fov: f32, near: f32, far: f32, eye: Vec3, target: Vec3) -> Self {
        Self {
            projection: Projection::Perspective { fov, near, far },
            eye,
            target,
            up: Vec3::y(),
            role: ViewRole::Free,
        }
    }

    /// Camera used when the document declares none
    pub fn fallback() -> Self {
        Self::perspective(
            utils::deg_to_rad(45.0),
            0.1,
            500.0,
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::zeros(),
        )
    }

    /// Eye and target as a camera pose
    pub fn pose(&self) -> CameraPose {
        CameraPose::new(self.eye, self.target)
    }

    /// Move the camera to a pose
    pub fn set_pose(&mut self, pose: &CameraPose) {
        self.eye = pose.eye;
        self.target = pose.target;
    }

    /// World-to-camera matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.eye, self.target, self.up)
    }
}

/// All views plus the default, current and player camera selections
#[derive(Debug)]
pub struct Views {
    list: Registry<ViewKey, View>,
    default: ViewKey,
    current: ViewKey,
    player1: Option<ViewKey>,
    player2: Option<ViewKey>,
    move_camera: Option<ViewKey>,
}

impl Views {
    /// Build the view table
    ///
    /// `list` must hold at least one view and `default` must be one of its
    /// keys; the parser guarantees both.
    pub fn new(list: Registry<ViewKey, View>, default: ViewKey) -> Self {
        let mut player1 = None;
        let mut player2 = None;
        let mut move_camera = None;
        for (_, key, view) in list.iter() {
            match view.role {
                ViewRole::Player1 => player1 = Some(key),
                ViewRole::Player2 => player2 = Some(key),
                ViewRole::MoveCamera => move_camera = Some(key),
                ViewRole::Free => {}
            }
        }
        Self {
            list,
            default,
            current: default,
            player1,
            player2,
            move_camera,
        }
    }

    /// Whether player one, player two and the move camera all exist
    pub fn has_player_cameras(&self) -> bool {
        self.player1.is_some() && self.player2.is_some() && self.move_camera.is_some()
    }

    /// Camera of a player (1 or 2)
    pub fn player_camera(&self, player: u8) -> Option<ViewKey> {
        match player {
            1 => self.player1,
            2 => self.player2,
            _ => None,
        }
    }

    /// Camera animated during player transitions
    pub fn move_camera(&self) -> Option<ViewKey> {
        self.move_camera
    }

    /// Default view
    pub fn default_key(&self) -> ViewKey {
        self.default
    }

    /// Active view
    pub fn current_key(&self) -> ViewKey {
        self.current
    }

    /// Active view's camera
    pub fn current(&self) -> Option<&View> {
        self.list.get(self.current)
    }

    /// Switch the active view; unknown ids are ignored
    pub fn select(&mut self, id: &str) -> bool {
        match self.list.key(id) {
            Some(key) => {
                self.current = key;
                true
            }
            None => false,
        }
    }

    /// Switch the active view by key
    pub fn set_current(&mut self, key: ViewKey) {
        if self.list.get(key).is_some() {
            self.current = key;
        }
    }

    /// Look up a view
    pub fn get(&self, key: ViewKey) -> Option<&View> {
        self.list.get(key)
    }

    /// Look up a view for modification
    pub fn get_mut(&mut self, key: ViewKey) -> Option<&mut View> {
        self.list.get_mut(key)
    }

    /// Look up a view by id
    pub fn get_by_id(&self, id: &str) -> Option<&View> {
        self.list.get_by_id(id)
    }

    /// Id of a view
    pub fn id_of(&self, key: ViewKey) -> Option<&str> {
        self.list.id_of(key)
    }

    /// View ids in document order
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.list.ids()
    }

    /// Number of views
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Always false once built by the parser
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn views() -> Views {
        let mut list = Registry::new("view");
        let default = list.insert("overview", View::fallback()).unwrap();
        let mut p1 = View::fallback();
        p1.role = ViewRole::Player1;
        list.insert("p1", p1).unwrap();
        Views::new(list, default)
    }

    #[test]
    fn test_roles_are_indexed() {
        let views = views();
        assert!(views.player_camera(1).is_some());
        assert!(views.player_camera(2).is_none());
        assert!(!views.has_player_cameras());
    }

    #[test]
    fn test_select_by_id() {
        let mut views = views();
        assert!(views.select("p1"));
        assert_eq!(views.id_of(views.current_key()), Some("p1"));
        assert!(!views.select("missing"));
        assert_eq!(views.id_of(views.current_key()), Some("p1"));
    }
}
