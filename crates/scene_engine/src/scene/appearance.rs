//! Appearance stack
//!
//! The active appearance is a (material, texture) pair of handles. Entering
//! a node saves the active pair and resolves the node's references against
//! it; leaving restores the saved pair. The rendering context is only told
//! about a pair when it differs from the active one, compared by handle
//! identity.

use crate::foundation::collections::{MaterialKey, TextureKey};

use super::context::RenderContext;
use super::node::{MaterialRef, TextureRef};

/// Material and texture applied to the rendering context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Appearance {
    /// Active material; `None` means the host's default
    pub material: Option<MaterialKey>,
    /// Active texture; `None` means texturing disabled
    pub texture: Option<TextureKey>,
}

impl Appearance {
    /// Resolve node references against this appearance
    pub fn resolve(&self, material: MaterialRef, texture: TextureRef) -> Appearance {
        Appearance {
            material: match material {
                MaterialRef::Inherit => self.material,
                MaterialRef::Material(key) => Some(key),
            },
            texture: match texture {
                TextureRef::Inherit => self.texture,
                TextureRef::Clear => None,
                TextureRef::Texture(key) => Some(key),
            },
        }
    }
}

/// Restoration token returned by [`AppearanceStack::enter`]
#[must_use = "an appearance token must be passed back to AppearanceStack::leave"]
#[derive(Debug)]
pub struct AppearanceToken {
    saved: Appearance,
    depth: usize,
}

/// Save/restore stack over the active appearance
#[derive(Debug, Default)]
pub struct AppearanceStack {
    active: Appearance,
    saved: Vec<Appearance>,
    pushes: usize,
    pops: usize,
    applies: usize,
}

impl AppearanceStack {
    /// Stack whose active appearance is `initial`
    pub fn new(initial: Appearance) -> Self {
        Self {
            active: initial,
            ..Self::default()
        }
    }

    /// Active appearance
    pub fn active(&self) -> Appearance {
        self.active
    }

    /// Saved entries
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Number of enters so far
    pub fn pushes(&self) -> usize {
        self.pushes
    }

    /// Number of leaves so far
    pub fn pops(&self) -> usize {
        self.pops
    }

    /// Number of apply calls issued to the rendering context
    pub fn applies(&self) -> usize {
        self.applies
    }

    /// Save the active appearance and switch to the node's effective one
    pub fn enter(
        &mut self,
        material: MaterialRef,
        texture: TextureRef,
        ctx: &mut dyn RenderContext,
    ) -> AppearanceToken {
        let saved = self.active;
        self.saved.push(saved);
        self.pushes += 1;
        let effective = saved.resolve(material, texture);
        self.switch_to(effective, ctx);
        AppearanceToken {
            saved,
            depth: self.saved.len(),
        }
    }

    /// Make `appearance` active without saving, applying it only if it differs
    pub fn switch_to(&mut self, appearance: Appearance, ctx: &mut dyn RenderContext) {
        if appearance != self.active {
            ctx.apply_appearance(&appearance);
            self.applies += 1;
            self.active = appearance;
        }
    }

    /// Restore the appearance saved by the matching [`enter`](Self::enter)
    pub fn leave(&mut self, token: AppearanceToken, ctx: &mut dyn RenderContext) {
        debug_assert_eq!(token.depth, self.saved.len(), "unbalanced appearance stack");
        self.saved.pop();
        self.pops += 1;
        self.switch_to(token.saved, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::context::{RecordingContext, RenderCommand};
    use slotmap::SlotMap;

    struct Keys {
        wood: MaterialKey,
        metal: MaterialKey,
        grain: TextureKey,
    }

    fn keys() -> Keys {
        let mut materials: SlotMap<MaterialKey, ()> = SlotMap::with_key();
        let mut textures: SlotMap<TextureKey, ()> = SlotMap::with_key();
        Keys {
            wood: materials.insert(()),
            metal: materials.insert(()),
            grain: textures.insert(()),
        }
    }

    #[test]
    fn test_inherit_issues_no_apply() {
        let k = keys();
        let mut ctx = RecordingContext::new();
        let mut stack = AppearanceStack::default();

        let outer = stack.enter(MaterialRef::Material(k.wood), TextureRef::Inherit, &mut ctx);
        let applies_before = stack.applies();

        let inner = stack.enter(MaterialRef::Inherit, TextureRef::Inherit, &mut ctx);
        stack.leave(inner, &mut ctx);

        assert_eq!(stack.applies(), applies_before);
        assert_eq!(stack.active().material, Some(k.wood));
        stack.leave(outer, &mut ctx);
    }

    #[test]
    fn test_leave_restores_previous_appearance() {
        let k = keys();
        let mut ctx = RecordingContext::new();
        let mut stack = AppearanceStack::default();

        let outer = stack.enter(MaterialRef::Material(k.wood), TextureRef::Texture(k.grain), &mut ctx);
        let inner = stack.enter(MaterialRef::Material(k.metal), TextureRef::Clear, &mut ctx);
        assert_eq!(
            stack.active(),
            Appearance {
                material: Some(k.metal),
                texture: None
            }
        );
        stack.leave(inner, &mut ctx);
        assert_eq!(
            stack.active(),
            Appearance {
                material: Some(k.wood),
                texture: Some(k.grain)
            }
        );
        stack.leave(outer, &mut ctx);

        assert_eq!(stack.active(), Appearance::default());
        assert_eq!(stack.pushes(), stack.pops());
        assert_eq!(stack.depth(), 0);
        assert_eq!(ctx.count(|c| matches!(c, RenderCommand::ApplyAppearance(_))), 4);
    }

    #[test]
    fn test_same_handle_is_not_reapplied() {
        let k = keys();
        let mut ctx = RecordingContext::new();
        let mut stack = AppearanceStack::default();

        let outer = stack.enter(MaterialRef::Material(k.wood), TextureRef::Inherit, &mut ctx);
        let inner = stack.enter(MaterialRef::Material(k.wood), TextureRef::Inherit, &mut ctx);
        stack.leave(inner, &mut ctx);
        stack.leave(outer, &mut ctx);

        assert_eq!(stack.applies(), 2);
    }
}
