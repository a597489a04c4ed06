use bevy::asset::LoadState;
use bevy::prelude::*;

/// Neutral grey used until (or instead of) a texture.
pub const FALLBACK_COLOR: Color = Color::srgb(0.53, 0.53, 0.53);

/// A texture request that hasn't settled yet.
///
/// The material starts untextured; once the image arrives it is swapped in,
/// if it fails the material simply stays as it is.
pub struct PendingTexture {
    pub path: &'static str,
    pub image: Handle<Image>,
    pub material: Handle<StandardMaterial>,
    pub tint: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureOutcome {
    Waiting,
    Applied,
    Missing,
}

#[derive(Resource, Default)]
pub struct PendingTextures(pub Vec<PendingTexture>);

impl PendingTextures {
    // fire and forget, never blocks scene construction
    pub fn request(
        &mut self,
        asset_server: &AssetServer,
        materials: &mut Assets<StandardMaterial>,
        path: &'static str,
        base: StandardMaterial,
        tint: Color,
    ) -> Handle<StandardMaterial> {
        let material = materials.add(StandardMaterial {
            base_color: FALLBACK_COLOR,
            base_color_texture: None,
            ..base
        });

        self.0.push(PendingTexture {
            path,
            image: asset_server.load(path),
            material: material.clone(),
            tint,
        });

        material
    }
}

pub fn settle(state: &LoadState) -> TextureOutcome {
    match state {
        LoadState::Loaded => TextureOutcome::Applied,
        LoadState::Failed(_) => TextureOutcome::Missing,
        LoadState::NotLoaded | LoadState::Loading => TextureOutcome::Waiting,
    }
}

pub fn resolve_textures(
    asset_server: Res<AssetServer>,
    mut pending: ResMut<PendingTextures>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if pending.0.is_empty() {
        return;
    }

    pending.0.retain(|request| {
        let outcome = match asset_server.get_load_state(request.image.id()) {
            Some(state) => settle(&state),
            None => TextureOutcome::Missing,
        };

        match outcome {
            TextureOutcome::Waiting => true,
            TextureOutcome::Applied => {
                if let Some(material) = materials.get_mut(&request.material) {
                    material.base_color = request.tint;
                    material.base_color_texture = Some(request.image.clone());
                }
                debug!("texture {} applied", request.path);
                false
            }
            TextureOutcome::Missing => {
                warn!("texture {} unavailable, keeping untextured material", request.path);
                false
            }
        }
    });
}
