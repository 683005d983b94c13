//! GPU texture cache for decoded thumbnails

use app_core::{Thumbnail, ViewId};
use egui::{ColorImage, Context, TextureHandle, TextureOptions};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Textures keyed by view and entry index. Entries for views that are no
/// longer shown are released by [`retain_views`](Self::retain_views).
#[derive(Default)]
pub struct TextureCache {
    textures: HashMap<(ViewId, usize), TextureHandle>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Texture for an entry, uploading the thumbnail on first use
    pub fn get_or_upload(
        &mut self,
        ctx: &Context,
        view: ViewId,
        index: usize,
        thumbnail: &Thumbnail,
    ) -> &TextureHandle {
        self.textures
            .entry((view, index))
            .or_insert_with(|| upload(ctx, &format!("thumb-{}-{}", view.0, index), thumbnail))
    }

    /// Drop textures of views not in `live`
    pub fn retain_views(&mut self, live: &HashSet<ViewId>) {
        let before = self.textures.len();
        self.textures.retain(|(view, _), _| live.contains(view));

        let released = before - self.textures.len();
        if released > 0 {
            tracing::trace!(released, "Released thumbnail textures");
        }
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

fn upload(ctx: &Context, name: &str, thumbnail: &Thumbnail) -> TextureHandle {
    let image = ColorImage::from_rgba_unmultiplied(
        [thumbnail.width as usize, thumbnail.height as usize],
        &thumbnail.data,
    );
    ctx.load_texture(name, image, TextureOptions::LINEAR)
}

/// Load an image file from disk into a texture
pub fn load_image_file(ctx: &Context, path: &Path) -> anyhow::Result<TextureHandle> {
    let img = image::open(path)?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let color_image = ColorImage::from_rgba_unmultiplied(
        [width as usize, height as usize],
        rgba.as_flat_samples().as_slice(),
    );

    tracing::debug!("Loaded background image {:?} ({}x{})", path, width, height);
    Ok(ctx.load_texture(path.display().to_string(), color_image, TextureOptions::LINEAR))
}
