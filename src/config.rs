//! Gallery content configuration
//!
//! The host supplies the list of portfolio items (frames) and the popup image
//! pool as plain structured data; the engine treats it as opaque except for
//! positions, slugs, and the presence of a video reference.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable handle into the gallery item list.
///
/// Indices are assigned in config order and never change for the lifetime of
/// a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u32);

/// One frame in the gallery ring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryItem {
    /// URL-safe identifier used by the router (`#/item/<slug>`)
    pub slug: String,
    /// Image shown inside the frame
    pub image: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// When present, selection reveals this video instead of the text panel
    #[serde(default)]
    pub video: Option<String>,
    /// Frame base position in gallery-local space
    pub position: [f32; 3],
    /// Frame yaw in gallery-local space (radians)
    #[serde(default)]
    pub yaw: f32,
}

/// Full gallery configuration consumed at scene start
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryConfig {
    pub items: Vec<GalleryItem>,
    /// Image pool the popup storm draws from
    #[serde(default)]
    pub popup_images: Vec<String>,
}

/// Configuration rejection reasons
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid gallery JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("gallery has no items")]
    Empty,
    #[error("duplicate item slug: {0}")]
    DuplicateSlug(String),
}

impl GalleryConfig {
    /// Parse and validate a host-supplied JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Slugs must be unique so the router binding is unambiguous
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.items.is_empty() {
            return Err(ConfigError::Empty);
        }
        for (i, item) in self.items.iter().enumerate() {
            if self.items[..i].iter().any(|other| other.slug == item.slug) {
                return Err(ConfigError::DuplicateSlug(item.slug.clone()));
            }
        }
        Ok(())
    }

    /// Look up an item; out-of-range ids yield `None` (and callers no-op)
    pub fn get(&self, id: ItemId) -> Option<&GalleryItem> {
        self.items.get(id.0 as usize)
    }

    /// Resolve a router slug to an item id
    pub fn find_by_slug(&self, slug: &str) -> Option<ItemId> {
        self.items
            .iter()
            .position(|item| item.slug == slug)
            .map(|i| ItemId(i as u32))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Built-in demo gallery: one hero frame front and center, a back row,
    /// and two angled side walls.
    pub fn sample() -> Self {
        const WALL_YAW: f32 = std::f32::consts::PI / 2.5;

        let mut items = Vec::new();
        let mut push = |slug: &str, title: &str, pos: [f32; 3], yaw: f32, video: Option<&str>| {
            items.push(GalleryItem {
                slug: slug.to_string(),
                image: format!("images/{slug}.jpg"),
                title: title.to_string(),
                subtitle: String::new(),
                year: "2024".to_string(),
                tags: Vec::new(),
                video: video.map(str::to_string),
                position: pos,
                yaw,
            });
        };

        // Front hero
        push("smart-wing", "Inflatable Smart Wing", [0.0, 0.0, 1.5], 0.0, None);
        // Back row
        push("lattices", "Ballistic 3D Lattices", [-0.8, 0.0, -0.6], 0.0, None);
        push("retail-media", "Inside e-Retail Media", [0.8, 0.0, -0.6], 0.0, Some("videos/akira.mp4"));
        // Left wall
        push("seo-consulting", "SEO / SEA Consulting", [-1.75, 0.0, 0.25], WALL_YAW, None);
        push("hive-robotics", "Hive Robotics", [-2.15, 0.0, 1.5], WALL_YAW, None);
        push("alexandrie", "Alexandrie Circle", [-2.0, 0.0, 2.75], WALL_YAW, None);
        // Right wall
        push("ungae", "UNGAE & NGOs", [1.75, 0.0, 0.25], -WALL_YAW, None);
        push("youtube", "Educational Content", [2.15, 0.0, 1.5], -WALL_YAW, None);
        push("worldbuilding", "Warhammer Worldbuilding", [2.0, 0.0, 2.75], -WALL_YAW, None);

        Self {
            items,
            popup_images: (0..8).map(|i| format!("gifs/popup-{i}.gif")).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_is_valid() {
        let config = GalleryConfig::sample();
        config.validate().unwrap();
        assert_eq!(config.len(), 9);
        assert!(!config.popup_images.is_empty());
    }

    #[test]
    fn test_slug_lookup() {
        let config = GalleryConfig::sample();
        let id = config.find_by_slug("retail-media").unwrap();
        let item = config.get(id).unwrap();
        assert!(item.video.is_some());
        assert!(config.find_by_slug("nope").is_none());
        assert!(config.get(ItemId(999)).is_none());
    }

    #[test]
    fn test_duplicate_slug_rejected() {
        let mut config = GalleryConfig::sample();
        let dup = config.items[0].clone();
        config.items.push(dup);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateSlug(_))
        ));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = GalleryConfig::sample();
        let json = serde_json::to_string(&config).unwrap();
        let back = GalleryConfig::from_json(&json).unwrap();
        assert_eq!(back.len(), config.len());
        assert_eq!(back.items[0].slug, config.items[0].slug);
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(
            GalleryConfig::from_json(r#"{"items":[]}"#),
            Err(ConfigError::Empty)
        ));
    }
}
