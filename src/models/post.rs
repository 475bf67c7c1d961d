use crate::layout::MasonryItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PostId(pub u64);

/// One inspiration card in the home feed.
#[derive(Debug, Clone, PartialEq)]
pub struct InspoPost {
    pub id: PostId,
    /// Design-time height of the image area in pixels.
    pub image_height: f32,
    pub image_url: Option<String>,
    pub artist_name: String,
    pub artist_handle: String,
    pub tag: String,
}

impl InspoPost {
    pub fn new(id: u64, image_height: f32, artist_name: &str, artist_handle: &str, tag: &str) -> Self {
        Self {
            id: PostId(id),
            image_height,
            image_url: None,
            artist_name: artist_name.to_string(),
            artist_handle: artist_handle.to_string(),
            tag: tag.to_string(),
        }
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// The bundled feed shown on the home tab.
    pub fn samples() -> Vec<InspoPost> {
        vec![
            InspoPost::new(1, 280.0, "Jasmine Li", "@mua_jas", "Soft glam"),
            InspoPost::new(2, 320.0, "Maya Chen", "@mayabeauty", "Bridal"),
            InspoPost::new(3, 240.0, "Sofia Martinez", "@sofiaglam", "Full beat"),
            InspoPost::new(4, 300.0, "Aisha Williams", "@aisha_mua", "Natural"),
            InspoPost::new(5, 260.0, "Emma Thompson", "@emmaartistry", "Editorial"),
            InspoPost::new(6, 340.0, "Priya Patel", "@priya_beauty", "Glam"),
            InspoPost::new(7, 220.0, "Luna Rodriguez", "@luna_makeup", "Dewy skin"),
            InspoPost::new(8, 290.0, "Zara Kim", "@zara_mua", "Bold lips"),
            InspoPost::new(9, 310.0, "Chloe Davis", "@chloebeauty", "Soft glam"),
            InspoPost::new(10, 270.0, "Nadia Ali", "@nadia_artistry", "Bridal"),
        ]
    }
}

impl MasonryItem for InspoPost {
    fn layout_id(&self) -> u64 {
        self.id.0
    }

    fn display_height(&self) -> f32 {
        self.image_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_samples_have_unique_ids() {
        let posts = InspoPost::samples();
        let ids: HashSet<PostId> = posts.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), posts.len());
        assert_eq!(posts.len(), 10);
    }

    #[test]
    fn test_samples_have_no_image_urls() {
        assert!(InspoPost::samples().iter().all(|p| p.image_url.is_none()));
    }

    #[test]
    fn test_display_height_is_design_height() {
        let post = InspoPost::new(42, 333.0, "A", "@a", "Glam");
        assert_eq!(post.display_height(), 333.0);
        assert_eq!(post.layout_id(), 42);
    }
}
