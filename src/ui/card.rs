// Inspiration card: rounded image frame with the artist handle and tag underneath
// Images load asynchronously; the placeholder stays until a texture arrives

use gdk4::Texture;
use glib::Object;
use gtk4::prelude::*;
use gtk4::subclass::prelude::*;
use gtk4::{
    gdk, glib, Align, Box as GtkBox, ContentFit, GestureClick, Image, Label, Orientation, Overflow,
    Overlay, Picture,
};
use std::cell::{Cell, RefCell};
use std::num::NonZeroUsize;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use tracing::{debug, warn};

use crate::config::FeedConfig;
use crate::image_loader::{DecodedImage, FetchConfig, FetchResult, ImageFetcher};
use crate::models::{InspoPost, PostId};
use crate::ui::load_tracker::{LoadRequest, LoadSlot, LoadTracker};
use crate::ui::theme;

const CARD_TEXTURE_CACHE: usize = 256;

// Flat placeholder, generated once
fn placeholder_texture() -> &'static Texture {
    static PLACEHOLDER: OnceLock<Texture> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        let width = 16;
        let height = 16;
        let pixels: Vec<u8> = theme::PLACEHOLDER_RGBA
            .iter()
            .copied()
            .cycle()
            .take(width * height * 4)
            .collect();

        let bytes = glib::Bytes::from_owned(pixels);
        gdk::MemoryTexture::new(
            width as i32,
            height as i32,
            gdk::MemoryFormat::R8g8b8a8,
            &bytes,
            width * 4,
        )
        .upcast()
    })
}

/// Whole-pixel frame size. Width rounds down so a row of columns never overflows its container.
fn frame_size(width: f32, height: f32) -> (i32, i32) {
    let clamp = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
    (clamp(width).floor() as i32, clamp(height).round() as i32)
}

fn texture_from_image(image: DecodedImage) -> Option<Texture> {
    if image.width == 0 || image.height == 0 {
        return None;
    }
    let expected = (image.width as usize)
        .saturating_mul(image.height as usize)
        .saturating_mul(4);
    if image.rgba.len() < expected {
        return None;
    }
    let bytes = glib::Bytes::from_owned(image.rgba);
    let texture = gdk::MemoryTexture::new(
        image.width as i32,
        image.height as i32,
        gdk::MemoryFormat::R8g8b8a8,
        &bytes,
        (image.width * 4) as usize,
    );
    Some(texture.upcast())
}

static NEXT_LOAD_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Main-thread side of the image pipeline.
///
/// Deduplicates requests per URL, caches finished textures and hands them to
/// every card still waiting with a matching load token.
pub struct CardImageLoader {
    fetcher: Option<ImageFetcher>,
    loads: RefCell<LoadTracker<glib::WeakRef<InspoCard>, Texture>>,
}

impl CardImageLoader {
    pub fn new(config: &FeedConfig) -> Rc<Self> {
        let fetcher = match ImageFetcher::spawn(FetchConfig::from(config)) {
            Ok(fetcher) => Some(fetcher),
            Err(err) => {
                warn!(error = ?err, "Image fetcher unavailable, cards keep placeholders");
                None
            }
        };

        let capacity = NonZeroUsize::new(CARD_TEXTURE_CACHE).unwrap_or(NonZeroUsize::MIN);
        let loader = Rc::new(Self {
            fetcher,
            loads: RefCell::new(LoadTracker::new(capacity)),
        });

        if let Some(results) = loader.fetcher.as_ref().map(ImageFetcher::results) {
            let loader_weak = Rc::downgrade(&loader);
            glib::spawn_future_local(async move {
                while let Ok(result) = results.recv().await {
                    let Some(loader) = loader_weak.upgrade() else {
                        break;
                    };
                    loader.deliver(result);
                }
            });
        }

        loader
    }

    fn request(&self, card: &InspoCard, url: &str, token: u64) {
        let Some(fetcher) = self.fetcher.as_ref() else {
            return;
        };

        let mut loads = self.loads.borrow_mut();
        match loads.request(url, card.downgrade(), token) {
            LoadRequest::Cached(texture) => {
                let card_weak = card.downgrade();
                let url = url.to_string();
                glib::idle_add_local_once(move || {
                    if let Some(card) = card_weak.upgrade() {
                        card.apply_texture(token, &url, Some(&texture));
                    }
                });
            }
            LoadRequest::Fetch => {
                if !fetcher.request(url) {
                    debug!(url, "Image queue full, keeping placeholder");
                    loads.abandon(url);
                }
            }
            LoadRequest::Waiting => {}
        }
    }

    fn deliver(&self, result: FetchResult) {
        let texture = result.image.and_then(texture_from_image);
        let waiters = self
            .loads
            .borrow_mut()
            .complete(&result.url, texture.clone());

        for (card, token) in waiters {
            if let Some(card) = card.upgrade() {
                card.apply_texture(token, &result.url, texture.as_ref());
            }
        }
    }
}

mod imp {
    use super::*;

    pub struct CardParts {
        pub frame: Overlay,
        pub picture: Picture,
        pub placeholder_icon: Image,
        pub handle: Label,
        pub tag: Label,
    }

    #[derive(Default)]
    pub struct InspoCardInner {
        pub parts: RefCell<Option<CardParts>>,
        pub post_id: Cell<Option<PostId>>,
        pub load: RefCell<LoadSlot>,
        pub on_activated: RefCell<Option<Rc<dyn Fn(PostId)>>>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for InspoCardInner {
        const NAME: &'static str = "KhoiInspoCard";
        type Type = super::InspoCard;
        type ParentType = GtkBox;
    }

    impl ObjectImpl for InspoCardInner {
        fn constructed(&self) {
            self.parent_constructed();

            let obj = self.obj();
            obj.set_orientation(Orientation::Vertical);
            obj.set_spacing(theme::px(theme::SPACING_SM));
            obj.set_halign(Align::Fill);
            obj.set_valign(Align::Start);
            obj.add_css_class("inspo-card");

            let picture = Picture::new();
            picture.set_can_shrink(true);
            picture.set_content_fit(ContentFit::Cover);
            picture.set_paintable(Some(placeholder_texture()));

            let placeholder_icon = Image::from_icon_name("image-x-generic-symbolic");
            placeholder_icon.set_pixel_size(32);
            placeholder_icon.set_halign(Align::Center);
            placeholder_icon.set_valign(Align::Center);
            placeholder_icon.add_css_class("card-placeholder-icon");

            let frame = Overlay::new();
            frame.set_child(Some(&picture));
            frame.add_overlay(&placeholder_icon);
            frame.set_overflow(Overflow::Hidden);
            frame.add_css_class("card-image");

            let handle = Label::new(None);
            handle.set_xalign(0.0);
            handle.set_ellipsize(gtk4::pango::EllipsizeMode::End);
            handle.add_css_class("card-handle");

            let tag = Label::new(None);
            tag.set_xalign(0.0);
            tag.set_ellipsize(gtk4::pango::EllipsizeMode::End);
            tag.add_css_class("card-tag");

            let caption = GtkBox::new(Orientation::Vertical, 2);
            caption.append(&handle);
            caption.append(&tag);

            obj.append(&frame);
            obj.append(&caption);

            let card_weak = obj.downgrade();
            let click = GestureClick::new();
            click.set_button(1);
            click.connect_released(move |_, _n, _x, _y| {
                if let Some(card) = card_weak.upgrade() {
                    card.emit_activated();
                }
            });
            obj.add_controller(click);

            self.parts.replace(Some(CardParts {
                frame,
                picture,
                placeholder_icon,
                handle,
                tag,
            }));
        }
    }

    impl WidgetImpl for InspoCardInner {}
    impl BoxImpl for InspoCardInner {}
}

glib::wrapper! {
    pub struct InspoCard(ObjectSubclass<imp::InspoCardInner>)
        @extends GtkBox, gtk4::Widget,
        @implements gtk4::Accessible, gtk4::Buildable, gtk4::ConstraintTarget, gtk4::Orientable;
}

impl InspoCard {
    pub fn new() -> Self {
        Object::builder().build()
    }

    /// Shows `post` with an image frame of `width` x `height`, as laid out by the masonry pass.
    ///
    /// Rebinding the same post only resizes; the image is not requested again.
    pub fn bind(&self, post: &InspoPost, width: f32, height: f32, loader: &Rc<CardImageLoader>) {
        let imp = self.imp();
        let parts = imp.parts.borrow();
        let Some(parts) = parts.as_ref() else {
            return;
        };

        let (width, height) = frame_size(width, height);
        parts.frame.set_size_request(width, height);
        parts.picture.set_size_request(width, height);

        let same_post = imp.post_id.get() == Some(post.id)
            && imp.load.borrow().url() == post.image_url.as_deref();
        if same_post {
            return;
        }

        imp.post_id.set(Some(post.id));
        parts.handle.set_text(&post.artist_handle);
        parts.tag.set_text(&post.tag);
        parts.picture.set_paintable(Some(placeholder_texture()));
        parts.placeholder_icon.set_visible(true);

        let token = NEXT_LOAD_TOKEN.fetch_add(1, Ordering::Relaxed);
        imp.load.borrow_mut().begin(post.image_url.as_deref(), token);
        if let Some(url) = post.image_url.as_deref() {
            loader.request(self, url, token);
        }
    }

    pub fn connect_activated<F>(&self, callback: F)
    where
        F: Fn(PostId) + 'static,
    {
        *self.imp().on_activated.borrow_mut() = Some(Rc::new(callback));
    }

    fn apply_texture(&self, token: u64, expected_url: &str, texture: Option<&Texture>) {
        let Some(texture) = texture else {
            return;
        };
        let imp = self.imp();
        if !imp.load.borrow().accepts(token, expected_url) {
            return;
        }
        if let Some(parts) = imp.parts.borrow().as_ref() {
            parts.picture.set_paintable(Some(texture));
            parts.placeholder_icon.set_visible(false);
        }
    }

    fn emit_activated(&self) {
        let imp = self.imp();
        let Some(id) = imp.post_id.get() else {
            return;
        };
        let callback = imp.on_activated.borrow().clone();
        if let Some(callback) = callback {
            callback(id);
        }
    }
}

impl Default for InspoCard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_from_image_rejects_bad_buffers() {
        let empty = DecodedImage {
            rgba: Vec::new(),
            width: 0,
            height: 4,
        };
        assert!(texture_from_image(empty).is_none());

        let short = DecodedImage {
            rgba: vec![0; 8],
            width: 4,
            height: 4,
        };
        assert!(texture_from_image(short).is_none());
    }

    #[test]
    fn test_frame_size_follows_layout() {
        assert_eq!(frame_size(150.0, 280.0), (150, 280));
        assert_eq!(frame_size(165.5, 240.4), (165, 240));
        assert_eq!(frame_size(0.0, 300.0), (0, 300));
        assert_eq!(frame_size(f32::NAN, -5.0), (0, 0));
    }
}
