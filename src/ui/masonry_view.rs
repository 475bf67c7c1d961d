// Scrollable masonry feed
// Columns are plain vertical boxes; cards are reused by item index across relayouts

use gtk4::prelude::*;
use gtk4::{glib, Align, Box as GtkBox, Orientation, PolicyType, ScrolledWindow};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;
use tracing::{debug, warn};

use super::card::{CardImageLoader, InspoCard};
use super::theme;
use crate::config::FeedConfig;
use crate::layout::CachedMasonryComputer;
use crate::models::{InspoPost, MasonryModel, PostId};

const RESIZE_DEBOUNCE: Duration = Duration::from_millis(80);

type ActivatedCallback = Rc<RefCell<Option<Box<dyn Fn(PostId)>>>>;

pub struct MasonryView {
    self_weak: RefCell<Weak<Self>>,
    scrolled_window: ScrolledWindow,
    columns_box: GtkBox,
    column_boxes: RefCell<Vec<GtkBox>>,
    computer: CachedMasonryComputer,
    posts: RefCell<Vec<InspoPost>>,
    cards: RefCell<Vec<InspoCard>>,
    /// Column per card from the last layout pass, used to skip reparenting.
    assignment: RefCell<Vec<u32>>,
    loader: Rc<CardImageLoader>,
    last_layout_width: Cell<i32>,
    relayout_pending: Cell<bool>,
    on_post_activated: ActivatedCallback,
}

impl MasonryView {
    pub fn new(config: &FeedConfig, loader: Rc<CardImageLoader>) -> Rc<Self> {
        let columns_box = GtkBox::new(Orientation::Horizontal, theme::px(config.spacing));
        columns_box.set_halign(Align::Start);
        columns_box.set_valign(Align::Start);
        columns_box.set_margin_start(theme::px(config.horizontal_inset));
        columns_box.set_margin_end(theme::px(config.horizontal_inset));
        columns_box.set_margin_top(theme::px(config.vertical_inset));
        columns_box.set_margin_bottom(theme::px(config.vertical_inset));
        columns_box.add_css_class("masonry");

        let scrolled_window = ScrolledWindow::builder()
            // External: the cards' width requests must not pin the window's minimum width.
            .hscrollbar_policy(PolicyType::External)
            .vscrollbar_policy(PolicyType::Automatic)
            .kinetic_scrolling(true)
            .propagate_natural_width(false)
            .propagate_natural_height(false)
            .child(&columns_box)
            .build();
        scrolled_window.set_min_content_width(0);
        scrolled_window.set_hexpand(true);
        scrolled_window.set_vexpand(true);

        let view = Rc::new(Self {
            self_weak: RefCell::new(Weak::new()),
            scrolled_window,
            columns_box,
            column_boxes: RefCell::new(Vec::new()),
            computer: CachedMasonryComputer::with_layout(config.masonry_layout()),
            posts: RefCell::new(Vec::new()),
            cards: RefCell::new(Vec::new()),
            assignment: RefCell::new(Vec::new()),
            loader,
            last_layout_width: Cell::new(0),
            relayout_pending: Cell::new(false),
            on_post_activated: Rc::new(RefCell::new(None)),
        });
        *view.self_weak.borrow_mut() = Rc::downgrade(&view);
        view.setup_resize_observer();
        view
    }

    pub fn widget(&self) -> &ScrolledWindow {
        &self.scrolled_window
    }

    /// Replaces the feed. Unchanged lists keep their cards and images.
    pub fn set_posts(&self, posts: &[InspoPost]) {
        if self.posts.borrow().as_slice() == posts {
            return;
        }
        *self.posts.borrow_mut() = posts.to_vec();
        self.relayout();
    }

    pub fn connect_post_activated<F>(&self, callback: F)
    where
        F: Fn(PostId) + 'static,
    {
        *self.on_post_activated.borrow_mut() = Some(Box::new(callback));
    }

    /// Width available to the layout, excluding a visible vertical scrollbar.
    /// Insets are subtracted by the layout itself.
    pub fn content_width(&self) -> f32 {
        let mut width = self.scrolled_window.width() as f32;
        if !width.is_finite() || width <= 0.0 {
            return 0.0;
        }

        let vscrollbar = self.scrolled_window.vscrollbar();
        if vscrollbar.is_visible() && !self.scrolled_window.is_overlay_scrolling() {
            width = (width - vscrollbar.width() as f32).max(0.0);
        }
        width
    }

    fn setup_resize_observer(&self) {
        let weak_self = self.self_weak.borrow().clone();
        self.scrolled_window.add_tick_callback(move |_widget, _clock| {
            let Some(view) = weak_self.upgrade() else {
                return glib::ControlFlow::Break;
            };
            let width = view.content_width().round() as i32;
            if width > 0 && width != view.last_layout_width.get() {
                view.last_layout_width.set(width);
                view.schedule_relayout_debounced(RESIZE_DEBOUNCE);
            }
            glib::ControlFlow::Continue
        });
    }

    fn schedule_relayout_debounced(&self, delay: Duration) {
        if self.relayout_pending.replace(true) {
            return;
        }
        let weak_self = self.self_weak.borrow().clone();
        glib::timeout_add_local(delay, move || {
            if let Some(view) = weak_self.upgrade() {
                view.relayout_pending.set(false);
                view.relayout();
            }
            glib::ControlFlow::Break
        });
    }

    fn relayout(&self) {
        let width = self.content_width();
        if width <= 0.0 {
            // Not allocated yet; the resize observer picks it up.
            return;
        }

        let posts = self.posts.borrow();
        let model = match self.computer.compute(posts.as_slice(), width) {
            Ok(model) => model,
            Err(err) => {
                warn!(error = %err, "Masonry layout failed");
                return;
            }
        };
        debug!(
            width,
            column_width = model.column_width,
            items = model.item_count(),
            height = model.content_height(),
            "Masonry relayout"
        );

        self.ensure_columns(model.columns.len());
        self.ensure_cards(posts.len());
        self.place_cards(&model);

        let column_width = model.column_width.floor().max(0.0) as i32;
        for column in self.column_boxes.borrow().iter() {
            column.set_size_request(column_width, -1);
        }

        let cards = self.cards.borrow();
        for column in &model.columns {
            for item in &column.items {
                if let (Some(post), Some(card)) = (posts.get(item.item_index), cards.get(item.item_index)) {
                    card.bind(post, item.display_w, item.display_h, &self.loader);
                }
            }
        }
    }

    fn ensure_columns(&self, count: usize) {
        let mut column_boxes = self.column_boxes.borrow_mut();
        if column_boxes.len() == count {
            return;
        }

        for column in column_boxes.drain(..) {
            self.columns_box.remove(&column);
        }
        self.assignment.borrow_mut().clear();

        let spacing = theme::px(self.computer.layout.spacing);
        for _ in 0..count {
            let column = GtkBox::new(Orientation::Vertical, spacing);
            column.set_valign(Align::Start);
            self.columns_box.append(&column);
            column_boxes.push(column);
        }
    }

    fn ensure_cards(&self, count: usize) {
        let mut cards = self.cards.borrow_mut();
        while cards.len() < count {
            let card = InspoCard::new();
            let on_post_activated = self.on_post_activated.clone();
            card.connect_activated(move |id| {
                if let Some(ref callback) = *on_post_activated.borrow() {
                    callback(id);
                }
            });
            cards.push(card);
        }

        // Cards past the end of a shorter list are detached and kept for reuse.
        for card in cards.iter().skip(count) {
            if let Some(parent) = card.parent().and_downcast::<GtkBox>() {
                parent.remove(card);
            }
        }
    }

    fn place_cards(&self, model: &MasonryModel) {
        let assignment: Vec<u32> = model.placements().iter().map(|p| p.column_index).collect();
        if *self.assignment.borrow() == assignment {
            return;
        }

        let cards = self.cards.borrow();
        let column_boxes = self.column_boxes.borrow();
        for card in cards.iter().take(assignment.len()) {
            if let Some(parent) = card.parent().and_downcast::<GtkBox>() {
                parent.remove(card);
            }
        }
        for column in &model.columns {
            let Some(column_box) = column_boxes.get(column.column_index as usize) else {
                continue;
            };
            for item in &column.items {
                if let Some(card) = cards.get(item.item_index) {
                    column_box.append(card);
                }
            }
        }

        *self.assignment.borrow_mut() = assignment;
    }
}
