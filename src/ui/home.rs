// Home tab: category chips, DISCOVER header, masonry feed

use gtk4::prelude::*;
use gtk4::{Align, Box as GtkBox, Image, Label, Orientation, PolicyType, ScrolledWindow};
use std::rc::Rc;

use super::card::CardImageLoader;
use super::filter_chip::FilterChip;
use super::masonry_view::MasonryView;
use super::theme;
use crate::config::FeedConfig;
use crate::models::ServiceCategory;
use crate::state::{Action, AppState, Store};

pub struct HomeView {
    root: GtkBox,
    chips: Vec<FilterChip>,
    masonry: Rc<MasonryView>,
}

impl HomeView {
    pub fn new(store: &Rc<Store>, config: &FeedConfig, loader: Rc<CardImageLoader>) -> Self {
        let root = GtkBox::new(Orientation::Vertical, 0);
        root.add_css_class("home");

        let chip_row = GtkBox::new(Orientation::Horizontal, theme::px(theme::SPACING_SM));
        chip_row.set_margin_start(theme::px(theme::SPACING_LG));
        chip_row.set_margin_end(theme::px(theme::SPACING_LG));
        chip_row.set_margin_top(theme::px(theme::SPACING_MD));
        chip_row.set_margin_bottom(theme::px(theme::SPACING_SM));

        let chips: Vec<FilterChip> = ServiceCategory::ALL
            .into_iter()
            .map(|category| {
                let chip = FilterChip::new(category);
                let store_weak = Rc::downgrade(store);
                chip.connect_clicked(move |category| {
                    if let Some(store) = store_weak.upgrade() {
                        store.dispatch(Action::SelectCategory(category));
                    }
                });
                chip_row.append(chip.widget());
                chip
            })
            .collect();

        let chip_scroller = ScrolledWindow::builder()
            .hscrollbar_policy(PolicyType::External)
            .vscrollbar_policy(PolicyType::Never)
            .child(&chip_row)
            .build();

        let header = GtkBox::new(Orientation::Horizontal, theme::px(theme::SPACING_SM));
        header.set_margin_start(theme::px(theme::SPACING_LG));
        header.set_margin_end(theme::px(theme::SPACING_LG));
        header.set_margin_top(theme::px(theme::SPACING_SM));
        let title = Label::new(Some("DISCOVER"));
        title.add_css_class("discover-header");
        title.set_halign(Align::Start);
        title.set_hexpand(true);
        let globe = Image::from_icon_name("web-browser-symbolic");
        globe.add_css_class("discover-header");
        header.append(&title);
        header.append(&globe);

        let masonry = MasonryView::new(config, loader);
        let masonry_store = Rc::downgrade(store);
        masonry.connect_post_activated(move |id| {
            if let Some(store) = masonry_store.upgrade() {
                store.dispatch(Action::ActivatePost(id));
            }
        });

        root.append(&chip_scroller);
        root.append(&header);
        root.append(masonry.widget());

        let view = Self {
            root,
            chips,
            masonry,
        };
        store.with_state(|state| view.sync(state));
        view
    }

    pub fn widget(&self) -> &GtkBox {
        &self.root
    }

    pub fn sync(&self, state: &AppState) {
        for chip in &self.chips {
            chip.set_selected(chip.category() == state.selected_category);
        }
        self.masonry.set_posts(state.filtered_posts());
    }
}
