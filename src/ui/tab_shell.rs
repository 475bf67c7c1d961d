use gtk4::prelude::*;
use gtk4::{
    Align, Box as GtkBox, Button, Image, Label, Orientation, Stack, StackTransitionType,
};
use std::rc::Rc;

use super::card::CardImageLoader;
use super::home::HomeView;
use super::theme;
use crate::config::FeedConfig;
use crate::models::Tab;
use crate::state::{Action, AppState, Store};

/// Page stack with the bottom tab bar.
pub struct TabShell {
    root: GtkBox,
    pages: Stack,
    tab_buttons: Vec<(Tab, Button)>,
    home: HomeView,
}

impl TabShell {
    pub fn new(store: &Rc<Store>, config: &FeedConfig, loader: Rc<CardImageLoader>) -> Self {
        let pages = Stack::new();
        pages.set_transition_type(StackTransitionType::Crossfade);
        pages.set_vexpand(true);

        let home = HomeView::new(store, config, loader);
        pages.add_named(home.widget(), Some(Tab::Home.page_name()));
        for tab in Tab::ALL {
            if let Some(text) = tab.placeholder_text() {
                pages.add_named(&placeholder_page(tab, text), Some(tab.page_name()));
            }
        }

        let tab_bar = GtkBox::new(Orientation::Horizontal, 0);
        tab_bar.set_homogeneous(true);
        tab_bar.add_css_class("tab-bar");

        let tab_buttons: Vec<(Tab, Button)> = Tab::ALL
            .into_iter()
            .map(|tab| {
                let button = tab_button(tab);
                let store_weak = Rc::downgrade(store);
                button.connect_clicked(move |_| {
                    if let Some(store) = store_weak.upgrade() {
                        store.dispatch(Action::SelectTab(tab));
                    }
                });
                tab_bar.append(&button);
                (tab, button)
            })
            .collect();

        let root = GtkBox::new(Orientation::Vertical, 0);
        root.append(&pages);
        root.append(&tab_bar);

        let shell = Self {
            root,
            pages,
            tab_buttons,
            home,
        };
        store.with_state(|state| shell.sync(state));
        shell
    }

    pub fn widget(&self) -> &GtkBox {
        &self.root
    }

    pub fn sync(&self, state: &AppState) {
        self.pages
            .set_visible_child_name(state.selected_tab.page_name());
        for (tab, button) in &self.tab_buttons {
            if *tab == state.selected_tab {
                button.add_css_class("tab-active");
            } else {
                button.remove_css_class("tab-active");
            }
        }
        self.home.sync(state);
    }
}

fn tab_button(tab: Tab) -> Button {
    let content = GtkBox::new(Orientation::Vertical, theme::px(theme::SPACING_XS));
    let icon = Image::from_icon_name(tab.icon_name());
    icon.set_pixel_size(22);
    content.append(&icon);
    content.append(&Label::new(Some(tab.label())));

    let button = Button::new();
    button.set_child(Some(&content));
    button.add_css_class("tab-button");
    button.set_tooltip_text(Some(tab.label()));
    button
}

fn placeholder_page(tab: Tab, text: &str) -> GtkBox {
    let page = GtkBox::new(Orientation::Vertical, theme::px(theme::SPACING_LG));
    page.set_margin_start(theme::px(theme::SPACING_LG));
    page.set_margin_end(theme::px(theme::SPACING_LG));
    page.set_margin_top(theme::px(theme::SPACING_XL));

    let title = Label::new(Some(tab.title()));
    title.add_css_class("page-title");
    title.set_halign(Align::Start);

    let body = Label::new(Some(text));
    body.add_css_class("placeholder-text");
    body.set_halign(Align::Center);
    body.set_valign(Align::Center);
    body.set_vexpand(true);

    page.append(&title);
    page.append(&body);
    page
}
