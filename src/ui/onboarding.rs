// Onboarding screen: wordmark, tagline and the two sign-in buttons over an optional photo

use gtk4::prelude::*;
use gtk4::{Align, Box as GtkBox, Button, ContentFit, Label, Orientation, Overlay, Picture};
use std::path::Path;
use std::rc::Rc;
use tracing::debug;

use super::theme;
use crate::state::{Action, SignInProvider, Store};

const BACKGROUND_ASSET: &str = "background.png";

pub struct OnboardingView {
    root: Overlay,
}

impl OnboardingView {
    pub fn new(store: &Rc<Store>, asset_dir: Option<&Path>) -> Self {
        let root = Overlay::new();
        root.add_css_class("onboarding");

        let background = Picture::new();
        background.set_content_fit(ContentFit::Cover);
        background.set_can_shrink(true);
        if let Some(path) = asset_dir.map(|dir| dir.join(BACKGROUND_ASSET)) {
            if path.is_file() {
                background.set_filename(Some(&path));
            } else {
                debug!(?path, "No onboarding background");
            }
        }
        root.set_child(Some(&background));

        let content = GtkBox::new(Orientation::Vertical, theme::px(theme::SPACING_MD));
        content.set_margin_start(theme::px(theme::SPACING_XL));
        content.set_margin_end(theme::px(theme::SPACING_XL));
        content.set_margin_top(theme::px(theme::SPACING_XXL));
        content.set_margin_bottom(theme::px(theme::SPACING_XXL));

        let logo = Label::new(Some("KHOI"));
        logo.add_css_class("logo");
        logo.set_margin_top(theme::px(theme::SPACING_XXL));

        let tagline = Label::new(Some("where beauty finds you."));
        tagline.add_css_class("tagline");

        let spacer = GtkBox::new(Orientation::Vertical, 0);
        spacer.set_vexpand(true);

        content.append(&logo);
        content.append(&tagline);
        content.append(&spacer);
        for provider in [SignInProvider::Apple, SignInProvider::Google] {
            content.append(&sign_in_button(store, provider));
        }

        content.set_valign(Align::Fill);
        root.add_overlay(&content);

        Self { root }
    }

    pub fn widget(&self) -> &Overlay {
        &self.root
    }
}

fn sign_in_button(store: &Rc<Store>, provider: SignInProvider) -> Button {
    let button = Button::with_label(provider.button_label());
    button.add_css_class("btn-signin");
    button.add_css_class(match provider {
        SignInProvider::Apple => "btn-apple",
        SignInProvider::Google => "btn-google",
    });

    let store_weak = Rc::downgrade(store);
    button.connect_clicked(move |_| {
        if let Some(store) = store_weak.upgrade() {
            store.dispatch(Action::CompleteOnboarding(provider));
        }
    });
    button
}
