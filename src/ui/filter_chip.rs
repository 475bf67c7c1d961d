use gtk4::prelude::*;
use gtk4::Button;

use crate::models::ServiceCategory;

/// Pill button for one service category.
pub struct FilterChip {
    category: ServiceCategory,
    button: Button,
}

impl FilterChip {
    pub fn new(category: ServiceCategory) -> Self {
        let button = Button::with_label(category.label());
        button.add_css_class("filter-chip");
        button.set_focus_on_click(false);
        Self { category, button }
    }

    pub fn category(&self) -> ServiceCategory {
        self.category
    }

    pub fn widget(&self) -> &Button {
        &self.button
    }

    pub fn set_selected(&self, selected: bool) {
        if selected {
            self.button.add_css_class("selected");
        } else {
            self.button.remove_css_class("selected");
        }
    }

    pub fn connect_clicked<F>(&self, callback: F)
    where
        F: Fn(ServiceCategory) + 'static,
    {
        let category = self.category;
        self.button.connect_clicked(move |_| callback(category));
    }
}
