/// Service categories offered as filter chips on the home tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ServiceCategory {
    #[default]
    All,
    Makeup,
    Hair,
    Nails,
    Lashes,
    Skin,
}

impl ServiceCategory {
    pub const ALL: [ServiceCategory; 6] = [
        Self::All,
        Self::Makeup,
        Self::Hair,
        Self::Nails,
        Self::Lashes,
        Self::Skin,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Makeup => "Makeup",
            Self::Hair => "Hair",
            Self::Nails => "Nails",
            Self::Lashes => "Lashes",
            Self::Skin => "Skin",
        }
    }
}

/// Tabs of the navigation shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Home,
    Explore,
    Chats,
    Profile,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Self::Home, Self::Explore, Self::Chats, Self::Profile];

    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Explore => "Explore",
            Self::Chats => "Chats",
            Self::Profile => "Profile",
        }
    }

    pub fn icon_name(self) -> &'static str {
        match self {
            Self::Home => "go-home-symbolic",
            Self::Explore => "view-grid-symbolic",
            Self::Chats => "mail-unread-symbolic",
            Self::Profile => "avatar-default-symbolic",
        }
    }

    /// Page title shown above the tab content.
    pub fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Explore => "Explore",
            Self::Chats => "Messages",
            Self::Profile => "Profile",
        }
    }

    /// Body copy for tabs that have no content yet.
    pub fn placeholder_text(self) -> Option<&'static str> {
        match self {
            Self::Home => None,
            Self::Explore => Some("Browse/Explore"),
            Self::Chats => Some("Chats"),
            Self::Profile => Some("Profile & Appointments"),
        }
    }

    /// Stack child name for this tab's page.
    pub fn page_name(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Explore => "explore",
            Self::Chats => "chats",
            Self::Profile => "profile",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_labels() {
        let labels: Vec<&str> = ServiceCategory::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(labels, ["All", "Makeup", "Hair", "Nails", "Lashes", "Skin"]);
    }

    #[test]
    fn test_only_home_has_content() {
        for tab in Tab::ALL {
            assert_eq!(tab.placeholder_text().is_none(), tab == Tab::Home);
        }
        assert_eq!(Tab::Chats.title(), "Messages");
    }
}
