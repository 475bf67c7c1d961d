//! Application state with a single owner.
//!
//! Views never mutate state directly. They dispatch an [`Action`], the store runs
//! [`reduce`], and subscribers are notified when something actually changed.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info};

use crate::models::{InspoPost, PostId, ServiceCategory, Tab};

/// Which sign-in button finished onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignInProvider {
    Apple,
    Google,
}

impl SignInProvider {
    pub fn button_label(self) -> &'static str {
        match self {
            Self::Apple => "Continue with Apple",
            Self::Google => "Continue with Google",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    CompleteOnboarding(SignInProvider),
    SelectTab(Tab),
    SelectCategory(ServiceCategory),
    ActivatePost(PostId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub onboarding_complete: bool,
    pub selected_tab: Tab,
    pub selected_category: ServiceCategory,
    pub posts: Vec<InspoPost>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_posts(InspoPost::samples())
    }
}

impl AppState {
    pub fn with_posts(posts: Vec<InspoPost>) -> Self {
        Self {
            onboarding_complete: false,
            selected_tab: Tab::default(),
            selected_category: ServiceCategory::default(),
            posts,
        }
    }

    /// Posts shown in the home feed.
    ///
    /// The selected category is not applied yet; every category shows the full list.
    pub fn filtered_posts(&self) -> &[InspoPost] {
        &self.posts
    }
}

/// Applies `action` to `state`. Returns true when the state changed.
pub fn reduce(state: &mut AppState, action: Action) -> bool {
    match action {
        Action::CompleteOnboarding(provider) => {
            if state.onboarding_complete {
                return false;
            }
            info!(?provider, "Onboarding complete");
            state.onboarding_complete = true;
            true
        }
        Action::SelectTab(tab) => {
            if state.selected_tab == tab {
                return false;
            }
            state.selected_tab = tab;
            true
        }
        Action::SelectCategory(category) => {
            if state.selected_category == category {
                return false;
            }
            state.selected_category = category;
            true
        }
        Action::ActivatePost(id) => {
            debug!(post = id.0, "Post activated");
            false
        }
    }
}

type Listener = Rc<dyn Fn(&AppState)>;

/// Owner of [`AppState`]. Lives on the GTK main thread.
pub struct Store {
    state: RefCell<AppState>,
    listeners: RefCell<Vec<Listener>>,
}

impl Store {
    pub fn new(state: AppState) -> Rc<Self> {
        Rc::new(Self {
            state: RefCell::new(state),
            listeners: RefCell::new(Vec::new()),
        })
    }

    /// Runs `f` against the current state.
    pub fn with_state<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.state.borrow())
    }

    pub fn snapshot(&self) -> AppState {
        self.state.borrow().clone()
    }

    /// Registers a listener called after every state change.
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&AppState) + 'static,
    {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    pub fn dispatch(&self, action: Action) {
        debug!(?action, "Dispatch");
        let changed = reduce(&mut self.state.borrow_mut(), action);
        if !changed {
            return;
        }

        // Listeners may dispatch again, so neither borrow is held while they run.
        let listeners: Vec<Listener> = self.listeners.borrow().clone();
        let state = self.snapshot();
        for listener in listeners {
            listener(&state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_initial_state() {
        let state = AppState::default();
        assert!(!state.onboarding_complete);
        assert_eq!(state.selected_tab, Tab::Home);
        assert_eq!(state.selected_category, ServiceCategory::All);
        assert_eq!(state.posts.len(), 10);
    }

    #[test]
    fn test_complete_onboarding_once() {
        let mut state = AppState::default();
        assert!(reduce(
            &mut state,
            Action::CompleteOnboarding(SignInProvider::Apple)
        ));
        assert!(state.onboarding_complete);
        assert!(!reduce(
            &mut state,
            Action::CompleteOnboarding(SignInProvider::Google)
        ));
    }

    #[test]
    fn test_select_tab_and_category() {
        let mut state = AppState::default();
        assert!(reduce(&mut state, Action::SelectTab(Tab::Chats)));
        assert_eq!(state.selected_tab, Tab::Chats);
        assert!(!reduce(&mut state, Action::SelectTab(Tab::Chats)));

        assert!(reduce(&mut state, Action::SelectCategory(ServiceCategory::Nails)));
        assert_eq!(state.selected_category, ServiceCategory::Nails);
    }

    #[test]
    fn test_activate_post_leaves_state_alone() {
        let mut state = AppState::default();
        let before = state.clone();
        assert!(!reduce(&mut state, Action::ActivatePost(PostId(3))));
        assert_eq!(state, before);
    }

    #[test]
    fn test_filtered_posts_ignores_category() {
        let mut state = AppState::default();
        for category in ServiceCategory::ALL {
            reduce(&mut state, Action::SelectCategory(category));
            assert_eq!(state.filtered_posts(), state.posts.as_slice());
        }
    }

    #[test]
    fn test_store_notifies_only_on_change() {
        let store = Store::new(AppState::default());
        let calls = Rc::new(Cell::new(0));
        let calls_listener = calls.clone();
        store.subscribe(move |_| calls_listener.set(calls_listener.get() + 1));

        store.dispatch(Action::SelectTab(Tab::Profile));
        store.dispatch(Action::SelectTab(Tab::Profile));
        store.dispatch(Action::ActivatePost(PostId(1)));
        assert_eq!(calls.get(), 1);
        assert_eq!(store.with_state(|s| s.selected_tab), Tab::Profile);
    }

    #[test]
    fn test_listener_can_dispatch() {
        let store = Store::new(AppState::default());
        let weak = Rc::downgrade(&store);
        store.subscribe(move |state| {
            if state.onboarding_complete && state.selected_tab != Tab::Explore {
                if let Some(store) = weak.upgrade() {
                    store.dispatch(Action::SelectTab(Tab::Explore));
                }
            }
        });

        store.dispatch(Action::CompleteOnboarding(SignInProvider::Google));
        let state = store.snapshot();
        assert!(state.onboarding_complete);
        assert_eq!(state.selected_tab, Tab::Explore);
    }
}
