//! Navigation seam between action handlers and whatever renders pages.

use estate_core::ListingId;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Pages an action handler can send the user to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    SignIn,
    SignUp,
    Profile,
    CreateListing,
    Listing(ListingId),
    UpdateListing(ListingId),
    AdminDashboard,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::SignIn => "/sign-in".to_string(),
            Route::SignUp => "/sign-up".to_string(),
            Route::Profile => "/profile".to_string(),
            Route::CreateListing => "/create-listing".to_string(),
            Route::Listing(id) => format!("/listing/{}", id),
            Route::UpdateListing(id) => format!("/update-listing/{}", id),
            Route::AdminDashboard => "/admin/dashboard".to_string(),
        }
    }
}

/// Something that can move the user to another page.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

impl<T: Navigator + ?Sized> Navigator for Arc<T> {
    fn navigate(&self, route: Route) {
        (**self).navigate(route);
    }
}

/// Publishes the current route on a watch channel for a UI loop to follow.
#[derive(Debug)]
pub struct WatchNavigator {
    tx: watch::Sender<Route>,
}

impl WatchNavigator {
    pub fn new(initial: Route) -> (Self, watch::Receiver<Route>) {
        let (tx, rx) = watch::channel(initial);
        (Self { tx }, rx)
    }

    pub fn current(&self) -> Route {
        self.tx.borrow().clone()
    }
}

impl Navigator for WatchNavigator {
    fn navigate(&self, route: Route) {
        debug!(path = %route.path(), "Navigating");
        self.tx.send_replace(route);
    }
}
