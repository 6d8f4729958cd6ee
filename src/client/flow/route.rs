use std::io;

use crate::client::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Signup,
    Profile,
    Mood,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Signup => "/signup",
            Route::Profile => "/profile",
            Route::Mood => "/mood",
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        match path.trim_end_matches('/') {
            "" | "/login" => Some(Route::Login),
            "/signup" => Some(Route::Signup),
            "/profile" => Some(Route::Profile),
            "/mood" => Some(Route::Mood),
            _ => None,
        }
    }

    pub fn requires_session(&self) -> bool {
        matches!(self, Route::Profile | Route::Mood)
    }
}

/// Where the user actually lands: protected screens bounce to login without a token.
pub fn resolve(route: Route, session: &Session) -> Route {
    if route.requires_session() && !session.is_authenticated() {
        return Route::Login;
    }
    route
}

pub fn logout(session: &Session) -> io::Result<Route> {
    session.clear()?;
    tracing::debug!("Session cleared");
    Ok(Route::Login)
}
