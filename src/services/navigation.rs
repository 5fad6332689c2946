//! Route table and tab history

use super::guard::RouteRequirement;
use crate::models::user::Role;

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
pub const CURATOR_PATH: &str = "/curador";
pub const BOOK_PATH_PREFIX: &str = "/book/";

/// Declared routes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Catalog,
    /// Raw id segment; parsed by the detail view
    BookDetail(String),
    Curator,
    Login,
    NotFound,
}

impl Route {
    /// Match a location against the route table.
    /// Query strings and fragments are ignored, as is a trailing slash.
    pub fn resolve(location: &str) -> Route {
        let path = path_of(location);

        match path.as_str() {
            HOME_PATH => Route::Catalog,
            CURATOR_PATH => Route::Curator,
            LOGIN_PATH => Route::Login,
            other => match other.strip_prefix(BOOK_PATH_PREFIX) {
                Some(id) if !id.is_empty() && !id.contains('/') => {
                    Route::BookDetail(id.to_string())
                }
                _ => Route::NotFound,
            },
        }
    }

    pub fn requirement(&self) -> RouteRequirement {
        match self {
            Route::Catalog | Route::Login | Route::NotFound => RouteRequirement::Public,
            Route::BookDetail(_) => RouteRequirement::RequiresSession,
            Route::Curator => RouteRequirement::RequiresRole(Role::Admin),
        }
    }
}

/// Path part of a location, without trailing slash
pub fn path_of(location: &str) -> String {
    let end = location.find(['?', '#']).unwrap_or(location.len());
    let path = &location[..end];
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        HOME_PATH.to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Value of a query parameter in a location
pub fn query_param<'a>(location: &'a str, name: &str) -> Option<&'a str> {
    let query = location.split_once('?')?.1;
    let query = query.split('#').next().unwrap_or_default();
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// One history entry, with the origin captured by a login redirect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub location: String,
    pub from: Option<String>,
}

/// Back/forward history of the tab
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Entry>,
    index: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(HOME_PATH)
    }
}

impl History {
    pub fn new(location: &str) -> Self {
        Self {
            entries: vec![Entry {
                location: location.to_string(),
                from: None,
            }],
            index: 0,
        }
    }

    pub fn current(&self) -> &Entry {
        &self.entries[self.index]
    }

    /// New entry; drops anything ahead of the current one
    pub fn push(&mut self, location: &str) {
        self.entries.truncate(self.index + 1);
        self.entries.push(Entry {
            location: location.to_string(),
            from: None,
        });
        self.index = self.entries.len() - 1;
    }

    /// Overwrite the current entry
    pub fn replace(&mut self, location: &str, from: Option<String>) {
        self.entries[self.index] = Entry {
            location: location.to_string(),
            from,
        };
    }

    /// Step back; returns false at the first entry
    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        true
    }

    /// Take the captured origin of the current entry, leaving none behind
    pub fn take_origin(&mut self) -> Option<String> {
        self.entries[self.index].from.take()
    }

    pub fn locations(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.location.as_str()).collect()
    }
}
