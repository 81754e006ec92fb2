use std::fmt;

use crate::photo::PhotoCatalog;

const PHOTO_PREFIX: &str = "/p/";

/// In-app location
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`
    Gallery,
    /// `/p/{id}`; the id is everything after the prefix, slashes included
    Photo(String),
}

impl Route {
    /// Parse a path; `None` for anything that is neither `/` nor `/p/{id}`
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.trim();
        if path.is_empty() || path == "/" {
            return Some(Route::Gallery);
        }

        match path.strip_prefix(PHOTO_PREFIX) {
            Some(id) if !id.is_empty() => Some(Route::Photo(id.to_string())),
            _ => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Gallery => "/".to_string(),
            Route::Photo(id) => format!("{}{}", PHOTO_PREFIX, id),
        }
    }

    pub fn photo_id(&self) -> Option<&str> {
        match self {
            Route::Gallery => None,
            Route::Photo(id) => Some(id),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// What a route shows against a given catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    Gallery,
    Photo { index: usize },
    NotFound,
}

pub fn resolve_route(route: &Route, catalog: &PhotoCatalog) -> RouteOutcome {
    match route {
        Route::Gallery => RouteOutcome::Gallery,
        Route::Photo(id) => match catalog.position(id) {
            Some(index) => RouteOutcome::Photo { index },
            None => RouteOutcome::NotFound,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photo::PhotoRecord;

    fn catalog(ids: &[&str]) -> PhotoCatalog {
        PhotoCatalog::new(
            ids.iter()
                .map(|id| PhotoRecord {
                    id: id.to_string(),
                    width: 10,
                    height: 10,
                    storage_ref: id.to_string(),
                    format: "jpg".to_string(),
                    placeholder: None,
                })
                .collect(),
        )
    }

    #[test]
    fn test_parse_paths() {
        assert_eq!(Route::parse("/"), Some(Route::Gallery));
        assert_eq!(Route::parse(""), Some(Route::Gallery));
        assert_eq!(
            Route::parse("/p/gallery/dawn"),
            Some(Route::Photo("gallery/dawn".to_string()))
        );
        assert_eq!(Route::parse("/p/"), None);
        assert_eq!(Route::parse("/about"), None);
    }

    #[test]
    fn test_path_round_trip() {
        for path in ["/", "/p/a", "/p/folder/nested/id"] {
            assert_eq!(Route::parse(path).unwrap().path(), path);
        }
        assert_eq!(Route::Photo("x".to_string()).to_string(), "/p/x");
    }

    #[test]
    fn test_resolve_every_id_to_its_position() {
        let catalog = catalog(&["c", "b/1", "a"]);
        for (index, id) in catalog.ids().into_iter().enumerate() {
            assert_eq!(
                resolve_route(&Route::Photo(id), &catalog),
                RouteOutcome::Photo { index }
            );
        }
        assert_eq!(
            resolve_route(&Route::Photo("zzz".to_string()), &catalog),
            RouteOutcome::NotFound
        );
        assert_eq!(resolve_route(&Route::Gallery, &catalog), RouteOutcome::Gallery);
    }

    #[test]
    fn test_empty_catalog_is_not_found() {
        let empty = PhotoCatalog::empty();
        assert_eq!(
            resolve_route(&Route::Photo("a".to_string()), &empty),
            RouteOutcome::NotFound
        );
    }
}
