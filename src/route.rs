//! Client-side routes.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Home,
    Terminal,
    NotFound(String),
}

impl Route {
    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "" | "/index.html" => Self::Home,
            "/terminal" => Self::Terminal,
            _ => Self::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Self::Home => "/",
            Self::Terminal => "/terminal",
            Self::NotFound(path) => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_paths() {
        assert_eq!(Route::from_path("/"), Route::Home);
        assert_eq!(Route::from_path(""), Route::Home);
        assert_eq!(Route::from_path("/terminal/"), Route::Terminal);
        assert_eq!(Route::from_path("/blog"), Route::NotFound("/blog".to_string()));
        assert_eq!(Route::from_path("/blog").path(), "/blog");
    }
}
