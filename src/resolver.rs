//! @dose
//! purpose: Resolves an application matcher to the path of one application, querying the
//!     registry for creator / bundle ID / name matches.
//!
//! invariants:
//!     - An explicit path is returned untouched, without a registry query
//!     - At most two registry queries: the original, then the name with the bundle suffix
//!
//! gotchas:
//!     - The retry only happens when a name was given and it lacks the suffix already

use crate::error::{LaunchError, Result};
use crate::platform::AppRegistry;
use crate::types::AppMatcher;
use std::path::PathBuf;

pub fn resolve_application<R: AppRegistry + ?Sized>(matcher: &AppMatcher, registry: &R) -> Result<PathBuf> {
    let query = match matcher {
        AppMatcher::Explicit(path) => return Ok(path.clone()),
        AppMatcher::Query(query) => query,
    };

    let status = match registry.find_application(query) {
        Ok(path) => return Ok(path),
        Err(status) => status,
    };

    let suffix = registry.bundle_suffix();
    let retry = match &query.name {
        Some(name) if !name.ends_with(suffix) => query.with_name_suffix(suffix),
        _ => None,
    };

    let status = match retry {
        Some(retry) => {
            tracing::debug!("no match for {}, retrying as {}", query, retry);
            match registry.find_application(&retry) {
                Ok(path) => return Ok(path),
                Err(status) => status,
            }
        }
        None => status,
    };

    Err(LaunchError::platform("can't locate application", status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::memory::{MemoryApp, MemoryPlatform};
    use crate::status::Status;
    use crate::types::{AppQuery, CreatorCode};
    use std::path::Path;

    fn by_name(name: &str) -> AppMatcher {
        AppMatcher::Query(AppQuery {
            name: Some(name.to_string()),
            ..Default::default()
        })
    }

    fn editor() -> MemoryApp {
        MemoryApp {
            path: PathBuf::from("/Applications/TextEdit.app"),
            creator: Some("ttxt".to_string()),
            bundle_id: Some("com.apple.TextEdit".to_string()),
            name: Some("TextEdit.app".to_string()),
        }
    }

    #[test]
    fn test_explicit_path_skips_registry() {
        let platform = MemoryPlatform::new();
        let matcher = AppMatcher::Explicit(PathBuf::from("/opt/tool"));
        assert_eq!(resolve_application(&matcher, &platform).unwrap(), Path::new("/opt/tool"));
        assert!(platform.queries().is_empty());
    }

    #[test]
    fn test_name_retried_with_bundle_suffix() {
        let platform = MemoryPlatform::new().with_app(editor());
        let path = resolve_application(&by_name("TextEdit"), &platform).unwrap();
        assert_eq!(path, Path::new("/Applications/TextEdit.app"));

        let queries = platform.queries();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[1].name.as_deref(), Some("TextEdit.app"));
    }

    #[test]
    fn test_suffixed_name_not_retried() {
        let platform = MemoryPlatform::new().with_bundle_suffix(".desktop");
        let err = resolve_application(&by_name("gedit.desktop"), &platform).unwrap_err();
        assert_eq!(
            err.to_string(),
            "can't locate application: application not found (-10814)"
        );
        assert_eq!(platform.queries().len(), 1);
    }

    #[test]
    fn test_query_without_name_not_retried() {
        let platform = MemoryPlatform::new().with_app(editor());
        let matcher = AppMatcher::Query(AppQuery {
            creator: CreatorCode::new("ToyS"),
            ..Default::default()
        });
        let err = resolve_application(&matcher, &platform).unwrap_err();
        assert!(matches!(
            err,
            LaunchError::Platform {
                status: Status::APPLICATION_NOT_FOUND,
                ..
            }
        ));
        assert_eq!(platform.queries().len(), 1);
    }

    #[test]
    fn test_combined_query_must_match_all_fields() {
        let platform = MemoryPlatform::new().with_app(editor());
        let matcher = AppMatcher::Query(AppQuery {
            creator: CreatorCode::new("ttxt"),
            bundle_id: Some("com.apple.TextEdit".to_string()),
            name: None,
        });
        assert!(resolve_application(&matcher, &platform).is_ok());

        let matcher = AppMatcher::Query(AppQuery {
            creator: CreatorCode::new("ttxt"),
            bundle_id: Some("org.example.Other".to_string()),
            name: None,
        });
        assert!(resolve_application(&matcher, &platform).is_err());
    }
}
