use super::{RouteError, Router};
use crate::dispatcher::handler;
use http::Method;

fn noop() -> crate::dispatcher::HandlerFunc {
    handler(|_| {})
}

#[test]
fn test_root_path() {
    let mut router = Router::new();
    router.add_route(Method::GET, "/", noop());
    let matched = router.find(&Method::GET, "/").unwrap();
    assert_eq!(matched.pattern, "/");
    assert!(matched.path_params.is_empty());
}

#[test]
fn test_parameterized_path() {
    let mut router = Router::new();
    router.add_route(Method::GET, "/p/:lang/doc", noop());
    let matched = router.find(&Method::GET, "/p/go/doc").unwrap();
    assert_eq!(matched.pattern, "/p/:lang/doc");
    assert_eq!(matched.get_path_param("lang"), Some("go"));
    assert_eq!(matched.path_params.len(), 1);
}

#[test]
fn test_wildcard_path() {
    let mut router = Router::new();
    router.add_route(Method::GET, "/static/*filepath", noop());
    let matched = router.find(&Method::GET, "/static/css/a.css").unwrap();
    assert_eq!(matched.get_path_param("filepath"), Some("css/a.css"));
}

#[test]
fn test_bare_wildcard_binds_nothing() {
    let mut router = Router::new();
    router.add_route(Method::GET, "/files/*", noop());
    let matched = router.find(&Method::GET, "/files/a/b").unwrap();
    assert!(matched.path_params.is_empty());
}

#[test]
fn test_methods_have_separate_trees() {
    let mut router = Router::new();
    router.add_route(Method::GET, "/items", noop());
    router.add_route(Method::POST, "/items/:id", noop());
    assert!(router.find(&Method::GET, "/items").is_some());
    assert!(router.find(&Method::POST, "/items").is_none());
    assert!(router.find(&Method::GET, "/items/1").is_none());
    assert!(router.find(&Method::PUT, "/items").is_none());
}

#[test]
fn test_repeated_param_name_last_capture_wins() {
    let mut router = Router::new();
    router.add_route(Method::GET, "/org/:id/user/:id", noop());
    let matched = router.find(&Method::GET, "/org/1/user/2").unwrap();
    assert_eq!(matched.get_path_param("id"), Some("2"));
}

#[test]
fn test_reregistration_keeps_one_table_entry() {
    let mut router = Router::new();
    router.add_route(Method::GET, "/a", noop());
    router.add_route(Method::GET, "/a", noop());
    assert_eq!(router.len(), 1);
    assert_eq!(router.routes(&Method::GET), vec!["/a"]);
}

#[test]
fn test_try_add_route_rejects_bad_patterns() {
    let mut router = Router::new();
    let err = router.try_add_route(Method::GET, "no-slash", noop()).unwrap_err();
    assert!(matches!(err, RouteError::MissingLeadingSlash { .. }));

    let err = router
        .try_add_route(Method::GET, "/a/*rest/b", noop())
        .unwrap_err();
    assert!(matches!(err, RouteError::SegmentsAfterWildcard { .. }));
    assert!(err.to_string().contains("/a/*rest/b"));

    assert!(router.is_empty());
    assert!(router.try_add_route(Method::GET, "/a/*rest", noop()).is_ok());
}

#[test]
fn test_all_routes_sorted_by_method() {
    let mut router = Router::new();
    router.add_route(Method::POST, "/b", noop());
    router.add_route(Method::GET, "/a", noop());
    router.add_route(Method::GET, "/a/:id", noop());
    assert_eq!(
        router.all_routes(),
        vec![
            (Method::GET, "/a".to_string()),
            (Method::GET, "/a/:id".to_string()),
            (Method::POST, "/b".to_string()),
        ]
    );
}
