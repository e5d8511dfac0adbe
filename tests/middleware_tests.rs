//! Built-in logger and recovery middleware.

mod common;

use common::{body_str, get};
use tinyroute::{logger, recovery, Engine};

#[allow(clippy::panic)]
fn boom(_: &mut tinyroute::Context<'_>) {
    panic!("boom");
}

#[test]
fn test_recovery_turns_panic_into_500() {
    let mut engine = Engine::new();
    engine.use_middleware([logger(), recovery()]);
    engine.get("/panic", boom);
    engine.get("/fine", |c| c.string(200, "fine"));

    let resp = get(&engine, "/panic");
    assert_eq!(resp.status(), 500);
    assert_eq!(body_str(&resp), r#"{"message":"Internal Server Error"}"#);

    // The engine keeps serving afterwards.
    let resp = get(&engine, "/fine");
    assert_eq!(resp.status(), 200);
    assert_eq!(body_str(&resp), "fine");
}

#[test]
fn test_recovery_catches_panics_in_later_middleware() {
    let mut engine = Engine::new();
    engine.use_middleware([recovery()]);
    engine
        .group("/api")
        .use_middleware([tinyroute::handler(boom)]);
    engine.get("/api/x", |c| c.string(200, "unreachable"));

    let resp = get(&engine, "/api/x");
    assert_eq!(resp.status(), 500);
}

#[test]
fn test_logger_is_transparent() {
    let mut engine = Engine::new();
    engine.use_middleware([logger()]);
    engine.get("/x", |c| c.string(202, "accepted"));

    let resp = get(&engine, "/x");
    assert_eq!(resp.status(), 202);
    assert_eq!(body_str(&resp), "accepted");

    let resp = get(&engine, "/y");
    assert_eq!(resp.status(), 404);
}
