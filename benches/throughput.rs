use criterion::{criterion_group, criterion_main, Criterion};
use http::Method;
use std::hint::black_box;
use tinyroute::{handler, Engine, Router};

const ROUTES: &[(Method, &str)] = &[
    (Method::GET, "/"),
    (Method::GET, "/zoo/animals"),
    (Method::POST, "/zoo/animals"),
    (Method::GET, "/zoo/animals/:id"),
    (Method::PUT, "/zoo/animals/:id"),
    (Method::PATCH, "/zoo/animals/:id"),
    (Method::DELETE, "/zoo/animals/:id"),
    (Method::GET, "/zoo/animals/:id/toys/:toy_id"),
    (
        Method::GET,
        "/zoo/:category/animals/:id/habitats/:habitat_id/sections/:section_id",
    ),
    (
        Method::POST,
        "/inventory/:warehouse_id/feeds/:feed_id/items/:item_id/batches/:batch_id",
    ),
    (Method::GET, "/complex/:a/:b/:c/:d/:e/:f/:g/:h/:i"),
    (Method::HEAD, "/zoo/health"),
    (Method::OPTIONS, "/zoo/health"),
    (Method::GET, "/static/*filepath"),
];

const PATHS: &[(Method, &str)] = &[
    (Method::GET, "/zoo/animals/123"),
    (Method::GET, "/zoo/animals/123/toys/456"),
    (Method::GET, "/zoo/cats/animals/123/habitats/88/sections/5"),
    (Method::POST, "/inventory/1/feeds/2/items/3/batches/4"),
    (Method::GET, "/complex/1/2/3/4/5/6/7/8/9"),
    (Method::GET, "/static/css/site/main.css"),
];

fn bench_route_throughput(c: &mut Criterion) {
    let mut router = Router::new();
    for (method, pattern) in ROUTES {
        router.add_route(method.clone(), pattern, handler(|_| {}));
    }
    c.bench_function("route_match", |b| {
        b.iter(|| {
            for (method, path) in PATHS {
                let res = router.find(method, path);
                black_box(&res);
            }
        })
    });
}

fn bench_dispatch_throughput(c: &mut Criterion) {
    let mut engine = Engine::new();
    engine.use_middleware([handler(|c| c.next())]);
    for (method, pattern) in ROUTES {
        engine.add_route(method.clone(), pattern, handler(|c| c.string(200, "ok")));
    }
    c.bench_function("dispatch", |b| {
        b.iter(|| {
            for (method, path) in PATHS {
                let req = http::Request::builder()
                    .method(method.clone())
                    .uri(*path)
                    .body(Vec::new())
                    .unwrap_or_default();
                black_box(engine.handle(req));
            }
        })
    });
}

criterion_group!(benches, bench_route_throughput, bench_dispatch_throughput);
criterion_main!(benches);
