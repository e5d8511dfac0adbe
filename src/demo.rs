//! The sample application served by `tinyroute serve`.
//!
//! Exercises every engine feature: global middleware, nested groups with their
//! own middleware, parameter and wildcard routes, form and JSON handling,
//! static files and templates with a helper function.

use anyhow::Result;
use minijinja::context;
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::config::ServerConfig;
use crate::dispatcher::{handler, Context, Engine};
use crate::middleware::{logger, recovery};

/// Mount point for `ServerConfig::static_dir`
pub const ASSETS_PREFIX: &str = "/assets";

const INDEX_TEMPLATE: &str = r#"<html>
<link rel="stylesheet" href="/assets/css/style.css">
<p>tinyroute</p>
</html>
"#;

const STUDENTS_TEMPLATE: &str = r#"<html>
<body>
<p>hello, {{ title }}</p>
{% for stu in students %}<p>{{ loop.index0 }}: {{ stu.name }} is {{ stu.age }} years old</p>
{% endfor %}</body>
</html>
"#;

const DATE_TEMPLATE: &str = r#"<html>
<body>
<p>hello, {{ title }}</p>
<p>Date: {{ format_as_date(now.year, now.month, now.day) }}</p>
</body>
</html>
"#;

#[derive(Debug, Clone, Serialize)]
struct Student {
    name: &'static str,
    age: u8,
}

/// `YYYY-MM-DD`
#[must_use]
pub fn format_as_date(year: i64, month: u32, day: u32) -> String {
    format!("{year}-{month:02}-{day:02}")
}

// Lets recovery() be seen at work.
#[allow(clippy::panic)]
fn always_panics(_: &mut Context<'_>) {
    panic!("deliberate panic from /panic");
}

/// Build the sample engine described by `config`.
///
/// # Errors
///
/// Fails when `config.templates_dir` cannot be read or holds a template that
/// does not parse.
pub fn build_engine(config: &ServerConfig) -> Result<Engine> {
    let mut engine = Engine::new();
    engine.use_middleware([logger(), recovery()]);

    let templates = engine.templates_mut();
    templates.env_mut().add_function("format_as_date", format_as_date);
    templates.add("css.tmpl", INDEX_TEMPLATE)?;
    templates.add("arr.tmpl", STUDENTS_TEMPLATE)?;
    templates.add("custom_func.tmpl", DATE_TEMPLATE)?;
    if let Some(dir) = &config.templates_dir {
        engine.load_html_dir(dir)?;
    }
    if let Some(dir) = &config.static_dir {
        engine.static_dir(ASSETS_PREFIX, dir.clone());
    }

    engine.get("/", |c| c.html_template(200, "css.tmpl", context! {}));
    engine.get("/students", |c| {
        let students = [
            Student { name: "alice", age: 20 },
            Student { name: "bob", age: 22 },
        ];
        c.html_template(200, "arr.tmpl", context! { title => "tinyroute", students => students });
    });
    engine.get("/date", |c| {
        let now = json!({ "year": 2022, "month": 5, "day": 19 });
        c.html_template(200, "custom_func.tmpl", context! { title => "tinyroute", now => now });
    });
    engine.get("/panic", always_panics);

    {
        let mut v1 = engine.group("/v1");
        v1.get("/", |c| c.html(200, "<h1>Hello tinyroute</h1>"));
        v1.get("/hello", |c| {
            let name = c.query("name");
            c.string(200, format!("hello {}, you're at {}\n", name, c.path));
        });
    }
    {
        let mut v2 = engine.group("/v2");
        v2.use_middleware([handler(|c| {
            c.next();
            info!(
                request_id = %c.request_id,
                path = %c.path,
                status = c.status_code(),
                "v2 request handled"
            );
        })]);
        v2.get("/hello/:name", |c| {
            let body = format!("hello {}, you're at {}\n", c.param("name"), c.path);
            c.string(200, body);
        });
        v2.post("/login", |c| {
            let body = json!({
                "username": c.post_form("username"),
                "password": c.post_form("password"),
            });
            c.json(200, &body);
        });
        v2.get("/files/*filepath", |c| {
            let body = json!({ "filepath": c.param("filepath") });
            c.json(200, &body);
        });
    }

    info!(routes = engine.router().len(), "Sample application configured");
    Ok(engine)
}
