//! # CLI Module
//!
//! Command-line front end of the `tinyroute` binary.
//!
//! ## Commands
//!
//! ### `serve`
//!
//! Run the sample application over HTTP until SIGINT or SIGTERM:
//!
//! ```bash
//! tinyroute serve --config tinyroute.yaml --addr 0.0.0.0:8080 \
//!     --static-dir ./static --templates ./templates
//! ```
//!
//! Precedence: flags, then `TINYROUTE_*` environment variables, then the
//! config file, then built-in defaults.
//!
//! ### `routes`
//!
//! Print the sample application's route table and exit:
//!
//! ```bash
//! tinyroute routes
//! ```

mod commands;


pub use commands::{run, run_cli, Cli, Commands};
