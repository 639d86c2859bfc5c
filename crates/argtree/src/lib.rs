//! Declarative argument parsing over a tree of commands, arguments and options.
//!
//! A program builds the tree once, then hands each invocation's tokens to
//! [`Cli::run_with`]. The matcher walks the tree depth-first over a shared
//! [`Cursor`], filling a [`Matches`] and running the handler of the node it
//! ends on. `--help`/`-h` interrupts matching and returns
//! [`Outcome::Help`] with the node and invocation path it was asked at, so
//! [`Cli::help`] can render usage for exactly that part of the grammar.
//!
//! ```rust,ignore
//! use argtree::{Argument, Cli, Command, Outcome};
//!
//! let cli = Cli::builder()
//!     .name("gurl")
//!     .command(
//!         Command::builder("get")
//!             .argument(Argument::builder("url").build()?)
//!             .build()?,
//!     )
//!     .build()?;
//!
//! match cli.run()? {
//!     Outcome::Matched(m) => println!("{:?}", m.argument("url")),
//!     Outcome::Help(req) => print!("{}", cli.help(&req)),
//! }
//! ```

mod cli;
mod cursor;
mod error;
mod help;
mod matcher;
mod matches;
mod node;
pub mod schema;

pub use cli::{Cli, CliBuilder, Outcome};
pub use cursor::Cursor;
pub use error::{BuildError, Error, Result, Violation};
pub use matches::Matches;
pub use node::{
    Argument, ArgumentBuilder, Branch, Command, CommandBuilder, Handler, HelpRequest, NodeRef,
    Opt, Validator,
};
pub use schema::{GrammarSchema, SchemaError};
