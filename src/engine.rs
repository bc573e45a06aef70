//! Translation engine.
//!
//! This module turns a validated [`Collation`](crate::Collation) into rule
//! text. It is split into focused submodules under `src/engine/`.
//!
//! ## How the parts work together
//!
//! ```text
//!                      Collation
//!                          │
//!          ┌───────────────┴────────────────┐
//!          v                                v
//!   compiler::compile               simple::reduce
//!   (compiler.rs)                   (simple.rs)
//!     - settings directives           - reject settings
//!       (settings.rs)                 - require & [before 1] [first regular]
//!     - option directives             - p/s/t (+ concat) only
//!     - rule body walk                - newline / space / ( ) separators
//!     - variable top                        │
//!     - trim                                v
//!          │                          Option<String>
//!          v
//!       String
//!
//!   both read payloads through extract.rs, which escapes via escape.rs
//! ```
//!
//! ## Responsibilities by module
//!
//! - `escape.rs`: ICU literal quoting and Unicode escape handling. Holds the
//!   only process-wide state: two compiled escape matchers.
//! - `extract.rs`: payload decoding (code points, anchors, variable top).
//! - `settings.rs`: `<settings>` and option directives.
//! - `compiler.rs`: the full ICU compiler.
//! - `simple.rs`: the simple-rules reducer.
//!
//! Every entry point is a pure function of its input; all intermediate state
//! lives on the stack of one call, so callers may compile different trees from
//! several threads at once.
//!
//! ## Debugging
//!
//! Both passes emit `tracing` events at `debug`/`trace` level (variable-top
//! placement, reducer rejections, per-item progress).

#[path = "engine/compiler.rs"]
mod compiler;
#[path = "engine/escape.rs"]
mod escape;
#[path = "engine/extract.rs"]
mod extract;
#[path = "engine/settings.rs"]
mod settings;
#[path = "engine/simple.rs"]
mod simple;


pub(crate) use compiler::compile;
pub use escape::{escape_for_icu, replace_unicode_escapes};
pub(crate) use simple::reduce;
