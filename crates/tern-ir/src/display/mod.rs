//! Textual form of RIR.
//!
//! Every typedef, global, and instruction has exactly one line format:
//!
//! ```text
//! $pair = typedef(a:i32, b:string)
//! global(gstr_1234, string, "hello")
//! fndef foo($0:u32) -> u64
//! {
//! %label_0:
//!     $1 = alloca(u64, 1)
//!     ...
//! }
//! ```
//!
//! Rendering only reads the unit.

mod block;
mod expression;
mod module;
