// Core types and upstream plumbing for devroast

pub mod auth;
pub mod error;
pub mod github;
pub mod http;
pub mod leetcode;
pub mod normalize;
pub mod roast;
pub mod types;

pub use error::{ErrorKind, ToolError, ToolResult};
pub use types::*;
