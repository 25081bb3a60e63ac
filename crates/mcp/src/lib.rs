// MCP (Model Context Protocol) server implementation
// Exposes the profile-roast tools to MCP clients

pub mod protocol;
pub mod server;
pub mod tools;

pub use server::McpServer;
