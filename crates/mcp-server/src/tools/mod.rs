//! Memento MCP tool surface.

mod dispatch;
mod schemas;

pub use dispatch::MementoService;
