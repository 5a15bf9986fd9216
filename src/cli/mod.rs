mod root;
mod page;
mod select;
mod logs;
mod schema;

pub use root::Cli;
pub use page::PageCommand;
pub use select::SelectCommand;
pub use logs::LogsCommand;
pub use schema::SchemaCommand;
