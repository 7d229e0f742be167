//! Individual command implementations.

mod add;
mod decrypt;
mod delete;
mod export;
mod generate;
mod help;
mod purge;
mod quit;
mod search;
mod update;
mod view;

pub use add::AddCommand;
pub use decrypt::DecryptCommand;
pub use delete::DeleteCommand;
pub use export::ExportCommand;
pub use generate::{DEFAULT_GENERATED_LEN, GenerateCommand};
pub use help::HelpCommand;
pub use purge::PurgeCommand;
pub use quit::QuitCommand;
pub use search::SearchCommand;
pub use update::UpdateCommand;
pub use view::{ViewCommand, render_table};

use std::sync::Arc;

use super::command::CommandRegistry;

/// Registers all built-in commands with the registry.
pub fn register_all(registry: &mut CommandRegistry) {
    registry.register(Arc::new(AddCommand));
    registry.register(Arc::new(ViewCommand));
    registry.register(Arc::new(DecryptCommand));
    registry.register(Arc::new(UpdateCommand));
    registry.register(Arc::new(DeleteCommand));
    registry.register(Arc::new(GenerateCommand));
    registry.register(Arc::new(SearchCommand));
    registry.register(Arc::new(ExportCommand));
    registry.register(Arc::new(PurgeCommand));
    registry.register(Arc::new(HelpCommand));
    registry.register(Arc::new(QuitCommand));
}
