pub mod chat;
pub mod diagram;
pub mod engine;
pub mod error;
pub mod intent;
pub mod markup_ast;
pub mod markup_parser;
pub mod markup_writer;
pub mod mutator;
pub mod style;
pub mod upload;

pub use engine::{EditOptions, EditOutcome};
pub use mutator::ReplaceScope;

pub fn edit(markup: &str, instruction: &str) -> EditOutcome {
    edit_with_options(markup, instruction, &EditOptions::default())
}

pub fn edit_with_options(markup: &str, instruction: &str, options: &EditOptions) -> EditOutcome {
    engine::apply_instruction(markup, instruction, options)
}
