pub mod context_generator;
pub mod filter_form;
pub mod tree_renderer;
