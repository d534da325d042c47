//! Generator registry
//!
//! An ordered list of generators. Lookup is first-match-wins in
//! registration order, which is also the tie-break when two generators
//! accept the same widget.

use std::sync::Arc;

use crate::config::TocConfig;
use crate::error::{Result, TocError};
use crate::generators::{
    Generator, GeneratorOptions, LatexGenerator, MarkdownGenerator, NotebookGenerator,
    RenderedMarkdownGenerator,
};
use crate::model::Widget;

#[derive(Default)]
pub struct GeneratorRegistry {
    generators: Vec<Arc<dyn Generator>>,
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in generators, in their standard order:
    /// notebook, markdown editor, rendered markdown, LaTeX
    pub fn with_defaults(config: &TocConfig) -> Self {
        let mut registry = Self::new();
        let builtins: [Arc<dyn Generator>; 4] = [
            Arc::new(NotebookGenerator::new(config.notebook_options())),
            Arc::new(MarkdownGenerator::new(config.generator_options())),
            Arc::new(RenderedMarkdownGenerator::new(config.generator_options())),
            Arc::new(LatexGenerator::new(GeneratorOptions {
                collapsible: false,
                ..config.generator_options()
            })),
        ];
        for generator in builtins {
            // Built-in names are distinct
            if let Err(e) = registry.add_generator(generator) {
                tracing::error!("Failed to register built-in generator: {}", e);
            }
        }
        registry
    }

    /// Append a generator; fails if one with the same name is registered
    pub fn add_generator(&mut self, generator: Arc<dyn Generator>) -> Result<()> {
        if self.generators.iter().any(|g| g.name() == generator.name()) {
            return Err(TocError::DuplicateGenerator(generator.name().to_string()));
        }
        tracing::info!("Registered table of contents generator `{}`", generator.name());
        self.generators.push(generator);
        Ok(())
    }

    /// First registered generator that accepts `widget`
    pub fn find_generator_for_widget(&self, widget: &Widget) -> Option<Arc<dyn Generator>> {
        self.generators
            .iter()
            .find(|g| g.is_enabled(widget))
            .cloned()
    }

    /// Registered generator names, in lookup order
    pub fn names(&self) -> Vec<&str> {
        self.generators.iter().map(|g| g.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

impl std::fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorRegistry")
            .field("generators", &self.names())
            .finish()
    }
}
