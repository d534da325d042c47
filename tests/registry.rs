//! Generator registry tests
//!
//! Lookup order, duplicate rejection and built-in coverage.

mod common;

use std::sync::Arc;

use common::{markdown_editor, notebook, rendered_markdown};
use tocpanel::config::TocConfig;
use tocpanel::generators::{Generator, GeneratorOptions, MarkdownGenerator};
use tocpanel::model::{Cell, EditorDocument, Widget, WidgetContent, WidgetId, MIME_LATEX, MIME_PLAIN, MIME_STEX};
use tocpanel::outline::Heading;
use tocpanel::registry::GeneratorRegistry;
use tocpanel::TocError;

/// Claims every widget and finds nothing
struct Greedy {
    name: &'static str,
    options: GeneratorOptions,
}

impl Greedy {
    fn named(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            options: GeneratorOptions::default(),
        })
    }
}

impl Generator for Greedy {
    fn name(&self) -> &str {
        self.name
    }

    fn is_enabled(&self, _widget: &Widget) -> bool {
        true
    }

    fn generate(
        &self,
        _content: &WidgetContent,
        _options: &GeneratorOptions,
    ) -> tocpanel::Result<Vec<Heading>> {
        Ok(Vec::new())
    }

    fn options(&self) -> &GeneratorOptions {
        &self.options
    }
}

fn widget(content: WidgetContent) -> Widget {
    Widget::new(WidgetId(1), "test", content)
}

fn found(registry: &GeneratorRegistry, content: WidgetContent) -> Option<String> {
    registry
        .find_generator_for_widget(&widget(content))
        .map(|g| g.name().to_string())
}

#[test]
fn test_empty_registry_finds_nothing() {
    let registry = GeneratorRegistry::new();
    assert!(registry.is_empty());
    assert_eq!(found(&registry, markdown_editor("# A")), None);
}

#[test]
fn test_defaults_cover_every_builtin_kind() {
    let registry = GeneratorRegistry::with_defaults(&TocConfig::default());
    assert_eq!(
        registry.names(),
        vec!["notebook", "markdown", "rendered-markdown", "latex"]
    );

    let cases = [
        (notebook(vec![Cell::markdown("# A")]), Some("notebook")),
        (markdown_editor("# A"), Some("markdown")),
        (rendered_markdown("# A"), Some("rendered-markdown")),
        (
            WidgetContent::Editor(EditorDocument::with_text("", MIME_LATEX)),
            Some("latex"),
        ),
        (
            WidgetContent::Editor(EditorDocument::with_text("", MIME_STEX)),
            Some("latex"),
        ),
        (
            WidgetContent::Editor(EditorDocument::with_text("", MIME_PLAIN)),
            None,
        ),
    ];
    for (content, expected) in cases {
        let kind = content.kind_name();
        assert_eq!(
            found(&registry, content).as_deref(),
            expected,
            "wrong generator for {}",
            kind
        );
    }
}

#[test]
fn test_first_registered_match_wins() {
    let mut registry = GeneratorRegistry::new();
    registry.add_generator(Greedy::named("first")).unwrap();
    registry.add_generator(Greedy::named("second")).unwrap();
    assert_eq!(
        found(&registry, markdown_editor("# A")).as_deref(),
        Some("first")
    );
}

#[test]
fn test_builtins_take_precedence_over_later_additions() {
    let mut registry = GeneratorRegistry::with_defaults(&TocConfig::default());
    registry.add_generator(Greedy::named("greedy")).unwrap();

    assert_eq!(
        found(&registry, markdown_editor("# A")).as_deref(),
        Some("markdown")
    );
    assert_eq!(
        found(
            &registry,
            WidgetContent::Editor(EditorDocument::with_text("", MIME_PLAIN))
        )
        .as_deref(),
        Some("greedy")
    );
}

#[test]
fn test_duplicate_name_is_rejected() {
    let mut registry = GeneratorRegistry::with_defaults(&TocConfig::default());
    let duplicate = Arc::new(MarkdownGenerator::new(GeneratorOptions::default()));
    let err = registry.add_generator(duplicate).unwrap_err();
    assert!(matches!(err, TocError::DuplicateGenerator(ref name) if name == "markdown"));
    assert_eq!(registry.len(), 4);
}

#[test]
fn test_config_flows_into_generator_options() {
    let config = TocConfig {
        numbering: true,
        notebook_numbering: false,
        ..TocConfig::default()
    };
    let registry = GeneratorRegistry::with_defaults(&config);

    let md = registry
        .find_generator_for_widget(&widget(markdown_editor("# A")))
        .unwrap();
    assert!(md.options().numbering);

    let nb = registry
        .find_generator_for_widget(&widget(notebook(Vec::new())))
        .unwrap();
    assert!(!nb.options().numbering);

    let tex = registry
        .find_generator_for_widget(&widget(WidgetContent::Editor(EditorDocument::with_text(
            "",
            MIME_LATEX,
        ))))
        .unwrap();
    assert!(!tex.options().collapsible);
}
