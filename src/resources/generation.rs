//! Text generation for resource entities.
//!
//! Everything that can be written back into a document implements [`Generatable`].
//! Formatting choices come from [`GenerationOptions`], which is derived from the
//! resolver configuration.

use super::declarations::{
    MemberKind, MethodDeclaration, ParameterDeclaration, PropertyDeclaration,
};
use super::exports::Export;
use super::imports::{Import, NamedImport, SymbolSpecifier};
use crate::config::ResolverConfig;

const NOT_IMPLEMENTED_BODY: &str = "throw new Error('Not implemented yet.');";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
    pub quote: char,
    pub semicolons: bool,
    pub space_braces: bool,
    pub wrap_threshold: usize,
    pub trailing_comma: bool,
    /// One indentation level
    pub indent: String,
}

impl GenerationOptions {
    fn terminator(&self) -> &'static str {
        if self.semicolons {
            ";"
        } else {
            ""
        }
    }

    fn quoted(&self, library: &str) -> String {
        format!("{q}{library}{q}", q = self.quote)
    }

    fn braces(&self, inner: &str) -> String {
        if self.space_braces {
            format!("{{ {} }}", inner)
        } else {
            format!("{{{}}}", inner)
        }
    }
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self::from(&ResolverConfig::default())
    }
}

impl From<&ResolverConfig> for GenerationOptions {
    fn from(config: &ResolverConfig) -> Self {
        let indent = if config.insert_spaces {
            " ".repeat(config.tab_size)
        } else {
            "\t".to_string()
        };
        Self {
            quote: config.string_quote_style.as_char(),
            semicolons: config.insert_semicolons,
            space_braces: config.insert_space_before_and_after_import_braces,
            wrap_threshold: config.multi_line_wrap_threshold,
            trailing_comma: config.multi_line_trailing_comma,
            indent,
        }
    }
}

/// Produces source text for an entity
pub trait Generatable {
    fn generate(&self, options: &GenerationOptions) -> String;
}

impl Generatable for SymbolSpecifier {
    fn generate(&self, _options: &GenerationOptions) -> String {
        match &self.alias {
            Some(alias) if alias != &self.specifier => format!("{} as {}", self.specifier, alias),
            _ => self.specifier.clone(),
        }
    }
}

/// `{ a, b as c }` on one line, or one specifier per line once `single_line` is too long
fn specifier_block(
    specifiers: &[SymbolSpecifier],
    options: &GenerationOptions,
    prefix: &str,
    suffix: &str,
) -> String {
    let rendered: Vec<String> = specifiers.iter().map(|s| s.generate(options)).collect();
    let single_line = format!("{}{}{}", prefix, options.braces(&rendered.join(", ")), suffix);
    if single_line.len() <= options.wrap_threshold {
        return single_line;
    }

    let mut lines = Vec::with_capacity(rendered.len() + 2);
    lines.push(format!("{}{{", prefix));
    let last = rendered.len().saturating_sub(1);
    for (i, specifier) in rendered.iter().enumerate() {
        let comma = if i < last || options.trailing_comma {
            ","
        } else {
            ""
        };
        lines.push(format!("{}{}{}", options.indent, specifier, comma));
    }
    lines.push(format!("}}{}", suffix));
    lines.join("\n")
}

impl Generatable for NamedImport {
    fn generate(&self, options: &GenerationOptions) -> String {
        let from = format!(
            " from {}{}",
            options.quoted(self.library_name()),
            options.terminator()
        );
        let keyword = if self.is_type_only {
            "import type "
        } else {
            "import "
        };

        match (&self.default_alias, self.specifiers.is_empty()) {
            // Stays a named import; `import 'lib'` would be a side-effect import
            (None, true) => format!("{}{{}}{}", keyword, from),
            (Some(default), true) => format!("{}{}{}", keyword, default, from),
            (Some(default), false) => {
                let prefix = format!("{}{}, ", keyword, default);
                specifier_block(&self.specifiers, options, &prefix, &from)
            }
            (None, false) => specifier_block(&self.specifiers, options, keyword, &from),
        }
    }
}

impl Generatable for Import {
    fn generate(&self, options: &GenerationOptions) -> String {
        let terminator = options.terminator();
        match self {
            Import::Named(named) => named.generate(options),
            Import::Namespace(i) => format!(
                "import * as {} from {}{}",
                i.alias,
                options.quoted(i.library_name()),
                terminator
            ),
            Import::ExternalModule(i) => format!(
                "import {} = require({}){}",
                i.alias,
                options.quoted(i.library_name()),
                terminator
            ),
            Import::String(i) => {
                format!("import {}{}", options.quoted(i.library_name()), terminator)
            }
        }
    }
}

impl Generatable for Export {
    fn generate(&self, options: &GenerationOptions) -> String {
        let terminator = options.terminator();
        match self {
            Export::All { library, .. } => {
                format!("export * from {}{}", options.quoted(library), terminator)
            }
            Export::AllAs { library, alias, .. } => format!(
                "export * as {} from {}{}",
                alias,
                options.quoted(library),
                terminator
            ),
            Export::Named {
                library,
                specifiers,
                ..
            } => {
                let from = format!(" from {}{}", options.quoted(library), terminator);
                specifier_block(specifiers, options, "export ", &from)
            }
            Export::Assigned { name, .. } => format!("export = {}{}", name, terminator),
        }
    }
}

impl Generatable for ParameterDeclaration {
    fn generate(&self, _options: &GenerationOptions) -> String {
        let mut text = String::new();
        if self.is_rest {
            text.push_str("...");
        }
        text.push_str(&self.name);
        if self.is_optional {
            text.push('?');
        }
        if let Some(type_annotation) = &self.type_annotation {
            text.push_str(": ");
            text.push_str(type_annotation);
        }
        text
    }
}

impl Generatable for PropertyDeclaration {
    fn generate(&self, options: &GenerationOptions) -> String {
        let mut text = String::new();
        if let Some(visibility) = self.visibility {
            text.push_str(&format!("{} ", visibility));
        }
        if self.is_static {
            text.push_str("static ");
        }
        if self.is_readonly {
            text.push_str("readonly ");
        }
        text.push_str(&self.name);
        if self.is_optional {
            text.push('?');
        }
        if let Some(type_annotation) = &self.type_annotation {
            text.push_str(": ");
            text.push_str(type_annotation);
        }
        text.push_str(options.terminator());
        text
    }
}

impl Generatable for MethodDeclaration {
    fn generate(&self, options: &GenerationOptions) -> String {
        let mut text = String::new();
        if let Some(visibility) = self.visibility {
            text.push_str(&format!("{} ", visibility));
        }
        if self.is_abstract {
            text.push_str("abstract ");
        }
        if self.is_static {
            text.push_str("static ");
        }
        if self.is_async {
            text.push_str("async ");
        }
        match self.kind {
            MemberKind::Getter => text.push_str("get "),
            MemberKind::Setter => text.push_str("set "),
            MemberKind::Method | MemberKind::Constructor => {}
        }
        text.push_str(&self.name);
        if self.is_optional {
            text.push('?');
        }

        let parameters: Vec<String> = self
            .parameters
            .iter()
            .map(|p| p.generate(options))
            .collect();
        text.push_str(&format!("({})", parameters.join(", ")));

        if self.kind != MemberKind::Constructor {
            if let Some(return_type) = &self.return_type {
                text.push_str(": ");
                text.push_str(return_type);
            }
        }

        if self.is_abstract {
            text.push_str(options.terminator());
        } else {
            text.push_str(&format!(
                " {{\n{}{}\n}}",
                options.indent, NOT_IMPLEMENTED_BODY
            ));
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QuoteStyle;
    use crate::resources::declarations::Visibility;
    use crate::resources::imports::{ExternalModuleImport, NamespaceImport, StringImport};

    fn named(library: &str, specifiers: &[&str]) -> NamedImport {
        let mut import = NamedImport::new(library);
        for s in specifiers {
            import.add_specifier(SymbolSpecifier::new(*s));
        }
        import
    }

    #[test]
    fn test_import_variants() {
        let options = GenerationOptions::default();
        let mut import = named("lib", &["a"]);
        import.add_specifier(SymbolSpecifier::aliased("b", "c"));
        assert_eq!(
            import.generate(&options),
            "import { a, b as c } from 'lib';"
        );

        import.default_alias = Some("Lib".into());
        assert_eq!(
            import.generate(&options),
            "import Lib, { a, b as c } from 'lib';"
        );

        let mut default_only = NamedImport::new("lib");
        default_only.default_alias = Some("Lib".into());
        assert_eq!(default_only.generate(&options), "import Lib from 'lib';");

        assert_eq!(
            NamedImport::new("lib").generate(&options),
            "import {} from 'lib';"
        );

        assert_eq!(
            Import::Namespace(NamespaceImport::new("lib", "ns")).generate(&options),
            "import * as ns from 'lib';"
        );
        assert_eq!(
            Import::ExternalModule(ExternalModuleImport::new("lib", "lib")).generate(&options),
            "import lib = require('lib');"
        );
        assert_eq!(
            Import::String(StringImport::new("./polyfill")).generate(&options),
            "import './polyfill';"
        );
    }

    #[test]
    fn test_empty_named_import_is_not_a_side_effect_import() {
        let options = GenerationOptions::default();
        let rendered = Import::Named(NamedImport::new("lib")).generate(&options);
        let reparsed = crate::extractors::ExtractorManager::new()
            .extract_source(&rendered)
            .unwrap();

        assert_eq!(reparsed.imports.len(), 1);
        assert!(matches!(&reparsed.imports[0], Import::Named(named) if named.specifiers.is_empty()));
    }

    #[test]
    fn test_type_only_import() {
        let mut import = named("./types", &["Shape"]);
        import.is_type_only = true;
        assert_eq!(
            import.generate(&GenerationOptions::default()),
            "import type { Shape } from './types';"
        );
    }

    #[test]
    fn test_quote_semicolon_and_brace_options() {
        let config = ResolverConfig {
            string_quote_style: QuoteStyle::Double,
            insert_semicolons: false,
            insert_space_before_and_after_import_braces: false,
            ..ResolverConfig::default()
        };
        let options = GenerationOptions::from(&config);
        assert_eq!(
            named("lib", &["a", "b"]).generate(&options),
            "import {a, b} from \"lib\""
        );
    }

    #[test]
    fn test_multiline_wrapping() {
        let config = ResolverConfig {
            multi_line_wrap_threshold: 30,
            tab_size: 2,
            ..ResolverConfig::default()
        };
        let options = GenerationOptions::from(&config);
        let import = named("some-library", &["first", "second", "third"]);
        assert_eq!(
            import.generate(&options),
            "import {\n  first,\n  second,\n  third,\n} from 'some-library';"
        );

        let no_trailing = GenerationOptions {
            trailing_comma: false,
            indent: "\t".into(),
            ..options
        };
        assert_eq!(
            import.generate(&no_trailing),
            "import {\n\tfirst,\n\tsecond,\n\tthird\n} from 'some-library';"
        );
    }

    #[test]
    fn test_exports() {
        let options = GenerationOptions::default();
        let export = Export::Named {
            library: "./a".into(),
            specifiers: vec![SymbolSpecifier::new("a"), SymbolSpecifier::aliased("b", "c")],
            start: 0,
            end: 0,
        };
        assert_eq!(export.generate(&options), "export { a, b as c } from './a';");
        let all = Export::AllAs {
            library: "./a".into(),
            alias: "ns".into(),
            start: 0,
            end: 0,
        };
        assert_eq!(all.generate(&options), "export * as ns from './a';");
    }

    #[test]
    fn test_method_stub() {
        let method = MethodDeclaration {
            name: "load".into(),
            kind: MemberKind::Method,
            visibility: Some(Visibility::Protected),
            parameters: vec![
                ParameterDeclaration {
                    name: "id".into(),
                    type_annotation: Some("string".into()),
                    is_optional: false,
                    is_rest: false,
                },
                ParameterDeclaration {
                    name: "rest".into(),
                    type_annotation: Some("any[]".into()),
                    is_optional: false,
                    is_rest: true,
                },
            ],
            return_type: Some("Promise<void>".into()),
            is_abstract: false,
            is_static: false,
            is_async: true,
            is_optional: false,
            start: 0,
            end: 0,
        };
        assert_eq!(
            method.generate(&GenerationOptions::default()),
            "protected async load(id: string, ...rest: any[]): Promise<void> {\n    throw new Error('Not implemented yet.');\n}"
        );

        let abstract_method = MethodDeclaration {
            is_abstract: true,
            is_async: false,
            ..method
        };
        assert_eq!(
            abstract_method.generate(&GenerationOptions::default()),
            "protected abstract load(id: string, ...rest: any[]): Promise<void>;"
        );
    }

    #[test]
    fn test_property() {
        let property = PropertyDeclaration {
            name: "name".into(),
            visibility: Some(Visibility::Private),
            type_annotation: Some("string".into()),
            is_static: false,
            is_readonly: true,
            is_optional: true,
            start: 0,
            end: 0,
        };
        assert_eq!(
            property.generate(&GenerationOptions::default()),
            "private readonly name?: string;"
        );
    }
}
