//! Structural parser for Java compilation units.
//!
//! Recognises the package clause, imports, module declarations with their
//! directives, and type declarations (including member types). Method and
//! initializer bodies are skipped by bracket matching, so a file with
//! unbalanced brackets, a malformed header, or stray tokens at the top
//! level is rejected.

use smol_str::SmolStr;

use super::error::SyntaxError;
use super::lexer::{SyntaxKind, Token, tokenize};
use super::tree::{CompilationUnit, ImportDecl, ModuleDecl, ModuleDirective, TypeDecl, TypeKind};
use crate::base::{QualifiedName, TextRange, TextSize};

const MODIFIERS: &[&str] = &[
    "public",
    "protected",
    "private",
    "abstract",
    "final",
    "sealed",
    "strictfp",
    "default",
    "native",
    "synchronized",
    "transient",
    "volatile",
];

/// Parse the text of one `.java` file.
pub fn parse(source: &str) -> Result<CompilationUnit, SyntaxError> {
    let tokens = tokenize(source)
        .map_err(|range| SyntaxError::new("unrecognised character", range))?;
    Parser::new(source, tokens).compilation_unit()
}

struct Parser<'src> {
    tokens: Vec<Token<'src>>,
    pos: usize,
    eof: TextRange,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str, tokens: Vec<Token<'src>>) -> Self {
        Self {
            tokens,
            pos: 0,
            eof: TextRange::empty(TextSize::of(source)),
        }
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    fn compilation_unit(mut self) -> Result<CompilationUnit, SyntaxError> {
        let mut unit = CompilationUnit::default();
        loop {
            self.skip_annotations_and_modifiers()?;
            let Some(token) = self.peek() else {
                return Ok(unit);
            };
            match token.kind {
                SyntaxKind::Package => {
                    if unit.package.is_some()
                        || unit.module.is_some()
                        || !unit.imports.is_empty()
                        || !unit.types.is_empty()
                    {
                        return Err(self.error("package declaration must come first"));
                    }
                    self.bump();
                    let name = self.qualified_name()?;
                    self.expect(SyntaxKind::Semi)?;
                    unit.package = Some(name);
                }
                SyntaxKind::Import => {
                    if unit.module.is_some() || !unit.types.is_empty() {
                        return Err(self.error("import after a declaration"));
                    }
                    unit.imports.push(self.import_decl()?);
                }
                SyntaxKind::Semi => {
                    self.bump();
                }
                _ if self.at_module_decl() => {
                    if unit.module.is_some() || !unit.types.is_empty() {
                        return Err(self.error("unexpected module declaration"));
                    }
                    unit.module = Some(self.module_decl()?);
                }
                _ if self.at_type_decl() => {
                    if unit.module.is_some() {
                        return Err(self.error("type declaration after module declaration"));
                    }
                    unit.types.push(self.type_decl()?);
                }
                kind => {
                    return Err(self.error(format!(
                        "expected a declaration, found {}",
                        kind.describe()
                    )));
                }
            }
        }
    }

    fn import_decl(&mut self) -> Result<ImportDecl, SyntaxError> {
        self.expect(SyntaxKind::Import)?;
        let is_static = self.eat(SyntaxKind::Static);
        let mut segments = vec![SmolStr::new(self.expect(SyntaxKind::Ident)?.text)];
        let mut on_demand = false;
        while self.eat(SyntaxKind::Dot) {
            if self.eat(SyntaxKind::Star) {
                on_demand = true;
                break;
            }
            segments.push(SmolStr::new(self.expect(SyntaxKind::Ident)?.text));
        }
        self.expect(SyntaxKind::Semi)?;
        Ok(ImportDecl {
            name: QualifiedName::from_segments(segments),
            is_static,
            on_demand,
        })
    }

    fn module_decl(&mut self) -> Result<ModuleDecl, SyntaxError> {
        let open = self.at_ident("open");
        if open {
            self.bump();
        }
        self.bump(); // `module`
        let name = self.qualified_name()?;
        self.expect(SyntaxKind::LBrace)?;

        let mut directives = Vec::new();
        loop {
            let Some(token) = self.peek() else {
                return Err(self.error(format!("unclosed declaration of module {}", name)));
            };
            let directive = match (token.kind, token.text) {
                (SyntaxKind::RBrace, _) => {
                    self.bump();
                    break;
                }
                (SyntaxKind::Ident, "requires") => {
                    self.bump();
                    let mut transitive = false;
                    let mut is_static = false;
                    loop {
                        if self.eat(SyntaxKind::Static) {
                            is_static = true;
                        } else if self.at_ident("transitive")
                            && self.nth_kind(1) == Some(SyntaxKind::Ident)
                        {
                            self.bump();
                            transitive = true;
                        } else {
                            break;
                        }
                    }
                    ModuleDirective::Requires {
                        module: self.qualified_name()?,
                        transitive,
                        is_static,
                    }
                }
                (SyntaxKind::Ident, keyword @ ("exports" | "opens")) => {
                    self.bump();
                    let package = self.qualified_name()?;
                    let to = if self.at_ident("to") {
                        self.bump();
                        self.name_list()?
                    } else {
                        Vec::new()
                    };
                    if keyword == "exports" {
                        ModuleDirective::Exports { package, to }
                    } else {
                        ModuleDirective::Opens { package, to }
                    }
                }
                (SyntaxKind::Ident, "uses") => {
                    self.bump();
                    ModuleDirective::Uses {
                        service: self.qualified_name()?,
                    }
                }
                (SyntaxKind::Ident, "provides") => {
                    self.bump();
                    let service = self.qualified_name()?;
                    if !self.at_ident("with") {
                        return Err(self.error("expected 'with' in provides directive"));
                    }
                    self.bump();
                    ModuleDirective::Provides {
                        service,
                        with: self.name_list()?,
                    }
                }
                (kind, _) => {
                    return Err(self.error(format!(
                        "expected a module directive, found {}",
                        kind.describe()
                    )));
                }
            };
            self.expect(SyntaxKind::Semi)?;
            directives.push(directive);
        }

        Ok(ModuleDecl {
            name,
            open,
            directives,
        })
    }

    fn type_decl(&mut self) -> Result<TypeDecl, SyntaxError> {
        let Some((kind, width)) = self.type_keyword_at(0) else {
            return Err(self.error("expected a type declaration"));
        };
        for _ in 0..width {
            self.bump();
        }
        let name = SmolStr::new(self.expect(SyntaxKind::Ident)?.text);

        // type parameters, record components, extends/implements/permits
        loop {
            match self.peek_kind() {
                Some(SyntaxKind::LBrace) => break,
                Some(SyntaxKind::LParen | SyntaxKind::LBracket) => self.skip_balanced()?,
                Some(SyntaxKind::Semi | SyntaxKind::RBrace | SyntaxKind::RParen) | None => {
                    return Err(self.error(format!("expected '{{' to open {} {}", kind, name)));
                }
                Some(_) => {
                    self.bump();
                }
            }
        }

        let members = self.type_body(&name)?;
        Ok(TypeDecl {
            kind,
            name,
            members,
        })
    }

    fn type_body(&mut self, owner: &str) -> Result<Vec<TypeDecl>, SyntaxError> {
        self.expect(SyntaxKind::LBrace)?;
        let mut members = Vec::new();
        loop {
            match self.peek_kind() {
                None => return Err(self.error(format!("unclosed body of {}", owner))),
                Some(SyntaxKind::RBrace) => {
                    self.bump();
                    return Ok(members);
                }
                Some(SyntaxKind::LBrace | SyntaxKind::LParen | SyntaxKind::LBracket) => {
                    self.skip_balanced()?
                }
                Some(kind @ (SyntaxKind::RParen | SyntaxKind::RBracket)) => {
                    return Err(self.error(format!("unexpected {}", kind.describe())));
                }
                Some(_) if self.at_type_decl() => members.push(self.type_decl()?),
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Pieces
    // ------------------------------------------------------------------

    fn qualified_name(&mut self) -> Result<QualifiedName, SyntaxError> {
        let mut segments = vec![SmolStr::new(self.expect(SyntaxKind::Ident)?.text)];
        while self.at(SyntaxKind::Dot) && self.nth_kind(1) == Some(SyntaxKind::Ident) {
            self.bump();
            segments.push(SmolStr::new(self.expect(SyntaxKind::Ident)?.text));
        }
        Ok(QualifiedName::from_segments(segments))
    }

    fn name_list(&mut self) -> Result<Vec<QualifiedName>, SyntaxError> {
        let mut names = vec![self.qualified_name()?];
        while self.eat(SyntaxKind::Comma) {
            names.push(self.qualified_name()?);
        }
        Ok(names)
    }

    fn skip_annotations_and_modifiers(&mut self) -> Result<(), SyntaxError> {
        loop {
            if self.at(SyntaxKind::At) && self.nth_kind(1) != Some(SyntaxKind::Interface) {
                self.bump();
                self.qualified_name()?;
                if self.at(SyntaxKind::LParen) {
                    self.skip_balanced()?;
                }
            } else if self.at(SyntaxKind::Static)
                || self
                    .peek()
                    .is_some_and(|t| t.kind == SyntaxKind::Ident && MODIFIERS.contains(&t.text))
            {
                self.bump();
            } else if self.at_ident("non")
                && self.nth(1).is_some_and(|t| t.text == "-")
                && self.nth(2).is_some_and(|t| t.text == "sealed")
            {
                self.pos += 3;
            } else {
                return Ok(());
            }
        }
    }

    /// Skip from an opening bracket to its matching closer.
    fn skip_balanced(&mut self) -> Result<(), SyntaxError> {
        let mut stack: Vec<Token<'src>> = Vec::new();
        loop {
            let Some(token) = self.bump() else {
                let range = stack.last().map_or(self.eof, |open| open.range);
                return Err(SyntaxError::new("unclosed bracket", range));
            };
            match token.kind {
                SyntaxKind::LBrace | SyntaxKind::LParen | SyntaxKind::LBracket => stack.push(token),
                SyntaxKind::RBrace | SyntaxKind::RParen | SyntaxKind::RBracket => {
                    let Some(open) = stack.pop() else {
                        return Err(SyntaxError::new(
                            format!("unexpected {}", token.kind.describe()),
                            token.range,
                        ));
                    };
                    if closer(open.kind) != token.kind {
                        return Err(SyntaxError::new(
                            format!(
                                "expected {} to match {}, found {}",
                                closer(open.kind).describe(),
                                open.kind.describe(),
                                token.kind.describe()
                            ),
                            token.range,
                        ));
                    }
                }
                _ => {}
            }
            if stack.is_empty() {
                return Ok(());
            }
        }
    }

    fn at_module_decl(&self) -> bool {
        let offset = usize::from(self.at_ident("open"));
        self.nth(offset)
            .is_some_and(|t| t.kind == SyntaxKind::Ident && t.text == "module")
            && self.nth_kind(offset + 1) == Some(SyntaxKind::Ident)
    }

    fn at_type_decl(&self) -> bool {
        let after_dot = self
            .pos
            .checked_sub(1)
            .and_then(|prev| self.tokens.get(prev))
            .is_some_and(|t| t.kind == SyntaxKind::Dot);
        !after_dot && self.type_keyword_at(0).is_some()
    }

    /// The type kind introduced at lookahead `n`, with the number of
    /// keyword tokens to consume before the type name.
    fn type_keyword_at(&self, n: usize) -> Option<(TypeKind, usize)> {
        let token = self.nth(n)?;
        let (kind, width) = match token.kind {
            SyntaxKind::Class => (TypeKind::Class, 1),
            SyntaxKind::Interface => (TypeKind::Interface, 1),
            SyntaxKind::Enum => (TypeKind::Enum, 1),
            SyntaxKind::At if self.nth_kind(n + 1) == Some(SyntaxKind::Interface) => {
                (TypeKind::Annotation, 2)
            }
            SyntaxKind::Ident
                if token.text == "record"
                    && matches!(
                        self.nth_kind(n + 2),
                        Some(SyntaxKind::LParen | SyntaxKind::Lt)
                    ) =>
            {
                (TypeKind::Record, 1)
            }
            _ => return None,
        };
        (self.nth_kind(n + width) == Some(SyntaxKind::Ident)).then_some((kind, width))
    }

    // ------------------------------------------------------------------
    // Token cursor
    // ------------------------------------------------------------------

    fn nth(&self, n: usize) -> Option<Token<'src>> {
        self.tokens.get(self.pos + n).copied()
    }

    fn nth_kind(&self, n: usize) -> Option<SyntaxKind> {
        self.nth(n).map(|t| t.kind)
    }

    fn peek(&self) -> Option<Token<'src>> {
        self.nth(0)
    }

    fn peek_kind(&self) -> Option<SyntaxKind> {
        self.nth_kind(0)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    fn at_ident(&self, text: &str) -> bool {
        self.peek()
            .is_some_and(|t| t.kind == SyntaxKind::Ident && t.text == text)
    }

    fn bump(&mut self) -> Option<Token<'src>> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind) -> Result<Token<'src>, SyntaxError> {
        match self.peek() {
            Some(token) if token.kind == kind => {
                self.pos += 1;
                Ok(token)
            }
            Some(token) => Err(self.error(format!(
                "expected {}, found {}",
                kind.describe(),
                token.kind.describe()
            ))),
            None => Err(self.error(format!("expected {}, found end of file", kind.describe()))),
        }
    }

    fn error(&self, message: impl Into<String>) -> SyntaxError {
        let range = self.peek().map_or(self.eof, |t| t.range);
        SyntaxError::new(message, range)
    }
}

fn closer(open: SyntaxKind) -> SyntaxKind {
    match open {
        SyntaxKind::LParen => SyntaxKind::RParen,
        SyntaxKind::LBracket => SyntaxKind::RBracket,
        _ => SyntaxKind::RBrace,
    }
}
