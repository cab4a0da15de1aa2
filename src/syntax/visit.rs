use super::error::CompileError;
use super::tree::{CompilationUnit, SyntaxNode, TypeDecl};

/// Walk every node of `unit` in pre-order, calling `callback` on each.
///
/// Order: the unit, its package clause, imports, the module declaration
/// followed by its directives, then each type followed by its members.
/// The first callback error stops the walk and is returned.
pub fn visit<F>(unit: &CompilationUnit, callback: &mut F) -> Result<(), CompileError>
where
    F: FnMut(SyntaxNode<'_>) -> Result<(), CompileError>,
{
    callback(SyntaxNode::Unit(unit))?;
    if let Some(package) = &unit.package {
        callback(SyntaxNode::Package(package))?;
    }
    for import in &unit.imports {
        callback(SyntaxNode::Import(import))?;
    }
    if let Some(module) = &unit.module {
        callback(SyntaxNode::Module(module))?;
        for directive in &module.directives {
            callback(SyntaxNode::Directive(directive))?;
        }
    }
    for ty in &unit.types {
        visit_type(ty, callback)?;
    }
    Ok(())
}

fn visit_type<F>(ty: &TypeDecl, callback: &mut F) -> Result<(), CompileError>
where
    F: FnMut(SyntaxNode<'_>) -> Result<(), CompileError>,
{
    callback(SyntaxNode::Type(ty))?;
    for member in &ty.members {
        visit_type(member, callback)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parser::parse;

    fn describe(node: SyntaxNode<'_>) -> String {
        match node {
            SyntaxNode::Unit(_) => "unit".to_string(),
            SyntaxNode::Package(name) => format!("package {}", name),
            SyntaxNode::Import(import) => format!("import {}", import.name),
            SyntaxNode::Module(module) => format!("module {}", module.name),
            SyntaxNode::Directive(_) => "directive".to_string(),
            SyntaxNode::Type(ty) => format!("{} {}", ty.kind, ty.name),
        }
    }

    #[test]
    fn test_pre_order() {
        let unit = parse(
            "package p; import java.util.List; class A { interface B { enum C {} } } record D() {}",
        )
        .unwrap();
        let mut seen = Vec::new();
        visit(&unit, &mut |node| {
            seen.push(describe(node));
            Ok(())
        })
        .unwrap();
        assert_eq!(
            seen,
            vec![
                "unit",
                "package p",
                "import java.util.List",
                "class A",
                "interface B",
                "enum C",
                "record D",
            ]
        );
    }

    #[test]
    fn test_module_directives_are_visited() {
        let unit = parse("module m { requires a; exports b; }").unwrap();
        let mut seen = Vec::new();
        visit(&unit, &mut |node| {
            seen.push(describe(node));
            Ok(())
        })
        .unwrap();
        assert_eq!(seen, vec!["unit", "module m", "directive", "directive"]);
    }

    #[test]
    fn test_callback_error_stops_the_walk() {
        let unit = parse("class A {} class B {} class C {}").unwrap();
        let mut visited = 0;
        let err = visit(&unit, &mut |node| {
            visited += 1;
            match node {
                SyntaxNode::Type(ty) if ty.name == "B" => Err(CompileError::new("no B allowed")),
                _ => Ok(()),
            }
        })
        .unwrap_err();
        assert_eq!(err.message, "no B allowed");
        // unit, A, B
        assert_eq!(visited, 3);
    }
}
