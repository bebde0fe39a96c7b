#[cfg(test)]
mod resolver_tests {
    use rox::ast::{Expr, Stmt};
    use rox::parser::Parser;
    use rox::resolver::{Locals, Resolver};
    use rox::scanner::scan_tokens;

    fn parse(source: &str) -> Vec<Stmt> {
        let (tokens, errors) = scan_tokens(source);
        assert!(errors.is_empty(), "Unexpected scan errors: {:?}", errors);

        match Parser::new(&tokens).parse() {
            Ok(statements) => statements,
            Err(errors) => panic!("Unexpected parse errors: {:?}", errors),
        }
    }

    fn resolve(source: &str) -> (Vec<Stmt>, Locals) {
        let statements = parse(source);

        match Resolver::new().resolve(&statements) {
            Ok(locals) => (statements, locals),
            Err(errors) => panic!("Unexpected resolve errors: {:?}", errors),
        }
    }

    fn resolve_errors(source: &str) -> Vec<String> {
        match Resolver::new().resolve(&parse(source)) {
            Ok(_) => panic!("Expected resolve errors for {:?}", source),
            Err(errors) => errors.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Distance recorded for the variable printed by the last `print`,
    /// descending into the last nested block.
    fn printed_distance(statements: &[Stmt], locals: &Locals) -> Option<usize> {
        for stmt in statements.iter().rev() {
            match stmt {
                Stmt::Print(Expr::Variable { id, .. }) => return locals.get(id).copied(),
                Stmt::Block(inner) => return printed_distance(inner, locals),
                _ => {}
            }
        }
        None
    }

    #[test]
    fn globals_get_no_entry() {
        let (_, locals) = resolve("var a = 1; print a;");

        assert!(locals.is_empty());
    }

    #[test]
    fn locals_record_hop_count() {
        let (statements, locals) = resolve("{ var a = 1; { { print a; } } }");

        assert_eq!(printed_distance(&statements, &locals), Some(2));
    }

    #[test]
    fn innermost_declaration_wins() {
        let (statements, locals) = resolve("{ var a = 1; { var a = 2; print a; } }");

        assert_eq!(printed_distance(&statements, &locals), Some(0));
    }

    #[test]
    fn function_parameters_and_body_share_one_scope() {
        let (statements, locals) = resolve("fun f(x) { var y = x; print y; }");

        let Some(Stmt::Function(decl)) = statements.first() else {
            panic!("Expected a function declaration");
        };

        let Some(Stmt::Var {
            initializer: Some(Expr::Variable { id, .. }),
            ..
        }) = decl.body.first()
        else {
            panic!("Expected `var y = x;`");
        };

        assert_eq!(locals.get(id), Some(&0));
    }

    #[test]
    fn self_referential_initializer_is_an_error() {
        assert_eq!(
            resolve_errors("{ var a = a; }"),
            vec!["[line 1] Error at 'a': Can't read local variable in its own initializer."]
        );
    }

    #[test]
    fn global_self_reference_is_left_to_runtime() {
        let statements = parse("var a = a;");

        assert!(Resolver::new().resolve(&statements).is_ok());
    }

    #[test]
    fn duplicate_local_declaration_is_an_error() {
        assert_eq!(
            resolve_errors("fun f() { var a; var a; }"),
            vec!["[line 1] Error at 'a': Already a variable with this name in this scope."]
        );
    }

    #[test]
    fn duplicate_parameter_is_an_error() {
        assert_eq!(resolve_errors("fun f(a, a) {}").len(), 1);
    }

    #[test]
    fn top_level_return_is_an_error() {
        assert_eq!(
            resolve_errors("return 1;"),
            vec!["[line 1] Error at 'return': Can't return from top-level code."]
        );
    }

    #[test]
    fn this_outside_class_is_an_error() {
        assert_eq!(
            resolve_errors("fun f() { print this; }"),
            vec!["[line 1] Error at 'this': Can't use 'this' outside of a class."]
        );
    }

    #[test]
    fn errors_do_not_stop_the_walk() {
        let errors = resolve_errors("return;\n{ var b = b; }\nfun g() { var c; var c; }");

        assert_eq!(errors.len(), 3);
        assert!(errors[0].starts_with("[line 1]"));
        assert!(errors[1].starts_with("[line 2]"));
        assert!(errors[2].starts_with("[line 3]"));
    }

    #[test]
    fn method_this_sits_one_scope_outside_the_body() {
        let (statements, locals) = resolve("class A { m() { return this; } }");

        let Some(Stmt::Class { methods, .. }) = statements.first() else {
            panic!("Expected a class declaration");
        };

        let Some(Stmt::Return {
            value: Some(Expr::This { id, .. }),
            ..
        }) = methods[0].body.first()
        else {
            panic!("Expected `return this;`");
        };

        assert_eq!(locals.get(id), Some(&1));
    }
}
