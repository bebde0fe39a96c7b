#[cfg(test)]
mod parser_tests {
    use rox::ast::{Expr, Stmt};
    use rox::ast_printer::AstPrinter;
    use rox::error::LoxError;
    use rox::parser::Parser;
    use rox::scanner::scan_tokens;

    fn parse(source: &str) -> Result<Vec<Stmt>, Vec<LoxError>> {
        let (tokens, errors) = scan_tokens(source);
        assert!(errors.is_empty(), "Unexpected scan errors: {:?}", errors);

        Parser::new(&tokens).parse()
    }

    /// Parses `source` and prints every statement in prefix form.
    fn print(source: &str) -> Vec<String> {
        match parse(source) {
            Ok(statements) => statements.iter().map(AstPrinter::print_stmt).collect(),
            Err(errors) => panic!("Unexpected parse errors: {:?}", errors),
        }
    }

    fn error_messages(source: &str) -> Vec<String> {
        match parse(source) {
            Ok(_) => panic!("Expected parse errors for {:?}", source),
            Err(errors) => errors.iter().map(|e| e.to_string()).collect(),
        }
    }

    #[test]
    fn factor_binds_tighter_than_term() {
        assert_eq!(print("1 + 2 * 3;"), vec!["(; (+ 1.0 (* 2.0 3.0)))"]);
        assert_eq!(
            print("(1 + 2) * 3;"),
            vec!["(; (* (group (+ 1.0 2.0)) 3.0))"]
        );
    }

    #[test]
    fn binary_operators_are_left_associative() {
        assert_eq!(print("1 - 2 - 3;"), vec!["(; (- (- 1.0 2.0) 3.0))"]);
        assert_eq!(print("8 / 4 / 2;"), vec!["(; (/ (/ 8.0 4.0) 2.0))"]);
    }

    #[test]
    fn assignment_is_right_associative() {
        assert_eq!(print("a = b = 1;"), vec!["(; (= a (= b 1.0)))"]);
    }

    #[test]
    fn precedence_ladder_from_or_down_to_unary() {
        assert_eq!(
            print("!a or b and c == d < -e;"),
            vec!["(; (or (! a) (and b (== c (< d (- e))))))"]
        );
    }

    #[test]
    fn calls_and_property_access_chain() {
        assert_eq!(
            print("a.b(1, 2).c = 3;"),
            vec!["(; (= (. (call (. a b) 1.0 2.0) c) 3.0))"]
        );
    }

    #[test]
    fn for_loop_is_desugared_to_while() {
        assert_eq!(
            print("for (var i = 0; i < 3; i = i + 1) print i;"),
            vec!["(block (var i 0.0) (while (< i 3.0) (block (print i) (; (= i (+ i 1.0))))))"]
        );
    }

    #[test]
    fn for_loop_without_clauses_loops_on_true() {
        assert_eq!(print("for (;;) print 1;"), vec!["(while true (print 1.0))"]);
    }

    #[test]
    fn declarations_parse() {
        assert_eq!(
            print("fun add(a, b) { return a + b; } class Point { sum() { return this.x; } } var p;"),
            vec![
                "(fun add (a b) (return (+ a b)))",
                "(class Point (method sum () (return (. this x))))",
                "(var p)",
            ]
        );
    }

    #[test]
    fn if_else_attaches_to_nearest_if() {
        assert_eq!(
            print("if (a) if (b) print 1; else print 2;"),
            vec!["(if a (if b (print 1.0) (print 2.0)))"]
        );
    }

    #[test]
    fn invalid_assignment_target_is_reported_at_equals() {
        assert_eq!(
            error_messages("1 + 2 = 3;"),
            vec!["[line 1] Error at '=': Invalid assignment target."]
        );
    }

    #[test]
    fn multiple_syntax_errors_surface_in_one_parse() {
        let messages = error_messages("var = 1;\nprint 2;\nprint (3;\nvar ok = 4;");

        assert_eq!(
            messages,
            vec![
                "[line 1] Error at '=': Expected variable name.",
                "[line 3] Error at ';': Expected ')' after expression.",
            ]
        );
    }

    #[test]
    fn missing_semicolon_at_end_reports_at_end() {
        assert_eq!(
            error_messages("print 1"),
            vec!["[line 1] Error at end: Expected ';' after value."]
        );
    }

    #[test]
    fn too_many_arguments_is_reported_but_parsing_continues() {
        let args: Vec<String> = (0..256).map(|i| i.to_string()).collect();
        let source = format!("f({});\nprint 1", args.join(", "));

        let messages = error_messages(&source);

        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("Can't have more than 255 arguments."));
        assert!(messages[1].contains("Expected ';' after value."));
    }

    #[test]
    fn too_many_parameters_is_reported() {
        let params: Vec<String> = (0..256).map(|i| format!("p{}", i)).collect();
        let source = format!("fun f({}) {{}}", params.join(", "));

        let messages = error_messages(&source);

        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("Can't have more than 255 parameters."));
    }

    #[test]
    fn variable_nodes_get_distinct_ids() {
        let statements = parse("a; a;").unwrap_or_default();

        let ids: Vec<_> = statements
            .iter()
            .filter_map(|stmt| match stmt {
                Stmt::Expression(Expr::Variable { id, .. }) => Some(*id),
                _ => None,
            })
            .collect();

        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn first_id_offsets_the_counter() {
        let (tokens, _) = scan_tokens("a = b;");
        let mut parser = Parser::with_first_id(&tokens, 100);

        assert!(parser.parse().is_ok());
        assert_eq!(parser.next_id(), 102);
    }
}
