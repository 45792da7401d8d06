//! Unit tests for the type checker.
//!
//! Covers the scoped symbol table, the typing rules for every node kind,
//! synthetic coordinate bindings and scope pairing on failure.

use test_log::test;

use super::{
    symbol_table::SymbolTable,
    type_checker::{binary_result_type, type_check, type_check_program, type_check_stmt, TypeChecker},
};
use crate::{
    ast::{
        ast::{Ast, BlockElem, NameDefId},
        expressions::Expr,
        statements::Statement,
        types::Type,
    },
    errors::errors::{Error, ErrorKind},
    lexer::tokens::TokenKind,
    parser::parser::parse,
    Position,
};

fn check(source: &str) -> Result<(Ast, Type), Error> {
    let mut ast = parse(source, Some("test.plc".to_string()))?;
    let ty = type_check(&mut ast)?;
    Ok((ast, ty))
}

fn check_type(source: &str) -> Type {
    check(source).unwrap().1
}

fn check_err(source: &str) -> Error {
    let error = check(source).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::TypeCheck, "unexpected failure: {}", error);
    error
}

fn program(source: &str) -> crate::ast::ast::Program {
    match parse(source, None).unwrap() {
        Ast::Program(program) => program,
        Ast::Expr(_) => panic!("expected a program"),
    }
}

// SYMBOL TABLE

#[test]
fn test_symbol_table_insert_and_lookup() {
    let mut table = SymbolTable::new();
    table.insert("a", NameDefId::Declared(0), Type::Int, Position::null()).unwrap();

    let symbol = table.lookup("a").unwrap();
    assert_eq!(symbol.ty, Type::Int);
    assert_eq!(symbol.scope_serial, 0);
    assert!(table.lookup("b").is_none());
}

#[test]
fn test_symbol_table_shadowing() {
    let mut table = SymbolTable::new();
    table.insert("a", NameDefId::Declared(0), Type::Int, Position::null()).unwrap();

    let serial = table.enter_scope();
    table.insert("a", NameDefId::Declared(1), Type::String, Position::null()).unwrap();

    assert_eq!(table.lookup("a").unwrap().name_def, NameDefId::Declared(1));
    assert_eq!(table.lookup("a").unwrap().scope_serial, serial);

    table.leave_scope();

    assert_eq!(table.lookup("a").unwrap().name_def, NameDefId::Declared(0));
    assert_eq!(table.lookup("a").unwrap().ty, Type::Int);
}

#[test]
fn test_symbol_table_redeclaration() {
    let mut table = SymbolTable::new();
    table.insert("a", NameDefId::Declared(0), Type::Int, Position::null()).unwrap();

    // Same definition again is harmless
    table.insert("a", NameDefId::Declared(0), Type::Int, Position::null()).unwrap();

    let error = table
        .insert("a", NameDefId::Declared(1), Type::Int, Position::null())
        .unwrap_err();
    assert_eq!(error.get_error_name(), "VariableAlreadyDeclared");
}

#[test]
fn test_symbol_table_current_scope_lookup() {
    let mut table = SymbolTable::new();
    table.insert("a", NameDefId::Declared(0), Type::Int, Position::null()).unwrap();
    table.enter_scope();

    assert!(table.lookup("a").is_some());
    assert!(table.lookup_current_scope("a").is_none());

    table.insert("b", NameDefId::Declared(1), Type::Pixel, Position::null()).unwrap();
    assert!(table.lookup_current_scope("b").is_some());
}

#[test]
fn test_symbol_table_leave_purges_scope() {
    let mut table = SymbolTable::new();
    table.enter_scope();
    table.insert("a", NameDefId::Declared(0), Type::Int, Position::null()).unwrap();
    table.enter_scope();
    table.insert("a", NameDefId::Declared(1), Type::Int, Position::null()).unwrap();
    table.insert("b", NameDefId::Declared(2), Type::Int, Position::null()).unwrap();

    table.leave_scope();
    assert!(table.lookup("b").is_none());
    assert_eq!(table.lookup("a").unwrap().name_def, NameDefId::Declared(0));

    table.leave_scope();
    assert!(table.lookup("a").is_none());
    assert_eq!(table.depth(), 1);
}

#[test]
fn test_symbol_table_serials_are_not_reused() {
    let mut table = SymbolTable::new();

    assert_eq!(table.enter_scope(), 1);
    table.leave_scope();
    assert_eq!(table.enter_scope(), 2);
    assert_eq!(table.current_serial(), 2);
}

#[test]
#[should_panic(expected = "global scope")]
fn test_symbol_table_leave_global_scope() {
    let mut table = SymbolTable::new();
    table.leave_scope();
}

// PROGRAMS AND STATEMENTS

#[test]
fn test_selector_on_declared_image() {
    let (ast, ty) = check("int f() <: image[10,10] im; int x; ^ im[x,0]:red; :>").unwrap();
    assert_eq!(ty, Type::Int);

    let Ast::Program(program) = ast else {
        panic!("expected a program");
    };
    let BlockElem::Statement(Statement::Return(ret)) = &program.block.elems[2] else {
        panic!("expected a return statement");
    };
    assert_eq!(ret.value.get_type(), Some(Type::Int));
}

#[test]
fn test_pixel_selector_on_int() {
    let error = check_err("int f() <: int im; ^ im[0,0]; :>");
    assert_eq!(error.get_error_name(), "InvalidSelector");
}

#[test]
fn test_return_type() {
    assert_eq!(check_type("int f() <: ^ 5; :>"), Type::Int);

    let error = check_err("boolean f() <: ^ 5; :>");
    assert_eq!(error.get_error_name(), "ReturnTypeMismatch");
}

#[test]
fn test_return_outside_function() {
    let mut program = program("int f() <: ^ 1; :>");
    let BlockElem::Statement(statement) = &mut program.block.elems[0] else {
        panic!("expected a statement");
    };

    let mut type_checker = TypeChecker::new();
    let error = type_check_stmt(&mut type_checker, statement).unwrap_err();
    assert_eq!(error.get_error_name(), "ReturnOutsideFunction");
}

#[test]
fn test_redeclaration_in_same_block() {
    let error = check_err("void f() <: int a; int a; :>");
    assert_eq!(error.get_error_name(), "VariableAlreadyDeclared");
}

#[test]
fn test_shadowing_in_nested_block() {
    // After the nested block the outer INT binding is visible again
    assert_eq!(
        check_type("int f() <: int a = 1; <: string a = \"s\"; write a; :>; ^ a; :>"),
        Type::Int
    );

    // The body block is nested inside the parameter scope
    assert_eq!(check_type("int f(int a) <: string a; ^ 1; :>"), Type::Int);
}

#[test]
fn test_duplicate_parameters() {
    let error = check_err("int f(int a, int a) <: ^ a; :>");
    assert_eq!(error.get_error_name(), "VariableAlreadyDeclared");
}

#[test]
fn test_synthetic_coordinates() {
    assert!(check("void f() <: image[10,10] im; im[x,y] = Z; :>").is_ok());

    let error = check_err("int f() <: image[10,10] im; im[x,y] = Z; ^ x; :>");
    assert_eq!(error.get_error_name(), "VariableNotDeclared");
    assert!(error.to_string().contains("not declared"));
}

#[test]
fn test_synthetic_coordinates_stay_in_target() {
    let error = check_err("void f() <: image[10,10] im; im[a,b] = [a, b, 0]; :>");
    assert_eq!(error.get_error_name(), "VariableNotDeclared");
}

#[test]
fn test_synthetic_names_inside_index_expressions() {
    let (ast, _) = check("void f() <: image[4,4] im; im[i + 1, - j] = Z; :>").unwrap();

    let Ast::Program(program) = ast else {
        panic!("expected a program");
    };
    let BlockElem::Statement(Statement::Assignment(assignment)) = &program.block.elems[1] else {
        panic!("expected an assignment");
    };
    let Expr::Binary(index) = assignment.lvalue.pixel_selector.as_ref().unwrap().x.as_ref() else {
        panic!("expected a binary index");
    };
    let Expr::Ident(i) = index.left.as_ref() else {
        panic!("expected an identifier");
    };
    assert!(matches!(i.name_def, Some(NameDefId::Synthetic(_))));
    assert_eq!(index.ty.get(), Some(Type::Int));

    let error = check_err("int f() <: image[4,4] im; im[i + 1, j] = Z; ^ i; :>");
    assert_eq!(error.get_error_name(), "VariableNotDeclared");
}

#[test]
fn test_declared_coordinates_keep_their_binding() {
    assert!(check("void f() <: image im; int x = 1; im[x, y] = RED; :>").is_ok());

    let error = check_err("void f() <: image im; string x; im[x, 0] = RED; :>");
    assert_eq!(error.get_error_name(), "TypeMatchError");
}

#[test]
fn test_undeclared_index_in_expression() {
    let error = check_err("int f() <: image im; ^ im[a,0]:red; :>");
    assert_eq!(error.get_error_name(), "VariableNotDeclared");
}

#[test]
fn test_modulo_has_no_typing_rule() {
    let error = check_err("int f(int n) <: ^ n % 2; :>");
    assert_eq!(error.get_error_name(), "InvalidBinaryOperands");

    assert_eq!(binary_result_type(TokenKind::Mod, Type::Int, Type::Int), None);
    assert_eq!(binary_result_type(TokenKind::Mod, Type::Pixel, Type::Int), None);
}

#[test]
fn test_channel_on_image_target() {
    assert!(check("void f() <: image[10,10] im; im[x,y]:red = 255; :>").is_ok());
    assert!(check("void f(image im) <: im:green = 5; :>").is_ok());

    let (ast, _) = check("void f(image im, image other) <: im:blue = other; :>").unwrap();
    let Ast::Program(program) = ast else {
        panic!("expected a program");
    };
    let BlockElem::Statement(Statement::Assignment(assignment)) = &program.block.elems[0] else {
        panic!("expected an assignment");
    };
    assert_eq!(assignment.lvalue.ty.get(), Some(Type::Image));
}

#[test]
fn test_invalid_lvalue_selectors() {
    let error = check_err("void f(pixel p) <: p[0,0] = 1; :>");
    assert_eq!(error.get_error_name(), "InvalidSelector");

    let error = check_err("void f(int n) <: n:red = 1; :>");
    assert_eq!(error.get_error_name(), "InvalidSelector");
}

#[test]
fn test_undeclared_target() {
    let error = check_err("void f() <: q = 1; :>");
    assert_eq!(error.get_error_name(), "VariableNotDeclared");
}

#[test]
fn test_assignment_compatibility() {
    assert!(check("void f(pixel p, image im, int n, string s) <: p = n; im = p; im = n; im = s; n = n; :>").is_ok());

    let error = check_err("void f(pixel p, int n) <: n = p; :>");
    assert_eq!(error.get_error_name(), "TypeMatchError");

    let error = check_err("void f(string s, int n) <: s = n; :>");
    assert_eq!(error.get_error_name(), "TypeMatchError");
}

#[test]
fn test_do_guards() {
    let error = check_err("void f() <: do 1 -> <: :> od; :>");
    assert_eq!(error.get_error_name(), "GuardNotBoolean");

    assert!(check("void f() <: do true -> <: :> od; :>").is_ok());
}

#[test]
fn test_if_guards() {
    assert!(check("void f(int a) <: if a > 0 -> <: write a; :> [] a <= 0 -> <: write 0; :> fi; :>").is_ok());

    let error = check_err("void f(int a) <: if a > 0 -> <: :> [] a -> <: :> fi; :>");
    assert_eq!(error.get_error_name(), "GuardNotBoolean");
}

#[test]
fn test_loop_locals_do_not_escape() {
    let error = check_err("void f() <: do TRUE -> <: int k; :> od; k = 1; :>");
    assert_eq!(error.get_error_name(), "VariableNotDeclared");
}

#[test]
fn test_declarations() {
    assert!(check("void f() <: image im = \"file.png\"; :>").is_ok());

    let error = check_err("void f() <: int a = TRUE; :>");
    assert_eq!(error.get_error_name(), "TypeMatchError");

    let error = check_err("void f() <: int a = a; :>");
    assert_eq!(error.get_error_name(), "VariableNotDeclared");
}

#[test]
fn test_channel_initializer_is_int() {
    assert!(check("void f(image im, pixel p) <: int a = im:green; int b = p:blue; int c = im[0,0]:red; :>").is_ok());

    let error = check_err("void f(image im) <: image a = im:green; :>");
    assert_eq!(error.get_error_name(), "TypeMatchError");
}

#[test]
fn test_name_def_types() {
    let error = check_err("void f() <: void v; :>");
    assert_eq!(error.get_error_name(), "InvalidNameDefType");

    let error = check_err("void f() <: int[2,2] a; :>");
    assert_eq!(error.get_error_name(), "InvalidDimension");

    let error = check_err("void f() <: image[TRUE, 2] im; :>");
    assert_eq!(error.get_error_name(), "TypeMatchError");

    assert!(check("void f(int w) <: image[w, w * 2] im; :>").is_ok());
}

// EXPRESSIONS

#[test]
fn test_literal_types() {
    assert_eq!(check_type("1"), Type::Int);
    assert_eq!(check_type("\"text\""), Type::String);
    assert_eq!(check_type("TRUE"), Type::Boolean);
    assert_eq!(check_type("false"), Type::Boolean);
    assert_eq!(check_type("Z"), Type::Int);
    assert_eq!(check_type("MAGENTA"), Type::Pixel);
    assert_eq!(check_type("[1, 2, 3]"), Type::Pixel);
}

#[test]
fn test_binary_types() {
    assert_eq!(check_type("1 + 2"), Type::Int);
    assert_eq!(check_type("\"a\" + \"b\""), Type::String);
    assert_eq!(check_type("TRUE + FALSE"), Type::Boolean);
    assert_eq!(check_type("RED - 1"), Type::Pixel);
    assert_eq!(check_type("RED * RED"), Type::Pixel);
    assert_eq!(check_type("RED & BLUE"), Type::Pixel);
    assert_eq!(check_type("TRUE && FALSE"), Type::Boolean);
    assert_eq!(check_type("TRUE || FALSE"), Type::Boolean);
    assert_eq!(check_type("1 < 2"), Type::Boolean);
    assert_eq!(check_type("RED == RED"), Type::Boolean);
    assert_eq!(check_type("2 ** 3"), Type::Int);
    assert_eq!(check_type("RED ** 2"), Type::Pixel);
}

#[test]
fn test_invalid_binary_operands() {
    for source in ["\"a\" - \"b\"", "1 & 2", "TRUE < FALSE", "2 ** RED", "1 + RED", "1 == TRUE", "1 && 2"] {
        let error = check_err(source);
        assert_eq!(error.get_error_name(), "InvalidBinaryOperands", "{}", source);
    }
}

#[test]
fn test_binary_image_operands() {
    assert_eq!(check_type("image f(image a) <: ^ a - 1; :>"), Type::Image);
    assert_eq!(check_type("image f(image a, image b) <: ^ a / b; :>"), Type::Image);

    assert_eq!(binary_result_type(TokenKind::Times, Type::Image, Type::Int), Some(Type::Image));
    assert_eq!(binary_result_type(TokenKind::Times, Type::Int, Type::Image), None);
    assert_eq!(binary_result_type(TokenKind::Minus, Type::String, Type::String), None);
}

#[test]
fn test_unary_types() {
    assert_eq!(check_type("-1"), Type::Int);
    assert_eq!(check_type("!TRUE"), Type::Boolean);
    assert_eq!(check_type("int f(image im) <: ^ width im + height im; :>"), Type::Int);

    for source in ["-TRUE", "!1", "width 1"] {
        let error = check_err(source);
        assert_eq!(error.get_error_name(), "InvalidUnaryOperand", "{}", source);
    }
}

#[test]
fn test_conditional_types() {
    assert_eq!(check_type("? TRUE -> 1 , 2"), Type::Int);

    let error = check_err("? 1 -> 1 , 2");
    assert_eq!(error.get_error_name(), "GuardNotBoolean");

    let error = check_err("? TRUE -> 1 , \"a\"");
    assert_eq!(error.get_error_name(), "TypeMatchError");
}

#[test]
fn test_postfix_types() {
    assert_eq!(check_type("pixel f(image im) <: ^ im[0,0]; :>"), Type::Pixel);
    assert_eq!(check_type("int f(image im) <: ^ im[0,0]:red; :>"), Type::Int);
    assert_eq!(check_type("image f(image im) <: ^ im:green; :>"), Type::Image);
    assert_eq!(check_type("int f(pixel p) <: ^ p:blue; :>"), Type::Int);

    let error = check_err("int f(pixel p) <: ^ p[0,0]; :>");
    assert_eq!(error.get_error_name(), "InvalidSelector");

    let error = check_err("int f(image im) <: ^ im[TRUE,0]; :>");
    assert_eq!(error.get_error_name(), "TypeMatchError");
}

#[test]
fn test_expanded_pixel_components() {
    let error = check_err("[1, TRUE, 3]");
    assert_eq!(error.get_error_name(), "TypeMatchError");
}

#[test]
fn test_undeclared_identifier() {
    let error = check_err("a + 1");
    assert_eq!(error.get_error_name(), "VariableNotDeclared");
    assert_eq!(error.get_position().column, 1);
}

// ANNOTATION AND SCOPE PAIRING

#[test]
fn test_nodes_are_annotated() {
    let (ast, _) = check("int f(int a) <: ^ a + 1; :>").unwrap();

    let Ast::Program(program) = ast else {
        panic!("expected a program");
    };
    assert_eq!(program.ty.get(), Some(Type::Int));
    assert_eq!(program.params[0].ty.get(), Some(Type::Int));

    let BlockElem::Statement(Statement::Return(ret)) = &program.block.elems[0] else {
        panic!("expected a return statement");
    };
    let Expr::Binary(binary) = &ret.value else {
        panic!("expected a binary expression");
    };
    assert_eq!(binary.ty.get(), Some(Type::Int));

    let Expr::Ident(ident) = binary.left.as_ref() else {
        panic!("expected an identifier");
    };
    assert_eq!(ident.name_def, Some(NameDefId::Declared(0)));
    assert_eq!(ident.ty.get(), Some(Type::Int));
}

#[test]
fn test_synthetic_bindings_are_recorded() {
    let (ast, _) = check("void f() <: image im; im[x,y] = Z; :>").unwrap();

    let Ast::Program(program) = ast else {
        panic!("expected a program");
    };
    let BlockElem::Statement(Statement::Assignment(assignment)) = &program.block.elems[1] else {
        panic!("expected an assignment");
    };
    assert_eq!(assignment.lvalue.ty.get(), Some(Type::Pixel));

    let Expr::Ident(x) = assignment.lvalue.pixel_selector.as_ref().unwrap().x.as_ref() else {
        panic!("expected an identifier");
    };
    assert!(matches!(x.name_def, Some(NameDefId::Synthetic(_))));
}

#[test]
fn test_revisit_is_idempotent() {
    let mut ast = parse("int f(int a) <: image im; im[x,y] = [a, a, a]; ^ a; :>", None).unwrap();

    assert_eq!(type_check(&mut ast).unwrap(), Type::Int);
    assert_eq!(type_check(&mut ast).unwrap(), Type::Int);
}

#[test]
fn test_scopes_closed_after_failure() {
    let mut program = program("int f(int a) <: <: do TRUE -> <: ^ \"s\"; :> od; :>; :>");

    let mut type_checker = TypeChecker::new();
    let error = type_check_program(&mut type_checker, &mut program).unwrap_err();

    assert_eq!(error.get_error_name(), "ReturnTypeMismatch");
    assert_eq!(type_checker.symbols.depth(), 1);
    assert!(type_checker.return_types.is_empty());
    assert!(type_checker.symbols.lookup("a").is_none());
}
