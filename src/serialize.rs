//! Renders the resolved tree back to normalized source text:
//! declarations first in first-declaration order, then function
//! definitions with 4-space-indented bodies.

use crate::ast::*;

pub(crate) fn serialize<'a, D, F>(declarations: D, functions: F) -> String
  where D: Iterator<Item = &'a VariableDeclaration>,
        F: Iterator<Item = &'a FunctionDefinition> {

  let mut out = String::new();
  for var in declarations {
    write_variable(&mut out, var);
    out.push('\n');
  }
  for function in functions {
    write_function(&mut out, function);
    out.push('\n');
  }
  out
}

fn write_variable(out: &mut String, var: &VariableDeclaration) {
  if let Some(layout) = var.layout_qualifier {
    out.push_str(layout.spelling());
    out.push(' ');
  }
  if let Some(precision) = var.precision_qualifier {
    out.push_str(precision.spelling());
    out.push(' ');
  }
  out.push_str(var.type_specifier.spelling());
  out.push(' ');
  out.push_str(&var.name);
  if let Some(size) = &var.array_size {
    out.push('[');
    write_expression(out, size);
    out.push(']');
  }
  if let Some(initializer) = &var.initializer {
    out.push_str(" = ");
    write_expression(out, initializer);
  }
  out.push(';');
}

fn write_function(out: &mut String, function: &FunctionDefinition) {
  out.push_str(function.return_type().spelling());
  out.push(' ');
  out.push_str(function.name());
  out.push('(');
  for (i, param) in function.parameters().iter().enumerate() {
    if i > 0 {
      out.push_str(", ");
    }
    // the default `in` is not re-emitted
    if param.qualifier != ParameterQualifier::In {
      out.push_str(param.qualifier.spelling());
      out.push(' ');
    }
    out.push_str(param.type_specifier.spelling());
    if let Some(name) = &param.name {
      out.push(' ');
      out.push_str(name);
    }
  }
  out.push_str(") ");
  write_compound(out, &function.body, 0);
}

fn push_indent(out: &mut String, indent: usize) {
  for _ in 0..indent {
    out.push_str("    ");
  }
}

fn write_compound(out: &mut String, block: &CompoundStatement, indent: usize) {
  out.push('{');
  for item in &block.items {
    out.push('\n');
    push_indent(out, indent + 1);
    match item {
      BlockItem::Declaration(var) => write_variable(out, var),
      BlockItem::Statement(statement) => write_statement(out, statement, indent + 1),
    }
  }
  out.push('\n');
  push_indent(out, indent);
  out.push('}');
}

fn write_statement(out: &mut String, statement: &Statement, indent: usize) {
  match statement {
    Statement::Expression(expression) => {
      write_expression(out, expression);
      out.push(';');
    },
    Statement::Return(None) => out.push_str("return;"),
    Statement::Return(Some(value)) => {
      out.push_str("return ");
      write_expression(out, value);
      out.push(';');
    },
    Statement::Discard => out.push_str("discard;"),
    Statement::Compound(block) => write_compound(out, block, indent),
    Statement::If{ condition, then_branch, else_branch } => {
      out.push_str("if (");
      write_expression(out, condition);
      out.push(')');
      write_branch(out, then_branch, indent);
      if let Some(else_branch) = else_branch {
        if let Statement::Compound(_) = **then_branch {
          out.push(' ');
        } else {
          out.push('\n');
          push_indent(out, indent);
        }
        out.push_str("else");
        if let Statement::If{ .. } = **else_branch {
          // keep `else if` chains on one line
          out.push(' ');
          write_statement(out, else_branch, indent);
        } else {
          write_branch(out, else_branch, indent);
        }
      }
    },
  }
}

fn write_branch(out: &mut String, branch: &Statement, indent: usize) {
  if let Statement::Compound(block) = branch {
    out.push(' ');
    write_compound(out, block, indent);
  } else {
    out.push('\n');
    push_indent(out, indent + 1);
    write_statement(out, branch, indent + 1);
  }
}

pub(crate) fn write_expression(out: &mut String, expression: &Expression) {
  match expression {
    Expression::Identifier(name) => out.push_str(name),
    Expression::IntLiteral(text) | Expression::FloatLiteral(text) => out.push_str(text),
    Expression::BoolLiteral(value) => out.push_str(if *value { "true" } else { "false" }),
    Expression::Member(base, field) => {
      write_postfix_base(out, base);
      out.push('.');
      out.push_str(field);
    },
    Expression::Index(base, index) => {
      write_postfix_base(out, base);
      out.push('[');
      write_expression(out, index);
      out.push(']');
    },
    Expression::Call(name, arguments) => {
      out.push_str(name);
      out.push('(');
      for (i, argument) in arguments.iter().enumerate() {
        if i > 0 {
          out.push_str(", ");
        }
        write_expression(out, argument);
      }
      out.push(')');
    },
    Expression::Unary(op, operand) => {
      if op.is_postfix() {
        write_unary_operand(out, operand);
        out.push_str(op.spelling());
      } else {
        out.push_str(op.spelling());
        write_unary_operand(out, operand);
      }
    },
    Expression::Binary(op, left, right) => {
      write_binary_operand(out, left, op.precedence(), false);
      out.push(' ');
      out.push_str(op.spelling());
      out.push(' ');
      write_binary_operand(out, right, op.precedence(), true);
    },
    Expression::Assignment(op, lvalue, rvalue) => {
      write_expression(out, lvalue);
      out.push(' ');
      out.push_str(op.spelling());
      out.push(' ');
      write_expression(out, rvalue);
    },
  }
}

// A lower-precedence operand always needs parens; a binary right operand
// gets them unconditionally, which keeps the printed form stable when it
// is parsed and printed again.
fn write_binary_operand(out: &mut String, operand: &Expression, parent_precedence: u8, is_right: bool) {
  let parens = match operand {
    Expression::Binary(op, _, _) => is_right || op.precedence() < parent_precedence,
    Expression::Assignment(..) => true,
    _ => false,
  };
  write_maybe_parenthesized(out, operand, parens);
}

fn write_unary_operand(out: &mut String, operand: &Expression) {
  let parens = match operand {
    Expression::Binary(..) | Expression::Assignment(..) => true,
    _ => false,
  };
  write_maybe_parenthesized(out, operand, parens);
}

fn write_postfix_base(out: &mut String, base: &Expression) {
  let parens = match base {
    Expression::Binary(..) | Expression::Assignment(..) | Expression::Unary(..) => true,
    _ => false,
  };
  write_maybe_parenthesized(out, base, parens);
}

fn write_maybe_parenthesized(out: &mut String, expression: &Expression, parens: bool) {
  if parens {
    out.push('(');
  }
  write_expression(out, expression);
  if parens {
    out.push(')');
  }
}

#[cfg(test)]
fn parse_serialize(source: &str, fragment_shader: bool) -> String {
  let mut options = crate::Options::new(fragment_shader);
  options.cpp_path = None;
  let mut parser = crate::ShaderParser::with_options(options);
  parser.parse(source).unwrap();
  parser.serialize()
}

#[cfg(test)]
fn print_expr(source: &str) -> String {
  let mut lexer = crate::lex::Lexer::new();
  lexer.input(source);
  let tokens = lexer.tokenize();
  let expression = crate::parse::Parser::new(&tokens).parse_expression().unwrap();
  let mut out = String::new();
  write_expression(&mut out, &expression);
  out
}

#[cfg(test)]
#[test]
fn test_main_body() {
  let text = parse_serialize("void main(){ gl_Position = 2 + mvp * vertex; }", false);
  assert_eq!(text, "void main() {\n    gl_Position = 2 + (mvp * vertex);\n}\n");
}

#[cfg(test)]
#[test]
fn test_declarations_come_first() {
  let source = "void main() { gl_FragColor = vec4(uv, 0.0, 1.0); }\nvarying vec2 uv;\nuniform sampler2D tex;\n";
  let text = parse_serialize(source, true);
  assert_eq!(text,
             "varying vec2 uv;\n\
              uniform lowp sampler2D tex;\n\
              void main() {\n    gl_FragColor = vec4(uv, 0.0, 1.0);\n}\n");
}

#[cfg(test)]
#[test]
fn test_parameters_and_locals() {
  let text = parse_serialize("void f(inout vec3 v, in float s) { vec4 tmp; }", false);
  assert_eq!(text, "void f(inout vec3 v, float s) {\n    vec4 tmp;\n}\n");
}

#[cfg(test)]
#[test]
fn test_parenthesization() {
  // tighter-binding right operands keep explicit parens
  assert_eq!(print_expr("a + b * c"), "a + (b * c)");
  // looser-binding left operands require them
  assert_eq!(print_expr("(a + b) * c"), "(a + b) * c");
  // same precedence on the left stays flat
  assert_eq!(print_expr("a - b + c"), "a - b + c");
  assert_eq!(print_expr("-(a + b)"), "-(a + b)");
  assert_eq!(print_expr("x = y = z"), "x = y = z");
  assert_eq!(print_expr("(a + b).x"), "(a + b).x");
}

#[cfg(test)]
#[test]
fn test_printed_expressions_are_stable() {
  for source in &[
    "a + b * c",
    "(a + b) * c",
    "a * b + c",
    "a || b && c",
    "f(a, b)[1].xy",
    "x += -y * 2.0",
    "a << 1 | b >> 2",
  ] {
    let printed = print_expr(source);
    assert_eq!(print_expr(&printed), printed);
  }
}

#[cfg(test)]
#[test]
fn test_if_else_rendering() {
  let source = "void f() { if (a < 0.5) { x = 1; } else if (b) { x = 2; } else discard; }";
  let text = parse_serialize(source, true);
  assert_eq!(text,
             "void f() {\n    \
                  if (a < 0.5) {\n        \
                      x = 1;\n    \
                  } else if (b) {\n        \
                      x = 2;\n    \
                  } else\n        \
                      discard;\n\
              }\n");
}

#[cfg(test)]
#[test]
fn test_round_trip_idempotence() {
  let source = "#version 300 es\n\
                precision highp float;\n\
                uniform mat4 mvp;\n\
                in vec3 position;\n\
                out vec4 color;\n\
                float scaled(float x) { return x * 0.5; }\n\
                void main() { if (position.x > 0.0) color = vec4(scaled(position.x), 0.0, 0.0, 1.0); else color = vec4(0.0); }\n";

  let once = parse_serialize(source, false);
  let twice = parse_serialize(&once, false);
  assert_eq!(twice, once);
}
