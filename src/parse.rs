//! Recursive-descent grammar over the token stream. One function per
//! binary-operator precedence level; left-associative except assignment.

use crate::ast::*;
use crate::lex::{Token,TokenKind};
use crate::{Error,Result};

pub(crate) fn parse(tokens: &[Token]) -> Result<Vec<ExternalDeclaration>> {
  Parser::new(tokens).parse_translation_unit()
}

pub struct Parser<'a> {
  tokens: &'a [Token],
}

impl<'a> Parser<'a> {
  pub fn new(tokens: &'a [Token]) -> Parser<'a> {
    Parser{
      tokens,
    }
  }

  pub fn parse_translation_unit(&mut self) -> Result<Vec<ExternalDeclaration>> {
    let mut result = vec![];

    while !self.tokens.is_empty() {
      let external = self.parse_external_declaration()?;
      result.push(external);
    }

    Ok(result)
  }

  fn peek(&self) -> Result<&'a TokenKind> {
    self.tokens.first().map(|t| &t.kind).ok_or(Error::EndOfInput)
  }

  fn peek_kind(&self) -> Option<&'a TokenKind> {
    self.tokens.first().map(|t| &t.kind)
  }

  fn peekn_kind(&self, n: usize) -> Option<&'a TokenKind> {
    self.tokens.get(n).map(|t| &t.kind)
  }

  fn consume(&mut self, kind: &TokenKind) -> bool {
    match self.tokens.split_first() {
      Some((first, rest)) if &first.kind == kind => {
        self.tokens = rest;
        true
      },
      _ => false,
    }
  }

  fn must_consume(&mut self, kind: &TokenKind) -> Result<()> {
    if self.consume(kind) { Ok(()) } else { self.unexpected() }
  }

  fn consume_ident(&mut self) -> Option<String> {
    match self.tokens.split_first() {
      Some((first, rest)) if first.kind == TokenKind::Identifier => {
        self.tokens = rest;
        Some(first.text.clone())
      },
      _ => None,
    }
  }

  fn must_consume_ident(&mut self) -> Result<String> {
    match self.consume_ident() {
      Some(ident) => Ok(ident),
      None => self.unexpected(),
    }
  }

  fn advance(&mut self) {
    if let Some((_, rest)) = self.tokens.split_first() {
      self.tokens = rest;
    }
  }

  fn unexpected<T>(&self) -> Result<T> {
    match self.tokens.first() {
      Some(token) => Err(Error::Syntax{ line: token.line, token: token.text.clone() }),
      None => Err(Error::EndOfInput),
    }
  }

  fn parse_external_declaration(&mut self) -> Result<ExternalDeclaration> {
    if self.consume(&TokenKind::Precision) {
      let qualifier = self.must_parse_precision_qualifier()?;
      let type_specifier = self.parse_type_specifier()?;
      self.must_consume(&TokenKind::Semicolon)?;
      return Ok(ExternalDeclaration::Precision(PrecisionStatement{ qualifier, type_specifier }));
    }

    let layout_qualifier = self.parse_layout_qualifier();
    let type_qualifier = if self.consume(&TokenKind::Const) { Some(TypeQualifier::Const) } else { None };
    let precision_qualifier = self.parse_precision_qualifier();

    let unqualified = layout_qualifier.is_none() && type_qualifier.is_none() && precision_qualifier.is_none();
    let type_specifier = self.parse_type_specifier()?;

    // `type name (` can only open a function at this point
    if unqualified
      && self.peek_kind() == Some(&TokenKind::Identifier)
      && self.peekn_kind(1) == Some(&TokenKind::LeftParen) {

      let name = self.must_consume_ident()?;
      self.must_consume(&TokenKind::LeftParen)?;
      let parameters = self.parse_parameter_declarations()?;
      let prototype = FunctionPrototype{ name, return_type: type_specifier, parameters };

      if self.consume(&TokenKind::Semicolon) {
        return Ok(ExternalDeclaration::Prototype(prototype));
      }
      let body = self.parse_compound_statement()?;
      return Ok(ExternalDeclaration::Function(FunctionDefinition{ prototype, body }));
    }

    let declarations = self.parse_declarators(type_specifier, type_qualifier, layout_qualifier, precision_qualifier)?;
    Ok(ExternalDeclaration::Variables(declarations))
  }

  fn parse_layout_qualifier(&mut self) -> Option<LayoutQualifier> {
    let qualifier = match self.peek_kind()? {
      TokenKind::Varying => LayoutQualifier::Varying,
      TokenKind::Uniform => LayoutQualifier::Uniform,
      TokenKind::Attribute => LayoutQualifier::Attribute,
      TokenKind::In => LayoutQualifier::In,
      TokenKind::Out => LayoutQualifier::Out,
      _ => return None,
    };
    self.advance();
    Some(qualifier)
  }

  fn parse_precision_qualifier(&mut self) -> Option<PrecisionQualifier> {
    if let Some(&TokenKind::PrecisionQualifier(qualifier)) = self.peek_kind() {
      self.advance();
      Some(qualifier)
    } else {
      None
    }
  }

  fn must_parse_precision_qualifier(&mut self) -> Result<PrecisionQualifier> {
    match self.parse_precision_qualifier() {
      Some(qualifier) => Ok(qualifier),
      None => self.unexpected(),
    }
  }

  fn parse_type_specifier(&mut self) -> Result<TypeSpecifier> {
    if let &TokenKind::Type(type_specifier) = self.peek()? {
      self.advance();
      Ok(type_specifier)
    } else {
      self.unexpected()
    }
  }

  /// One or more comma-separated declarators sharing the line's
  /// qualifiers and type, terminated by `;`.
  fn parse_declarators(&mut self,
                       type_specifier: TypeSpecifier,
                       type_qualifier: Option<TypeQualifier>,
                       layout_qualifier: Option<LayoutQualifier>,
                       precision_qualifier: Option<PrecisionQualifier>) -> Result<Vec<VariableDeclaration>> {
    let mut result = vec![];

    loop {
      let line = self.tokens.first().map(|t| t.line).unwrap_or(0);
      let name = self.must_consume_ident()?;

      let array_size = if self.consume(&TokenKind::LeftBracket) {
        let size = self.parse_expression()?;
        self.must_consume(&TokenKind::RightBracket)?;
        Some(size)
      } else {
        None
      };

      let initializer = if self.consume(&TokenKind::Equal) {
        Some(self.parse_assignment_expression()?)
      } else {
        None
      };

      result.push(VariableDeclaration{
        name,
        type_specifier,
        type_qualifier,
        layout_qualifier,
        precision_qualifier,
        array_size,
        initializer,
        line,
      });

      if !self.consume(&TokenKind::Comma) { break; }
    }
    self.must_consume(&TokenKind::Semicolon)?;

    Ok(result)
  }

  fn parse_parameter_declarations(&mut self) -> Result<Vec<ParameterDeclaration>> {
    if self.consume(&TokenKind::RightParen) {
      return Ok(vec![]);
    }

    // `(void)` is the empty parameter list
    if self.peek_kind() == Some(&TokenKind::Type(TypeSpecifier::Void))
      && self.peekn_kind(1) == Some(&TokenKind::RightParen) {
      self.advance();
      self.advance();
      return Ok(vec![]);
    }

    let mut result = vec![];

    loop {
      let qualifier = match self.peek()? {
        TokenKind::In => { self.advance(); ParameterQualifier::In },
        TokenKind::Out => { self.advance(); ParameterQualifier::Out },
        TokenKind::Inout => { self.advance(); ParameterQualifier::InOut },
        _ => ParameterQualifier::In,
      };
      let type_specifier = self.parse_type_specifier()?;
      let name = self.consume_ident();

      result.push(ParameterDeclaration{ qualifier, type_specifier, name });

      if self.consume(&TokenKind::RightParen) {
        break;
      } else {
        self.must_consume(&TokenKind::Comma)?;
      }
    }

    Ok(result)
  }

  fn parse_compound_statement(&mut self) -> Result<CompoundStatement> {
    self.must_consume(&TokenKind::LeftBrace)?;

    let mut items = vec![];
    loop {
      if self.tokens.is_empty() { return self.unexpected(); }
      if self.consume(&TokenKind::RightBrace) { break; }

      if self.starts_declaration() {
        let type_qualifier = if self.consume(&TokenKind::Const) { Some(TypeQualifier::Const) } else { None };
        let precision_qualifier = self.parse_precision_qualifier();
        let type_specifier = self.parse_type_specifier()?;
        let declarations = self.parse_declarators(type_specifier, type_qualifier, None, precision_qualifier)?;
        items.extend(declarations.into_iter().map(BlockItem::Declaration));
      } else {
        items.push(BlockItem::Statement(self.parse_statement()?));
      }
    }

    Ok(CompoundStatement{ items })
  }

  fn starts_declaration(&self) -> bool {
    match self.peek_kind() {
      Some(TokenKind::Const) | Some(TokenKind::PrecisionQualifier(_)) => true,
      // a type keyword followed by `(` is a constructor call, not a declaration
      Some(TokenKind::Type(_)) => self.peekn_kind(1) == Some(&TokenKind::Identifier),
      _ => false,
    }
  }

  fn parse_statement(&mut self) -> Result<Statement> {
    if self.peek_kind() == Some(&TokenKind::LeftBrace) {
      return Ok(Statement::Compound(self.parse_compound_statement()?));
    }

    if self.consume(&TokenKind::If) {
      self.must_consume(&TokenKind::LeftParen)?;
      let condition = self.parse_expression()?;
      self.must_consume(&TokenKind::RightParen)?;
      let then_branch = Box::new(self.parse_statement()?);
      // an `else` binds to the nearest unmatched `if`
      let else_branch = if self.consume(&TokenKind::Else) {
        Some(Box::new(self.parse_statement()?))
      } else {
        None
      };
      return Ok(Statement::If{ condition, then_branch, else_branch });
    }

    if self.consume(&TokenKind::Return) {
      if self.consume(&TokenKind::Semicolon) {
        return Ok(Statement::Return(None));
      }
      let value = self.parse_expression()?;
      self.must_consume(&TokenKind::Semicolon)?;
      return Ok(Statement::Return(Some(value)));
    }

    if self.consume(&TokenKind::Discard) {
      self.must_consume(&TokenKind::Semicolon)?;
      return Ok(Statement::Discard);
    }

    let expression = self.parse_expression()?;
    self.must_consume(&TokenKind::Semicolon)?;
    Ok(Statement::Expression(expression))
  }

  pub fn parse_expression(&mut self) -> Result<Expression> {
    self.parse_assignment_expression()
  }

  fn parse_assignment_expression(&mut self) -> Result<Expression> {
    let lhs = self.parse_logical_or_expression()?;

    let op = match self.peek_kind() {
      Some(TokenKind::Equal) => AssignOp::Assign,
      Some(TokenKind::AddAssign) => AssignOp::Add,
      Some(TokenKind::SubAssign) => AssignOp::Sub,
      Some(TokenKind::MulAssign) => AssignOp::Mul,
      Some(TokenKind::DivAssign) => AssignOp::Div,
      Some(TokenKind::ModAssign) => AssignOp::Mod,
      Some(TokenKind::LeftAssign) => AssignOp::Shl,
      Some(TokenKind::RightAssign) => AssignOp::Shr,
      Some(TokenKind::AndAssign) => AssignOp::And,
      Some(TokenKind::XorAssign) => AssignOp::Xor,
      Some(TokenKind::OrAssign) => AssignOp::Or,
      _ => return Ok(lhs),
    };
    self.advance();

    // right-associative
    let rhs = self.parse_assignment_expression()?;
    Ok(Expression::Assignment(op, Box::new(lhs), Box::new(rhs)))
  }

  fn parse_logical_or_expression(&mut self) -> Result<Expression> {
    let mut a = self.parse_logical_and_expression()?;
    while self.consume(&TokenKind::OrOp) {
      let b = self.parse_logical_and_expression()?;
      a = Expression::Binary(BinaryOp::Or, Box::new(a), Box::new(b));
    }
    Ok(a)
  }

  fn parse_logical_and_expression(&mut self) -> Result<Expression> {
    let mut a = self.parse_bitwise_or_expression()?;
    while self.consume(&TokenKind::AndOp) {
      let b = self.parse_bitwise_or_expression()?;
      a = Expression::Binary(BinaryOp::And, Box::new(a), Box::new(b));
    }
    Ok(a)
  }

  fn parse_bitwise_or_expression(&mut self) -> Result<Expression> {
    let mut a = self.parse_bitwise_xor_expression()?;
    while self.consume(&TokenKind::VerticalBar) {
      let b = self.parse_bitwise_xor_expression()?;
      a = Expression::Binary(BinaryOp::BitOr, Box::new(a), Box::new(b));
    }
    Ok(a)
  }

  fn parse_bitwise_xor_expression(&mut self) -> Result<Expression> {
    let mut a = self.parse_bitwise_and_expression()?;
    while self.consume(&TokenKind::Caret) {
      let b = self.parse_bitwise_and_expression()?;
      a = Expression::Binary(BinaryOp::BitXor, Box::new(a), Box::new(b));
    }
    Ok(a)
  }

  fn parse_bitwise_and_expression(&mut self) -> Result<Expression> {
    let mut a = self.parse_equality_expression()?;
    while self.consume(&TokenKind::Ampersand) {
      let b = self.parse_equality_expression()?;
      a = Expression::Binary(BinaryOp::BitAnd, Box::new(a), Box::new(b));
    }
    Ok(a)
  }

  fn parse_equality_expression(&mut self) -> Result<Expression> {
    let mut a = self.parse_relational_expression()?;
    loop {
      let op = if self.consume(&TokenKind::EqOp) {
        BinaryOp::Eq
      } else if self.consume(&TokenKind::NeOp) {
        BinaryOp::Ne
      } else {
        return Ok(a);
      };
      let b = self.parse_relational_expression()?;
      a = Expression::Binary(op, Box::new(a), Box::new(b));
    }
  }

  fn parse_relational_expression(&mut self) -> Result<Expression> {
    let mut a = self.parse_shift_expression()?;
    loop {
      let op = if self.consume(&TokenKind::LeftAngle) {
        BinaryOp::Lt
      } else if self.consume(&TokenKind::RightAngle) {
        BinaryOp::Gt
      } else if self.consume(&TokenKind::LeOp) {
        BinaryOp::Le
      } else if self.consume(&TokenKind::GeOp) {
        BinaryOp::Ge
      } else {
        return Ok(a);
      };
      let b = self.parse_shift_expression()?;
      a = Expression::Binary(op, Box::new(a), Box::new(b));
    }
  }

  fn parse_shift_expression(&mut self) -> Result<Expression> {
    let mut a = self.parse_additive_expression()?;
    loop {
      let op = if self.consume(&TokenKind::LeftOp) {
        BinaryOp::Shl
      } else if self.consume(&TokenKind::RightOp) {
        BinaryOp::Shr
      } else {
        return Ok(a);
      };
      let b = self.parse_additive_expression()?;
      a = Expression::Binary(op, Box::new(a), Box::new(b));
    }
  }

  fn parse_additive_expression(&mut self) -> Result<Expression> {
    let mut a = self.parse_multiplicative_expression()?;
    loop {
      let op = if self.consume(&TokenKind::Plus) {
        BinaryOp::Add
      } else if self.consume(&TokenKind::Dash) {
        BinaryOp::Sub
      } else {
        return Ok(a);
      };
      let b = self.parse_multiplicative_expression()?;
      a = Expression::Binary(op, Box::new(a), Box::new(b));
    }
  }

  fn parse_multiplicative_expression(&mut self) -> Result<Expression> {
    let mut a = self.parse_unary_expression()?;
    loop {
      let op = if self.consume(&TokenKind::Star) {
        BinaryOp::Mul
      } else if self.consume(&TokenKind::Slash) {
        BinaryOp::Div
      } else if self.consume(&TokenKind::Percent) {
        BinaryOp::Mod
      } else {
        return Ok(a);
      };
      let b = self.parse_unary_expression()?;
      a = Expression::Binary(op, Box::new(a), Box::new(b));
    }
  }

  fn parse_unary_expression(&mut self) -> Result<Expression> {
    let op = match self.peek_kind() {
      Some(TokenKind::Plus) => UnaryOp::Plus,
      Some(TokenKind::Dash) => UnaryOp::Minus,
      Some(TokenKind::Bang) => UnaryOp::Not,
      Some(TokenKind::Tilde) => UnaryOp::BitNot,
      Some(TokenKind::IncOp) => UnaryOp::PreInc,
      Some(TokenKind::DecOp) => UnaryOp::PreDec,
      _ => return self.parse_postfix_expression(),
    };
    self.advance();
    let operand = self.parse_unary_expression()?;
    Ok(Expression::Unary(op, Box::new(operand)))
  }

  fn parse_postfix_expression(&mut self) -> Result<Expression> {
    // constructors (`vec4(...)`) and user calls are indistinguishable here
    let callee = match self.tokens.first() {
      Some(t) if t.kind == TokenKind::Identifier => Some(t.text.clone()),
      Some(t) => {
        if let TokenKind::Type(type_specifier) = t.kind {
          Some(type_specifier.spelling().to_string())
        } else {
          None
        }
      },
      None => None,
    };
    let mut expr = match callee {
      Some(name) if self.peekn_kind(1) == Some(&TokenKind::LeftParen) => {
        self.advance();
        self.advance();
        let mut arguments = vec![];
        if !self.consume(&TokenKind::RightParen) {
          loop {
            arguments.push(self.parse_assignment_expression()?);
            if !self.consume(&TokenKind::Comma) { break; }
          }
          self.must_consume(&TokenKind::RightParen)?;
        }
        Expression::Call(name, arguments)
      },
      _ => self.parse_primary_expression()?,
    };

    loop {
      if self.consume(&TokenKind::LeftBracket) {
        let index = self.parse_expression()?;
        self.must_consume(&TokenKind::RightBracket)?;
        expr = Expression::Index(Box::new(expr), Box::new(index));
      } else if self.consume(&TokenKind::Dot) {
        // struct fields and swizzles look the same at this layer
        let field = self.must_consume_ident()?;
        expr = Expression::Member(Box::new(expr), field);
      } else if self.consume(&TokenKind::IncOp) {
        expr = Expression::Unary(UnaryOp::PostInc, Box::new(expr));
      } else if self.consume(&TokenKind::DecOp) {
        expr = Expression::Unary(UnaryOp::PostDec, Box::new(expr));
      } else {
        return Ok(expr);
      }
    }
  }

  fn parse_primary_expression(&mut self) -> Result<Expression> {
    if self.consume(&TokenKind::LeftParen) {
      let expr = self.parse_expression()?;
      self.must_consume(&TokenKind::RightParen)?;
      return Ok(expr);
    }

    let first = match self.tokens.first() {
      Some(first) => first,
      None => return Err(Error::EndOfInput),
    };
    let primary = match first.kind {
      TokenKind::Identifier => Expression::Identifier(first.text.clone()),
      TokenKind::IntConstant => Expression::IntLiteral(first.text.clone()),
      TokenKind::FloatConstant => Expression::FloatLiteral(first.text.clone()),
      TokenKind::BoolConstant => Expression::BoolLiteral(first.text == "true"),
      _ => return self.unexpected(),
    };
    self.advance();
    Ok(primary)
  }
}

#[cfg(test)]
fn tokens(source: &str) -> Vec<Token> {
  let mut lexer = crate::lex::Lexer::new();
  lexer.input(source);
  lexer.tokenize()
}

#[cfg(test)]
fn expr(source: &str) -> Expression {
  let tokens = tokens(source);
  Parser::new(&tokens).parse_expression().unwrap()
}

#[cfg(test)]
#[test]
fn test_order_of_operations() {
  use self::Expression::*;

  // multiplication binds tighter on the right
  assert_eq!(expr("1 + 2 * 3"),
             Binary(BinaryOp::Add,
                    Box::new(IntLiteral("1".to_string())),
                    Box::new(Binary(BinaryOp::Mul,
                                    Box::new(IntLiteral("2".to_string())),
                                    Box::new(IntLiteral("3".to_string()))))));

  // and on the left
  assert_eq!(expr("1 * 2 + 3"),
             Binary(BinaryOp::Add,
                    Box::new(Binary(BinaryOp::Mul,
                                    Box::new(IntLiteral("1".to_string())),
                                    Box::new(IntLiteral("2".to_string())))),
                    Box::new(IntLiteral("3".to_string()))));

  // parens override
  assert_eq!(expr("(1 + 2) * 3"),
             Binary(BinaryOp::Mul,
                    Box::new(Binary(BinaryOp::Add,
                                    Box::new(IntLiteral("1".to_string())),
                                    Box::new(IntLiteral("2".to_string())))),
                    Box::new(IntLiteral("3".to_string()))));
}

#[cfg(test)]
#[test]
fn test_left_associativity() {
  use self::Expression::*;

  assert_eq!(expr("a - b - c"),
             Binary(BinaryOp::Sub,
                    Box::new(Binary(BinaryOp::Sub,
                                    Box::new(Identifier("a".to_string())),
                                    Box::new(Identifier("b".to_string())))),
                    Box::new(Identifier("c".to_string()))));
}

#[cfg(test)]
#[test]
fn test_assignment_is_right_associative() {
  use self::Expression::*;

  assert_eq!(expr("a = b = c"),
             Assignment(AssignOp::Assign,
                        Box::new(Identifier("a".to_string())),
                        Box::new(Assignment(AssignOp::Assign,
                                            Box::new(Identifier("b".to_string())),
                                            Box::new(Identifier("c".to_string()))))));
}

#[cfg(test)]
#[test]
fn test_postfix_chain() {
  use self::Expression::*;

  assert_eq!(expr("texture2D(sampler, uv).xyz[0]"),
             Index(Box::new(Member(Box::new(Call("texture2D".to_string(),
                                                 vec![
                                                   Identifier("sampler".to_string()),
                                                   Identifier("uv".to_string()),
                                                 ])),
                                   "xyz".to_string())),
                   Box::new(IntLiteral("0".to_string()))));
}

#[cfg(test)]
#[test]
fn test_constructor_call() {
  use self::Expression::*;

  assert_eq!(expr("vec2(0.5, y)"),
             Call("vec2".to_string(),
                  vec![
                    FloatLiteral("0.5".to_string()),
                    Identifier("y".to_string()),
                  ]));
}

#[cfg(test)]
#[test]
fn test_function_definition() {
  let tokens = tokens("void f(inout vec3 v) { vec4 tmp; }");
  let unit = parse(&tokens).unwrap();

  assert_eq!(unit.len(), 1);
  let function = match &unit[0] {
    ExternalDeclaration::Function(function) => function,
    other => panic!("expected a function definition, got {:?}", other),
  };
  assert_eq!(function.name(), "f");
  assert_eq!(function.return_type(), TypeSpecifier::Void);
  assert_eq!(function.parameters(),
             &[ParameterDeclaration{
               qualifier: ParameterQualifier::InOut,
               type_specifier: TypeSpecifier::Vec3,
               name: Some("v".to_string()),
             }]);
  assert_eq!(function.body.items,
             vec![BlockItem::Declaration(VariableDeclaration{
               name: "tmp".to_string(),
               type_specifier: TypeSpecifier::Vec4,
               type_qualifier: None,
               layout_qualifier: None,
               precision_qualifier: None,
               array_size: None,
               initializer: None,
               line: 1,
             })]);
}

#[cfg(test)]
#[test]
fn test_void_parameter_list() {
  for source in &["void main(void) {}", "void main() {}"] {
    let tokens = tokens(source);
    let unit = parse(&tokens).unwrap();
    match &unit[0] {
      ExternalDeclaration::Function(function) => assert_eq!(function.parameters(), &[]),
      other => panic!("expected a function definition, got {:?}", other),
    }
  }
}

#[cfg(test)]
#[test]
fn test_forward_declaration() {
  let tokens = tokens("float brightness(vec3 color);");
  let unit = parse(&tokens).unwrap();
  match &unit[0] {
    ExternalDeclaration::Prototype(prototype) => {
      assert_eq!(prototype.name, "brightness");
      assert_eq!(prototype.return_type, TypeSpecifier::Float);
    },
    other => panic!("expected a prototype, got {:?}", other),
  }
}

#[cfg(test)]
#[test]
fn test_comma_declarators_are_flattened() {
  let tokens = tokens("uniform float a, b = 1.0, c[2];");
  let unit = parse(&tokens).unwrap();

  let vars = match &unit[0] {
    ExternalDeclaration::Variables(vars) => vars,
    other => panic!("expected variables, got {:?}", other),
  };
  assert_eq!(vars.len(), 3);
  assert!(vars.iter().all(|v| v.layout_qualifier == Some(LayoutQualifier::Uniform)));
  assert!(vars.iter().all(|v| v.type_specifier == TypeSpecifier::Float));
  assert_eq!(vars[0].initializer, None);
  assert_eq!(vars[1].initializer, Some(Expression::FloatLiteral("1.0".to_string())));
  assert_eq!(vars[2].array_size, Some(Expression::IntLiteral("2".to_string())));
}

#[cfg(test)]
#[test]
fn test_dangling_else_binds_to_nearest_if() {
  let tokens = tokens("void f() { if (a) if (b) x = 1; else x = 2; }");
  let unit = parse(&tokens).unwrap();

  let function = match &unit[0] {
    ExternalDeclaration::Function(function) => function,
    other => panic!("expected a function definition, got {:?}", other),
  };
  let outer = match &function.body.items[0] {
    BlockItem::Statement(Statement::If{ else_branch, then_branch, .. }) => {
      assert!(else_branch.is_none());
      then_branch
    },
    other => panic!("expected an if, got {:?}", other),
  };
  match &**outer {
    Statement::If{ else_branch, .. } => assert!(else_branch.is_some()),
    other => panic!("expected a nested if, got {:?}", other),
  }
}

#[cfg(test)]
#[test]
fn test_precision_statement() {
  let tokens = tokens("precision mediump float;");
  let unit = parse(&tokens).unwrap();
  assert_eq!(unit,
             vec![ExternalDeclaration::Precision(PrecisionStatement{
               qualifier: PrecisionQualifier::Mediump,
               type_specifier: TypeSpecifier::Float,
             })]);
}

#[cfg(test)]
#[test]
fn test_syntax_error_carries_line_and_token() {
  match parse(&tokens("varying ;")) {
    Err(Error::Syntax{ line, token }) => {
      assert_eq!(line, 1);
      assert_eq!(token, ";");
    },
    other => panic!("expected a syntax error, got {:?}", other),
  }

  match parse(&tokens("void f() { return")) {
    Err(Error::EndOfInput) => {},
    other => panic!("expected end-of-input, got {:?}", other),
  }
}

#[cfg(test)]
#[test]
fn test_return_and_discard() {
  let tokens = tokens("void f() { if (x > 0.5) discard; return; }");
  let unit = parse(&tokens).unwrap();
  let function = match &unit[0] {
    ExternalDeclaration::Function(function) => function,
    other => panic!("expected a function definition, got {:?}", other),
  };
  assert_eq!(function.body.items.len(), 2);
  assert_eq!(function.body.items[1], BlockItem::Statement(Statement::Return(None)));
}
