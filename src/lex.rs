//! Converts shader source text into a token stream. `input` resets the
//! scanner, `token` hands out one token at a time; lexical errors are
//! logged and skipped so a stray byte never kills the whole scan.

use std::collections::HashMap;

use crate::ast::{PrecisionQualifier,TypeSpecifier};

#[derive(Debug,Clone,PartialEq)]
pub struct Token {
  pub kind: TokenKind,
  pub text: String,
  pub line: usize,
}

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum TokenKind {
  // Types and precision keywords carry their resolved meaning so the
  // parser never re-inspects spellings.
  Type(TypeSpecifier),
  PrecisionQualifier(PrecisionQualifier),
  // Qualifiers
  Varying,
  Uniform,
  Attribute,
  In,
  Out,
  Inout,
  Const,
  Layout,
  Centroid,
  Flat,
  Smooth,
  Invariant,
  Precision,
  // Control flow
  If,
  Else,
  For,
  While,
  Do,
  Break,
  Continue,
  Return,
  Discard,
  Switch,
  Case,
  Default,
  Struct,
  // Literals
  Identifier,
  IntConstant,
  FloatConstant,
  BoolConstant,
  // Operators
  Plus,
  Dash,
  Star,
  Slash,
  Percent,
  Bang,
  Tilde,
  Question,
  LeftAngle,
  RightAngle,
  LeOp,
  GeOp,
  EqOp,
  NeOp,
  AndOp,
  OrOp,
  XorOp,
  LeftOp,
  RightOp,
  IncOp,
  DecOp,
  Ampersand,
  VerticalBar,
  Caret,
  Equal,
  AddAssign,
  SubAssign,
  MulAssign,
  DivAssign,
  ModAssign,
  LeftAssign,
  RightAssign,
  AndAssign,
  XorAssign,
  OrAssign,
  // Symbols
  LeftParen,
  RightParen,
  LeftBracket,
  RightBracket,
  LeftBrace,
  RightBrace,
  Dot,
  Comma,
  Colon,
  Semicolon,
  /// End-of-input sentinel.
  End,
}

lazy_static! {
  static ref KEYWORDS: HashMap<&'static str, TokenKind> = {
    use crate::ast::TypeSpecifier::*;
    let mut m = HashMap::new();
    m.insert("void", TokenKind::Type(Void));
    m.insert("bool", TokenKind::Type(Bool));
    m.insert("int", TokenKind::Type(Int));
    m.insert("uint", TokenKind::Type(Uint));
    m.insert("float", TokenKind::Type(Float));
    m.insert("vec2", TokenKind::Type(Vec2));
    m.insert("vec3", TokenKind::Type(Vec3));
    m.insert("vec4", TokenKind::Type(Vec4));
    m.insert("bvec2", TokenKind::Type(BVec2));
    m.insert("bvec3", TokenKind::Type(BVec3));
    m.insert("bvec4", TokenKind::Type(BVec4));
    m.insert("ivec2", TokenKind::Type(IVec2));
    m.insert("ivec3", TokenKind::Type(IVec3));
    m.insert("ivec4", TokenKind::Type(IVec4));
    m.insert("uvec2", TokenKind::Type(UVec2));
    m.insert("uvec3", TokenKind::Type(UVec3));
    m.insert("uvec4", TokenKind::Type(UVec4));
    m.insert("mat2", TokenKind::Type(Mat2));
    m.insert("mat3", TokenKind::Type(Mat3));
    m.insert("mat4", TokenKind::Type(Mat4));
    m.insert("mat2x2", TokenKind::Type(Mat2x2));
    m.insert("mat2x3", TokenKind::Type(Mat2x3));
    m.insert("mat2x4", TokenKind::Type(Mat2x4));
    m.insert("mat3x2", TokenKind::Type(Mat3x2));
    m.insert("mat3x3", TokenKind::Type(Mat3x3));
    m.insert("mat3x4", TokenKind::Type(Mat3x4));
    m.insert("mat4x2", TokenKind::Type(Mat4x2));
    m.insert("mat4x3", TokenKind::Type(Mat4x3));
    m.insert("mat4x4", TokenKind::Type(Mat4x4));
    m.insert("sampler2D", TokenKind::Type(Sampler2D));
    m.insert("sampler2DArray", TokenKind::Type(Sampler2DArray));
    m.insert("sampler3D", TokenKind::Type(Sampler3D));
    m.insert("samplerCube", TokenKind::Type(SamplerCube));
    m.insert("sampler2DShadow", TokenKind::Type(Sampler2DShadow));
    m.insert("sampler2DArrayShadow", TokenKind::Type(Sampler2DArrayShadow));
    m.insert("samplerCubeShadow", TokenKind::Type(SamplerCubeShadow));
    m.insert("isampler2D", TokenKind::Type(ISampler2D));
    m.insert("isampler2DArray", TokenKind::Type(ISampler2DArray));
    m.insert("isampler3D", TokenKind::Type(ISampler3D));
    m.insert("isamplerCube", TokenKind::Type(ISamplerCube));
    m.insert("usampler2D", TokenKind::Type(USampler2D));
    m.insert("usampler2DArray", TokenKind::Type(USampler2DArray));
    m.insert("usampler3D", TokenKind::Type(USampler3D));
    m.insert("usamplerCube", TokenKind::Type(USamplerCube));
    m.insert("varying", TokenKind::Varying);
    m.insert("uniform", TokenKind::Uniform);
    m.insert("attribute", TokenKind::Attribute);
    m.insert("in", TokenKind::In);
    m.insert("out", TokenKind::Out);
    m.insert("inout", TokenKind::Inout);
    m.insert("const", TokenKind::Const);
    m.insert("layout", TokenKind::Layout);
    m.insert("centroid", TokenKind::Centroid);
    m.insert("flat", TokenKind::Flat);
    m.insert("smooth", TokenKind::Smooth);
    m.insert("invariant", TokenKind::Invariant);
    m.insert("precision", TokenKind::Precision);
    m.insert("lowp", TokenKind::PrecisionQualifier(PrecisionQualifier::Lowp));
    m.insert("mediump", TokenKind::PrecisionQualifier(PrecisionQualifier::Mediump));
    m.insert("highp", TokenKind::PrecisionQualifier(PrecisionQualifier::Highp));
    m.insert("if", TokenKind::If);
    m.insert("else", TokenKind::Else);
    m.insert("for", TokenKind::For);
    m.insert("while", TokenKind::While);
    m.insert("do", TokenKind::Do);
    m.insert("break", TokenKind::Break);
    m.insert("continue", TokenKind::Continue);
    m.insert("return", TokenKind::Return);
    m.insert("discard", TokenKind::Discard);
    m.insert("switch", TokenKind::Switch);
    m.insert("case", TokenKind::Case);
    m.insert("default", TokenKind::Default);
    m.insert("struct", TokenKind::Struct);
    m.insert("true", TokenKind::BoolConstant);
    m.insert("false", TokenKind::BoolConstant);
    m
  };
}

pub struct Lexer {
  chars: Vec<char>,
  pos: usize,
  line: usize,
}

impl Lexer {
  pub fn new() -> Self {
    Lexer{
      chars: vec![],
      pos: 0,
      line: 1,
    }
  }

  /// Loads new source text and resets the scan position and line counter.
  pub fn input(&mut self, text: &str) {
    self.chars = text.chars().collect();
    self.pos = 0;
    self.line = 1;
  }

  /// Returns the next token, or the `End` sentinel once the input is
  /// exhausted. Unrecognized characters are logged and skipped.
  pub fn token(&mut self) -> Token {
    loop {
      self.skip_whitespace();

      let line = self.line;
      let next = match self.peek() {
        Some(c) => c,
        None => return Token{ kind: TokenKind::End, text: String::new(), line },
      };

      if next.is_ascii_alphabetic() || next == '_' {
        let text = self.take(|c| c.is_ascii_alphanumeric() || c == '_');
        let kind = KEYWORDS.get(text.as_str()).cloned().unwrap_or(TokenKind::Identifier);
        return Token{ kind, text, line };
      }

      if next.is_ascii_digit() {
        let (kind, text) = self.number();
        return Token{ kind, text, line };
      }

      if let Some((kind, text)) = self.operator(next) {
        return Token{ kind, text, line };
      }

      log::error!("Illegal character {:?} at line {}", next, line);
      self.advance();
    }
  }

  /// Drains the stream. The `End` sentinel is not included.
  pub fn tokenize(&mut self) -> Vec<Token> {
    let mut result = vec![];
    loop {
      let token = self.token();
      if token.kind == TokenKind::End {
        return result;
      }
      result.push(token);
    }
  }

  fn skip_whitespace(&mut self) {
    while let Some(next) = self.peek() {
      if next == ' ' || next == '\t' || next == '\n' {
        self.advance();
      } else {
        break;
      }
    }
  }

  fn number(&mut self) -> (TokenKind, String) {
    let mut text = String::new();

    // hex form only ever yields an integer
    if self.peek() == Some('0') && (self.peekn(1) == Some('x') || self.peekn(1) == Some('X')) {
      text.push(self.must_advance());
      text.push(self.must_advance());
      text.push_str(&self.take(|c| c.is_ascii_hexdigit()));
      text.push_str(&self.take(|c| c == 'u' || c == 'U' || c == 'l' || c == 'L'));
      return (TokenKind::IntConstant, text);
    }

    text.push_str(&self.take(|c| c.is_ascii_digit()));

    let mut is_float = false;
    if self.peek() == Some('.') && self.peekn(1).map(|c| c.is_ascii_digit()).unwrap_or(false) {
      is_float = true;
      text.push(self.must_advance());
      text.push_str(&self.take(|c| c.is_ascii_digit()));
    }
    if self.peek() == Some('e') || self.peek() == Some('E') {
      let after_sign = match self.peekn(1) {
        Some('+') | Some('-') => self.peekn(2),
        other => other,
      };
      if after_sign.map(|c| c.is_ascii_digit()).unwrap_or(false) {
        is_float = true;
        text.push(self.must_advance());
        if self.peek() == Some('+') || self.peek() == Some('-') {
          text.push(self.must_advance());
        }
        text.push_str(&self.take(|c| c.is_ascii_digit()));
      }
    }

    if is_float {
      text.push_str(&self.take(|c| c == 'f' || c == 'F' || c == 'l' || c == 'L'));
      (TokenKind::FloatConstant, text)
    } else {
      text.push_str(&self.take(|c| c == 'u' || c == 'U' || c == 'l' || c == 'L'));
      (TokenKind::IntConstant, text)
    }
  }

  fn operator(&mut self, next: char) -> Option<(TokenKind, String)> {
    let kind = match next {
      '(' => TokenKind::LeftParen,
      ')' => TokenKind::RightParen,
      '[' => TokenKind::LeftBracket,
      ']' => TokenKind::RightBracket,
      '{' => TokenKind::LeftBrace,
      '}' => TokenKind::RightBrace,
      '.' => TokenKind::Dot,
      ',' => TokenKind::Comma,
      ':' => TokenKind::Colon,
      ';' => TokenKind::Semicolon,
      '?' => TokenKind::Question,
      '~' => TokenKind::Tilde,
      '+' => return Some(self.two_char_op('+', TokenKind::Plus, &[('+', TokenKind::IncOp), ('=', TokenKind::AddAssign)])),
      '-' => return Some(self.two_char_op('-', TokenKind::Dash, &[('-', TokenKind::DecOp), ('=', TokenKind::SubAssign)])),
      '*' => return Some(self.two_char_op('*', TokenKind::Star, &[('=', TokenKind::MulAssign)])),
      '/' => return Some(self.two_char_op('/', TokenKind::Slash, &[('=', TokenKind::DivAssign)])),
      '%' => return Some(self.two_char_op('%', TokenKind::Percent, &[('=', TokenKind::ModAssign)])),
      '=' => return Some(self.two_char_op('=', TokenKind::Equal, &[('=', TokenKind::EqOp)])),
      '!' => return Some(self.two_char_op('!', TokenKind::Bang, &[('=', TokenKind::NeOp)])),
      '&' => return Some(self.two_char_op('&', TokenKind::Ampersand, &[('&', TokenKind::AndOp), ('=', TokenKind::AndAssign)])),
      '|' => return Some(self.two_char_op('|', TokenKind::VerticalBar, &[('|', TokenKind::OrOp), ('=', TokenKind::OrAssign)])),
      '^' => return Some(self.two_char_op('^', TokenKind::Caret, &[('^', TokenKind::XorOp), ('=', TokenKind::XorAssign)])),
      '<' => return Some(self.shift_op('<', TokenKind::LeftAngle, TokenKind::LeOp, TokenKind::LeftOp, TokenKind::LeftAssign)),
      '>' => return Some(self.shift_op('>', TokenKind::RightAngle, TokenKind::GeOp, TokenKind::RightOp, TokenKind::RightAssign)),
      _ => return None,
    };
    self.advance();
    Some((kind, next.to_string()))
  }

  fn two_char_op(&mut self, first: char, single: TokenKind, pairs: &[(char, TokenKind)]) -> (TokenKind, String) {
    self.advance();
    for &(second, kind) in pairs {
      if self.peek() == Some(second) {
        self.advance();
        let mut text = first.to_string();
        text.push(second);
        return (kind, text);
      }
    }
    (single, first.to_string())
  }

  // < <= << <<=  (and the > family)
  fn shift_op(&mut self, c: char, angle: TokenKind, cmp: TokenKind, shift: TokenKind, shift_assign: TokenKind) -> (TokenKind, String) {
    self.advance();
    if self.peek() == Some('=') {
      self.advance();
      return (cmp, format!("{}=", c));
    }
    if self.peek() == Some(c) {
      self.advance();
      if self.peek() == Some('=') {
        self.advance();
        return (shift_assign, format!("{}{}=", c, c));
      }
      return (shift, format!("{}{}", c, c));
    }
    (angle, c.to_string())
  }

  fn peek(&self) -> Option<char> {
    self.chars.get(self.pos).cloned()
  }

  fn peekn(&self, n: usize) -> Option<char> {
    self.chars.get(self.pos + n).cloned()
  }

  fn advance(&mut self) {
    if let Some(&c) = self.chars.get(self.pos) {
      self.pos += 1;
      if c == '\n' {
        self.line += 1;
      }
    }
  }

  fn must_advance(&mut self) -> char {
    let c = self.chars[self.pos];
    self.advance();
    c
  }

  fn take<P>(&mut self, p: P) -> String
    where P: Fn(char) -> bool {

    let mut result = String::new();
    while let Some(next) = self.peek() {
      if !p(next) { break; }
      self.advance();
      result.push(next);
    }

    result
  }
}

impl Default for Lexer {
  fn default() -> Self {
    Lexer::new()
  }
}

#[cfg(test)]
#[test]
fn test_tokenize() {
  use crate::ast::TypeSpecifier::*;

  let source = "uniform mediump vec4 color;\nvoid main() {}\n";

  let mut lexer = Lexer::new();
  lexer.input(source);
  let tokens = lexer.tokenize();

  let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
  assert_eq!(kinds,
             vec![
               TokenKind::Uniform,
               TokenKind::PrecisionQualifier(PrecisionQualifier::Mediump),
               TokenKind::Type(Vec4),
               TokenKind::Identifier,
               TokenKind::Semicolon,
               TokenKind::Type(Void),
               TokenKind::Identifier,
               TokenKind::LeftParen,
               TokenKind::RightParen,
               TokenKind::LeftBrace,
               TokenKind::RightBrace,
             ]);
  assert_eq!(tokens[3].text, "color");
  assert_eq!(tokens[3].line, 1);
  assert_eq!(tokens[5].line, 2);
  assert_eq!(lexer.token().kind, TokenKind::End);
}

#[cfg(test)]
#[test]
fn test_literals() {
  let mut lexer = Lexer::new();
  lexer.input("0x1F 12u 3.5 1e-3 2.5e+4f true false");
  let tokens = lexer.tokenize();

  let expected = [
    (TokenKind::IntConstant, "0x1F"),
    (TokenKind::IntConstant, "12u"),
    (TokenKind::FloatConstant, "3.5"),
    (TokenKind::FloatConstant, "1e-3"),
    (TokenKind::FloatConstant, "2.5e+4f"),
    (TokenKind::BoolConstant, "true"),
    (TokenKind::BoolConstant, "false"),
  ];
  let actual: Vec<(TokenKind, &str)> = tokens.iter().map(|t| (t.kind, t.text.as_str())).collect();
  assert_eq!(actual, expected.to_vec());
}

#[cfg(test)]
#[test]
fn test_operators() {
  let mut lexer = Lexer::new();
  lexer.input("a <<= b << c <= d < e");
  let kinds: Vec<TokenKind> = lexer.tokenize().iter().map(|t| t.kind).collect();
  assert_eq!(kinds,
             vec![
               TokenKind::Identifier,
               TokenKind::LeftAssign,
               TokenKind::Identifier,
               TokenKind::LeftOp,
               TokenKind::Identifier,
               TokenKind::LeOp,
               TokenKind::Identifier,
               TokenKind::LeftAngle,
               TokenKind::Identifier,
             ]);
}

#[cfg(test)]
#[test]
fn test_illegal_character_is_skipped() {
  let mut lexer = Lexer::new();
  lexer.input("@float x;\n@@ y");
  let tokens = lexer.tokenize();
  let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
  assert_eq!(kinds,
             vec![
               TokenKind::Type(TypeSpecifier::Float),
               TokenKind::Identifier,
               TokenKind::Semicolon,
               TokenKind::Identifier,
             ]);
  assert_eq!(tokens[3].line, 2);
}

#[cfg(test)]
#[test]
fn test_identifiers_are_ascii_only() {
  let mut lexer = Lexer::new();
  lexer.input("π r;");
  let tokens = lexer.tokenize();
  let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
  // a non-ASCII letter is an illegal character, not an identifier start
  assert_eq!(kinds, vec![TokenKind::Identifier, TokenKind::Semicolon]);
  assert_eq!(tokens[0].text, "r");
}

#[cfg(test)]
#[test]
fn test_input_resets_state() {
  let mut lexer = Lexer::new();
  lexer.input("a\nb");
  lexer.tokenize();
  lexer.input("c");
  let tokens = lexer.tokenize();
  assert_eq!(tokens.len(), 1);
  assert_eq!(tokens[0].line, 1);
}
