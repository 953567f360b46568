//! Source-level front end for ESSL shaders, as used by a GLES call
//! capture tool: lexer, recursive-descent parser, stage-dependent
//! default-precision resolver and a deterministic serializer.
//!
//! One `ShaderParser` instance per shader source; its tables accumulate
//! across repeated `parse` calls by design.

#[macro_use]
extern crate lazy_static;
#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;

pub mod ast;
pub mod lex;
pub mod parse;
pub mod resolve;
mod preprocess;
mod serialize;

use std::io;
use std::path::PathBuf;

use indexmap::IndexMap;
use thiserror::Error;

use crate::ast::{FunctionDefinition,VariableDeclaration};
use crate::resolve::PrecisionTable;

pub type Result<T> = ::std::result::Result<T, Error>;

#[derive(Debug,Error)]
pub enum Error {
  /// The grammar could not reduce the current token. Fatal to the
  /// current parse; no partial tree is kept.
  #[error("syntax error at line {line}: before: {token}")]
  Syntax { line: usize, token: String },

  #[error("syntax error: at end of input")]
  EndOfInput,

  /// The external preprocessor could not be invoked. Not retryable
  /// without an environment fix.
  #[error("unable to invoke '{command}', make sure it is on the path: {source}")]
  Preprocessor { command: String, source: io::Error },

  #[error("duplicate definition of function '{name}'")]
  DuplicateFunction { name: String },

  #[error("no default precision for '{name}' at line {line}")]
  UnresolvedPrecision { name: String, line: usize },
}

impl Error {
  pub fn line(&self) -> Option<usize> {
    match *self {
      Error::Syntax{ line, .. } | Error::UnresolvedPrecision{ line, .. } => Some(line),
      _ => None,
    }
  }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum DuplicatePolicy {
  /// A later definition replaces the earlier one in the function table
  /// (the table keeps the first-occurrence position).
  Overwrite,
  Reject,
}

#[derive(Debug,Clone)]
pub struct Options {
  pub fragment_shader: bool,
  /// Shown in diagnostics only.
  pub filename: String,
  /// External preprocessor executable; `None` skips macro expansion
  /// (the `#version` line is still handled).
  pub cpp_path: Option<PathBuf>,
  pub on_duplicate_function: DuplicatePolicy,
  /// When set, a declaration with no resolvable default precision fails
  /// the parse instead of being logged and left unresolved.
  pub strict_precision: bool,
}

impl Options {
  pub fn new(fragment_shader: bool) -> Self {
    Options{
      fragment_shader,
      filename: String::new(),
      cpp_path: Some(PathBuf::from("cpp")),
      on_duplicate_function: DuplicatePolicy::Overwrite,
      strict_precision: false,
    }
  }
}

/// Parses shader sources and exposes the result as ordered tables:
/// interface buckets, the full declaration list and the functions, plus
/// the resolved `#version` (100 or 300).
#[derive(Debug)]
pub struct ShaderParser {
  pub version: u32,
  pub input_variables: IndexMap<String, VariableDeclaration>,
  pub output_variables: IndexMap<String, VariableDeclaration>,
  pub uniform_variables: IndexMap<String, VariableDeclaration>,
  pub declarations: IndexMap<String, VariableDeclaration>,
  pub functions: IndexMap<String, FunctionDefinition>,
  pub(crate) precision: PrecisionTable,
  options: Options,
}

impl ShaderParser {
  pub fn new(fragment_shader: bool) -> Self {
    Self::with_options(Options::new(fragment_shader))
  }

  pub fn with_options(options: Options) -> Self {
    ShaderParser{
      version: 100,
      input_variables: IndexMap::new(),
      output_variables: IndexMap::new(),
      uniform_variables: IndexMap::new(),
      declarations: IndexMap::new(),
      functions: IndexMap::new(),
      precision: PrecisionTable::for_stage(options.fragment_shader),
      options,
    }
  }

  pub fn options(&self) -> &Options {
    &self.options
  }

  /// Runs the whole pipeline: newline normalization, `#version`
  /// detection, external macro expansion, lexing, parsing and
  /// resolution. Syntax and preprocessor failures abort the parse with
  /// no declarations recorded from the failed source.
  pub fn parse(&mut self, source: &str) -> Result<()> {
    let source = source
      .replace("\r\n", "\n")
      .replace('\r', "\n");

    let (source, version) = preprocess::strip_version(&source);
    self.version = version;

    let source = match &self.options.cpp_path {
      Some(cpp_path) => preprocess::expand(&source, cpp_path)?,
      None => source,
    };

    let mut lexer = lex::Lexer::new();
    lexer.input(&source);
    let tokens = lexer.tokenize();

    let declarations = parse::parse(&tokens)?;
    resolve::resolve(self, declarations)
  }

  /// Reconstructs normalized source text from the resolved tables.
  pub fn serialize(&self) -> String {
    serialize::serialize(self.declarations.values(), self.functions.values())
  }
}

#[cfg(test)]
fn offline(fragment_shader: bool) -> ShaderParser {
  let mut options = Options::new(fragment_shader);
  options.cpp_path = None;
  ShaderParser::with_options(options)
}

#[cfg(test)]
#[test]
fn test_empty_shader() {
  let mut parser = ShaderParser::new(true);
  parser.parse("").unwrap();
  assert_eq!(parser.version, 100);
  assert_eq!(parser.uniform_variables.len(), 0);
  assert_eq!(parser.declarations.len(), 0);
  assert_eq!(parser.functions.len(), 0);
}

#[cfg(test)]
#[test]
fn test_version_300() {
  let mut parser = offline(true);
  parser.parse("  \t #version 300 es").unwrap();
  assert_eq!(parser.version, 300);
  assert_eq!(parser.uniform_variables.len(), 0);
}

#[cfg(test)]
#[test]
fn test_version_300_uniform() {
  let mut parser = offline(true);
  parser.parse("#version 300 es\nprecision mediump samplerCube;\nuniform samplerCube time;\n").unwrap();

  assert_eq!(parser.version, 300);
  let var = &parser.uniform_variables["time"];
  assert_eq!(var.type_specifier, ast::TypeSpecifier::SamplerCube);
  assert_eq!(var.precision_qualifier, Some(ast::PrecisionQualifier::Mediump));
}

#[cfg(test)]
#[test]
fn test_main_function() {
  let mut parser = offline(false);
  parser.parse("void main(){ gl_Position = 2 + mvp * vertex; }").unwrap();

  assert_eq!(parser.functions.len(), 1);
  let main = &parser.functions["main"];
  assert_eq!(main.return_type(), ast::TypeSpecifier::Void);
  assert_eq!(main.parameters().len(), 0);
  assert_eq!(parser.serialize(), "void main() {\n    gl_Position = 2 + (mvp * vertex);\n}\n");
}

#[cfg(test)]
#[test]
fn test_syntax_error_propagates() {
  let mut parser = offline(true);
  let err = parser.parse("varying ;").unwrap_err();
  assert_eq!(err.line(), Some(1));
}

#[cfg(test)]
#[test]
fn test_tables_accumulate_across_parses() {
  let mut parser = offline(true);
  parser.parse("uniform lowp sampler2D first;").unwrap();
  parser.parse("uniform lowp sampler2D second;").unwrap();

  let names: Vec<&str> = parser.uniform_variables.keys().map(|k| k.as_str()).collect();
  assert_eq!(names, vec!["first", "second"]);
}

#[cfg(test)]
#[test]
fn test_crlf_sources() {
  let mut parser = offline(false);
  parser.parse("attribute vec4 a;\r\nattribute vec4 b;\r\n").unwrap();
  assert_eq!(parser.input_variables.len(), 2);
}

#[cfg(test)]
#[test]
fn test_missing_preprocessor_is_fatal() {
  let mut options = Options::new(true);
  options.cpp_path = Some(PathBuf::from("/nonexistent/essl-cpp"));
  let mut parser = ShaderParser::with_options(options);

  match parser.parse("uniform lowp sampler2D tex;") {
    Err(Error::Preprocessor{ .. }) => {},
    other => panic!("expected a preprocessor error, got {:?}", other),
  }
}
