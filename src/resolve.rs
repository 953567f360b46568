//! Default-precision resolution and interface classification. Runs over
//! the parsed declaration list in source order, so a `precision`
//! statement only affects declarations textually after it.

use std::fmt;

use crate::ast::{ExternalDeclaration,LayoutQualifier,PrecisionQualifier,PrecisionStatement,TypeSpecifier};
use crate::{DuplicatePolicy,Error,Result,ShaderParser};

/// The key a type resolves its default precision through.
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash)]
pub enum PrecisionCategory {
  Int,
  Float,
  Sampler2D,
  SamplerCube,
}

impl fmt::Display for PrecisionCategory {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let name = match *self {
      PrecisionCategory::Int => "int",
      PrecisionCategory::Float => "float",
      PrecisionCategory::Sampler2D => "sampler2D",
      PrecisionCategory::SamplerCube => "samplerCube",
    };
    f.write_str(name)
  }
}

/// The live default-precision table, seeded per shader stage and updated
/// by `precision` statements as the walk encounters them.
#[derive(Debug,Clone,PartialEq)]
pub struct PrecisionTable {
  int: Option<PrecisionQualifier>,
  float: Option<PrecisionQualifier>,
  sampler_2d: Option<PrecisionQualifier>,
  sampler_cube: Option<PrecisionQualifier>,
}

impl PrecisionTable {
  /// Fragment shaders get no float default; an unprefaced float
  /// declaration there is a resolution warning.
  pub fn for_stage(fragment_shader: bool) -> Self {
    if fragment_shader {
      PrecisionTable{
        int: Some(PrecisionQualifier::Mediump),
        float: None,
        sampler_2d: Some(PrecisionQualifier::Lowp),
        sampler_cube: Some(PrecisionQualifier::Lowp),
      }
    } else {
      PrecisionTable{
        int: Some(PrecisionQualifier::Highp),
        float: Some(PrecisionQualifier::Highp),
        sampler_2d: Some(PrecisionQualifier::Lowp),
        sampler_cube: Some(PrecisionQualifier::Lowp),
      }
    }
  }

  pub fn lookup(&self, category: PrecisionCategory) -> Option<PrecisionQualifier> {
    match category {
      PrecisionCategory::Int => self.int,
      PrecisionCategory::Float => self.float,
      PrecisionCategory::Sampler2D => self.sampler_2d,
      PrecisionCategory::SamplerCube => self.sampler_cube,
    }
  }

  /// Applies a `precision` statement. Only `int`, `float` and the
  /// sampler types may appear in one; anything else is logged and the
  /// table is left untouched.
  pub fn apply(&mut self, statement: &PrecisionStatement) {
    let category = match statement_category(statement.type_specifier) {
      Some(category) => category,
      None => {
        log::warn!("Ignoring precision statement for type '{}'", statement.type_specifier);
        return;
      },
    };
    let slot = match category {
      PrecisionCategory::Int => &mut self.int,
      PrecisionCategory::Float => &mut self.float,
      PrecisionCategory::Sampler2D => &mut self.sampler_2d,
      PrecisionCategory::SamplerCube => &mut self.sampler_cube,
    };
    *slot = Some(statement.qualifier);
  }
}

fn statement_category(type_specifier: TypeSpecifier) -> Option<PrecisionCategory> {
  match type_specifier {
    TypeSpecifier::Int => Some(PrecisionCategory::Int),
    TypeSpecifier::Float => Some(PrecisionCategory::Float),
    t if t.is_sampler() => t.precision_category(),
    _ => None,
  }
}

pub(crate) fn is_input_variable(layout_qualifier: Option<LayoutQualifier>, fragment_shader: bool) -> bool {
  match layout_qualifier {
    Some(LayoutQualifier::In) => true,
    Some(LayoutQualifier::Varying) => fragment_shader,
    Some(LayoutQualifier::Attribute) => !fragment_shader,
    _ => false,
  }
}

pub(crate) fn is_output_variable(layout_qualifier: Option<LayoutQualifier>, fragment_shader: bool) -> bool {
  match layout_qualifier {
    Some(LayoutQualifier::Out) => true,
    Some(LayoutQualifier::Varying) => !fragment_shader,
    _ => false,
  }
}

/// Walks the parsed declarations in source order, assigning default
/// precisions, bucketing interface variables and recording functions
/// into the parser's tables.
pub(crate) fn resolve(parser: &mut ShaderParser, declarations: Vec<ExternalDeclaration>) -> Result<()> {
  let fragment_shader = parser.options().fragment_shader;

  for external in declarations {
    match external {
      ExternalDeclaration::Precision(statement) => {
        parser.precision.apply(&statement);
      },

      ExternalDeclaration::Variables(variables) => {
        for mut var in variables {
          if var.precision_qualifier.is_none() {
            if let Some(category) = var.type_specifier.precision_category() {
              match parser.precision.lookup(category) {
                Some(qualifier) => var.precision_qualifier = Some(qualifier),
                None => {
                  if parser.options().strict_precision {
                    return Err(Error::UnresolvedPrecision{ name: var.name, line: var.line });
                  }
                  log::warn!("{}No default precision for '{}' ({} category) at line {}",
                             diagnostic_prefix(parser), var.name, category, var.line);
                },
              }
            }
          }

          if is_input_variable(var.layout_qualifier, fragment_shader) {
            parser.input_variables.insert(var.name.clone(), var.clone());
          } else if is_output_variable(var.layout_qualifier, fragment_shader) {
            parser.output_variables.insert(var.name.clone(), var.clone());
          } else if var.layout_qualifier == Some(LayoutQualifier::Uniform) {
            parser.uniform_variables.insert(var.name.clone(), var.clone());
          }
          parser.declarations.insert(var.name.clone(), var);
        }
      },

      ExternalDeclaration::Function(function) => {
        let name = function.name().to_string();
        if parser.functions.contains_key(&name)
          && parser.options().on_duplicate_function == DuplicatePolicy::Reject {
          return Err(Error::DuplicateFunction{ name });
        }
        // re-insertion keeps the first-occurrence position
        parser.functions.insert(name, function);
      },

      // forward declarations are accepted but not tracked
      ExternalDeclaration::Prototype(_) => {},
    }
  }

  Ok(())
}

fn diagnostic_prefix(parser: &ShaderParser) -> String {
  let filename = &parser.options().filename;
  if filename.is_empty() {
    String::new()
  } else {
    format!("{}: ", filename)
  }
}

#[cfg(test)]
fn parser(fragment_shader: bool) -> ShaderParser {
  let mut options = crate::Options::new(fragment_shader);
  options.cpp_path = None;
  ShaderParser::with_options(options)
}

#[cfg(test)]
#[test]
fn test_fragment_defaults() {
  let mut p = parser(true);
  p.parse("varying ivec2 vTexCoord;").unwrap();

  let var = &p.input_variables["vTexCoord"];
  assert_eq!(var.type_specifier, TypeSpecifier::IVec2);
  assert_eq!(var.precision_qualifier, Some(PrecisionQualifier::Mediump));
  assert!(p.output_variables.is_empty());
}

#[cfg(test)]
#[test]
fn test_vertex_defaults() {
  let mut p = parser(false);
  p.parse("varying ivec2 vTexCoord;\nattribute vec4 position;").unwrap();

  // varying is an output on the vertex side, and ints default to highp
  let var = &p.output_variables["vTexCoord"];
  assert_eq!(var.precision_qualifier, Some(PrecisionQualifier::Highp));
  let var = &p.input_variables["position"];
  assert_eq!(var.precision_qualifier, Some(PrecisionQualifier::Highp));
  assert!(p.uniform_variables.is_empty());
}

#[cfg(test)]
#[test]
fn test_precision_statement_is_position_dependent() {
  let mut p = parser(true);
  p.parse("uniform float before;\nprecision highp float;\nuniform float after;").unwrap();

  // fragment shaders have no float default until one is declared
  assert_eq!(p.uniform_variables["before"].precision_qualifier, None);
  assert_eq!(p.uniform_variables["after"].precision_qualifier, Some(PrecisionQualifier::Highp));
}

#[cfg(test)]
#[test]
fn test_strict_precision_fails_the_parse() {
  let mut options = crate::Options::new(true);
  options.cpp_path = None;
  options.strict_precision = true;
  let mut p = ShaderParser::with_options(options);

  match p.parse("uniform float bad;") {
    Err(Error::UnresolvedPrecision{ name, line }) => {
      assert_eq!(name, "bad");
      assert_eq!(line, 1);
    },
    other => panic!("expected an unresolved-precision error, got {:?}", other),
  }
}

#[cfg(test)]
#[test]
fn test_invalid_precision_statement_is_ignored() {
  let mut p = parser(true);
  p.parse("precision mediump vec2;\nuniform vec2 p;").unwrap();

  // vec2 is not a legal precision-statement type, so the float default
  // stays unset and the declaration stays unresolved
  assert_eq!(p.uniform_variables["p"].precision_qualifier, None);
}

#[cfg(test)]
#[test]
fn test_sampler_families() {
  let mut p = parser(true);
  p.parse("uniform samplerCube sky;\nuniform sampler2DArray pages;\nprecision highp samplerCube;\nuniform samplerCube sky2;").unwrap();

  assert_eq!(p.uniform_variables["sky"].precision_qualifier, Some(PrecisionQualifier::Lowp));
  assert_eq!(p.uniform_variables["pages"].precision_qualifier, Some(PrecisionQualifier::Lowp));
  assert_eq!(p.uniform_variables["sky2"].precision_qualifier, Some(PrecisionQualifier::Highp));
}

#[cfg(test)]
#[test]
fn test_explicit_precision_wins() {
  let mut p = parser(true);
  p.parse("uniform lowp int counter;").unwrap();
  assert_eq!(p.uniform_variables["counter"].precision_qualifier, Some(PrecisionQualifier::Lowp));
}

#[cfg(test)]
#[test]
fn test_classification() {
  // (layout qualifier, fragment?) fully determines the buckets
  assert!(is_input_variable(Some(LayoutQualifier::Varying), true));
  assert!(!is_input_variable(Some(LayoutQualifier::Varying), false));
  assert!(is_output_variable(Some(LayoutQualifier::Varying), false));
  assert!(is_input_variable(Some(LayoutQualifier::Attribute), false));
  assert!(!is_input_variable(Some(LayoutQualifier::Attribute), true));
  assert!(is_input_variable(Some(LayoutQualifier::In), true));
  assert!(is_input_variable(Some(LayoutQualifier::In), false));
  assert!(is_output_variable(Some(LayoutQualifier::Out), true));
  assert!(is_output_variable(Some(LayoutQualifier::Out), false));
  assert!(!is_input_variable(Some(LayoutQualifier::Uniform), true));
  assert!(!is_output_variable(Some(LayoutQualifier::Uniform), true));
  assert!(!is_input_variable(None, true));
}

#[cfg(test)]
#[test]
fn test_unclassified_declarations_are_still_recorded() {
  let mut p = parser(true);
  p.parse("const int kSize = 4;").unwrap();

  assert!(p.input_variables.is_empty());
  assert!(p.output_variables.is_empty());
  assert!(p.uniform_variables.is_empty());
  assert!(p.declarations.contains_key("kSize"));
}

#[cfg(test)]
#[test]
fn test_duplicate_function_overwrites_by_default() {
  let mut p = parser(true);
  p.parse("void f() { x = 1; }\nvoid g() {}\nvoid f() { x = 2; }").unwrap();

  assert_eq!(p.functions.len(), 2);
  // position is first occurrence, body is the later definition
  assert_eq!(p.functions.get_index(0).map(|(name, _)| name.as_str()), Some("f"));
  assert_eq!(p.functions["f"].body.items.len(), 1);
  match &p.functions["f"].body.items[0] {
    crate::ast::BlockItem::Statement(crate::ast::Statement::Expression(crate::ast::Expression::Assignment(_, _, rhs))) => {
      assert_eq!(**rhs, crate::ast::Expression::IntLiteral("2".to_string()));
    },
    other => panic!("unexpected body item: {:?}", other),
  }
}

#[cfg(test)]
#[test]
fn test_duplicate_function_can_be_rejected() {
  let mut options = crate::Options::new(true);
  options.cpp_path = None;
  options.on_duplicate_function = DuplicatePolicy::Reject;
  let mut p = ShaderParser::with_options(options);

  match p.parse("void f() {}\nvoid f() {}") {
    Err(Error::DuplicateFunction{ name }) => assert_eq!(name, "f"),
    other => panic!("expected a duplicate-function error, got {:?}", other),
  }
}
