//! The node model produced by the parser. Everything is a plain tagged
//! union; no node carries more than its own fields.

use std::fmt;

use crate::resolve::PrecisionCategory;

#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash)]
pub enum TypeSpecifier {
  // Primitives
  Void,
  Bool,
  Int,
  Uint,
  Float,
  // Vectors
  Vec2,
  Vec3,
  Vec4,
  BVec2,
  BVec3,
  BVec4,
  IVec2,
  IVec3,
  IVec4,
  UVec2,
  UVec3,
  UVec4,
  // Matrices
  Mat2,
  Mat3,
  Mat4,
  Mat2x2,
  Mat2x3,
  Mat2x4,
  Mat3x2,
  Mat3x3,
  Mat3x4,
  Mat4x2,
  Mat4x3,
  Mat4x4,
  // Samplers
  Sampler2D,
  Sampler2DArray,
  Sampler3D,
  SamplerCube,
  Sampler2DShadow,
  Sampler2DArrayShadow,
  SamplerCubeShadow,
  ISampler2D,
  ISampler2DArray,
  ISampler3D,
  ISamplerCube,
  USampler2D,
  USampler2DArray,
  USampler3D,
  USamplerCube,
}

impl TypeSpecifier {
  pub fn spelling(self) -> &'static str {
    match self {
      TypeSpecifier::Void => "void",
      TypeSpecifier::Bool => "bool",
      TypeSpecifier::Int => "int",
      TypeSpecifier::Uint => "uint",
      TypeSpecifier::Float => "float",
      TypeSpecifier::Vec2 => "vec2",
      TypeSpecifier::Vec3 => "vec3",
      TypeSpecifier::Vec4 => "vec4",
      TypeSpecifier::BVec2 => "bvec2",
      TypeSpecifier::BVec3 => "bvec3",
      TypeSpecifier::BVec4 => "bvec4",
      TypeSpecifier::IVec2 => "ivec2",
      TypeSpecifier::IVec3 => "ivec3",
      TypeSpecifier::IVec4 => "ivec4",
      TypeSpecifier::UVec2 => "uvec2",
      TypeSpecifier::UVec3 => "uvec3",
      TypeSpecifier::UVec4 => "uvec4",
      TypeSpecifier::Mat2 => "mat2",
      TypeSpecifier::Mat3 => "mat3",
      TypeSpecifier::Mat4 => "mat4",
      TypeSpecifier::Mat2x2 => "mat2x2",
      TypeSpecifier::Mat2x3 => "mat2x3",
      TypeSpecifier::Mat2x4 => "mat2x4",
      TypeSpecifier::Mat3x2 => "mat3x2",
      TypeSpecifier::Mat3x3 => "mat3x3",
      TypeSpecifier::Mat3x4 => "mat3x4",
      TypeSpecifier::Mat4x2 => "mat4x2",
      TypeSpecifier::Mat4x3 => "mat4x3",
      TypeSpecifier::Mat4x4 => "mat4x4",
      TypeSpecifier::Sampler2D => "sampler2D",
      TypeSpecifier::Sampler2DArray => "sampler2DArray",
      TypeSpecifier::Sampler3D => "sampler3D",
      TypeSpecifier::SamplerCube => "samplerCube",
      TypeSpecifier::Sampler2DShadow => "sampler2DShadow",
      TypeSpecifier::Sampler2DArrayShadow => "sampler2DArrayShadow",
      TypeSpecifier::SamplerCubeShadow => "samplerCubeShadow",
      TypeSpecifier::ISampler2D => "isampler2D",
      TypeSpecifier::ISampler2DArray => "isampler2DArray",
      TypeSpecifier::ISampler3D => "isampler3D",
      TypeSpecifier::ISamplerCube => "isamplerCube",
      TypeSpecifier::USampler2D => "usampler2D",
      TypeSpecifier::USampler2DArray => "usampler2DArray",
      TypeSpecifier::USampler3D => "usampler3D",
      TypeSpecifier::USamplerCube => "usamplerCube",
    }
  }

  pub fn is_sampler(self) -> bool {
    match self {
      TypeSpecifier::Sampler2D
        | TypeSpecifier::Sampler2DArray
        | TypeSpecifier::Sampler3D
        | TypeSpecifier::SamplerCube
        | TypeSpecifier::Sampler2DShadow
        | TypeSpecifier::Sampler2DArrayShadow
        | TypeSpecifier::SamplerCubeShadow
        | TypeSpecifier::ISampler2D
        | TypeSpecifier::ISampler2DArray
        | TypeSpecifier::ISampler3D
        | TypeSpecifier::ISamplerCube
        | TypeSpecifier::USampler2D
        | TypeSpecifier::USampler2DArray
        | TypeSpecifier::USampler3D
        | TypeSpecifier::USamplerCube => true,
      _ => false,
    }
  }

  /// The default-precision key this type resolves through, or `None` for
  /// types that never carry a precision (void, bool, bvec*).
  pub fn precision_category(self) -> Option<PrecisionCategory> {
    match self {
      TypeSpecifier::Int
        | TypeSpecifier::Uint
        | TypeSpecifier::IVec2
        | TypeSpecifier::IVec3
        | TypeSpecifier::IVec4
        | TypeSpecifier::UVec2
        | TypeSpecifier::UVec3
        | TypeSpecifier::UVec4 => Some(PrecisionCategory::Int),
      TypeSpecifier::Float
        | TypeSpecifier::Vec2
        | TypeSpecifier::Vec3
        | TypeSpecifier::Vec4
        | TypeSpecifier::Mat2
        | TypeSpecifier::Mat3
        | TypeSpecifier::Mat4
        | TypeSpecifier::Mat2x2
        | TypeSpecifier::Mat2x3
        | TypeSpecifier::Mat2x4
        | TypeSpecifier::Mat3x2
        | TypeSpecifier::Mat3x3
        | TypeSpecifier::Mat3x4
        | TypeSpecifier::Mat4x2
        | TypeSpecifier::Mat4x3
        | TypeSpecifier::Mat4x4 => Some(PrecisionCategory::Float),
      TypeSpecifier::SamplerCube
        | TypeSpecifier::SamplerCubeShadow
        | TypeSpecifier::ISamplerCube
        | TypeSpecifier::USamplerCube => Some(PrecisionCategory::SamplerCube),
      t if t.is_sampler() => Some(PrecisionCategory::Sampler2D),
      _ => None,
    }
  }
}

impl fmt::Display for TypeSpecifier {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str(self.spelling())
  }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum LayoutQualifier {
  Varying,
  Uniform,
  Attribute,
  In,
  Out,
}

impl LayoutQualifier {
  pub fn spelling(self) -> &'static str {
    match self {
      LayoutQualifier::Varying => "varying",
      LayoutQualifier::Uniform => "uniform",
      LayoutQualifier::Attribute => "attribute",
      LayoutQualifier::In => "in",
      LayoutQualifier::Out => "out",
    }
  }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum TypeQualifier {
  Const,
}

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum PrecisionQualifier {
  Lowp,
  Mediump,
  Highp,
}

impl PrecisionQualifier {
  pub fn spelling(self) -> &'static str {
    match self {
      PrecisionQualifier::Lowp => "lowp",
      PrecisionQualifier::Mediump => "mediump",
      PrecisionQualifier::Highp => "highp",
    }
  }
}

impl fmt::Display for PrecisionQualifier {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str(self.spelling())
  }
}

/// Parameter direction. `In` is the default when the source carries no
/// explicit qualifier.
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum ParameterQualifier {
  In,
  Out,
  InOut,
}

impl ParameterQualifier {
  pub fn spelling(self) -> &'static str {
    match self {
      ParameterQualifier::In => "in",
      ParameterQualifier::Out => "out",
      ParameterQualifier::InOut => "inout",
    }
  }
}

/// One declared variable. A comma-separated declaration line yields one
/// of these per declarator, all sharing the line's qualifiers and type.
#[derive(Debug,Clone,PartialEq)]
pub struct VariableDeclaration {
  pub name: String,
  pub type_specifier: TypeSpecifier,
  pub type_qualifier: Option<TypeQualifier>,
  pub layout_qualifier: Option<LayoutQualifier>,
  pub precision_qualifier: Option<PrecisionQualifier>,
  pub array_size: Option<Expression>,
  pub initializer: Option<Expression>,
  pub line: usize,
}

#[derive(Debug,Clone,PartialEq)]
pub struct ParameterDeclaration {
  pub qualifier: ParameterQualifier,
  pub type_specifier: TypeSpecifier,
  pub name: Option<String>,
}

#[derive(Debug,Clone,PartialEq)]
pub struct FunctionPrototype {
  pub name: String,
  pub return_type: TypeSpecifier,
  pub parameters: Vec<ParameterDeclaration>,
}

#[derive(Debug,Clone,PartialEq)]
pub struct FunctionDefinition {
  pub prototype: FunctionPrototype,
  pub body: CompoundStatement,
}

impl FunctionDefinition {
  pub fn name(&self) -> &str {
    &self.prototype.name
  }

  pub fn return_type(&self) -> TypeSpecifier {
    self.prototype.return_type
  }

  pub fn parameters(&self) -> &[ParameterDeclaration] {
    &self.prototype.parameters
  }
}

/// A block's items in source order. Declarations and statements
/// interleave freely; a multi-declarator declaration is flattened into
/// consecutive items.
#[derive(Debug,Clone,PartialEq)]
pub struct CompoundStatement {
  pub items: Vec<BlockItem>,
}

#[derive(Debug,Clone,PartialEq)]
pub enum BlockItem {
  Declaration(VariableDeclaration),
  Statement(Statement),
}

#[derive(Debug,Clone,PartialEq)]
pub enum Statement {
  Expression(Expression),
  If {
    condition: Expression,
    then_branch: Box<Statement>,
    else_branch: Option<Box<Statement>>,
  },
  Return(Option<Expression>),
  Discard,
  Compound(CompoundStatement),
}

#[derive(Debug,Clone,PartialEq)]
pub enum Expression {
  Identifier(String),
  /// Literal lexemes are kept verbatim so serialization reproduces the
  /// source spelling (hex, suffixes, exponents).
  IntLiteral(String),
  FloatLiteral(String),
  BoolLiteral(bool),
  Member(Box<Expression>, String),
  Index(Box<Expression>, Box<Expression>),
  Call(String, Vec<Expression>),
  Unary(UnaryOp, Box<Expression>),
  Binary(BinaryOp, Box<Expression>, Box<Expression>),
  Assignment(AssignOp, Box<Expression>, Box<Expression>),
}

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum UnaryOp {
  Plus,
  Minus,
  Not,
  BitNot,
  PreInc,
  PreDec,
  PostInc,
  PostDec,
}

impl UnaryOp {
  pub fn spelling(self) -> &'static str {
    match self {
      UnaryOp::Plus => "+",
      UnaryOp::Minus => "-",
      UnaryOp::Not => "!",
      UnaryOp::BitNot => "~",
      UnaryOp::PreInc | UnaryOp::PostInc => "++",
      UnaryOp::PreDec | UnaryOp::PostDec => "--",
    }
  }

  pub fn is_postfix(self) -> bool {
    self == UnaryOp::PostInc || self == UnaryOp::PostDec
  }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum BinaryOp {
  Or,
  And,
  BitOr,
  BitXor,
  BitAnd,
  Eq,
  Ne,
  Lt,
  Gt,
  Le,
  Ge,
  Shl,
  Shr,
  Add,
  Sub,
  Mul,
  Div,
  Mod,
}

impl BinaryOp {
  /// Binding strength, higher binds tighter. Assignment sits below all
  /// of these and is handled separately.
  pub fn precedence(self) -> u8 {
    match self {
      BinaryOp::Or => 1,
      BinaryOp::And => 2,
      BinaryOp::BitOr => 3,
      BinaryOp::BitXor => 4,
      BinaryOp::BitAnd => 5,
      BinaryOp::Eq | BinaryOp::Ne => 6,
      BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge => 7,
      BinaryOp::Shl | BinaryOp::Shr => 8,
      BinaryOp::Add | BinaryOp::Sub => 9,
      BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 10,
    }
  }

  pub fn spelling(self) -> &'static str {
    match self {
      BinaryOp::Or => "||",
      BinaryOp::And => "&&",
      BinaryOp::BitOr => "|",
      BinaryOp::BitXor => "^",
      BinaryOp::BitAnd => "&",
      BinaryOp::Eq => "==",
      BinaryOp::Ne => "!=",
      BinaryOp::Lt => "<",
      BinaryOp::Gt => ">",
      BinaryOp::Le => "<=",
      BinaryOp::Ge => ">=",
      BinaryOp::Shl => "<<",
      BinaryOp::Shr => ">>",
      BinaryOp::Add => "+",
      BinaryOp::Sub => "-",
      BinaryOp::Mul => "*",
      BinaryOp::Div => "/",
      BinaryOp::Mod => "%",
    }
  }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum AssignOp {
  Assign,
  Add,
  Sub,
  Mul,
  Div,
  Mod,
  Shl,
  Shr,
  And,
  Xor,
  Or,
}

impl AssignOp {
  pub fn spelling(self) -> &'static str {
    match self {
      AssignOp::Assign => "=",
      AssignOp::Add => "+=",
      AssignOp::Sub => "-=",
      AssignOp::Mul => "*=",
      AssignOp::Div => "/=",
      AssignOp::Mod => "%=",
      AssignOp::Shl => "<<=",
      AssignOp::Shr => ">>=",
      AssignOp::And => "&=",
      AssignOp::Xor => "^=",
      AssignOp::Or => "|=",
    }
  }
}

/// `precision <qualifier> <type>;` — feeds the resolver's live table and
/// is never retained as a declaration.
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct PrecisionStatement {
  pub qualifier: PrecisionQualifier,
  pub type_specifier: TypeSpecifier,
}

#[derive(Debug,Clone,PartialEq)]
pub enum ExternalDeclaration {
  Precision(PrecisionStatement),
  Variables(Vec<VariableDeclaration>),
  Function(FunctionDefinition),
  /// A bare prototype terminated by `;`. Accepted, not tracked.
  Prototype(FunctionPrototype),
}
