pub mod expression;
pub mod value;

pub use expression::{BinaryOp, Expr, UnaryOp};
pub use value::{Value, ValueKind};
