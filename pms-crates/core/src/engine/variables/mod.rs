mod literal;
mod variable;

pub use literal::Literal;
pub use variable::Variable;
