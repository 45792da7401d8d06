//! Source rendering of the AST.
//!
//! Every node prints back to source text built from the tokens it holds.
//! Binary, unary and conditional expressions are always parenthesized, so
//! parsing the rendered text yields a tree of the same shape.

use std::fmt::{Display, Formatter, Result};

use super::{
    ast::{Ast, Block, BlockElem, Declaration, Dimension, NameDef, Program},
    expressions::{ChannelSelector, Expr, PixelSelector},
    statements::{GuardedBlock, LValue, Statement},
};

impl Display for Ast {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Ast::Program(program) => write!(f, "{}", program),
            Ast::Expr(expr) => write!(f, "{}", expr),
        }
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let params = self
            .params
            .iter()
            .map(|param| param.to_string())
            .collect::<Vec<String>>()
            .join(", ");
        write!(
            f,
            "{} {}({}) {}",
            self.token.value, self.identifier.value, params, self.block
        )
    }
}

impl Display for Block {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "<:")?;
        for elem in self.iter() {
            match elem {
                BlockElem::Declaration(declaration) => writeln!(f, "{};", declaration)?,
                BlockElem::Statement(statement) => writeln!(f, "{};", statement)?,
            }
        }
        write!(f, ":>")
    }
}

impl Display for Declaration {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match &self.initializer {
            Some(initializer) => write!(f, "{} = {}", self.name_def, initializer),
            None => write!(f, "{}", self.name_def),
        }
    }
}

impl Display for NameDef {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match &self.dimension {
            Some(dimension) => write!(
                f,
                "{}{} {}",
                self.type_token.value, dimension, self.identifier.value
            ),
            None => write!(f, "{} {}", self.type_token.value, self.identifier.value),
        }
    }
}

impl Display for Dimension {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "[{}, {}]", self.width, self.height)
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Statement::Assignment(stmt) => write!(f, "{} = {}", stmt.lvalue, stmt.value),
            Statement::Write(stmt) => write!(f, "write {}", stmt.value),
            Statement::Return(stmt) => write!(f, "^ {}", stmt.value),
            Statement::If(stmt) => {
                write!(f, "if ")?;
                write_guarded_blocks(f, &stmt.guarded_blocks)?;
                write!(f, " fi")
            }
            Statement::Do(stmt) => {
                write!(f, "do ")?;
                write_guarded_blocks(f, &stmt.guarded_blocks)?;
                write!(f, " od")
            }
            Statement::Block(stmt) => write!(f, "{}", stmt.block),
        }
    }
}

fn write_guarded_blocks(f: &mut Formatter<'_>, guarded_blocks: &[GuardedBlock]) -> Result {
    for (i, guarded_block) in guarded_blocks.iter().enumerate() {
        if i > 0 {
            write!(f, " [] ")?;
        }
        write!(f, "{} -> {}", guarded_block.guard, guarded_block.block)?;
    }
    Ok(())
}

impl Display for LValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", self.token.value)?;
        if let Some(pixel_selector) = &self.pixel_selector {
            write!(f, "{}", pixel_selector)?;
        }
        if let Some(channel_selector) = &self.channel_selector {
            write!(f, "{}", channel_selector)?;
        }
        Ok(())
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Expr::Conditional(expr) => write!(
                f,
                "(? {} -> {} , {})",
                expr.guard, expr.true_expr, expr.false_expr
            ),
            Expr::Binary(expr) => {
                write!(f, "({} {} {})", expr.left, expr.operator.value, expr.right)
            }
            Expr::Unary(expr) => write!(f, "({} {})", expr.operator.value, expr.expr),
            Expr::Postfix(expr) => {
                match expr.primary.as_ref() {
                    Expr::Postfix(_) => write!(f, "({})", expr.primary)?,
                    primary => write!(f, "{}", primary)?,
                }
                if let Some(pixel_selector) = &expr.pixel_selector {
                    write!(f, "{}", pixel_selector)?;
                }
                if let Some(channel_selector) = &expr.channel_selector {
                    write!(f, "{}", channel_selector)?;
                }
                Ok(())
            }
            Expr::Ident(expr) => write!(f, "{}", expr.token.value),
            Expr::NumLit(expr) => write!(f, "{}", expr.token.value),
            Expr::StringLit(expr) => write!(f, "{}", expr.token.value),
            Expr::BooleanLit(expr) => write!(f, "{}", expr.token.value),
            Expr::Const(expr) => write!(f, "{}", expr.token.value),
            Expr::ExpandedPixel(expr) => {
                write!(f, "[{}, {}, {}]", expr.red, expr.green, expr.blue)
            }
        }
    }
}

impl Display for PixelSelector {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

impl Display for ChannelSelector {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, ":{}", self.color.value)
    }
}
