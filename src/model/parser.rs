//! Parser for models and LTL expressions, built on the PEG grammar in
//! `grammar.pest`.
//!
//! Expression precedence, loosest first:
//!
//! | operators             | associativity |
//! |-----------------------|---------------|
//! | `<->`                 | left          |
//! | `->`                  | right         |
//! | `\|` `xor` `xnor`     | left          |
//! | `&`                   | left          |
//! | `U`                   | left          |
//! | `X` `F` `G` (prefix)  |               |
//! | `=` `!=` `<` ...      | none          |
//! | `!` (prefix)          |               |

use pest::error::LineColLocation;
use pest::iterators::Pairs;
use pest::Parser;
use pest_derive::Parser;

use crate::error::{Error, Result};
use crate::formula::{BinaryOp, CompareOp, Formula};
use crate::model::ast::{AssignKind, Assignment, ModelAst, Property, PropertyKind};
use crate::symbolic::{Domain, Rhs};
use crate::value::Value;

#[derive(Parser)]
#[grammar = "model/grammar.pest"]
struct ModelParser;

type Pair<'a> = pest::iterators::Pair<'a, Rule>;

pub fn parse_model(source: &str) -> Result<ModelAst> {
    let pairs = ModelParser::parse(Rule::model, source).map_err(syntax_error)?;
    model(root(pairs)?)
}

/// Parse a single expression.
pub fn parse_formula(source: &str) -> Result<Formula> {
    let pairs = ModelParser::parse(Rule::formula, source).map_err(syntax_error)?;
    let formula = root(pairs)?;
    expr(first(&formula, Rule::expr)?)
}

fn describe(rule: &Rule) -> String {
    let s = match rule {
        Rule::EOI => "end of input",
        Rule::ident => "an identifier",
        Rule::integer => "an integer",
        Rule::expr
        | Rule::implies
        | Rule::disjunction
        | Rule::conjunction
        | Rule::until
        | Rule::temporal
        | Rule::comparison
        | Rule::negated
        | Rule::next_call => "an expression",
        Rule::or_op => "`|`, `xor` or `xnor`",
        Rule::compare_op => "a comparison",
        Rule::temporal_op => "`X`, `F` or `G`",
        Rule::kw_until => "`U`",
        Rule::var_decl => "a variable declaration",
        Rule::assignment => "an assignment",
        Rule::raw_property | Rule::raw_token => "a property",
        Rule::kw_module | Rule::extra_module => "`MODULE`",
        Rule::var_section
        | Rule::init_section
        | Rule::trans_section
        | Rule::invar_section
        | Rule::assign_section
        | Rule::ltl_spec
        | Rule::ctl_spec
        | Rule::invar_spec => "a section",
        other => return format!("{:?}", other),
    };
    s.to_string()
}

fn syntax_error(e: pest::error::Error<Rule>) -> Error {
    let e = e.renamed_rules(describe);
    let (line, column) = match e.line_col {
        LineColLocation::Pos(pos) => pos,
        LineColLocation::Span(start, _) => start,
    };
    Error::Parse {
        line,
        column,
        message: e.variant.message().into_owned(),
    }
}

fn error_at(pair: &Pair<'_>, message: impl Into<String>) -> Error {
    let (line, column) = pair.as_span().start_pos().line_col();
    Error::Parse {
        line,
        column,
        message: message.into(),
    }
}

fn root(mut pairs: Pairs<'_, Rule>) -> Result<Pair<'_>> {
    pairs.next().ok_or_else(|| Error::Parse {
        line: 1,
        column: 1,
        message: "empty input".to_string(),
    })
}

/// The next child of `parent`.
fn child<'i>(parent: &Pair<'i>, inner: &mut Pairs<'i, Rule>) -> Result<Pair<'i>> {
    inner
        .next()
        .ok_or_else(|| error_at(parent, format!("incomplete {}", describe(&parent.as_rule()))))
}

/// The first child of `parent` matching `rule`.
fn first<'i>(parent: &Pair<'i>, rule: Rule) -> Result<Pair<'i>> {
    parent
        .clone()
        .into_inner()
        .find(|p| p.as_rule() == rule)
        .ok_or_else(|| error_at(parent, format!("expected {}", describe(&rule))))
}

fn model(pair: Pair<'_>) -> Result<ModelAst> {
    let mut ast = ModelAst::default();

    for item in pair.into_inner() {
        match item.as_rule() {
            Rule::ident => ast.name = item.as_str().to_string(),
            Rule::var_section => {
                for decl in item.into_inner().filter(|p| p.as_rule() == Rule::var_decl) {
                    ast.vars.push(var_decl(decl)?);
                }
            }
            Rule::init_section => ast.init.push(expr(first(&item, Rule::expr)?)?),
            Rule::trans_section => ast.trans.push(expr(first(&item, Rule::expr)?)?),
            Rule::invar_section => ast.invar.push(expr(first(&item, Rule::expr)?)?),
            Rule::assign_section => {
                for a in item.into_inner().filter(|p| p.as_rule() == Rule::assignment) {
                    ast.assigns.push(assignment(a)?);
                }
            }
            Rule::ltl_spec => {
                let body = first(&item, Rule::expr)?;
                let text = source_text(&body).to_string();
                let formula = expr(body)?.in_context(ast.name.as_str());
                ast.properties.push(Property {
                    kind: PropertyKind::Ltl,
                    text,
                    formula: Some(formula),
                });
            }
            Rule::ctl_spec => ast.properties.push(raw_property(&item, PropertyKind::Ctl)?),
            Rule::invar_spec => ast.properties.push(raw_property(&item, PropertyKind::Invariant)?),
            Rule::extra_module => return Err(error_at(&item, "only a single module is supported")),
            _ => {}
        }
    }

    Ok(ast)
}

/// Source text of `pair` without the whitespace and comments skipped after it.
fn source_text<'i>(pair: &Pair<'i>) -> &'i str {
    let mut text = pair.as_str();
    loop {
        let trimmed = text.trim_end();
        let line = trimmed.rfind('\n').map_or(0, |i| i + 1);
        match trimmed[line..].find("--") {
            Some(i) => text = &trimmed[..line + i],
            None => return trimmed,
        }
    }
}

fn raw_property(pair: &Pair<'_>, kind: PropertyKind) -> Result<Property> {
    let raw = first(pair, Rule::raw_property)?;
    let text = source_text(&raw).trim_end_matches(';').trim_end();
    if text.is_empty() {
        return Err(error_at(&raw, "expected a property"));
    }
    Ok(Property {
        kind,
        text: text.to_string(),
        formula: None,
    })
}

fn var_decl(pair: Pair<'_>) -> Result<(String, Domain)> {
    let mut inner = pair.clone().into_inner();
    let name = child(&pair, &mut inner)?.as_str().to_string();
    let ty = child(&pair, &mut inner)?;
    let domain = match ty.as_rule() {
        Rule::boolean_type => Domain::Boolean,
        Rule::range_type => {
            let mut bounds = ty.clone().into_inner();
            let lo = integer(&child(&ty, &mut bounds)?)?;
            let hi = integer(&child(&ty, &mut bounds)?)?;
            Domain::Range(lo, hi)
        }
        Rule::enum_type => {
            let mut values = Vec::new();
            for v in ty.into_inner() {
                values.push(match v.as_rule() {
                    Rule::integer => Value::Int(integer(&v)?),
                    _ => Value::Symbol(v.as_str().to_string()),
                });
            }
            Domain::Enum(values)
        }
        _ => return Err(error_at(&ty, "expected a type")),
    };
    Ok((name, domain))
}

fn assignment(pair: Pair<'_>) -> Result<Assignment> {
    let mut inner = pair.clone().into_inner();
    let target = child(&pair, &mut inner)?;
    let (kind, var) = match target.as_rule() {
        Rule::init_target => (AssignKind::Init, first(&target, Rule::ident)?.as_str()),
        Rule::next_target => (AssignKind::Next, first(&target, Rule::ident)?.as_str()),
        _ => (AssignKind::Invariant, target.as_str()),
    };
    let rhs = rhs(child(&pair, &mut inner)?)?;
    Ok(Assignment {
        kind,
        var: var.to_string(),
        rhs,
    })
}

fn rhs(pair: Pair<'_>) -> Result<Rhs> {
    match pair.as_rule() {
        Rule::case_rhs => {
            let mut branches = Vec::new();
            for branch in pair.into_inner().filter(|p| p.as_rule() == Rule::case_branch) {
                let mut inner = branch.clone().into_inner();
                let guard = expr(child(&branch, &mut inner)?)?;
                let value = rhs(child(&branch, &mut inner)?)?;
                branches.push((guard, value));
            }
            Ok(Rhs::Case(branches))
        }
        Rule::set_rhs => Ok(Rhs::Set(pair.into_inner().map(expr).collect::<Result<_>>()?)),
        _ => Ok(Rhs::Expr(expr(pair)?)),
    }
}

fn integer(pair: &Pair<'_>) -> Result<i64> {
    pair.as_str()
        .parse()
        .map_err(|_| error_at(pair, format!("integer `{}` is too large", pair.as_str())))
}

/// Fold the operands of a left-associative level, skipping `U` tokens.
fn fold_left(pair: Pair<'_>, op: fn(Formula, Formula) -> Formula) -> Result<Formula> {
    let mut operands = pair.clone().into_inner().filter(|p| p.as_rule() != Rule::kw_until);
    let head = operands
        .next()
        .ok_or_else(|| error_at(&pair, "expected an expression"))?;
    let mut lhs = expr(head)?;
    for operand in operands {
        lhs = op(lhs, expr(operand)?);
    }
    Ok(lhs)
}

fn expr(pair: Pair<'_>) -> Result<Formula> {
    match pair.as_rule() {
        Rule::expr => fold_left(pair, Formula::iff),
        Rule::conjunction => fold_left(pair, Formula::and),
        Rule::until => fold_left(pair, Formula::until),
        Rule::implies => {
            let mut inner = pair.clone().into_inner();
            let lhs = expr(child(&pair, &mut inner)?)?;
            match inner.next() {
                Some(rhs) => Ok(lhs.implies(expr(rhs)?)),
                None => Ok(lhs),
            }
        }
        Rule::disjunction => {
            let mut inner = pair.clone().into_inner();
            let mut lhs = expr(child(&pair, &mut inner)?)?;
            while let Some(op) = inner.next() {
                let rhs = expr(child(&pair, &mut inner)?)?;
                let op = match op.as_str() {
                    "|" => BinaryOp::Or,
                    "xor" => BinaryOp::Xor,
                    _ => BinaryOp::Xnor,
                };
                lhs = Formula::binary(op, lhs, rhs);
            }
            Ok(lhs)
        }
        Rule::temporal => {
            let mut inner = pair.clone().into_inner();
            let head = child(&pair, &mut inner)?;
            if head.as_rule() != Rule::temporal_op {
                return expr(head);
            }
            let body = expr(child(&pair, &mut inner)?)?;
            Ok(match head.as_str() {
                "X" => body.next(),
                "F" => body.finally(),
                _ => body.globally(),
            })
        }
        Rule::comparison => {
            let mut inner = pair.clone().into_inner();
            let lhs = expr(child(&pair, &mut inner)?)?;
            let Some(op) = inner.next() else {
                return Ok(lhs);
            };
            let op = match op.as_str() {
                "=" => CompareOp::Eq,
                "!=" => CompareOp::Ne,
                "<" => CompareOp::Lt,
                ">" => CompareOp::Gt,
                "<=" => CompareOp::Le,
                _ => CompareOp::Ge,
            };
            let rhs = expr(child(&pair, &mut inner)?)?;
            Ok(Formula::compare(op, lhs, rhs))
        }
        Rule::negated => Ok(expr(first_child(&pair)?)?.not()),
        Rule::next_call => Ok(expr(first_child(&pair)?)?.next()),
        Rule::integer => Ok(Formula::Number(integer(&pair)?)),
        Rule::kw_true => Ok(Formula::True),
        Rule::kw_false => Ok(Formula::False),
        Rule::ident => Ok(Formula::Atom(pair.as_str().to_string())),
        _ => Err(error_at(&pair, "expected an expression")),
    }
}

fn first_child<'i>(pair: &Pair<'i>) -> Result<Pair<'i>> {
    child(pair, &mut pair.clone().into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence() {
        let f = parse_formula("a | b & c -> d <-> e").unwrap();
        let a = Formula::atom("a");
        let bc = Formula::atom("b").and(Formula::atom("c"));
        let expected = a.or(bc).implies(Formula::atom("d")).iff(Formula::atom("e"));
        assert_eq!(f, expected);
    }

    #[test]
    fn test_implication_is_right_associative() {
        let f = parse_formula("a -> b -> c").unwrap();
        let expected = Formula::atom("a").implies(Formula::atom("b").implies(Formula::atom("c")));
        assert_eq!(f, expected);
    }

    #[test]
    fn test_temporal_operators() {
        let f = parse_formula("G F p -> G F s = busy").unwrap();
        let expected = Formula::atom("p")
            .infinitely_often()
            .implies(Formula::eq(Formula::atom("s"), Formula::atom("busy")).infinitely_often());
        assert_eq!(f, expected);

        let g = parse_formula("X p U !G q").unwrap();
        let expected = Formula::atom("p").next().until(Formula::atom("q").globally().not());
        assert_eq!(g, expected);
    }

    #[test]
    fn test_keywords_need_word_boundaries() {
        let f = parse_formula("Gp & Xor_flag | F1").unwrap();
        let expected = Formula::atom("Gp")
            .and(Formula::atom("Xor_flag"))
            .or(Formula::atom("F1"));
        assert_eq!(f, expected);
        assert_eq!(
            parse_formula("a xor b").unwrap(),
            Formula::binary(BinaryOp::Xor, Formula::atom("a"), Formula::atom("b"))
        );
    }

    #[test]
    fn test_comparisons() {
        let f = parse_formula("next(x) = !x").unwrap();
        assert_eq!(f, Formula::eq(Formula::atom("x").next(), Formula::atom("x").not()));

        let g = parse_formula("n >= -2 & !(n != 3)").unwrap();
        let expected = Formula::compare(CompareOp::Ge, Formula::atom("n"), Formula::number(-2))
            .and(Formula::compare(CompareOp::Ne, Formula::atom("n"), Formula::number(3)).not());
        assert_eq!(g, expected);

        // `<` must not swallow the start of `<->`
        let h = parse_formula("a <-> b < 1").unwrap();
        let expected = Formula::atom("a").iff(Formula::compare(
            CompareOp::Lt,
            Formula::atom("b"),
            Formula::number(1),
        ));
        assert_eq!(h, expected);
    }

    #[test]
    fn test_display_parses_back() {
        for source in [
            "G F p -> G F q",
            "!(p & q) | r xor s",
            "(X s) = idle",
            "G (p U q)",
            "!(n <= -2)",
            "(p -> q) -> r",
            "a <-> b <-> c",
        ] {
            let f = parse_formula(source).unwrap();
            assert_eq!(f.to_string(), source);
            assert_eq!(parse_formula(&f.to_string()).unwrap(), f);
        }
    }

    #[test]
    fn test_model() {
        let source = "
MODULE main
VAR
  x : boolean;
  s : {idle, busy};
  n : 0..3;
INIT !x & s = idle
TRANS next(x) = !x
ASSIGN
  init(n) := 0;
  next(n) := case n < 3 : {n, 3}; TRUE : {0, 1}; esac;
LTLSPEC G F x -> G F s = busy
CTLSPEC AG (x -> EF !x)
INVARSPEC n <= 3;
";
        let ast = parse_model(source).unwrap();
        assert_eq!(ast.name, "main");
        assert_eq!(
            ast.vars,
            vec![
                ("x".to_string(), Domain::Boolean),
                (
                    "s".to_string(),
                    Domain::Enum(vec![Value::symbol("idle"), Value::symbol("busy")])
                ),
                ("n".to_string(), Domain::Range(0, 3)),
            ]
        );
        assert_eq!(ast.init.len(), 1);
        assert_eq!(ast.trans.len(), 1);
        assert_eq!(ast.assigns.len(), 2);
        assert_eq!(ast.assigns[0].kind, AssignKind::Init);
        assert_eq!(ast.assigns[1].kind, AssignKind::Next);
        assert!(matches!(&ast.assigns[1].rhs, Rhs::Case(branches) if branches.len() == 2));

        assert_eq!(ast.properties.len(), 3);
        assert_eq!(ast.properties[0].kind, PropertyKind::Ltl);
        assert_eq!(ast.properties[0].text, "G F x -> G F s = busy");
        assert!(matches!(&ast.properties[0].formula, Some(Formula::Context(name, _)) if name == "main"));
        assert_eq!(ast.properties[1].kind, PropertyKind::Ctl);
        assert_eq!(ast.properties[1].text, "AG (x -> EF !x)");
        assert_eq!(ast.properties[1].formula, None);
        assert_eq!(ast.properties[2].kind, PropertyKind::Invariant);
        assert_eq!(ast.properties[2].text, "n <= 3");
    }

    #[test]
    fn test_comments_and_invariant_assignments() {
        let source = "
MODULE main -- the only module
VAR
  x : boolean; -- a flag
  y : boolean;
ASSIGN
  y := !x;
LTLSPEC G F x -> G F y -- liveness
-- trailing comment
";
        let ast = parse_model(source).unwrap();
        assert_eq!(ast.vars.len(), 2);
        assert_eq!(ast.assigns.len(), 1);
        assert_eq!(ast.assigns[0].kind, AssignKind::Invariant);
        assert_eq!(ast.assigns[0].var, "y");
        assert_eq!(ast.assigns[0].rhs, Rhs::Expr(Formula::atom("x").not()));
        assert_eq!(ast.properties[0].text, "G F x -> G F y");
    }

    #[test]
    fn test_errors_carry_positions() {
        let err = parse_model("MODULE main\nVAR\n  x : boolean;\nINIT x @").unwrap_err();
        match err {
            Error::Parse { line, column, message } => {
                assert_eq!((line, column), (4, 8));
                assert!(!message.is_empty());
            }
            other => panic!("unexpected error: {:?}", other),
        }

        assert!(matches!(parse_formula("p &"), Err(Error::Parse { .. })));
        assert!(matches!(parse_formula("p q"), Err(Error::Parse { .. })));
        assert!(matches!(parse_model("VAR x : boolean;"), Err(Error::Parse { line: 1, column: 1, .. })));
    }

    #[test]
    fn test_integer_too_large() {
        let err = parse_formula("n = 99999999999999999999").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, column: 5, .. }));
    }

    #[test]
    fn test_single_module() {
        let err = parse_model("MODULE main\nMODULE other").unwrap_err();
        match err {
            Error::Parse { line, message, .. } => {
                assert_eq!(line, 2);
                assert!(message.contains("single module"), "{}", message);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
