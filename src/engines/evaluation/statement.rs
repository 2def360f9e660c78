use crate::engines::evaluation::input::InputSource;
use crate::types::Value;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Unknown,
    Define,
    Input,
    Output,
    Assign,
    Loop,
    Conditional,
    End,
    Comment,
}

impl StatementKind {
    pub fn keyword(self) -> &'static str {
        match self {
            StatementKind::Define => "define",
            StatementKind::Input => "input",
            StatementKind::Output => "output",
            StatementKind::Assign => "let",
            StatementKind::Loop => "while",
            StatementKind::Conditional => "if",
            StatementKind::End => "end",
            StatementKind::Comment => "#",
            StatementKind::Unknown => "?",
        }
    }

    pub fn is_block(self) -> bool {
        matches!(self, StatementKind::Loop | StatementKind::Conditional)
    }
}

/// Named parts of a statement's tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexicalElement {
    Target,
    LeftOperand,
    Operator,
    RightOperand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl ArithmeticOp {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "+" => Some(ArithmeticOp::Add),
            "-" => Some(ArithmeticOp::Subtract),
            "*" => Some(ArithmeticOp::Multiply),
            "/" => Some(ArithmeticOp::Divide),
            "%" => Some(ArithmeticOp::Modulo),
            _ => None,
        }
    }

    /// Wrapping arithmetic; division and modulo by zero give 0.
    pub fn apply(self, lhs: Value, rhs: Value) -> Value {
        match self {
            ArithmeticOp::Add => lhs.wrapping_add(rhs),
            ArithmeticOp::Subtract => lhs.wrapping_sub(rhs),
            ArithmeticOp::Multiply => lhs.wrapping_mul(rhs),
            ArithmeticOp::Divide if rhs == 0 => 0,
            ArithmeticOp::Divide => lhs.wrapping_div(rhs),
            ArithmeticOp::Modulo if rhs == 0 => 0,
            ArithmeticOp::Modulo => lhs.wrapping_rem(rhs),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Less,
    LessOrEqual,
    Equal,
    GreaterOrEqual,
    Greater,
    NotEqual,
}

impl ComparisonOp {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "<" => Some(ComparisonOp::Less),
            "<=" => Some(ComparisonOp::LessOrEqual),
            "=" => Some(ComparisonOp::Equal),
            ">=" => Some(ComparisonOp::GreaterOrEqual),
            ">" => Some(ComparisonOp::Greater),
            "!=" => Some(ComparisonOp::NotEqual),
            _ => None,
        }
    }

    pub fn apply(self, lhs: Value, rhs: Value) -> bool {
        match self {
            ComparisonOp::Less => lhs < rhs,
            ComparisonOp::LessOrEqual => lhs <= rhs,
            ComparisonOp::Equal => lhs == rhs,
            ComparisonOp::GreaterOrEqual => lhs >= rhs,
            ComparisonOp::Greater => lhs > rhs,
            ComparisonOp::NotEqual => lhs != rhs,
        }
    }
}

/// Mutable state a program runs against.
pub struct Runtime<'a> {
    pub symbols: &'a mut HashMap<String, Value>,
    pub inputs: &'a mut dyn InputSource,
    pub outputs: &'a mut Vec<Value>,
    /// Loop iterations left for the whole run, shared by every loop; `None` is unbounded.
    pub remaining_iterations: Option<usize>,
}

impl Runtime<'_> {
    /// Variable value for identifiers, literal value otherwise. The flag is
    /// false when the name is undefined or the literal does not parse.
    fn resolve(&self, token: &str) -> (Value, bool) {
        if starts_with_letter(token) {
            match self.symbols.get(token) {
                Some(value) => (*value, true),
                None => {
                    log::debug!("Undefined variable {}", token);
                    (0, false)
                }
            }
        } else {
            match token.parse::<Value>() {
                Ok(value) => (value, true),
                Err(_) => {
                    log::debug!("Unparseable literal {}", token);
                    (0, false)
                }
            }
        }
    }
}

/// One parsed line, plus the nested body for blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    kind: StatementKind,
    text: String,
    elements: HashMap<LexicalElement, String>,
    declared: Vec<String>,
    closes: Option<StatementKind>,
    body: Vec<Statement>,
    valid: bool,
}

impl Statement {
    pub fn parse(line: &str) -> Self {
        let lowered = line.trim().to_lowercase();
        let tokens: Vec<&str> = lowered.split_whitespace().collect();

        let mut statement = Statement {
            kind: StatementKind::Unknown,
            text: line.trim().to_string(),
            elements: HashMap::new(),
            declared: Vec::new(),
            closes: None,
            body: Vec::new(),
            valid: false,
        };

        let Some(first) = tokens.first() else {
            return statement;
        };
        let tail = &tokens[1..];

        statement.valid = match *first {
            "define" => statement.parse_define(tail),
            "input" => statement.parse_target(StatementKind::Input, tail, true),
            "output" => statement.parse_target(StatementKind::Output, tail, false),
            "let" => statement.parse_assign(tail),
            "while" => statement.parse_condition(StatementKind::Loop, tail),
            "if" => statement.parse_condition(StatementKind::Conditional, tail),
            "end" => statement.parse_end(tail),
            token if token.starts_with('#') => {
                statement.kind = StatementKind::Comment;
                true
            }
            _ => false,
        };

        statement
    }

    fn parse_define(&mut self, tail: &[&str]) -> bool {
        self.kind = StatementKind::Define;
        let joined = tail.join(" ");
        let names: Vec<String> = joined.split(',').map(|n| n.trim().to_string()).collect();

        if names.iter().any(|n| !is_identifier(n)) {
            return false;
        }
        self.declared = names;
        true
    }

    fn parse_target(&mut self, kind: StatementKind, tail: &[&str], identifier_only: bool) -> bool {
        self.kind = kind;
        let [target] = tail else {
            return false;
        };
        if identifier_only && !is_identifier(target) {
            return false;
        }
        self.elements.insert(LexicalElement::Target, target.to_string());
        true
    }

    fn parse_assign(&mut self, tail: &[&str]) -> bool {
        self.kind = StatementKind::Assign;
        let [target, "<-", left, op, right] = tail else {
            return false;
        };
        if !is_identifier(target) || ArithmeticOp::from_token(op).is_none() {
            return false;
        }
        self.elements.insert(LexicalElement::Target, target.to_string());
        self.insert_expression(left, op, right);
        true
    }

    fn parse_condition(&mut self, kind: StatementKind, tail: &[&str]) -> bool {
        self.kind = kind;
        let ["(", left, op, right, ")"] = tail else {
            return false;
        };
        if ComparisonOp::from_token(op).is_none() {
            return false;
        }
        self.insert_expression(left, op, right);
        true
    }

    fn parse_end(&mut self, tail: &[&str]) -> bool {
        self.kind = StatementKind::End;
        self.closes = match tail {
            ["while"] => Some(StatementKind::Loop),
            ["if"] => Some(StatementKind::Conditional),
            _ => None,
        };
        self.closes.is_some()
    }

    fn insert_expression(&mut self, left: &str, op: &str, right: &str) {
        self.elements.insert(LexicalElement::LeftOperand, left.to_string());
        self.elements.insert(LexicalElement::Operator, op.to_string());
        self.elements.insert(LexicalElement::RightOperand, right.to_string());
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn element(&self, element: LexicalElement) -> Option<&str> {
        self.elements.get(&element).map(String::as_str)
    }

    pub fn declared(&self) -> &[String] {
        &self.declared
    }

    /// The block kind an `end` closes.
    pub fn closes(&self) -> Option<StatementKind> {
        self.closes
    }

    pub fn body(&self) -> &[Statement] {
        &self.body
    }

    pub(crate) fn nest(&mut self, statement: Statement) {
        self.body.push(statement);
    }

    /// Run this statement. Returns false if anything went wrong along the
    /// way; execution of nested statements continues regardless.
    pub fn execute(&self, runtime: &mut Runtime<'_>) -> bool {
        match self.kind {
            StatementKind::Output => {
                let (value, ok) = runtime.resolve(self.operand(LexicalElement::Target));
                runtime.outputs.push(value);
                ok
            }
            StatementKind::Input => {
                let target = self.operand(LexicalElement::Target).to_string();
                match runtime.inputs.read() {
                    Some(value) => {
                        runtime.symbols.insert(target, value);
                        true
                    }
                    None => {
                        log::debug!("Input exhausted at `{}`", self.text);
                        runtime.symbols.insert(target, 0);
                        false
                    }
                }
            }
            StatementKind::Assign => {
                let (value, ok) = self.arithmetic(runtime);
                let target = self.operand(LexicalElement::Target).to_string();
                runtime.symbols.insert(target, value);
                ok
            }
            StatementKind::Conditional => {
                let (holds, mut ok) = self.condition(runtime);
                if holds {
                    ok &= self.execute_body(runtime);
                }
                ok
            }
            StatementKind::Loop => self.execute_loop(runtime),
            StatementKind::Define
            | StatementKind::End
            | StatementKind::Comment
            | StatementKind::Unknown => true,
        }
    }

    fn execute_loop(&self, runtime: &mut Runtime<'_>) -> bool {
        let mut ok = true;

        loop {
            if let Some(remaining) = runtime.remaining_iterations {
                if remaining == 0 {
                    log::debug!("Loop budget exhausted at `{}`", self.text);
                    break;
                }
                runtime.remaining_iterations = Some(remaining - 1);
            }

            let (holds, resolved) = self.condition(runtime);
            ok &= resolved;
            if !holds {
                break;
            }
            ok &= self.execute_body(runtime);
        }

        ok
    }

    fn execute_body(&self, runtime: &mut Runtime<'_>) -> bool {
        self.body
            .iter()
            .fold(true, |ok, statement| statement.execute(runtime) && ok)
    }

    fn arithmetic(&self, runtime: &Runtime<'_>) -> (Value, bool) {
        let (lhs, left_ok) = runtime.resolve(self.operand(LexicalElement::LeftOperand));
        let (rhs, right_ok) = runtime.resolve(self.operand(LexicalElement::RightOperand));
        match ArithmeticOp::from_token(self.operand(LexicalElement::Operator)) {
            Some(op) => (op.apply(lhs, rhs), left_ok && right_ok),
            None => (0, false),
        }
    }

    fn condition(&self, runtime: &Runtime<'_>) -> (bool, bool) {
        let (lhs, left_ok) = runtime.resolve(self.operand(LexicalElement::LeftOperand));
        let (rhs, right_ok) = runtime.resolve(self.operand(LexicalElement::RightOperand));
        match ComparisonOp::from_token(self.operand(LexicalElement::Operator)) {
            Some(op) => (op.apply(lhs, rhs), left_ok && right_ok),
            None => (false, false),
        }
    }

    fn operand(&self, element: LexicalElement) -> &str {
        self.element(element).unwrap_or("")
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn starts_with_letter(token: &str) -> bool {
    token.chars().next().is_some_and(|c| c.is_alphabetic())
}

fn is_identifier(token: &str) -> bool {
    starts_with_letter(token) && token.chars().all(|c| c.is_alphanumeric() || c == '_')
}
