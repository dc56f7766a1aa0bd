use crate::variants;
use std::cmp::Ordering;
use xapi_model::Value;

variants! {
    /// Binary operators
    pub enum BinaryOperator("binary operator", BINARY_OPERATORS) {
        And => "and", "AND";
        Or => "or", "OR";
        Equal => "=", "=";
        NotEqual => "!=", "!=";
        Less => "<", "<";
        LessOrEqual => "<=", "<=";
        Greater => ">", ">";
        GreaterOrEqual => ">=", ">=";
        Is => "is", "IS";
        Like => "like", "LIKE";
        Regexp => "regexp", "REGEXP";
        Plus => "+", "+";
        Minus => "-", "-";
        Multiply => "*", "*";
        Divide => "/", "/";
        Modulo => "%", "%";
        BitAnd => "&", "&";
        BitOr => "|", "|";
        ShiftLeft => "<<", "<<";
        ShiftRight => ">>", ">>";
    }
}

variants! {
    /// Unary operators
    pub enum UnaryOperator("unary operator", UNARY_OPERATORS) {
        Not => "not", "NOT";
        Negate => "-", "-";
        BitInvert => "~", "~";
    }
}

variants! {
    /// Operators joining a flat list of expressions.
    pub enum CompoundOperator("compound operator", COMPOUND_OPERATORS) {
        And => "and", "AND";
        Or => "or", "OR";
    }
}

variants! {
    pub enum JoinOperator("join operator", JOIN_OPERATORS) {
        Join => "join", "JOIN";
        Left => "left", "LEFT";
        LeftOuter => "left_outer", "LEFT_OUTER";
        Inner => "inner", "INNER";
        Cross => "cross", "CROSS";
    }
}

variants! {
    /// Operators of a full-text search term.
    pub enum SearchOperator("search operator", SEARCH_OPERATORS) {
        Equal => "=", "=";
        NotEqual => "!=", "!=";
        Less => "<", "<";
        LessOrEqual => "<=", "<=";
        Greater => ">", ">";
        GreaterOrEqual => ">=", ">=";
        Contains => "contains", "contains";
        NotContains => "not_contains", "Not Contains";
        StartsWith => "starts_with", "Starts With";
        NotStartsWith => "not_starts_with", "Not Starts With";
        EndsWith => "ends_with", "Ends With";
        NotEndsWith => "not_ends_with", "Not Ends With";
        IsNull => "is_null", "Is Null";
        IsNotNull => "is_not_null", "Is Not Null";
    }
}

impl SearchOperator {
    /// Evaluates `a <op> b` client-side.
    ///
    /// Text operators compare the lowercased string forms; ordering
    /// operators are false for values that do not compare.
    pub fn eval(&self, a: &Value, b: &Value) -> bool {
        let text = |v: &Value| v.to_string().to_lowercase();
        let ordering = a.compare(b);
        match self {
            SearchOperator::Equal => a == b || ordering == Some(Ordering::Equal),
            SearchOperator::NotEqual => !(a == b || ordering == Some(Ordering::Equal)),
            SearchOperator::Less => ordering == Some(Ordering::Less),
            SearchOperator::LessOrEqual => {
                matches!(ordering, Some(Ordering::Less | Ordering::Equal))
            }
            SearchOperator::Greater => ordering == Some(Ordering::Greater),
            SearchOperator::GreaterOrEqual => {
                matches!(ordering, Some(Ordering::Greater | Ordering::Equal))
            }
            SearchOperator::Contains => text(a).contains(&text(b)),
            SearchOperator::NotContains => !text(a).contains(&text(b)),
            SearchOperator::StartsWith => text(a).starts_with(&text(b)),
            SearchOperator::NotStartsWith => !text(a).starts_with(&text(b)),
            SearchOperator::EndsWith => text(a).ends_with(&text(b)),
            SearchOperator::NotEndsWith => !text(a).ends_with(&text(b)),
            SearchOperator::IsNull => a.is_null(),
            SearchOperator::IsNotNull => !a.is_null(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::Variant;

    #[test]
    fn test_binary_operator_display() {
        assert_eq!(format!("{}", BinaryOperator::Equal), "=");
        assert_eq!(format!("{}", BinaryOperator::And), "AND");
        assert_eq!(format!("{}", BinaryOperator::Regexp), "REGEXP");
        assert_eq!(BinaryOperator::parse("like").unwrap(), BinaryOperator::Like);
        assert!(BinaryOperator::parse("LIKE").is_err());
        assert_eq!(BinaryOperator::ShiftLeft.name(), "<<");
    }

    #[test]
    fn test_operator_registries_are_distinct() {
        assert!(UnaryOperator::parse("+").is_err());
        assert!(CompoundOperator::parse("=").is_err());
        assert_eq!(JoinOperator::parse("left_outer").unwrap().label(), "LEFT_OUTER");
        assert_eq!(SearchOperator::NotContains.label(), "Not Contains");
    }

    #[test]
    fn test_search_text_operators_ignore_case() {
        let a = Value::from("Hello World");
        assert!(SearchOperator::Contains.eval(&a, &"WORLD".into()));
        assert!(SearchOperator::StartsWith.eval(&a, &"hello".into()));
        assert!(SearchOperator::EndsWith.eval(&a, &"LD".into()));
        assert!(SearchOperator::NotContains.eval(&a, &"mars".into()));
        assert!(!SearchOperator::NotStartsWith.eval(&a, &"HE".into()));
    }

    #[test]
    fn test_search_comparisons() {
        assert!(SearchOperator::Equal.eval(&Value::Int(2), &Value::Float(2.0)));
        assert!(SearchOperator::Less.eval(&Value::Int(1), &Value::Int(2)));
        assert!(SearchOperator::GreaterOrEqual.eval(&Value::Int(2), &Value::Int(2)));
        assert!(!SearchOperator::Greater.eval(&Value::Int(2), &"abc".into()));
        assert!(SearchOperator::NotEqual.eval(&"a".into(), &"b".into()));
    }

    #[test]
    fn test_search_null_checks() {
        assert!(SearchOperator::IsNull.eval(&Value::Null, &Value::Null));
        assert!(SearchOperator::IsNotNull.eval(&Value::Int(0), &Value::Null));
    }
}
