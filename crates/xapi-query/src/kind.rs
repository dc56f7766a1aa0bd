use crate::variants;

variants! {
    /// Discriminant of an expression node, written under `type`.
    pub enum ExpressionType("expression type", EXPRESSION_TYPES) {
        Alias => "alias", "alias";
        Between => "between", "between";
        Binary => "binary", "binary";
        Case => "case", "case";
        Collate => "collate", "collate";
        Column => "col", "col", ["column"];
        Compound => "compound", "compound";
        CountRows => "count_rows", "Count Rows";
        DateTime => "dt", "dt", ["datetime", "date_time"];
        Exists => "exists", "exists";
        Function => "function", "function";
        GroupConcat => "group_concat", "Group Concat";
        In => "in", "in";
        InSelect => "in_select", "In Select";
        IsNull => "is_null", "Is Null";
        LocalDateTime => "ldt", "ldt", ["localdatetime"];
        Null => "null", "null";
        Number => "number", "number";
        Search => "search", "search";
        Select => "select", "select";
        String => "string", "string";
        Unary => "unary", "unary";
    }
}

variants! {
    /// Discriminant of a source node.
    pub enum SourceType("source type", SOURCE_TYPES) {
        SystemTable => "ts", "ts", ["table_system"];
        DatabaseTable => "td", "td", ["table_database"];
        Join => "join", "join";
        Select => "select", "select";
    }
}

variants! {
    /// Kind of join constraint.
    pub enum ConstraintType("constraint type", CONSTRAINT_TYPES) {
        On => "on", "ON";
        Using => "using", "USING";
    }
}

variants! {
    pub enum OrderType("order type", ORDER_TYPES) {
        Asc => "asc", "ASC";
        Desc => "desc", "DESC";
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::Variant;
    use serde_json::json;
    use xapi_model::ApiError;

    #[test]
    fn test_aliases_parse_to_canonical() {
        assert_eq!(ExpressionType::parse("column").unwrap(), ExpressionType::Column);
        assert_eq!(ExpressionType::parse("date_time").unwrap(), ExpressionType::DateTime);
        assert_eq!(ExpressionType::parse("localdatetime").unwrap(), ExpressionType::LocalDateTime);
        assert_eq!(SourceType::parse("table_database").unwrap(), SourceType::DatabaseTable);
        assert_eq!(ExpressionType::Column.name(), "col");
        assert_eq!(SourceType::DatabaseTable.name(), "td");
    }

    #[test]
    fn test_names_match_exactly() {
        assert!(ExpressionType::parse("COL").is_err());
        assert!(ExpressionType::parse("LocalDateTime").is_err());
        assert!(ExpressionType::parse(" col").is_err());
        assert!(OrderType::parse("DESC").is_err());
    }

    #[test]
    fn test_unknown_name() {
        let err = ExpressionType::parse("cube").unwrap_err();
        assert_eq!(
            err,
            ApiError::UnknownVariant {
                kind: "expression type",
                value: "cube".to_string()
            }
        );
        assert!(OrderType::from_json(&json!(1)).is_err());
    }

    #[test]
    fn test_labels() {
        assert_eq!(ExpressionType::CountRows.to_string(), "Count Rows");
        assert_eq!(ExpressionType::Column.label(), "col");
        assert_eq!(OrderType::Desc.to_string(), "DESC");
        assert_eq!(ConstraintType::Using.label(), "USING");
    }

    #[test]
    fn test_serde_writes_canonical_name() {
        let parsed: SourceType = serde_json::from_value(json!("table_system")).unwrap();
        assert_eq!(serde_json::to_value(parsed).unwrap(), json!("ts"));
        assert!(serde_json::from_value::<OrderType>(json!("sideways")).is_err());
    }

    #[test]
    fn test_values_in_declaration_order() {
        assert_eq!(ExpressionType::values().len(), 22);
        assert_eq!(ExpressionType::values()[0], ExpressionType::Alias);
        assert_eq!(ExpressionType::Column.aliases(), &["column"]);
        assert!(OrderType::Asc.aliases().is_empty());
    }
}
